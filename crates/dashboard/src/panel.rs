//! Interactive 320x240 panel
//!
//! The panel keeps all three field groups current on every refresh and shows
//! one of them. Button presses arrive as [`ButtonEvent`]s on a channel and are
//! applied at the start of the next refresh, so the interrupt context never
//! touches panel state directly.

use crate::fields::{FieldGroup, FieldGroups};
use crate::framebuffer::{FrameBuffer, WIDTH};
use crate::mode::{ButtonEvent, DisplayMode};
use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_9X15};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use obd_sampler::{Presenter, Snapshot};
use std::io::{self, Seek, Write};
use tokio::sync::mpsc;
use tracing::debug;

const HEADER_HEIGHT: u32 = 28;
const MARGIN: i32 = 8;
const VALUE_X: i32 = 170;
const ROW_HEIGHT: i32 = 44;
const LINE_HEIGHT: i32 = 22;

/// Characters of FONT_10X20 that fit right of the label column
const VALUE_COLUMNS: usize = ((WIDTH as i32 - VALUE_X - MARGIN) / 10) as usize;

const HEADER_COLOR: Rgb565 = Rgb565::new(4, 12, 16);
const LABEL_COLOR: Rgb565 = Rgb565::new(22, 44, 22);

/// Panel model: field groups plus the visible mode
pub struct Panel {
    groups: FieldGroups,
    mode: DisplayMode,
    events: mpsc::UnboundedReceiver<ButtonEvent>,
}

impl Panel {
    pub fn new(events: mpsc::UnboundedReceiver<ButtonEvent>) -> Self {
        Self {
            groups: FieldGroups::new(),
            mode: DisplayMode::default(),
            events,
        }
    }

    /// Create a panel together with the sender button sources post to
    pub fn channel() -> (mpsc::UnboundedSender<ButtonEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }

    /// Drain pending button events, returning how many were applied
    pub fn apply_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(ButtonEvent::Pressed) = self.events.try_recv() {
            self.mode = self.mode.next();
            applied += 1;
        }
        if applied > 0 {
            debug!("Display mode now {:?}", self.mode);
        }
        applied
    }

    pub fn update(&mut self, snapshot: &Snapshot) {
        self.groups.update(snapshot);
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn visible(&self) -> &FieldGroup {
        self.groups.group(self.mode)
    }

    /// Draw the visible group
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(Rgb565::BLACK)?;

        Rectangle::new(Point::zero(), Size::new(WIDTH, HEADER_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(HEADER_COLOR))
            .draw(target)?;

        let title_style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
        let label_style = MonoTextStyle::new(&FONT_9X15, LABEL_COLOR);
        let value_style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
        let top = TextStyleBuilder::new().baseline(Baseline::Top).build();
        let top_right = TextStyleBuilder::new()
            .baseline(Baseline::Top)
            .alignment(Alignment::Right)
            .build();

        Text::with_text_style(self.mode.title(), Point::new(MARGIN, 4), title_style, top)
            .draw(target)?;
        let page = format!("{}/{}", self.mode.page(), DisplayMode::ALL.len());
        Text::with_text_style(
            &page,
            Point::new(WIDTH as i32 - MARGIN, 4),
            title_style,
            top_right,
        )
        .draw(target)?;

        let mut y = HEADER_HEIGHT as i32 + 12;
        for field in self.visible().fields() {
            Text::with_text_style(field.label, Point::new(MARGIN, y + 3), label_style, top)
                .draw(target)?;

            let lines = wrap(&field.value, VALUE_COLUMNS);
            for (i, line) in lines.iter().enumerate() {
                Text::with_text_style(
                    line,
                    Point::new(VALUE_X, y + i as i32 * LINE_HEIGHT),
                    value_style,
                    top,
                )
                .draw(target)?;
            }
            y += ROW_HEIGHT.max(lines.len() as i32 * LINE_HEIGHT + 8);
        }

        Ok(())
    }
}

/// Word-wrap on spaces; words longer than `columns` get a line of their own
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 1 + word.chars().count() <= columns => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Presenter that renders the panel into a framebuffer sink each refresh
pub struct PanelPresenter<S> {
    panel: Panel,
    frame: FrameBuffer,
    sink: S,
}

impl<S: Write + Seek> PanelPresenter<S> {
    pub fn new(panel: Panel, sink: S) -> Self {
        Self {
            panel,
            frame: FrameBuffer::new(),
            sink,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

impl<S: Write + Seek> Presenter for PanelPresenter<S> {
    fn present(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.panel.apply_events();
        self.panel.update(snapshot);
        match self.panel.render(&mut self.frame) {
            Ok(()) => {}
            Err(never) => match never {},
        }
        self.frame.flush_to(&mut self.sink)
    }
}
