//! Mode button sources
//!
//! Both sources only post [`ButtonEvent`]s; the panel applies them on its
//! next refresh.

use crate::mode::ButtonEvent;
use std::io::{self, BufRead, BufReader};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

#[cfg(feature = "gpio")]
pub use gpio::GpioButton;

/// Treat each line on stdin (Enter) as a button press, for bench use
///
/// Runs on a detached OS thread; a pending read never blocks runtime shutdown.
pub fn spawn_stdin_button(events: UnboundedSender<ButtonEvent>) -> JoinHandle<()> {
    info!("Press Enter to cycle display mode");
    spawn_line_button(BufReader::new(io::stdin()), events)
}

/// Post one press per line read from `reader` until EOF or the panel is gone
pub fn spawn_line_button<R>(reader: R, events: UnboundedSender<ButtonEvent>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            if line.is_err() || events.send(ButtonEvent::Pressed).is_err() {
                break;
            }
        }
        debug!("Line button source finished");
    })
}

#[cfg(feature = "gpio")]
mod gpio {
    use super::ButtonEvent;
    use crate::error::PanelError;
    use rppal::gpio::{Gpio, InputPin, Trigger};
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedSender;
    use tracing::info;

    /// Push button on a Raspberry Pi GPIO pin, wired to ground
    pub struct GpioButton {
        // Interrupt is cleared when the pin is dropped
        _pin: InputPin,
    }

    impl GpioButton {
        /// Watch `bcm_pin` for debounced falling edges
        pub fn watch(
            bcm_pin: u8,
            debounce: Duration,
            events: UnboundedSender<ButtonEvent>,
        ) -> Result<Self, PanelError> {
            let mut pin = Gpio::new()?.get(bcm_pin)?.into_input_pullup();
            pin.set_async_interrupt(Trigger::FallingEdge, Some(debounce), move |_event| {
                let _ = events.send(ButtonEvent::Pressed);
            })?;

            info!("Mode button on GPIO {} ({:?} debounce)", bcm_pin, debounce);
            Ok(Self { _pin: pin })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::DisplayMode;
    use crate::panel::Panel;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_enter_presses_reach_panel() {
        let (events, mut panel) = Panel::channel();

        let source = spawn_line_button(Cursor::new("\n\n"), events);
        tokio::task::spawn_blocking(move || source.join())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(panel.apply_events(), 2);
        assert_eq!(panel.mode(), DisplayMode::Diagnostics);
    }

    #[tokio::test]
    async fn test_source_stops_when_panel_dropped() {
        let (events, panel) = Panel::channel();
        drop(panel);

        let source = spawn_line_button(Cursor::new("\n\n\n"), events);
        let joined = tokio::task::spawn_blocking(move || source.join()).await.unwrap();
        assert!(joined.is_ok());
    }
}
