//! In-memory RGB565 frame flushed to a Linux framebuffer device

use crate::error::PanelError;
use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use std::convert::Infallible;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::info;

/// Panel width in pixels
pub const WIDTH: u32 = 320;

/// Panel height in pixels
pub const HEIGHT: u32 = 240;

/// Full 320x240 frame, row-major
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; (WIDTH * HEIGHT) as usize],
        }
    }

    /// Open a framebuffer device such as `/dev/fb0` for writing
    pub fn open_device(path: impl AsRef<Path>) -> Result<File, PanelError> {
        let path = path.as_ref();
        info!("Opening framebuffer {}", path.display());
        OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| PanelError::Framebuffer {
                path: path.display().to_string(),
                source,
            })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[(y * WIDTH + x) as usize])
        } else {
            None
        }
    }

    /// Little-endian RGB565, the 16 bpp fbdev layout
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| RawU16::from(*color).into_inner().to_le_bytes())
            .collect()
    }

    /// Write the whole frame from the start of `out`
    pub fn flush_to<W: Write + Seek>(&self, out: &mut W) -> io::Result<()> {
        out.seek(SeekFrom::Start(0))?;
        out.write_all(&self.to_bytes())?;
        out.flush()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < WIDTH && y < HEIGHT {
                self.pixels[(y * WIDTH + x) as usize] = color;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use std::io::Cursor;

    #[test]
    fn test_out_of_bounds_pixels_ignored() {
        let mut frame = FrameBuffer::new();
        Rectangle::new(Point::new(-5, -5), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut frame)
            .unwrap();

        assert_eq!(frame.pixel(0, 0), Some(Rgb565::RED));
        assert_eq!(frame.pixel(5, 5), Some(Rgb565::BLACK));
        assert_eq!(frame.pixel(WIDTH, 0), None);
    }

    #[test]
    fn test_flush_rewrites_from_start() {
        let mut frame = FrameBuffer::new();
        let mut device = Cursor::new(Vec::new());
        frame.flush_to(&mut device).unwrap();

        frame.clear(Rgb565::WHITE).unwrap();
        frame.flush_to(&mut device).unwrap();

        let bytes = device.into_inner();
        assert_eq!(bytes.len(), (WIDTH * HEIGHT * 2) as usize);
        assert_eq!(&bytes[..2], &[0xFF, 0xFF]);
    }
}
