//! Presentation Error Types

use thiserror::Error;

/// Errors while setting up the panel
#[derive(Debug, Error)]
pub enum PanelError {
    /// Framebuffer device could not be opened
    #[error("Cannot open framebuffer {path}: {source}")]
    Framebuffer {
        path: String,
        source: std::io::Error,
    },

    /// GPIO setup for the mode button failed
    #[cfg(feature = "gpio")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}
