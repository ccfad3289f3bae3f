//! Dashboard Presentation
//!
//! Console output and the small-screen panel for live OBD-II readings.

mod button;
mod console;
mod error;
mod fields;
mod format;
mod framebuffer;
mod mode;
mod panel;

#[cfg(feature = "gpio")]
pub use button::GpioButton;
pub use button::{spawn_line_button, spawn_stdin_button};
pub use console::ConsolePresenter;
pub use error::PanelError;
pub use fields::{Field, FieldGroup, FieldGroups};
pub use format::PLACEHOLDER;
pub use framebuffer::{FrameBuffer, HEIGHT, WIDTH};
pub use mode::{ButtonEvent, DisplayMode};
pub use panel::{Panel, PanelPresenter};
