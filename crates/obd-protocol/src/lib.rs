//! OBD-II Adapter Client
//!
//! This crate talks to ELM327-compatible OBD-II adapters and exposes the
//! small capability surface the dashboard needs through [`ObdAdapter`].

mod adapter;
mod client;
mod dtc;
mod elm327;
mod error;
mod pid;
mod protocol;

pub use adapter::{ObdAdapter, Reading};
pub use client::{ObdClient, Transport};
pub use dtc::Dtc;
pub use error::ObdError;
pub use pid::{Pid, PidResponse};
pub use protocol::ObdProtocol;

/// OBD-II mode constants
pub mod mode {
    /// Current data
    pub const CURRENT_DATA: u8 = 0x01;
    /// Diagnostic trouble codes
    pub const READ_DTC: u8 = 0x03;
}
