//! Capability interface between the sampling loop and an OBD-II adapter

use crate::dtc::Dtc;
use crate::error::ObdError;
use crate::pid::Pid;
use serde::{Deserialize, Serialize};

/// One polled sensor reading
///
/// `value` is `None` when the adapter had nothing for the PID. A present
/// zero (0 RPM, 0% throttle) is still a reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub pid: Pid,
    pub value: Option<f64>,
}

impl Reading {
    pub fn present(pid: Pid, value: f64) -> Self {
        Self {
            pid,
            value: Some(value),
        }
    }

    pub fn absent(pid: Pid) -> Self {
        Self { pid, value: None }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// Minimal adapter surface used by the sampler
///
/// Implementations own their transport exclusively. `query` never fails:
/// an unanswered PID comes back as an absent [`Reading`].
#[allow(async_fn_in_trait)]
pub trait ObdAdapter {
    /// Open the transport and initialise the adapter
    async fn connect(&mut self) -> Result<(), ObdError>;

    /// Whether the adapter is ready for queries
    fn is_connected(&self) -> bool;

    /// Query one sensor
    async fn query(&mut self, pid: Pid) -> Reading;

    /// Read stored diagnostic trouble codes
    async fn query_dtcs(&mut self) -> Result<Vec<Dtc>, ObdError>;

    /// Release the transport; safe to call more than once
    async fn close(&mut self);
}
