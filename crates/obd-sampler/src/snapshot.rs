//! Per-cycle hand-off from the sampler to presenters

use obd_protocol::{Dtc, Pid, Reading};
use serde::{Deserialize, Serialize};

/// Result of a trouble code refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtcStatus {
    /// Codes read successfully, possibly none
    Codes(Vec<Dtc>),
    /// The query failed
    Unavailable,
}

/// Everything sampled in one loop iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tracked readings in polling order
    pub readings: Vec<Reading>,
    /// m/s², only when speed is present and a previous speed sample existed
    pub acceleration: Option<f64>,
    /// Only set on cycles where codes were refreshed
    pub dtcs: Option<DtcStatus>,
}

impl Snapshot {
    /// Reading for `pid`, absent if it was not polled
    pub fn reading(&self, pid: Pid) -> Reading {
        self.readings
            .iter()
            .copied()
            .find(|reading| reading.pid == pid)
            .unwrap_or(Reading::absent(pid))
    }

    /// Present value for `pid`
    pub fn value(&self, pid: Pid) -> Option<f64> {
        self.reading(pid).value
    }
}
