//! OBD-II Sampling Loop
//!
//! Polls the tracked sensors at a fixed cadence, reads trouble codes on a
//! slower one, and derives linear acceleration from consecutive speed samples.

mod accel;
mod sampler;
mod snapshot;

pub use accel::{acceleration, KMH_TO_MS};
pub use sampler::{Presenter, Sampler, SamplerConfig, SamplingState};
pub use snapshot::{DtcStatus, Snapshot};
