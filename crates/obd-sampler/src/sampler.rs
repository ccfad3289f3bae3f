//! Sampling Loop Implementation

use crate::accel::acceleration;
use crate::snapshot::{DtcStatus, Snapshot};
use obd_protocol::{ObdAdapter, ObdError, Pid};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for the sampling loop
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Pause between iterations (default: 1 s)
    pub poll_interval: Duration,
    /// Minimum time between trouble code reads (default: 5 s)
    pub dtc_interval: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            dtc_interval: Duration::from_secs(5),
        }
    }
}

/// Receives one [`Snapshot`] per iteration
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot) -> std::io::Result<()>;
}

/// State carried from one iteration to the next
#[derive(Debug, Clone)]
pub struct SamplingState {
    /// Last present speed (km/h)
    pub prev_speed: Option<f64>,
    /// Start of the previous iteration (or loop start)
    pub prev_tick: Instant,
    /// Last trouble code read (or loop start)
    pub last_dtc_check: Instant,
}

impl SamplingState {
    pub fn new(start: Instant) -> Self {
        Self {
            prev_speed: None,
            prev_tick: start,
            last_dtc_check: start,
        }
    }

    /// Advance to `now`, returning the seconds since the previous iteration
    fn tick(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.prev_tick).as_secs_f64();
        self.prev_tick = now;
        elapsed
    }

    /// Store a speed sample, returning the acceleration when a previous one exists
    fn record_speed(&mut self, speed_kmh: f64, elapsed: f64) -> Option<f64> {
        let accel = self
            .prev_speed
            .map(|prev| acceleration(Some(prev), speed_kmh, elapsed));
        self.prev_speed = Some(speed_kmh);
        accel
    }
}

/// Fixed-cadence sampler owning the adapter
pub struct Sampler<A> {
    adapter: A,
    config: SamplerConfig,
    state: SamplingState,
}

impl<A: ObdAdapter> Sampler<A> {
    /// Wrap an already connected adapter
    pub fn new(adapter: A, config: SamplerConfig) -> Self {
        Self {
            adapter,
            config,
            state: SamplingState::new(Instant::now()),
        }
    }

    /// Connect the adapter, closing it again if the connection does not come up
    pub async fn connect(mut adapter: A, config: SamplerConfig) -> Result<Self, ObdError> {
        info!("Connecting to OBD-II adapter");

        match adapter.connect().await {
            Ok(()) if adapter.is_connected() => {
                info!("Connected to OBD-II adapter");
                Ok(Self::new(adapter, config))
            }
            Ok(()) => {
                adapter.close().await;
                Err(ObdError::NotConnected)
            }
            Err(e) => {
                warn!("Adapter connection failed: {}", e);
                adapter.close().await;
                Err(e)
            }
        }
    }

    /// Run one iteration at `now`
    pub async fn poll(&mut self, now: Instant) -> Snapshot {
        let elapsed = self.state.tick(now);

        let dtcs = if now.saturating_duration_since(self.state.last_dtc_check)
            >= self.config.dtc_interval
        {
            self.state.last_dtc_check = now;
            Some(self.read_dtcs().await)
        } else {
            None
        };

        let mut readings = Vec::with_capacity(Pid::TRACKED.len());
        for pid in Pid::TRACKED {
            readings.push(self.adapter.query(pid).await);
        }

        let acceleration = readings
            .iter()
            .find(|reading| reading.pid == Pid::Speed)
            .and_then(|reading| reading.value)
            .and_then(|speed| self.state.record_speed(speed, elapsed));

        Snapshot {
            readings,
            acceleration,
            dtcs,
        }
    }

    /// Sample until `shutdown` resolves, then close the adapter
    pub async fn run<P, S>(&mut self, presenter: &mut P, shutdown: S)
    where
        P: Presenter,
        S: Future<Output = ()>,
    {
        info!(
            "Starting sampling loop ({:?} poll, {:?} DTC interval)",
            self.config.poll_interval, self.config.dtc_interval
        );

        tokio::select! {
            _ = shutdown => info!("Shutdown requested"),
            _ = self.sample_forever(presenter) => {}
        }

        self.adapter.close().await;
        info!("Sampling loop stopped");
    }

    async fn sample_forever<P: Presenter>(&mut self, presenter: &mut P) {
        loop {
            let snapshot = self.poll(Instant::now()).await;
            if let Err(e) = presenter.present(&snapshot) {
                warn!("Presenter failed: {}", e);
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn read_dtcs(&mut self) -> DtcStatus {
        match self.adapter.query_dtcs().await {
            Ok(codes) => {
                debug!("Read {} trouble code(s)", codes.len());
                DtcStatus::Codes(codes)
            }
            Err(e) => {
                warn!("Trouble code query failed: {}", e);
                DtcStatus::Unavailable
            }
        }
    }

    /// The owned adapter
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Current sampling state
    pub fn state(&self) -> &SamplingState {
        &self.state
    }
}
