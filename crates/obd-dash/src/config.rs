//! Runtime configuration
//!
//! Built-in defaults overridden by `OBD_DASH_*` environment variables, with
//! `__` separating nested keys (e.g. `OBD_DASH_ADAPTER__DEVICE=/dev/rfcomm0`).

use config::{Config, ConfigError, Environment};
use obd_protocol::{ObdProtocol, Transport};
use obd_sampler::SamplerConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::Level;

const ENV_PREFIX: &str = "OBD_DASH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// trace, debug, info, warn or error
    pub log_level: String,
    pub adapter: AdapterConfig,
    pub sampler: SamplingConfig,
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Serial device path, or "mock" for the simulator
    pub device: String,
    pub baud_rate: u32,
    pub protocol: ObdProtocol,
    /// Per-command adapter timeout
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub poll_interval_ms: u64,
    pub dtc_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Framebuffer device of the 320x240 screen
    pub framebuffer: String,
    /// BCM pin number of the mode button
    pub button_pin: u8,
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            adapter: AdapterConfig::default(),
            sampler: SamplingConfig::default(),
            panel: PanelConfig::default(),
        }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_string(),
            baud_rate: 38400,
            protocol: ObdProtocol::Auto,
            timeout_ms: 2000,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            dtc_interval_secs: 5,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            framebuffer: "/dev/fb0".to_string(),
            button_pin: 17,
            debounce_ms: 200,
        }
    }
}

impl AppConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(environment())
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder().add_source(env).build()?.try_deserialize()
    }

    pub fn transport(&self) -> Transport {
        Transport::from_device(&self.adapter.device, self.adapter.baud_rate)
    }

    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_millis(self.adapter.timeout_ms)
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            poll_interval: Duration::from_millis(self.sampler.poll_interval_ms),
            dtc_interval: Duration::from_secs(self.sampler.dtc_interval_secs),
        }
    }

    /// Parsed log level, INFO when unrecognised
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
