//! OBD-II PID Definitions and Response Parsing
//!
//! Defines the Mode 01 Parameter IDs (PIDs) the dashboard tracks and their
//! decoding formulas.

use serde::{Deserialize, Serialize};

/// Mode 01 PIDs tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Pid {
    /// Engine RPM (0x0C)
    Rpm = 0x0C,
    /// Vehicle speed (0x0D)
    Speed = 0x0D,
    /// Throttle position (0x11)
    ThrottlePosition = 0x11,
    /// Calculated engine load (0x04)
    EngineLoad = 0x04,
    /// Engine coolant temperature (0x05)
    CoolantTemp = 0x05,
}

impl Pid {
    /// Tracked PIDs in polling order
    pub const TRACKED: [Pid; 5] = [
        Pid::Rpm,
        Pid::Speed,
        Pid::ThrottlePosition,
        Pid::EngineLoad,
        Pid::CoolantTemp,
    ];

    /// Get the PID hex value
    pub fn as_hex(&self) -> u8 {
        *self as u8
    }

    /// Get the number of response data bytes for this PID
    pub fn response_bytes(&self) -> usize {
        match self {
            Pid::Rpm => 2,
            _ => 1,
        }
    }

    /// Short human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Pid::Rpm => "RPM",
            Pid::Speed => "Speed",
            Pid::ThrottlePosition => "Throttle Position",
            Pid::EngineLoad => "Engine Load",
            Pid::CoolantTemp => "Coolant Temp",
        }
    }
}

/// Response from a PID query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PidResponse {
    /// The PID that was queried
    pub pid: Pid,
    /// Decoded value, `None` when the payload is too short for the formula
    pub value: Option<f64>,
}

impl PidResponse {
    /// Create a new PID response by decoding raw data bytes
    pub fn decode(pid: Pid, bytes: &[u8]) -> Self {
        let value = if bytes.len() < pid.response_bytes() {
            None
        } else {
            Some(Self::decode_value(pid, bytes))
        };
        Self { pid, value }
    }

    fn decode_value(pid: Pid, bytes: &[u8]) -> f64 {
        let a = bytes[0] as f64;
        match pid {
            // RPM: ((A*256)+B)/4
            Pid::Rpm => (a * 256.0 + bytes[1] as f64) / 4.0,
            // Speed: A (km/h)
            Pid::Speed => a,
            // Throttle position: A * 100 / 255 (%)
            Pid::ThrottlePosition => a * 100.0 / 255.0,
            // Engine Load: A * 100 / 255 (%)
            Pid::EngineLoad => a * 100.0 / 255.0,
            // Coolant Temp: A - 40 (°C)
            Pid::CoolantTemp => a - 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpm_decode() {
        // 1A 2B => ((0x1A * 256) + 0x2B) / 4 = (26*256 + 43) / 4 = 6699/4 = 1674.75
        let response = PidResponse::decode(Pid::Rpm, &[0x1A, 0x2B]);
        assert!((response.value.unwrap() - 1674.75).abs() < 0.01);
    }

    #[test]
    fn test_coolant_temp_decode() {
        // 0x73 = 115, so temp = 115 - 40 = 75°C
        let response = PidResponse::decode(Pid::CoolantTemp, &[0x73]);
        assert!((response.value.unwrap() - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_speed_decode() {
        let response = PidResponse::decode(Pid::Speed, &[0x55]);
        assert!((response.value.unwrap() - 85.0).abs() < 0.01);
    }

    #[test]
    fn test_throttle_full_scale() {
        let response = PidResponse::decode(Pid::ThrottlePosition, &[0xFF]);
        assert!((response.value.unwrap() - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_short_payload_is_absent() {
        let response = PidResponse::decode(Pid::Rpm, &[0x1A]);
        assert!(response.value.is_none());
    }

    #[test]
    fn test_zero_speed_is_a_value() {
        let response = PidResponse::decode(Pid::Speed, &[0x00]);
        assert_eq!(response.value, Some(0.0));
    }

    #[test]
    fn test_empty_payload_is_absent() {
        for pid in Pid::TRACKED {
            assert!(PidResponse::decode(pid, &[]).value.is_none());
        }
    }
}
