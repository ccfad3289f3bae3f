//! Value formatting shared by the console and the panel

use obd_protocol::Pid;

/// Shown on the panel when a value is not present
pub const PLACEHOLDER: &str = "N/A";

fn unit(pid: Pid) -> &'static str {
    match pid {
        Pid::Rpm => "",
        Pid::Speed => " kph",
        Pid::ThrottlePosition | Pid::EngineLoad => "%",
        Pid::CoolantTemp => "°C",
    }
}

/// Console rendering, one decimal
pub fn console_value(pid: Pid, value: f64) -> String {
    format!("{:.1}{}", value, unit(pid))
}

/// Panel rendering, RPM without decimals
pub fn panel_value(pid: Pid, value: f64) -> String {
    match pid {
        Pid::Rpm => format!("{:.0}", value),
        _ => console_value(pid, value),
    }
}

pub fn acceleration(value: f64) -> String {
    format!("{:.2} m/s²", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(console_value(Pid::Speed, 36.0), "36.0 kph");
        assert_eq!(console_value(Pid::CoolantTemp, 90.04), "90.0°C");
        assert_eq!(console_value(Pid::EngineLoad, 40.0), "40.0%");
    }

    #[test]
    fn test_panel_rpm_is_whole() {
        assert_eq!(panel_value(Pid::Rpm, 1674.75), "1675");
        assert_eq!(panel_value(Pid::Rpm, 0.0), "0");
    }

    #[test]
    fn test_acceleration() {
        assert_eq!(acceleration(-0.5556), "-0.56 m/s²");
    }
}
