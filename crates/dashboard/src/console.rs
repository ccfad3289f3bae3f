//! Plain-text presenter for the console dashboard

use crate::format;
use obd_protocol::Pid;
use obd_sampler::{DtcStatus, Presenter, Snapshot};
use std::io::{self, Stdout, Write};

/// Writes one labelled line per present reading
pub struct ConsolePresenter<W> {
    out: W,
}

impl ConsolePresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_dtcs(&mut self, status: &DtcStatus) -> io::Result<()> {
        writeln!(self.out, "\n--- Checking Diagnostic Trouble Codes (DTCs) ---")?;
        match status {
            DtcStatus::Codes(codes) if codes.is_empty() => writeln!(self.out, "No DTCs detected."),
            DtcStatus::Codes(codes) => {
                writeln!(self.out, "Found DTCs:")?;
                for code in codes {
                    writeln!(self.out, "  {}", code)?;
                }
                Ok(())
            }
            DtcStatus::Unavailable => writeln!(self.out, "Unable to retrieve DTCs."),
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn present(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        if let Some(status) = &snapshot.dtcs {
            self.write_dtcs(status)?;
        }

        writeln!(self.out, "\n--- Vehicle Data ---")?;
        for reading in &snapshot.readings {
            let Some(value) = reading.value else {
                continue;
            };
            writeln!(
                self.out,
                "{}: {}",
                reading.pid.name(),
                format::console_value(reading.pid, value)
            )?;

            if reading.pid == Pid::Speed {
                if let Some(accel) = snapshot.acceleration {
                    writeln!(self.out, "Acceleration: {}", format::acceleration(accel))?;
                }
            }
        }

        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obd_protocol::{Dtc, Reading};

    fn render(snapshot: &Snapshot) -> String {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.present(snapshot).unwrap();
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_present_readings_only() {
        let snapshot = Snapshot {
            readings: vec![
                Reading::present(Pid::Rpm, 0.0),
                Reading::present(Pid::Speed, 36.0),
                Reading::absent(Pid::ThrottlePosition),
                Reading::present(Pid::EngineLoad, 40.0),
                Reading::present(Pid::CoolantTemp, 90.0),
            ],
            acceleration: Some(5.0),
            dtcs: None,
        };

        let text = render(&snapshot);
        assert_eq!(
            text,
            "\n--- Vehicle Data ---\n\
             RPM: 0.0\n\
             Speed: 36.0 kph\n\
             Acceleration: 5.00 m/s²\n\
             Engine Load: 40.0%\n\
             Coolant Temp: 90.0°C\n"
        );
    }

    #[test]
    fn test_no_acceleration_line_without_previous_speed() {
        let snapshot = Snapshot {
            readings: vec![Reading::present(Pid::Speed, 36.0)],
            acceleration: None,
            dtcs: None,
        };
        assert!(!render(&snapshot).contains("Acceleration"));
    }

    #[test]
    fn test_dtc_section_variants() {
        let mut snapshot = Snapshot {
            readings: Vec::new(),
            acceleration: None,
            dtcs: Some(DtcStatus::Codes(vec![Dtc::new("P0133"), Dtc::new("P0420")])),
        };
        let text = render(&snapshot);
        assert!(text.contains("Found DTCs:\n  P0133\n  P0420\n"));

        snapshot.dtcs = Some(DtcStatus::Codes(Vec::new()));
        assert!(render(&snapshot).contains("No DTCs detected."));

        snapshot.dtcs = Some(DtcStatus::Unavailable);
        assert!(render(&snapshot).contains("Unable to retrieve DTCs."));

        snapshot.dtcs = None;
        assert!(!render(&snapshot).contains("Checking Diagnostic"));
    }
}
