//! Field groups backing the panel pages

use crate::format::{self, PLACEHOLDER};
use crate::mode::DisplayMode;
use obd_protocol::Pid;
use obd_sampler::{DtcStatus, Snapshot};

const ACCELERATION: &str = "Acceleration";
const STATUS: &str = "Status";
const CODES: &str = "Codes";

/// One label and its latest formatted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

/// Ordered label -> value mapping for one page
#[derive(Debug, Clone)]
pub struct FieldGroup {
    fields: Vec<Field>,
}

impl FieldGroup {
    fn new(labels: &[&'static str], initial: &str) -> Self {
        Self {
            fields: labels
                .iter()
                .map(|&label| Field {
                    label,
                    value: initial.to_string(),
                })
                .collect(),
        }
    }

    fn set(&mut self, label: &str, value: String) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.label == label) {
            field.value = value;
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// The three pages: basic, advanced and diagnostics
#[derive(Debug, Clone)]
pub struct FieldGroups {
    basic: FieldGroup,
    advanced: FieldGroup,
    diagnostics: FieldGroup,
}

impl FieldGroups {
    const BASIC_PIDS: [Pid; 3] = [Pid::Rpm, Pid::Speed, Pid::CoolantTemp];
    const ADVANCED_PIDS: [Pid; 2] = [Pid::ThrottlePosition, Pid::EngineLoad];

    pub fn new() -> Self {
        let basic_labels = Self::BASIC_PIDS.map(|pid| pid.name());
        let [throttle, load] = Self::ADVANCED_PIDS.map(|pid| pid.name());

        let mut diagnostics = FieldGroup::new(&[STATUS, CODES], PLACEHOLDER);
        diagnostics.set(STATUS, "Pending".to_string());

        Self {
            basic: FieldGroup::new(&basic_labels, PLACEHOLDER),
            advanced: FieldGroup::new(&[throttle, load, ACCELERATION], PLACEHOLDER),
            diagnostics,
        }
    }

    /// Refresh every field from a snapshot
    ///
    /// Absent readings become the placeholder. Diagnostics only change on
    /// cycles that carry a trouble code refresh.
    pub fn update(&mut self, snapshot: &Snapshot) {
        for pid in Self::BASIC_PIDS {
            self.basic.set(pid.name(), sensor_value(snapshot, pid));
        }
        for pid in Self::ADVANCED_PIDS {
            self.advanced.set(pid.name(), sensor_value(snapshot, pid));
        }
        let accel = snapshot
            .acceleration
            .map(format::acceleration)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        self.advanced.set(ACCELERATION, accel);

        match &snapshot.dtcs {
            None => {}
            Some(DtcStatus::Codes(codes)) if codes.is_empty() => {
                self.diagnostics.set(STATUS, "No codes".to_string());
                self.diagnostics.set(CODES, "-".to_string());
            }
            Some(DtcStatus::Codes(codes)) => {
                self.diagnostics
                    .set(STATUS, format!("{} found", codes.len()));
                let joined = codes
                    .iter()
                    .map(|code| code.code())
                    .collect::<Vec<_>>()
                    .join(" ");
                self.diagnostics.set(CODES, joined);
            }
            Some(DtcStatus::Unavailable) => {
                self.diagnostics.set(STATUS, "Unavailable".to_string());
                self.diagnostics.set(CODES, PLACEHOLDER.to_string());
            }
        }
    }

    pub fn group(&self, mode: DisplayMode) -> &FieldGroup {
        match mode {
            DisplayMode::Basic => &self.basic,
            DisplayMode::Advanced => &self.advanced,
            DisplayMode::Diagnostics => &self.diagnostics,
        }
    }
}

impl Default for FieldGroups {
    fn default() -> Self {
        Self::new()
    }
}

fn sensor_value(snapshot: &Snapshot, pid: Pid) -> String {
    snapshot
        .value(pid)
        .map(|value| format::panel_value(pid, value))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use obd_protocol::{Dtc, Reading};

    fn snapshot(readings: Vec<Reading>, dtcs: Option<DtcStatus>) -> Snapshot {
        Snapshot {
            readings,
            acceleration: None,
            dtcs,
        }
    }

    #[test]
    fn test_initial_placeholders() {
        let groups = FieldGroups::new();
        assert_eq!(groups.group(DisplayMode::Basic).get("RPM"), Some(PLACEHOLDER));
        assert_eq!(
            groups.group(DisplayMode::Diagnostics).get("Status"),
            Some("Pending")
        );
        assert_eq!(groups.group(DisplayMode::Advanced).fields().len(), 3);
    }

    #[test]
    fn test_zero_is_shown_not_placeholder() {
        let mut groups = FieldGroups::new();
        groups.update(&snapshot(
            vec![
                Reading::present(Pid::Rpm, 0.0),
                Reading::present(Pid::ThrottlePosition, 0.0),
            ],
            None,
        ));
        assert_eq!(groups.group(DisplayMode::Basic).get("RPM"), Some("0"));
        assert_eq!(
            groups.group(DisplayMode::Advanced).get("Throttle Position"),
            Some("0.0%")
        );
    }

    #[test]
    fn test_absent_reading_resets_to_placeholder() {
        let mut groups = FieldGroups::new();
        groups.update(&snapshot(vec![Reading::present(Pid::Speed, 50.0)], None));
        assert_eq!(groups.group(DisplayMode::Basic).get("Speed"), Some("50.0 kph"));

        groups.update(&snapshot(vec![Reading::absent(Pid::Speed)], None));
        assert_eq!(groups.group(DisplayMode::Basic).get("Speed"), Some(PLACEHOLDER));
    }

    #[test]
    fn test_diagnostics_kept_between_refreshes() {
        let mut groups = FieldGroups::new();
        groups.update(&snapshot(
            Vec::new(),
            Some(DtcStatus::Codes(vec![Dtc::new("P0133"), Dtc::new("P0420")])),
        ));
        groups.update(&snapshot(Vec::new(), None));

        let diagnostics = groups.group(DisplayMode::Diagnostics);
        assert_eq!(diagnostics.get("Status"), Some("2 found"));
        assert_eq!(diagnostics.get("Codes"), Some("P0133 P0420"));

        groups.update(&snapshot(Vec::new(), Some(DtcStatus::Unavailable)));
        assert_eq!(
            groups.group(DisplayMode::Diagnostics).get("Status"),
            Some("Unavailable")
        );
    }
}
