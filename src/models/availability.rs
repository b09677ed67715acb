use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilitySlot {
    pub hour: u8,
    pub available: bool,
}

/// A slot ready for display, e.g. `09:00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlot {
    pub hour: u8,
    pub available: bool,
    pub label: String,
}

impl From<&AvailabilitySlot> for HourSlot {
    fn from(slot: &AvailabilitySlot) -> Self {
        Self {
            hour: slot.hour,
            available: slot.available,
            label: format_hour(slot.hour),
        }
    }
}

pub fn format_hour(hour: u8) -> String {
    format!("{hour:02}:00")
}

/// Availability of one provider on one day, as returned by
/// `GET /providers/:id/day-availability`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayAvailability {
    pub slots: Vec<AvailabilitySlot>,
}

impl DayAvailability {
    pub fn new(slots: Vec<AvailabilitySlot>) -> anyhow::Result<Self> {
        for slot in &slots {
            if slot.hour > 23 {
                anyhow::bail!("hour out of range: {}", slot.hour);
            }
        }
        Ok(Self { slots })
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let slots: Vec<AvailabilitySlot> = serde_json::from_str(s)?;
        Self::new(slots)
    }

    pub fn morning(&self) -> Vec<HourSlot> {
        self.slots
            .iter()
            .filter(|slot| slot.hour < 12)
            .map(HourSlot::from)
            .collect()
    }

    pub fn afternoon(&self) -> Vec<HourSlot> {
        self.slots
            .iter()
            .filter(|slot| slot.hour >= 12)
            .map(HourSlot::from)
            .collect()
    }

    pub fn is_available(&self, hour: u8) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.hour == hour && slot.available)
    }

    pub fn to_human_readable(&self) -> String {
        let open: Vec<String> = self
            .slots
            .iter()
            .filter(|slot| slot.available)
            .map(|slot| format_hour(slot.hour))
            .collect();

        open.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DayAvailability {
        DayAvailability::from_json(
            r#"[
                {"hour":8,"available":true},
                {"hour":9,"available":false},
                {"hour":11,"available":true},
                {"hour":12,"available":true},
                {"hour":17,"available":false}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_morning_only_holds_hours_before_noon() {
        let morning = sample().morning();
        let hours: Vec<u8> = morning.iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![8, 9, 11]);
        assert!(morning.iter().all(|s| s.hour < 12));
    }

    #[test]
    fn test_afternoon_starts_at_noon() {
        let afternoon = sample().afternoon();
        let labels: Vec<&str> = afternoon.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["12:00", "17:00"]);
        assert!(!afternoon[1].available);
    }

    #[test]
    fn test_labels_are_zero_padded() {
        assert_eq!(format_hour(0), "00:00");
        assert_eq!(format_hour(8), "08:00");
        assert_eq!(format_hour(23), "23:00");
        assert_eq!(sample().morning()[0].label, "08:00");
    }

    #[test]
    fn test_is_available() {
        let avail = sample();
        assert!(avail.is_available(8));
        assert!(!avail.is_available(9));
        assert!(!avail.is_available(14));
    }

    #[test]
    fn test_parse_rejects_out_of_range_hour() {
        assert!(DayAvailability::from_json(r#"[{"hour":24,"available":true}]"#).is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(DayAvailability::from_json("not json").is_err());
    }

    #[test]
    fn test_to_human_readable() {
        assert_eq!(sample().to_human_readable(), "08:00, 11:00, 12:00");
        assert_eq!(DayAvailability::default().to_human_readable(), "");
    }
}
