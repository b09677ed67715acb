use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppointmentRequest {
    pub provider_id: String,
    pub date: DateTime<Utc>,
}

impl AppointmentRequest {
    /// Builds a request for `hour:00` on `date` in the device's local time.
    pub fn at_local(provider_id: &str, date: NaiveDate, hour: u8) -> Option<Self> {
        Self::at_in(provider_id, date, hour, &Local)
    }

    pub fn at_in<Tz: TimeZone>(provider_id: &str, date: NaiveDate, hour: u8, tz: &Tz) -> Option<Self> {
        let naive = date.and_hms_opt(u32::from(hour), 0, 0)?;
        let local = tz.from_local_datetime(&naive).single()?;
        Some(Self {
            provider_id: provider_id.to_string(),
            date: local.with_timezone(&Utc),
        })
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.date.timestamp_millis()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub provider_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub date: DateTime<Utc>,
}

/// Renders e.g. `Tuesday, March the 3rd, 2020 at 2:00 PM.`
pub fn format_confirmation(dt: &NaiveDateTime) -> String {
    format!(
        "{}, {} the {}, {} at {}.",
        dt.format("%A"),
        dt.format("%B"),
        ordinal(dt.day()),
        dt.format("%Y"),
        dt.format("%-I:%M %p"),
    )
}

/// Formats a millisecond timestamp in local time.
pub fn format_confirmation_millis(timestamp_ms: i64) -> Option<String> {
    let utc = DateTime::from_timestamp_millis(timestamp_ms)?;
    Some(format_confirmation(&utc.with_timezone(&Local).naive_local()))
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}
