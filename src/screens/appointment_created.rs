use super::{Outcome, Route, Transition};
use crate::errors::ClientError;
use crate::models::appointment::format_confirmation_millis;
use crate::state::AppState;

pub struct AppointmentCreatedScreen {
    date: i64,
}

impl AppointmentCreatedScreen {
    /// `date` is the booked slot in milliseconds since the epoch.
    pub fn new(date: i64) -> Self {
        Self { date }
    }

    pub fn title(&self) -> &'static str {
        "Nice, appointment booked!"
    }

    pub fn description(&self) -> String {
        format_confirmation_millis(self.date).unwrap_or_else(|| "Date unavailable.".to_string())
    }

    pub fn ok(&self) -> Outcome {
        Outcome::go(Transition::Reset(Route::Dashboard))
    }

    pub fn render(&self, state: &AppState) -> Result<String, ClientError> {
        state.session.require()?;
        Ok(format!("{}\n{}", self.title(), self.description()))
    }
}
