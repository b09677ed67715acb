use chrono::NaiveDate;

use super::{remote_failure, Alert, Outcome, Route, Transition};
use crate::errors::ClientError;
use crate::models::{AppointmentRequest, DayAvailability, HourSlot, Provider};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPhase {
    Idle,
    ProvidersLoaded,
    AvailabilityLoaded,
    HourSelected,
    Submitted,
    Confirmed,
}

/// Provider, date and hour picker for a new appointment.
#[derive(Debug)]
pub struct CreateAppointmentScreen {
    phase: BookingPhase,
    providers: Vec<Provider>,
    selected_provider: String,
    selected_date: NaiveDate,
    selected_hour: Option<u8>,
    availability: DayAvailability,
    providers_loaded: bool,
}

impl CreateAppointmentScreen {
    pub fn new(provider_id: &str, date: NaiveDate) -> Self {
        Self {
            phase: BookingPhase::Idle,
            providers: Vec::new(),
            selected_provider: provider_id.to_string(),
            selected_date: date,
            selected_hour: None,
            availability: DayAvailability::default(),
            providers_loaded: false,
        }
    }

    pub fn phase(&self) -> BookingPhase {
        self.phase
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn selected_provider(&self) -> &str {
        &self.selected_provider
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected_hour(&self) -> Option<u8> {
        self.selected_hour
    }

    pub fn availability(&self) -> &DayAvailability {
        &self.availability
    }

    pub fn morning(&self) -> Vec<HourSlot> {
        self.availability.morning()
    }

    pub fn afternoon(&self) -> Vec<HourSlot> {
        self.availability.afternoon()
    }

    /// Fetches the provider list, then availability for the initial
    /// provider and date. A failed provider list does not stop the hour
    /// grid from loading.
    pub async fn load(&mut self, state: &mut AppState) -> Outcome {
        if state.session.require().is_err() {
            return Outcome::go(Transition::Reset(Route::SignIn));
        }

        let providers_failure = match state.api.list_providers().await {
            Ok(providers) => {
                self.providers = providers;
                self.providers_loaded = true;
                self.phase = BookingPhase::ProvidersLoaded;
                None
            }
            Err(e) => {
                let outcome = remote_failure(state, &e, Alert::new("Could not load providers"));
                if outcome.transition != Transition::Stay {
                    return outcome;
                }
                Some(outcome)
            }
        };

        let fetched = self.fetch_availability(state).await;
        match providers_failure {
            Some(outcome) if fetched == Outcome::stay() => outcome,
            _ => fetched,
        }
    }

    pub async fn select_provider(&mut self, state: &mut AppState, provider_id: &str) -> Outcome {
        if state.session.require().is_err() {
            return Outcome::go(Transition::Reset(Route::SignIn));
        }

        let loaded = !matches!(self.phase, BookingPhase::Idle | BookingPhase::ProvidersLoaded);
        if loaded && provider_id == self.selected_provider {
            return Outcome::stay();
        }

        self.selected_provider = provider_id.to_string();
        self.fetch_availability(state).await
    }

    pub async fn select_date(&mut self, state: &mut AppState, date: NaiveDate) -> Outcome {
        if state.session.require().is_err() {
            return Outcome::go(Transition::Reset(Route::SignIn));
        }

        self.selected_date = date;
        self.fetch_availability(state).await
    }

    /// Selects `hour` if it is offered and free. Returns whether it was taken.
    pub fn select_hour(&mut self, hour: u8) -> bool {
        let ready = matches!(
            self.phase,
            BookingPhase::AvailabilityLoaded | BookingPhase::HourSelected
        );
        if !ready || !self.availability.is_available(hour) {
            return false;
        }

        self.selected_hour = Some(hour);
        self.phase = BookingPhase::HourSelected;
        true
    }

    pub async fn submit(&mut self, state: &mut AppState) -> Outcome {
        if state.session.require().is_err() {
            return Outcome::go(Transition::Reset(Route::SignIn));
        }

        let Some(hour) = self.selected_hour else {
            return Outcome::alert(Alert::with_message(
                "Select a time",
                "Pick an available hour before booking",
            ));
        };

        let Some(request) =
            AppointmentRequest::at_local(&self.selected_provider, self.selected_date, hour)
        else {
            return Outcome::alert(Alert::with_message(
                "Error creating appointment",
                "The selected time does not exist on this device's clock",
            ));
        };

        self.phase = BookingPhase::Submitted;

        match state.api.create_appointment(&request).await {
            Ok(appointment) => {
                tracing::info!(
                    appointment_id = %appointment.id,
                    provider_id = %appointment.provider_id,
                    "appointment created"
                );
                self.phase = BookingPhase::Confirmed;
                Outcome::go(Transition::Push(Route::AppointmentCreated {
                    date: request.timestamp_millis(),
                }))
            }
            Err(e) => {
                self.phase = BookingPhase::HourSelected;
                remote_failure(
                    state,
                    &e,
                    Alert::with_message("Error creating appointment", "Please try again"),
                )
            }
        }
    }

    pub fn go_back(&self) -> Outcome {
        Outcome::go(Transition::Back)
    }

    /// Clears the selected hour and reloads slots for the current
    /// provider and date.
    async fn fetch_availability(&mut self, state: &mut AppState) -> Outcome {
        self.selected_hour = None;

        let fetched = state
            .api
            .day_availability(&self.selected_provider, self.selected_date)
            .await;

        let slots = match fetched {
            Ok(slots) => slots,
            Err(e) => {
                self.clear_availability();
                return remote_failure(state, &e, Alert::new("Could not load availability"));
            }
        };

        match DayAvailability::new(slots) {
            Ok(availability) => {
                self.availability = availability;
                self.phase = BookingPhase::AvailabilityLoaded;
                Outcome::stay()
            }
            Err(e) => {
                tracing::warn!(error = %e, "server sent malformed availability");
                self.clear_availability();
                Outcome::alert(Alert::new("Could not load availability"))
            }
        }
    }

    /// Drops the slot grid and falls back to the last phase that still holds.
    fn clear_availability(&mut self) {
        self.availability = DayAvailability::default();
        self.phase = if self.providers_loaded {
            BookingPhase::ProvidersLoaded
        } else {
            BookingPhase::Idle
        };
    }

    pub fn render(&self, state: &AppState) -> Result<String, ClientError> {
        state.session.require()?;

        let mut lines = vec!["Barbers".to_string()];
        for provider in &self.providers {
            let marker = if provider.id == self.selected_provider { '*' } else { ' ' };
            lines.push(format!(" {marker} [{}] {}", provider.id, provider.name));
        }

        lines.push(String::new());
        lines.push(format!("Date: {}", self.selected_date.format("%Y-%m-%d")));
        lines.push(String::new());
        lines.push("Morning".to_string());
        lines.push(self.render_slots(&self.morning()));
        lines.push("Afternoon".to_string());
        lines.push(self.render_slots(&self.afternoon()));

        Ok(lines.join("\n"))
    }

    fn render_slots(&self, slots: &[HourSlot]) -> String {
        if slots.is_empty() {
            return "  -".to_string();
        }

        let cells: Vec<String> = slots
            .iter()
            .map(|slot| {
                if self.selected_hour == Some(slot.hour) {
                    format!("[{}]", slot.label)
                } else if slot.available {
                    format!(" {} ", slot.label)
                } else {
                    format!("({})", slot.label)
                }
            })
            .collect();

        format!("  {}", cells.join(" "))
    }
}
