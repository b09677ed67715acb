use super::{remote_failure, Alert, Outcome, Route, Transition};
use crate::errors::ClientError;
use crate::models::{Provider, User};
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct DashboardScreen {
    pub providers: Vec<Provider>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, state: &mut AppState) -> Outcome {
        if state.session.require().is_err() {
            return Outcome::go(Transition::Reset(Route::SignIn));
        }

        match state.api.list_providers().await {
            Ok(providers) => {
                tracing::debug!(count = providers.len(), "providers loaded");
                self.providers = providers;
                Outcome::stay()
            }
            Err(e) => remote_failure(state, &e, Alert::new("Could not load providers")),
        }
    }

    pub fn open_profile(&self) -> Outcome {
        Outcome::go(Transition::Push(Route::Profile))
    }

    pub fn select_provider(&self, provider_id: &str) -> Outcome {
        Outcome::go(Transition::Push(Route::CreateAppointment {
            provider_id: provider_id.to_string(),
        }))
    }

    pub fn sign_out(&self, state: &mut AppState) -> Result<Outcome, ClientError> {
        state.session.sign_out()?;
        Ok(Outcome::go(Transition::Reset(Route::SignIn)))
    }

    /// Requires a signed-in user.
    pub fn render(&self, state: &AppState) -> Result<String, ClientError> {
        let user = &state.session.require()?.user;
        Ok(render_with(user, &self.providers))
    }
}

fn render_with(user: &User, providers: &[Provider]) -> String {
    let mut lines = vec![format!("Welcome,\n{}", user.name), String::new()];

    if providers.is_empty() {
        lines.push("No providers available".to_string());
    } else {
        lines.push("Barbers".to_string());
        lines.extend(
            providers
                .iter()
                .map(|p| format!("  [{}] {}", p.id, p.name)),
        );
    }

    lines.join("\n")
}
