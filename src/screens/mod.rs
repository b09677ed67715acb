pub mod appointment_created;
pub mod create_appointment;
pub mod dashboard;
pub mod profile;
pub mod sign_in;
pub mod sign_up;

use std::fmt;

use crate::errors::ClientError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignIn,
    SignUp,
    Dashboard,
    Profile,
    CreateAppointment { provider_id: String },
    /// Milliseconds since the epoch of the booked slot.
    AppointmentCreated { date: i64 },
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::SignIn | Route::SignUp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(Route),
    Back,
    Reset(Route),
}

/// Blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: Option<String>,
}

impl Alert {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            message: None,
        }
    }

    pub fn with_message(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: Some(message.to_string()),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.title),
            None => write!(f, "{}", self.title),
        }
    }
}

/// What a screen action asks of the navigator and the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub transition: Transition,
    pub alert: Option<Alert>,
}

impl Outcome {
    pub fn stay() -> Self {
        Self {
            transition: Transition::Stay,
            alert: None,
        }
    }

    pub fn go(transition: Transition) -> Self {
        Self {
            transition,
            alert: None,
        }
    }

    pub fn alert(alert: Alert) -> Self {
        Self {
            transition: Transition::Stay,
            alert: Some(alert),
        }
    }

    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }
}

/// Turns a failed remote call into an alert. A rejected token also ends
/// the session and sends the user back to sign-in.
pub fn remote_failure(state: &mut AppState, err: &ClientError, alert: Alert) -> Outcome {
    if err.is_auth_failure() && state.session.is_authenticated() {
        tracing::warn!("token rejected, signing out");
        if let Err(e) = state.session.sign_out() {
            tracing::error!(error = %e, "failed to clear session");
        }
        return Outcome::go(Transition::Reset(Route::SignIn)).with_alert(Alert::with_message(
            "Session expired",
            "Please sign in again",
        ));
    }

    tracing::warn!(error = %err, title = %alert.title, "remote call failed");
    Outcome::alert(alert)
}

/// Route stack split into the signed-out and signed-in stacks.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn for_state(state: &AppState) -> Self {
        Self {
            stack: vec![root(state.session.is_authenticated())],
        }
    }

    pub fn current(&self) -> &Route {
        // the stack is never emptied: `Back` keeps the root
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Push(route) => self.stack.push(route),
            Transition::Back => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            Transition::Reset(route) => self.stack = vec![route],
        }
    }

    /// Swaps stacks when the current route does not match the session.
    pub fn guard(&mut self, state: &AppState) {
        let authenticated = state.session.is_authenticated();
        if self.current().requires_auth() != authenticated {
            self.stack = vec![root(authenticated)];
        }
    }
}

fn root(authenticated: bool) -> Route {
    if authenticated {
        Route::Dashboard
    } else {
        Route::SignIn
    }
}
