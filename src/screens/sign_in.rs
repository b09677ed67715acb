use super::{Alert, Outcome, Route, Transition};
use crate::models::SignInCredentials;
use crate::services::validation::{sign_in_schema, FormData, ValidationErrors};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl FormData for SignInForm {
    fn field(&self, name: &str) -> &str {
        match name {
            "email" => &self.email,
            "password" => &self.password,
            _ => "",
        }
    }
}

#[derive(Debug, Default)]
pub struct SignInScreen {
    pub form: SignInForm,
    pub errors: ValidationErrors,
}

impl SignInScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit(&mut self, state: &mut AppState) -> Outcome {
        self.errors.clear();

        if let Err(errors) = sign_in_schema().validate(&self.form) {
            self.errors = errors;
            return Outcome::stay();
        }

        let credentials = SignInCredentials {
            email: self.form.email.clone(),
            password: self.form.password.clone(),
        };

        // A 401 here rejects the credentials, not a stored token, so any
        // existing session stays as it is.
        let signed_in = state.session.sign_in(&credentials).await.map(|_| ());
        match signed_in {
            Ok(()) => Outcome::go(Transition::Reset(Route::Dashboard)),
            Err(e) => {
                tracing::warn!(error = %e, "sign-in failed");
                Outcome::alert(Alert::with_message(
                    "Authentication error",
                    "Could not sign in, check your credentials",
                ))
            }
        }
    }

    pub fn create_account(&self) -> Outcome {
        Outcome::go(Transition::Push(Route::SignUp))
    }
}
