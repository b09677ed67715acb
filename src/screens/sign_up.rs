use super::{remote_failure, Alert, Outcome, Transition};
use crate::models::NewUser;
use crate::services::validation::{sign_up_schema, FormData, ValidationErrors};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl FormData for SignUpForm {
    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            "email" => &self.email,
            "password" => &self.password,
            _ => "",
        }
    }
}

#[derive(Debug, Default)]
pub struct SignUpScreen {
    pub form: SignUpForm,
    pub errors: ValidationErrors,
}

impl SignUpScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit(&mut self, state: &mut AppState) -> Outcome {
        self.errors.clear();

        if let Err(errors) = sign_up_schema().validate(&self.form) {
            self.errors = errors;
            return Outcome::stay();
        }

        let user = NewUser {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            password: self.form.password.clone(),
        };

        match state.api.create_user(&user).await {
            Ok(created) => {
                tracing::info!(user_id = %created.id, "account created");
                Outcome::go(Transition::Back).with_alert(Alert::with_message(
                    "Registration complete!",
                    "You can now sign in",
                ))
            }
            Err(e) => remote_failure(
                state,
                &e,
                Alert::with_message(
                    "Registration error",
                    "Could not create your account, try again",
                ),
            ),
        }
    }

    pub fn back_to_sign_in(&self) -> Outcome {
        Outcome::go(Transition::Back)
    }
}
