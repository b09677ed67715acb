use std::path::Path;

use super::{remote_failure, Alert, Outcome, Route, Transition};
use crate::errors::ClientError;
use crate::models::{ProfileUpdate, User, UserPatch};
use crate::services::validation::{profile_schema, FormData, ValidationErrors};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub old_password: String,
    pub password: String,
    pub password_confirmation: String,
}

impl FormData for ProfileForm {
    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            "email" => &self.email,
            "old_password" => &self.old_password,
            "password" => &self.password,
            "password_confirmation" => &self.password_confirmation,
            _ => "",
        }
    }
}

impl ProfileForm {
    fn to_update(&self) -> ProfileUpdate {
        let changing_password = !self.old_password.is_empty();
        let when_changing = |value: &str| changing_password.then(|| value.to_string());

        ProfileUpdate {
            name: self.name.clone(),
            email: self.email.clone(),
            old_password: when_changing(&self.old_password),
            password: when_changing(&self.password),
            password_confirmation: when_changing(&self.password_confirmation),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfileScreen {
    pub form: ProfileForm,
    pub errors: ValidationErrors,
}

impl ProfileScreen {
    /// Opens the form prefilled with the current user's name and email.
    pub fn new(user: &User) -> Self {
        Self {
            form: ProfileForm {
                name: user.name.clone(),
                email: user.email.clone(),
                ..Default::default()
            },
            errors: ValidationErrors::new(),
        }
    }

    pub async fn submit(&mut self, state: &mut AppState) -> Outcome {
        self.errors.clear();

        if state.session.require().is_err() {
            return Outcome::go(Transition::Reset(Route::SignIn));
        }

        if let Err(errors) = profile_schema().validate(&self.form) {
            self.errors = errors;
            return Outcome::stay();
        }

        let updated = state.api.update_profile(&self.form.to_update()).await;
        let result = updated.and_then(|user| state.session.update_user(user.into()).map(|_| ()));

        match result {
            Ok(()) => Outcome::go(Transition::Back).with_alert(Alert::new("Profile updated!")),
            Err(e) => remote_failure(
                state,
                &e,
                Alert::with_message(
                    "Profile update error",
                    "Could not update your data, check the credentials",
                ),
            ),
        }
    }

    /// Uploads the image at `path` as the new avatar.
    pub async fn update_avatar(&self, state: &mut AppState, path: &Path) -> Outcome {
        let user_id = match state.session.require() {
            Ok(session) => session.user.id.clone(),
            Err(_) => return Outcome::go(Transition::Reset(Route::SignIn)),
        };

        let result = upload_avatar(state, &user_id, path).await;

        match result {
            Ok(()) => Outcome::stay(),
            Err(e) => remote_failure(state, &e, Alert::new("Error while updating avatar")),
        }
    }

    pub fn go_back(&self) -> Outcome {
        Outcome::go(Transition::Back)
    }

    pub fn render(&self, user: &User) -> String {
        let mut lines = vec![
            "My profile".to_string(),
            format!("Avatar: {}", user.avatar_url.as_deref().unwrap_or("(none)")),
            format!("Name: {}", self.form.name),
            format!("E-mail: {}", self.form.email),
        ];

        for (field, message) in self.errors.iter() {
            lines.push(format!("  ! {field}: {message}"));
        }

        lines.join("\n")
    }
}

async fn upload_avatar(state: &mut AppState, user_id: &str, path: &Path) -> Result<(), ClientError> {
    let image = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = image.len(), "uploading avatar");

    let user = state.api.update_avatar(user_id, image).await?;
    state.session.update_user(UserPatch::from(user))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::test_support::{john, signed_in_state};

    fn filled(screen: &mut ProfileScreen, old: &str, new: &str, confirmation: &str) {
        screen.form.old_password = old.to_string();
        screen.form.password = new.to_string();
        screen.form.password_confirmation = confirmation.to_string();
    }

    #[tokio::test]
    async fn test_old_password_without_new_password_makes_no_call() {
        let (mut state, api) = signed_in_state().await;
        let mut screen = ProfileScreen::new(&john());
        filled(&mut screen, "old-secret", "", "");

        let outcome = screen.submit(&mut state).await;

        assert_eq!(outcome, Outcome::stay());
        assert_eq!(screen.errors.get("password"), Some("New password required"));
        assert!(api.profile_updates().is_empty());
    }

    #[tokio::test]
    async fn test_update_without_password_change_omits_password_fields() {
        let (mut state, api) = signed_in_state().await;
        let mut screen = ProfileScreen::new(&john());
        screen.form.name = "John Tre".to_string();

        let outcome = screen.submit(&mut state).await;

        assert_eq!(outcome.transition, Transition::Back);
        assert_eq!(outcome.alert, Some(Alert::new("Profile updated!")));
        let sent = api.profile_updates();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].old_password, None);
        assert_eq!(sent[0].password, None);
        assert_eq!(state.session.user().unwrap().name, "John Tre");
    }

    #[tokio::test]
    async fn test_password_change_sends_all_fields() {
        let (mut state, api) = signed_in_state().await;
        let mut screen = ProfileScreen::new(&john());
        filled(&mut screen, "old-secret", "new-secret", "new-secret");

        screen.submit(&mut state).await;

        let sent = api.profile_updates();
        assert_eq!(sent[0].old_password.as_deref(), Some("old-secret"));
        assert_eq!(sent[0].password.as_deref(), Some("new-secret"));
        assert_eq!(sent[0].password_confirmation.as_deref(), Some("new-secret"));
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_form_open() {
        let (mut state, api) = signed_in_state().await;
        api.fail_profile();
        let mut screen = ProfileScreen::new(&john());
        screen.form.name = "John Tre".to_string();

        let outcome = screen.submit(&mut state).await;

        assert_eq!(outcome.transition, Transition::Stay);
        assert_eq!(outcome.alert.unwrap().title, "Profile update error");
        assert_eq!(state.session.user().unwrap().name, "John Doe");
    }

    #[tokio::test]
    async fn test_avatar_upload_updates_session_user() {
        let (mut state, api) = signed_in_state().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xd8\xff\xe0fake-jpeg").unwrap();

        let screen = ProfileScreen::new(&john());
        let outcome = screen.update_avatar(&mut state, file.path()).await;

        assert_eq!(outcome, Outcome::stay());
        assert_eq!(api.avatars(), vec![("u-1".to_string(), 13)]);
        assert_eq!(
            state.session.user().unwrap().avatar_url.as_deref(),
            Some("http://cdn/u-1.jpg")
        );
    }

    #[tokio::test]
    async fn test_avatar_missing_file_alerts() {
        let (mut state, api) = signed_in_state().await;
        let screen = ProfileScreen::new(&john());

        let outcome = screen
            .update_avatar(&mut state, Path::new("/nonexistent/avatar.jpg"))
            .await;

        assert_eq!(outcome.alert, Some(Alert::new("Error while updating avatar")));
        assert!(api.avatars().is_empty());
    }
}
