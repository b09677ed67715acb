use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::{Session, SignInCredentials, User, UserPatch};
use crate::services::api::BarberApi;
use crate::storage::Storage;

pub const TOKEN_KEY: &str = "@barberbook:token";
pub const USER_KEY: &str = "@barberbook:user";

/// Holds the signed-in user and token, mirrored to device storage and to
/// the API client's bearer header.
pub struct SessionStore {
    storage: Storage,
    api: Arc<dyn BarberApi>,
    session: Option<Session>,
}

impl SessionStore {
    /// Restores a persisted session, if both keys are present.
    pub fn load(storage: Storage, api: Arc<dyn BarberApi>) -> Result<Self, ClientError> {
        let token = storage.get_item(TOKEN_KEY)?;
        let user = storage.get_item(USER_KEY)?;

        let session = match (token, user) {
            (Some(token), Some(user_json)) => match serde_json::from_str::<User>(&user_json) {
                Ok(user) => Some(Session { user, token }),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable persisted user");
                    storage.multi_remove(&[TOKEN_KEY, USER_KEY])?;
                    None
                }
            },
            _ => None,
        };

        api.set_token(session.as_ref().map(|s| s.token.clone()));

        if let Some(session) = &session {
            tracing::info!(user_id = %session.user.id, "restored session");
        }

        Ok(Self {
            storage,
            api,
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn require(&self) -> Result<&Session, ClientError> {
        self.session.as_ref().ok_or(ClientError::Unauthenticated)
    }

    pub fn api(&self) -> &dyn BarberApi {
        self.api.as_ref()
    }

    pub async fn sign_in(&mut self, credentials: &SignInCredentials) -> Result<&Session, ClientError> {
        let session = self.api.create_session(credentials).await?;

        let user_json = serde_json::to_string(&session.user)?;
        self.storage
            .multi_set(&[(TOKEN_KEY, session.token.as_str()), (USER_KEY, user_json.as_str())])?;
        self.api.set_token(Some(session.token.clone()));

        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(self.session.insert(session))
    }

    pub fn sign_out(&mut self) -> Result<(), ClientError> {
        self.storage.multi_remove(&[TOKEN_KEY, USER_KEY])?;
        self.api.set_token(None);

        if let Some(session) = self.session.take() {
            tracing::info!(user_id = %session.user.id, "signed out");
        }
        Ok(())
    }

    /// Merges `patch` into the current user and persists it.
    pub fn update_user(&mut self, patch: UserPatch) -> Result<&User, ClientError> {
        let session = self.session.as_mut().ok_or(ClientError::Unauthenticated)?;

        let mut user = session.user.clone();
        user.apply(patch);
        self.storage
            .set_item(USER_KEY, &serde_json::to_string(&user)?)?;

        session.user = user;
        Ok(&session.user)
    }
}
