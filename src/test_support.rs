use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ClientError;
use crate::models::{
    Appointment, AppointmentRequest, AvailabilitySlot, NewUser, ProfileUpdate, Provider, Session,
    SignInCredentials, User,
};
use crate::services::api::BarberApi;
use crate::services::auth::SessionStore;
use crate::state::AppState;
use crate::storage::Storage;

pub fn john() -> User {
    User {
        id: "u-1".to_string(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        avatar_url: None,
    }
}

pub fn providers() -> Vec<Provider> {
    vec![
        Provider {
            id: "p-1".to_string(),
            name: "Barber One".to_string(),
            avatar_url: None,
        },
        Provider {
            id: "p-2".to_string(),
            name: "Barber Two".to_string(),
            avatar_url: Some("http://cdn/p-2.jpg".to_string()),
        },
    ]
}

/// 08:00 through 17:00, with 09:00 and 15:00 taken.
pub fn day_slots() -> Vec<AvailabilitySlot> {
    (8..=17)
        .map(|hour| AvailabilitySlot {
            hour,
            available: hour != 9 && hour != 15,
        })
        .collect()
}

#[derive(Default)]
struct Calls {
    token: Option<String>,
    fail_sign_in: bool,
    fail_appointments: bool,
    fail_profile: bool,
    fail_providers: bool,
    fail_availability: bool,
    expired: bool,
    availability: Vec<(String, NaiveDate)>,
    profile_updates: Vec<ProfileUpdate>,
    appointments: Vec<AppointmentRequest>,
    signups: Vec<String>,
    avatars: Vec<(String, usize)>,
    provider_fetches: usize,
}

/// In-memory stand-in for the remote API that records every call.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Calls>,
}

impl FakeApi {
    fn with<T>(&self, f: impl FnOnce(&mut Calls) -> T) -> T {
        f(&mut self.calls.lock().unwrap())
    }

    pub fn token(&self) -> Option<String> {
        self.with(|c| c.token.clone())
    }

    pub fn fail_sign_in(&self) {
        self.with(|c| c.fail_sign_in = true);
    }

    pub fn fail_appointments(&self) {
        self.with(|c| c.fail_appointments = true);
    }

    pub fn fail_profile(&self) {
        self.with(|c| c.fail_profile = true);
    }

    pub fn fail_providers(&self) {
        self.with(|c| c.fail_providers = true);
    }

    pub fn fail_availability(&self) {
        self.with(|c| c.fail_availability = true);
    }

    /// Every authenticated call answers 401 from now on.
    pub fn expire_token(&self) {
        self.with(|c| c.expired = true);
    }

    pub fn availability_calls(&self) -> Vec<(String, NaiveDate)> {
        self.with(|c| c.availability.clone())
    }

    pub fn profile_updates(&self) -> Vec<ProfileUpdate> {
        self.with(|c| c.profile_updates.clone())
    }

    pub fn appointments(&self) -> Vec<AppointmentRequest> {
        self.with(|c| c.appointments.clone())
    }

    pub fn signups(&self) -> Vec<String> {
        self.with(|c| c.signups.clone())
    }

    pub fn avatars(&self) -> Vec<(String, usize)> {
        self.with(|c| c.avatars.clone())
    }

    pub fn provider_fetches(&self) -> usize {
        self.with(|c| c.provider_fetches)
    }

    fn authorize(&self) -> Result<(), ClientError> {
        self.with(|c| {
            if c.expired || c.token.is_none() {
                Err(ClientError::Unauthorized)
            } else {
                Ok(())
            }
        })
    }
}

#[async_trait]
impl BarberApi for FakeApi {
    fn set_token(&self, token: Option<String>) {
        self.with(|c| c.token = token);
    }

    async fn create_session(&self, credentials: &SignInCredentials) -> Result<Session, ClientError> {
        if self.with(|c| c.fail_sign_in) {
            return Err(ClientError::Unauthorized);
        }
        let mut user = john();
        user.email = credentials.email.clone();
        Ok(Session {
            user,
            token: "token-123".to_string(),
        })
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ClientError> {
        self.with(|c| c.signups.push(user.email.clone()));
        Ok(User {
            id: "u-2".to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_url: None,
        })
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        self.authorize()?;
        self.with(|c| c.profile_updates.push(update.clone()));
        if self.with(|c| c.fail_profile) {
            return Err(ClientError::Api {
                status: 400,
                message: "Old password does not match".to_string(),
            });
        }
        Ok(User {
            name: update.name.clone(),
            email: update.email.clone(),
            ..john()
        })
    }

    async fn update_avatar(&self, user_id: &str, image: Vec<u8>) -> Result<User, ClientError> {
        self.authorize()?;
        self.with(|c| c.avatars.push((user_id.to_string(), image.len())));
        Ok(User {
            avatar_url: Some(format!("http://cdn/{user_id}.jpg")),
            ..john()
        })
    }

    async fn list_providers(&self) -> Result<Vec<Provider>, ClientError> {
        self.authorize()?;
        self.with(|c| c.provider_fetches += 1);
        if self.with(|c| c.fail_providers) {
            return Err(ClientError::Api {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        Ok(providers())
    }

    async fn day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, ClientError> {
        self.authorize()?;
        self.with(|c| c.availability.push((provider_id.to_string(), date)));
        if self.with(|c| c.fail_availability) {
            return Err(ClientError::Api {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        Ok(day_slots())
    }

    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ClientError> {
        self.authorize()?;
        self.with(|c| c.appointments.push(request.clone()));
        if self.with(|c| c.fail_appointments) {
            return Err(ClientError::Api {
                status: 400,
                message: "This appointment is already booked".to_string(),
            });
        }
        Ok(Appointment {
            id: "a-1".to_string(),
            provider_id: request.provider_id.clone(),
            user_id: Some("u-1".to_string()),
            date: request.date,
        })
    }
}

/// App state backed by in-memory storage and a fresh [`FakeApi`].
pub fn app_state() -> (AppState, Arc<FakeApi>) {
    let storage = Storage::in_memory().unwrap();
    let api = Arc::new(FakeApi::default());
    let session = SessionStore::load(storage, api.clone()).unwrap();
    (
        AppState {
            api: api.clone(),
            session,
        },
        api,
    )
}

/// Same as [`app_state`], already signed in as [`john`].
pub async fn signed_in_state() -> (AppState, Arc<FakeApi>) {
    let (mut state, api) = app_state();
    state
        .session
        .sign_in(&SignInCredentials {
            email: "john@example.com".to_string(),
            password: "123456".to_string(),
        })
        .await
        .unwrap();
    (state, api)
}
