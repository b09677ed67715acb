pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ClientError;
use crate::models::{
    Appointment, AppointmentRequest, AvailabilitySlot, NewUser, ProfileUpdate, Provider, Session,
    SignInCredentials, User,
};

/// Remote booking API. Authenticated calls carry the token set through
/// [`BarberApi::set_token`].
#[async_trait]
pub trait BarberApi: Send + Sync {
    fn set_token(&self, token: Option<String>);

    /// POST /sessions
    async fn create_session(&self, credentials: &SignInCredentials) -> Result<Session, ClientError>;

    /// POST /users
    async fn create_user(&self, user: &NewUser) -> Result<User, ClientError>;

    /// PUT /profile
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError>;

    /// PATCH /users/avatar
    async fn update_avatar(&self, user_id: &str, image: Vec<u8>) -> Result<User, ClientError>;

    /// GET /providers
    async fn list_providers(&self) -> Result<Vec<Provider>, ClientError>;

    /// GET /providers/:id/day-availability
    async fn day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, ClientError>;

    /// POST /appointments
    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ClientError>;
}
