use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::BarberApi;
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::{
    Appointment, AppointmentRequest, AvailabilitySlot, NewUser, ProfileUpdate, Provider, Session,
    SignInCredentials, User,
};

pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

#[derive(Serialize)]
struct DayQuery {
    year: i32,
    month: u32,
    day: u32,
}

impl HttpApi {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        let req = self
            .client
            .request(method, format!("{}{path}", self.base_url));

        match self.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|data| data["message"].as_str().map(str::to_string))
            .unwrap_or(body);
        tracing::warn!(status = status.as_u16(), %message, "api error");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(resp.json().await?)
}

#[async_trait]
impl BarberApi for HttpApi {
    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    async fn create_session(&self, credentials: &SignInCredentials) -> Result<Session, ClientError> {
        let resp = self
            .request(Method::POST, "/sessions")
            .json(credentials)
            .send()
            .await?;
        parse(resp).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ClientError> {
        let resp = self.request(Method::POST, "/users").json(user).send().await?;
        parse(resp).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let resp = self
            .request(Method::PUT, "/profile")
            .json(update)
            .send()
            .await?;
        parse(resp).await
    }

    async fn update_avatar(&self, user_id: &str, image: Vec<u8>) -> Result<User, ClientError> {
        let part = Part::bytes(image)
            .file_name(format!("{user_id}.jpg"))
            .mime_str("image/jpeg")?;
        let form = Form::new().part("avatar", part);

        let resp = self
            .request(Method::PATCH, "/users/avatar")
            .multipart(form)
            .send()
            .await?;
        parse(resp).await
    }

    async fn list_providers(&self) -> Result<Vec<Provider>, ClientError> {
        let resp = self.request(Method::GET, "/providers").send().await?;
        parse(resp).await
    }

    async fn day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, ClientError> {
        let query = DayQuery {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        };
        let resp = self
            .request(Method::GET, &format!("/providers/{provider_id}/day-availability"))
            .query(&query)
            .send()
            .await?;
        parse(resp).await
    }

    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ClientError> {
        let resp = self
            .request(Method::POST, "/appointments")
            .json(request)
            .send()
            .await?;
        parse(resp).await
    }
}
