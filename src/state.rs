use std::sync::Arc;

use crate::config::ClientConfig;
use crate::services::api::http::HttpApi;
use crate::services::api::BarberApi;
use crate::services::auth::SessionStore;
use crate::storage::Storage;

/// Shared context every screen reads: the API client and the session.
pub struct AppState {
    pub api: Arc<dyn BarberApi>,
    pub session: SessionStore,
}

impl AppState {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let storage = Storage::open(&config.storage_path)?;
        let api: Arc<dyn BarberApi> = Arc::new(HttpApi::from_config(config)?);
        let session = SessionStore::load(storage, api.clone())?;

        Ok(Self { api, session })
    }
}
