use std::env;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub storage_path: String,
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("API_URL").unwrap_or_else(|_| "http://localhost:3333".to_string()),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "barberbook.db".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
