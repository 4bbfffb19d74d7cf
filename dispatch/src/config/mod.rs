pub mod manager;
use reqwest::Url;
use serde::{Deserialize, Serialize};
pub use manager::ConfigManager;

use crate::constants::defaults;
use crate::errors::ConfigError;
use crate::http::Credentials;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Management endpoint, e.g. `http://localhost:9990/management`
    pub endpoint_url: String,
    #[serde(default = "default_diagnostics_enabled")]
    pub diagnostics_enabled: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    // Transport only; dispatches themselves never time out
    pub connect_timeout_seconds: Option<u64>,
}

fn default_diagnostics_enabled() -> bool {
    defaults::DIAGNOSTICS_ENABLED
}

impl Config {
    pub fn credentials(&self) -> Option<Credentials> {
        self.username.as_ref().map(|username| Credentials {
            username: username.clone(),
            password: self.password.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint_url).map_err(|e| ConfigError::InvalidValue {
            field: "endpoint_url".to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "endpoint_url".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.password.is_some() && self.username.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "password".to_string(),
                reason: "password given without username".to_string(),
            });
        }

        if self.connect_timeout_seconds == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
