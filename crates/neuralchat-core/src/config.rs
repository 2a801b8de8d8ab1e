use crate::supported_models::ModelId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Client configuration, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the chat server (without the `/api` suffix).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model selected when the client starts.
    #[serde(default)]
    pub default_model: ModelId,
    /// Fallback log filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_model: ModelId::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
