//! Configuration service implementation.
//!
//! Loads the client configuration from `~/.config/neuralchat/config.toml` and
//! applies environment overrides on top of it.

use crate::paths::NeuralChatPaths;
use neuralchat_core::{ChatError, ClientConfig, ModelId, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Overrides `base_url`.
pub const ENV_BASE_URL: &str = "NEURALCHAT_BASE_URL";
/// Overrides `default_model`.
pub const ENV_MODEL: &str = "NEURALCHAT_MODEL";

/// Configuration service that loads and caches the client configuration.
///
/// A missing file is not an error: the defaults apply.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(NeuralChatPaths::config_file()?))
    }

    /// Creates a service reading `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it from file if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| ChatError::internal(format!("config cache poisoned: {e}")))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = Self::load_file(&self.path)?;
        let loaded = apply_overrides(loaded, |key| std::env::var(key).ok())?;

        {
            let mut write_lock = self
                .config
                .write()
                .map_err(|e| ChatError::internal(format!("config cache poisoned: {e}")))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_file(path: &Path) -> Result<ClientConfig> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }
}

/// Applies environment overrides, looked up through `lookup`.
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.base_url = base_url.trim().to_string();
    }
    if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
        config.default_model = ModelId::from_key(&model)?;
    }
    Ok(config)
}
