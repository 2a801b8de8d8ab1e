//! Path management for neuralchat configuration files.
//!
//! ```text
//! ~/.config/neuralchat/
//! └── config.toml
//! ```

use neuralchat_core::{ChatError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "neuralchat";
const CONFIG_FILE: &str = "config.toml";

pub struct NeuralChatPaths;

impl NeuralChatPaths {
    /// Returns the configuration directory (e.g. `~/.config/neuralchat/`).
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ChatError::config("Cannot find home directory"))?;
        Ok(home.join(".config").join(APP_DIR))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
