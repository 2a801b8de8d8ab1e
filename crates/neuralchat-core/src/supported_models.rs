//! Supported backend models.
//!
//! | Key | Label | Variant |
//! |-----|-------|---------|
//! | `llama3` | Llama 3.3 | 70B Versatile (default) |
//! | `llama3fast` | Llama 3.1 | 8B Instant |
//! | `qwen` | Qwen 3 | 32B |
//!
//! The key is what travels over the wire with every send and what the server
//! stores on each message.

use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// One entry of the fixed model catalogue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelId {
    #[default]
    Llama3,
    Llama3Fast,
    Qwen,
}

impl ModelId {
    /// Wire key, e.g. `llama3fast`.
    pub fn key(&self) -> &'static str {
        (*self).into()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Llama3 => "Llama 3.3",
            Self::Llama3Fast => "Llama 3.1",
            Self::Qwen => "Qwen 3",
        }
    }

    pub fn variant(&self) -> &'static str {
        match self {
            Self::Llama3 => "70B Versatile",
            Self::Llama3Fast => "8B Instant",
            Self::Qwen => "32B",
        }
    }

    /// Parses a wire key, rejecting anything outside the catalogue.
    pub fn from_key(key: &str) -> Result<Self> {
        Self::from_str(key.trim()).map_err(|_| ChatError::UnknownModel(key.to_string()))
    }

    /// Every supported model, in picker order.
    pub fn all() -> impl Iterator<Item = ModelId> {
        Self::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match_wire_format() {
        let keys: Vec<&str> = ModelId::all().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["llama3", "llama3fast", "qwen"]);
    }

    #[test]
    fn test_from_key_accepts_catalogue_members() {
        assert_eq!(ModelId::from_key("qwen").unwrap(), ModelId::Qwen);
        assert_eq!(ModelId::from_key("llama3fast").unwrap(), ModelId::Llama3Fast);
    }

    #[test]
    fn test_from_key_rejects_unknown_model() {
        let err = ModelId::from_key("gpt-4").unwrap_err();
        assert_eq!(err, ChatError::UnknownModel("gpt-4".to_string()));
    }

    #[test]
    fn test_default_is_llama3() {
        assert_eq!(ModelId::default(), ModelId::Llama3);
        assert_eq!(ModelId::default().to_string(), "llama3");
    }
}
