//! Error types for the NeuralChat client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the server fails without explaining why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// A shared error type for the whole client.
///
/// Gateway failures are carried as typed variants so the engine can log them,
/// while the stores above the gateway only ever look at success vs. failure.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatError {
    /// The request never produced an HTTP response (connection refused, DNS, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// A response body could not be decoded.
    #[error("Decode error: {format} - {message}")]
    Decode { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A model key outside the supported catalogue was requested.
    #[error("Unknown model: '{0}'")]
    UnknownModel(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Remote error, falling back to the generic message when the
    /// server did not send one.
    pub fn remote(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Self::Remote { status, message }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the server rejected the request
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if the server rejected the request because the session is not valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Remote { status, .. } if *status == 401 || *status == 403)
    }

    /// The human-readable message a login or register form should display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode {
                format: "JSON".to_string(),
                message: err.to_string(),
            };
        }
        match err.status() {
            Some(status) => Self::remote(status.as_u16(), None),
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Decode {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(format!("{} (kind: {:?})", err, err.kind()))
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_falls_back_to_generic_message() {
        let err = ChatError::remote(500, None);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = ChatError::remote(400, Some("   ".to_string()));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_remote_keeps_server_message() {
        let err = ChatError::remote(409, Some("User already exists".to_string()));
        assert!(err.is_remote());
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message(), "User already exists");
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ChatError::remote(401, None).is_unauthorized());
        assert!(ChatError::remote(403, None).is_unauthorized());
        assert!(!ChatError::transport("connection refused").is_unauthorized());
    }

    #[test]
    fn test_non_remote_errors_hide_details_from_users() {
        let err = ChatError::transport("connection reset by peer");
        assert!(err.is_transport());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
