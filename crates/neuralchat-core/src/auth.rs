//! Authentication boundary.
//!
//! The sync engine only needs to know whether a session exists. Logging in,
//! registering and logging out are thin calls that the login view drives.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of probing the remote store for a valid session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Credentials submitted by the login and register forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_name: String,
    /// Only required when registering.
    #[serde(default)]
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            email: String::new(),
            password: password.into(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

/// Account operations of the remote store.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Starts a session. The transport keeps the returned credential.
    async fn login(&self, credentials: &Credentials) -> Result<()>;

    /// Creates an account. Does not start a session.
    async fn register(&self, credentials: &Credentials) -> Result<()>;

    /// Ends the current session.
    async fn logout(&self) -> Result<()>;
}
