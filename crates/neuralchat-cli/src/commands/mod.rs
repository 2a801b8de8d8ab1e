pub mod chats;
pub mod models;
pub mod repl;
pub mod session;

use anyhow::{Context as _, Result, anyhow, bail};
use neuralchat_application::ChatClient;
use neuralchat_core::{AuthState, ClientConfig, Credentials};

/// Read before prompting for a password.
pub const ENV_PASSWORD: &str = "NEURALCHAT_PASSWORD";

/// What every command needs: the resolved configuration and who to log in as.
pub struct Context {
    pub config: ClientConfig,
    pub user: Option<String>,
}

impl Context {
    pub fn new(config: ClientConfig, user: Option<String>) -> Self {
        Self { config, user }
    }

    /// Builds a client holding a valid session.
    ///
    /// With `--user` the client logs in first; otherwise the session probe has
    /// to succeed on its own.
    pub async fn connect(&self) -> Result<ChatClient> {
        let client = ChatClient::from_config(&self.config)?;
        match &self.user {
            Some(user) => login(&client, user).await?,
            None => {
                if client.start().await != AuthState::Authenticated {
                    bail!("Not logged in. Pass --user or set NEURALCHAT_USER.");
                }
            }
        }
        Ok(client)
    }
}

/// Logs `user` in with a password from the environment or the terminal.
pub async fn login(client: &ChatClient, user: &str) -> Result<()> {
    let password = read_password()?;
    client
        .login(&Credentials::new(user, password))
        .await
        .map_err(|e| anyhow!("Login failed: {}", e.user_message()))
}

pub fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(ENV_PASSWORD) {
        return Ok(password);
    }
    rpassword::prompt_password("Password: ").context("Failed to read password")
}
