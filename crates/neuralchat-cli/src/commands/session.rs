use super::{Context, login, read_password};
use crate::render;
use anyhow::{Result, anyhow, bail};
use colored::Colorize;
use neuralchat_application::ChatClient;
use neuralchat_core::{AuthState, Credentials};

pub async fn status(ctx: &Context) -> Result<()> {
    let client = ChatClient::from_config(&ctx.config)?;
    let state = match &ctx.user {
        Some(user) => {
            login(&client, user).await?;
            client.probe().state().await
        }
        None => client.start().await,
    };

    println!("Server: {}", ctx.config.base_url);
    println!("Auth:   {}", render::auth_state(state));
    if state == AuthState::Authenticated {
        println!("Chats:  {}", client.chat_list().chats().await.len());
    }
    println!("Model:  {}", ctx.config.default_model);
    Ok(())
}

pub async fn register(ctx: &Context, email: &str) -> Result<()> {
    let Some(user) = &ctx.user else {
        bail!("Pass --user with the name to register.");
    };
    let client = ChatClient::from_config(&ctx.config)?;
    let password = read_password()?;

    client
        .register(&Credentials::new(user, password).with_email(email))
        .await
        .map_err(|e| anyhow!("Registration failed: {}", e.user_message()))?;

    println!("{}", format!("Registered {user}. You can log in now.").green());
    Ok(())
}
