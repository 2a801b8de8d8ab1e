use super::Context;
use crate::render;
use anyhow::{Result, bail};
use colored::Colorize;
use neuralchat_application::{ChatClient, IgnoreReason, LoadOutcome, LoadStatus, SubmitOutcome};
use neuralchat_core::ChatId;

pub async fn list(ctx: &Context) -> Result<()> {
    let client = ctx.connect().await?;
    if client.chat_list().status().await == LoadStatus::Failed {
        bail!("Failed to load chats");
    }

    let chats = client.chat_list().chats().await;
    if chats.is_empty() {
        println!("{}", "No chats yet.".bright_black());
    }
    for (index, chat) in chats.iter().enumerate() {
        println!("{}", render::chat_line(index + 1, chat, false));
    }
    Ok(())
}

pub async fn show(ctx: &Context, chat_id: &str) -> Result<()> {
    let client = ctx.connect().await?;
    open(&client, chat_id).await?;

    println!("{}", render::title(&client.active_title().await));
    for record in client.timeline().records().await {
        println!("{}", render::message(&record));
    }
    Ok(())
}

pub async fn send(
    ctx: &Context,
    chat_id: Option<&str>,
    model: Option<&str>,
    prompt: &str,
) -> Result<()> {
    let client = ctx.connect().await?;
    if let Some(key) = model {
        client.models().select_key(key).await?;
    }
    if let Some(chat_id) = chat_id {
        open(&client, chat_id).await?;
    }

    match client.send(prompt).await {
        SubmitOutcome::Confirmed { chat_id, created } => {
            if created {
                println!("{}", format!("Created chat {chat_id}").green());
            }
            if let Some(response) = client
                .timeline()
                .records()
                .await
                .last()
                .and_then(|r| r.response.clone())
            {
                println!("{}", render::response(&response));
            }
            Ok(())
        }
        SubmitOutcome::Ignored(IgnoreReason::EmptyPrompt) => bail!("Prompt is empty"),
        SubmitOutcome::Ignored(IgnoreReason::AlreadySending) => bail!("A send is already running"),
        SubmitOutcome::RolledBack(e) => bail!("Send failed: {}", e.user_message()),
    }
}

pub async fn delete(ctx: &Context, chat_id: &str) -> Result<()> {
    let client = ctx.connect().await?;
    if !client.delete_chat(&ChatId::from(chat_id)).await {
        bail!("Failed to delete chat {chat_id}");
    }
    println!("{}", format!("Deleted chat {chat_id}").green());
    Ok(())
}

async fn open(client: &ChatClient, chat_id: &str) -> Result<()> {
    if let Some(LoadOutcome::Failed) = client.select_chat(ChatId::from(chat_id)).await {
        bail!("Failed to load chat {chat_id}");
    }
    Ok(())
}
