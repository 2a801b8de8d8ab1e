use anyhow::Result;
use clap::{Parser, Subcommand};
use neuralchat_infrastructure::ConfigService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "neuralchat")]
#[command(about = "NeuralChat CLI - chat with the models of a NeuralChat server", long_about = None)]
struct Cli {
    /// Server URL, overriding the config file and NEURALCHAT_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file to use instead of ~/.config/neuralchat/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log in as this user before running the command
    #[arg(long, global = true, env = "NEURALCHAT_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the server and whether the session is valid
    Status,
    /// Create an account for --user
    Register {
        #[arg(long)]
        email: String,
    },
    /// List chats, most recent first
    List,
    /// Print the messages of a chat
    Show { chat_id: String },
    /// Send one prompt and print the answer
    Send {
        /// Chat to append to; a new chat is created when omitted
        #[arg(long)]
        chat: Option<String>,
        /// Model key (see `neuralchat models`)
        #[arg(long)]
        model: Option<String>,
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// Delete a chat
    Delete { chat_id: String },
    /// List the supported models
    Models,
    /// Start an interactive chat session
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service.get_config()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    init_tracing(&config.log_level);
    tracing::debug!(config = %config_service.path().display(), "configuration loaded");

    let ctx = commands::Context::new(config, cli.user);
    match cli.command {
        Commands::Status => commands::session::status(&ctx).await?,
        Commands::Register { email } => commands::session::register(&ctx, &email).await?,
        Commands::List => commands::chats::list(&ctx).await?,
        Commands::Show { chat_id } => commands::chats::show(&ctx, &chat_id).await?,
        Commands::Send {
            chat,
            model,
            prompt,
        } => commands::chats::send(&ctx, chat.as_deref(), model.as_deref(), &prompt.join(" ")).await?,
        Commands::Delete { chat_id } => commands::chats::delete(&ctx, &chat_id).await?,
        Commands::Models => commands::models::list(&ctx),
        Commands::Chat => commands::repl::run(&ctx).await?,
    }

    Ok(())
}

/// Logs to stderr. `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
