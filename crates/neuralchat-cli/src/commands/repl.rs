//! Interactive chat session.
//!
//! One `ChatClient` lives for the whole session, so the login cookie and the
//! local state survive between lines. Plain lines are sent to the open chat;
//! lines starting with `/` are commands.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use neuralchat_application::{ChatClient, IgnoreReason, LoadOutcome, SubmitOutcome};
use neuralchat_core::{AuthState, ChatId, ChatSummary, Credentials, ModelId};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context as LineContext, Editor, Helper};

use super::{Context, login, read_password};
use crate::render;

const COMMANDS: &[&str] = &[
    "/login", "/register", "/logout", "/list", "/open", "/new", "/delete", "/model", "/models",
    "/history", "/help", "/quit",
];

/// Completion and hints for slash commands.
struct ReplHelper;

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &LineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &LineContext<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ReplHelper {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Send(String),
    Login(String),
    Register { user: String, email: String },
    Logout,
    List,
    Open(String),
    New,
    Delete(String),
    Model(Option<String>),
    Models,
    History,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parses one input line. The error is a usage hint for the user.
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Ok(Self::Quit);
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(Self::Send(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        match (name, args.as_slice()) {
            ("login", [user]) => Ok(Self::Login(user.to_string())),
            ("login", _) => Err("Usage: /login <user>".to_string()),
            ("register", [user, email]) => Ok(Self::Register {
                user: user.to_string(),
                email: email.to_string(),
            }),
            ("register", _) => Err("Usage: /register <user> <email>".to_string()),
            ("logout", []) => Ok(Self::Logout),
            ("list", []) => Ok(Self::List),
            ("open", [target]) => Ok(Self::Open(target.to_string())),
            ("open", _) => Err("Usage: /open <chat id or number>".to_string()),
            ("new", []) => Ok(Self::New),
            ("delete", [target]) => Ok(Self::Delete(target.to_string())),
            ("delete", _) => Err("Usage: /delete <chat id or number>".to_string()),
            ("model", []) => Ok(Self::Model(None)),
            ("model", [key]) => Ok(Self::Model(Some(key.to_string()))),
            ("models", []) => Ok(Self::Models),
            ("history", []) => Ok(Self::History),
            ("help", []) => Ok(Self::Help),
            ("quit" | "exit", []) => Ok(Self::Quit),
            _ => Err(format!("Unknown command: /{command}. Type /help.")),
        }
    }
}

/// Resolves a 1-based position in the list shown by `/list`, or a chat id.
fn resolve_chat(target: &str, chats: &[ChatSummary]) -> Option<ChatId> {
    if let Ok(position) = target.parse::<usize>() {
        if let Some(chat) = position.checked_sub(1).and_then(|i| chats.get(i)) {
            return Some(chat.id.clone());
        }
    }
    chats
        .iter()
        .find(|c| c.id.as_str() == target)
        .map(|c| c.id.clone())
}

pub async fn run(ctx: &Context) -> Result<()> {
    let client = ChatClient::from_config(&ctx.config)?;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    println!("{}", "=== NeuralChat ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Server: {}. Type /help for commands, /quit to exit.", ctx.config.base_url)
            .bright_black()
    );

    let state = match &ctx.user {
        Some(user) => match login(&client, user).await {
            Ok(()) => AuthState::Authenticated,
            Err(e) => {
                println!("{}", e.to_string().red());
                AuthState::Unauthenticated
            }
        },
        None => client.start().await,
    };
    if state != AuthState::Authenticated {
        println!("{}", "Not logged in. Use /login <user>.".yellow());
    }
    println!();

    loop {
        let prompt = format!("[{}] >> ", client.models().selected().await);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match ReplCommand::parse(trimmed) {
                    Ok(ReplCommand::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(command) => execute(&client, command).await,
                    Err(usage) => println!("{}", usage.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn execute(client: &ChatClient, command: ReplCommand) {
    match command {
        ReplCommand::Send(prompt) => send(client, &prompt).await,
        ReplCommand::Login(user) => match login(client, &user).await {
            Ok(()) => {
                println!("{}", format!("Logged in as {user}.").green());
                print_chats(client).await;
            }
            Err(e) => println!("{}", e.to_string().red()),
        },
        ReplCommand::Register { user, email } => {
            let password = match read_password() {
                Ok(password) => password,
                Err(e) => return println!("{}", e.to_string().red()),
            };
            match client
                .register(&Credentials::new(&user, password).with_email(email))
                .await
            {
                Ok(()) => println!("{}", format!("Registered {user}. Use /login {user}.").green()),
                Err(e) => println!("{}", format!("Registration failed: {}", e.user_message()).red()),
            }
        }
        ReplCommand::Logout => {
            client.logout().await;
            println!("{}", "Logged out.".green());
        }
        ReplCommand::List => print_chats(client).await,
        ReplCommand::Open(target) => {
            let Some(chat_id) = resolve_chat(&target, &client.chat_list().chats().await) else {
                return println!("{}", format!("No chat {target}. Try /list.").yellow());
            };
            if let Some(LoadOutcome::Failed) = client.select_chat(chat_id).await {
                println!("{}", "Failed to load messages.".red());
            }
            print_history(client).await;
        }
        ReplCommand::New => {
            client.new_chat().await;
            println!("{}", render::title(&client.active_title().await));
        }
        ReplCommand::Delete(target) => {
            let Some(chat_id) = resolve_chat(&target, &client.chat_list().chats().await) else {
                return println!("{}", format!("No chat {target}. Try /list.").yellow());
            };
            if client.delete_chat(&chat_id).await {
                println!("{}", format!("Deleted chat {chat_id}.").green());
            } else {
                println!("{}", format!("Failed to delete chat {chat_id}.").red());
            }
        }
        ReplCommand::Model(None) | ReplCommand::Models => {
            let selected = client.models().selected().await;
            for model in client.models().options() {
                println!("{}", render::model_line(model, model == selected));
            }
        }
        ReplCommand::Model(Some(key)) => match client.models().select_key(&key).await {
            Ok(model) => println!("{}", format!("Using {} {}.", model.label(), model.variant()).green()),
            Err(_) => println!(
                "{}",
                format!(
                    "Unknown model {key}. Choose one of: {}",
                    ModelId::all().map(|m| m.key()).collect::<Vec<_>>().join(", ")
                )
                .yellow()
            ),
        },
        ReplCommand::History => print_history(client).await,
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => {}
    }
}

async fn send(client: &ChatClient, prompt: &str) {
    println!("{}", "...".bright_black());
    match client.send(prompt).await {
        SubmitOutcome::Confirmed { chat_id, created } => {
            if created {
                println!("{}", format!("Started chat {chat_id}.").bright_black());
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
        }
        SubmitOutcome::Ignored(IgnoreReason::EmptyPrompt) => {}
        SubmitOutcome::Ignored(IgnoreReason::AlreadySending) => {
            println!("{}", "Still waiting for the previous answer.".yellow());
        }
        SubmitOutcome::RolledBack(e) => {
            println!("{}", format!("Send failed: {}", e.user_message()).red());
        }
    }
}

async fn print_chats(client: &ChatClient) {
    let chats = client.chat_list().chats().await;
    if chats.is_empty() {
        return println!("{}", "No chats yet.".bright_black());
    }
    let active = client.active().get();
    for (index, chat) in chats.iter().enumerate() {
        println!(
            "{}",
            render::chat_line(index + 1, chat, active.as_ref() == Some(&chat.id))
        );
    }
}

async fn print_history(client: &ChatClient) {
    println!("{}", render::title(&client.active_title().await));
    for record in client.timeline().records().await {
        println!("{}", render::message(&record));
    }
}

fn print_help() {
    let lines = [
        ("<text>", "send to the open chat (a new chat if none is open)"),
        ("/login <user>", "log in"),
        ("/register <user> <email>", "create an account"),
        ("/logout", "log out and forget local state"),
        ("/list", "list chats"),
        ("/open <n|id>", "open a chat"),
        ("/new", "start a new chat"),
        ("/delete <n|id>", "delete a chat"),
        ("/model [key]", "show or change the model"),
        ("/history", "show the open chat again"),
        ("/quit", "exit"),
    ];
    for (usage, description) in lines {
        println!("  {:<26} {}", usage.bright_cyan(), description);
    }
}
