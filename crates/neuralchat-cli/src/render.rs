//! Terminal formatting.

use chrono::{DateTime, Utc};
use colored::Colorize;
use neuralchat_core::{AuthState, ChatSummary, MessageRecord, ModelId};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn auth_state(state: AuthState) -> String {
    match state {
        AuthState::Authenticated => "logged in".green().to_string(),
        AuthState::Unauthenticated => "logged out".yellow().to_string(),
        AuthState::Unknown => "unknown".bright_black().to_string(),
    }
}

pub fn title(title: &str) -> String {
    format!("=== {title} ===").bright_magenta().bold().to_string()
}

/// One picker row: position, title, id and creation date.
pub fn chat_line(index: usize, chat: &ChatSummary, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    format!(
        "{marker}{index:>3}. {}  {}",
        chat.title.bold(),
        format!("{} {}", chat.id, timestamp(&chat.created_at)).bright_black()
    )
}

/// A prompt with its answer, or a placeholder while the answer is pending.
pub fn message(record: &MessageRecord) -> String {
    let mut out = format!("{}\n", format!("> {}", record.prompt).green());
    match &record.response {
        Some(response) => out.push_str(&response_text(response)),
        None => out.push_str(&"  ...".bright_black().to_string()),
    }
    let meta = match &record.created_at {
        Some(at) => format!("  [{} {}]", record.model, timestamp(at)),
        None => format!("  [{}]", record.model),
    };
    out.push('\n');
    out.push_str(&meta.bright_black().to_string());
    out
}

pub fn response(text: &str) -> String {
    response_text(text)
}

pub fn model_line(model: ModelId, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    format!(
        "{marker} {:<11} {} {}",
        model.key(),
        model.label(),
        model.variant().bright_black()
    )
}

fn response_text(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line.bright_blue()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_chat_line_marks_active_chat() {
        plain();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let chat = ChatSummary::new("abc", "Rust questions", at);

        assert_eq!(
            chat_line(2, &chat, true),
            "*  2. Rust questions  abc 2025-03-01 09:30"
        );
        assert!(chat_line(2, &chat, false).starts_with("   2."));
    }

    #[test]
    fn test_pending_message_shows_placeholder() {
        plain();
        let record = MessageRecord::pending("hello", "qwen");

        assert_eq!(message(&record), "> hello\n  ...\n  [qwen]");
    }

    #[test]
    fn test_confirmed_message_indents_every_line() {
        plain();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let record = MessageRecord::confirmed("m1", "hi", "line one\nline two", "llama3", at);

        assert_eq!(
            message(&record),
            "> hi\n  line one\n  line two\n  [llama3 2025-03-01 09:30]"
        );
    }

    #[test]
    fn test_model_line() {
        plain();
        assert_eq!(
            model_line(ModelId::Llama3Fast, true),
            "* llama3fast  Llama 3.1 8B Instant"
        );
    }
}
