use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;

use crate::schema::{Message, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported export format '{0}'")]
pub struct UnsupportedFormat(pub String);

impl ExportFormat {
    /// Accepts `json`, `text`/`txt` and `markdown`/`md`, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" | "txt" => Some(Self::Text),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::parse(name).ok_or_else(|| UnsupportedFormat(name.trim().to_string()))
    }
}

/// Renders `messages` in the named format, `None` when the format is unknown.
pub fn export_conversation(messages: &[Message], format: &str) -> Option<String> {
    export_conversation_at(messages, format, OffsetDateTime::now_utc())
}

/// [`export_conversation`] with an explicit export time.
pub fn export_conversation_at(
    messages: &[Message],
    format: &str,
    exported_at: OffsetDateTime,
) -> Option<String> {
    let Some(format) = ExportFormat::parse(format) else {
        warn!(format, "unsupported export format");
        return None;
    };

    match format {
        ExportFormat::Json => match serde_json::to_string_pretty(messages) {
            Ok(json) => Some(json),
            Err(err) => {
                warn!(error = %err, "failed to serialize conversation export");
                None
            }
        },
        ExportFormat::Text => Some(render_text(messages)),
        ExportFormat::Markdown => Some(render_markdown(messages, exported_at)),
    }
}

fn render_text(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            format!(
                "[{}] {}: {}\n",
                display_timestamp(message.created_at),
                message.role.label(),
                message.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_markdown(messages: &[Message], exported_at: OffsetDateTime) -> String {
    let mut out = String::from("# Conversation Export\n\n");
    let _ = write!(
        out,
        "*Exported on {}*\n\n---\n\n",
        display_timestamp(exported_at)
    );

    for message in messages {
        let speaker = match message.role {
            Role::User => "**You**",
            Role::Assistant => "**AI Assistant**",
        };
        let _ = write!(
            out,
            "### {speaker} *({})*\n\n{}\n\n---\n\n",
            display_timestamp(message.created_at),
            message.content
        );
    }

    out
}

fn display_timestamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
    ))
    .unwrap_or_else(|_| at.to_string())
}
