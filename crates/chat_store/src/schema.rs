use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Opaque API key. Formatting never reveals the value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({self})")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<unset>")
        } else {
            write!(f, "<redacted>")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown model '{0}'")]
pub struct UnknownModel(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Model {
    #[default]
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    #[serde(rename = "gemini-1.5-pro-002")]
    Gemini15Pro002,
    #[serde(rename = "gemini-1.5-flash-002")]
    Gemini15Flash002,
}

impl Model {
    pub const ALL: [Model; 5] = [
        Model::Gemini20Flash,
        Model::Gemini15Pro,
        Model::Gemini15Flash,
        Model::Gemini15Pro002,
        Model::Gemini15Flash002,
    ];

    /// Identifier sent on the wire and stored in settings.
    pub fn id(self) -> &'static str {
        match self {
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini15Pro => "gemini-1.5-pro",
            Model::Gemini15Flash => "gemini-1.5-flash",
            Model::Gemini15Pro002 => "gemini-1.5-pro-002",
            Model::Gemini15Flash002 => "gemini-1.5-flash-002",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Model::Gemini20Flash => "Gemini 2.0 Flash",
            Model::Gemini15Pro => "Gemini 1.5 Pro",
            Model::Gemini15Flash => "Gemini 1.5 Flash",
            Model::Gemini15Pro002 => "Gemini 2.5 Pro",
            Model::Gemini15Flash002 => "Gemini 2.5 Flash",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Model::Gemini20Flash => "Fast and efficient",
            Model::Gemini15Pro => "Most capable",
            Model::Gemini15Flash => "Balanced performance",
            Model::Gemini15Pro002 => "Latest pro model",
            Model::Gemini15Flash002 => "Latest flash model",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Model {
    type Err = UnknownModel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Model::ALL
            .into_iter()
            .find(|model| model.id().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownModel(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    System,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub credential: Credential,
    pub model: Model,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub theme: Theme,
    /// Mirror every conversation change to the store.
    pub auto_persist: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential: Credential::default(),
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            theme: Theme::default(),
            auto_persist: true,
        }
    }
}

impl Settings {
    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Clamps temperature into range and replaces a zero output limit.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.temperature = if self.temperature.is_finite() {
            self.temperature.clamp(0.0, 1.0)
        } else {
            DEFAULT_TEMPERATURE
        };
        if self.max_output_tokens == 0 {
            self.max_output_tokens = DEFAULT_MAX_OUTPUT_TOKENS;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

impl Role {
    /// Short speaker name used in plain-text exports.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(rename = "timestamp", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            role,
            content: content.into(),
            created_at,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, OffsetDateTime::now_utc())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, OffsetDateTime::now_utc())
    }
}
