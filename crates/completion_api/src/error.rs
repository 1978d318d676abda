use std::sync::OnceLock;

use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Terminal outcome of a failed [`send`](crate::CompletionClient::send).
///
/// `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("Message cannot be empty")]
    Validation,
    #[error("Please configure your API key in settings")]
    NoCredential,
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,
    #[error("Network error. Please check your internet connection.")]
    NetworkError,
    #[error("Received invalid response from AI. Please try again.")]
    InvalidResponse,
    #[error("Error: {0}")]
    Unknown(String),
}

/// Coarse reason a request never produced an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Timeout,
    Body,
    Builder,
    Other,
}

/// Failure of a single attempt, before retry and classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{message}")]
    Transport {
        kind: TransportFailure,
        message: String,
    },
    #[error("empty response text")]
    EmptyText,
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response blocked ({0})")]
    Blocked(String),
}

impl AttemptError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn transport(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Maps a `reqwest` failure onto [`TransportFailure`].
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let kind = if error.is_builder() {
            TransportFailure::Builder
        } else if error.is_timeout() {
            TransportFailure::Timeout
        } else if error.is_connect() {
            TransportFailure::Connect
        } else if error.is_body() || error.is_decode() {
            TransportFailure::Body
        } else {
            TransportFailure::Other
        };
        Self::transport(kind, error.to_string())
    }

    fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Transport { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

fn credential_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)api.?key|unauthenticated|unauthori[sz]ed|permission.?denied")
            .expect("credential regex must compile")
    })
}

fn rate_limit_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)rate.?limit|quota|resource.?exhausted|too many requests")
            .expect("rate limit regex must compile")
    })
}

fn network_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)network|enotfound|dns|timed?.?out|connection")
            .expect("network regex must compile")
    })
}

fn invalid_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)invalid|malformed").expect("invalid response regex must compile")
    })
}

pub(crate) fn is_credential_rejection(status: Option<u16>, text: &str) -> bool {
    matches!(status, Some(401 | 403)) || credential_regex().is_match(text)
}

/// Reduces the last attempt failure to the user-facing taxonomy.
///
/// Checks run in priority order: credential, rate limit, connectivity,
/// invalid payload, then everything else.
pub fn classify(error: &AttemptError) -> CompletionError {
    let status = error.http_status();
    let detail = error.detail();

    if is_credential_rejection(status, &detail) {
        return CompletionError::NoCredential;
    }
    if status == Some(429) || rate_limit_regex().is_match(&detail) {
        return CompletionError::RateLimited;
    }
    let transport_failure = matches!(
        error,
        AttemptError::Transport {
            kind: TransportFailure::Connect | TransportFailure::Timeout | TransportFailure::Body,
            ..
        }
    );
    if transport_failure || network_regex().is_match(&detail) {
        return CompletionError::NetworkError;
    }
    if matches!(error, AttemptError::EmptyText | AttemptError::Malformed(_))
        || invalid_regex().is_match(&detail)
    {
        return CompletionError::InvalidResponse;
    }
    CompletionError::Unknown(detail)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl ErrorPayloadFields {
    fn message_or_status(&self) -> Option<String> {
        self.message
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.status.as_deref().filter(|value| !value.trim().is_empty()))
            .map(str::to_owned)
    }
}

/// Readable message for a non-success response body.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.to_string()
        }
    };

    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(ErrorPayload { value: Some(fields) }) => {
            fields.message_or_status().unwrap_or_else(fallback)
        }
        _ => fallback(),
    }
}
