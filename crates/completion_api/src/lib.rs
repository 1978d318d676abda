//! Single-shot text completion client for the Gemini `generateContent` endpoint.
//!
//! One call to [`CompletionClient::send`] issues up to
//! [`RetryPolicy::max_attempts`] requests with exponential backoff between them
//! and reduces the last failure to a [`CompletionError`] whose `Display` is the
//! message shown to the user. No conversation history is sent.

pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod payload;
pub mod retry;
pub mod transport;
pub mod url;

pub use client::CompletionClient;
pub use config::CompletionApiConfig;
pub use error::{classify, AttemptError, CompletionError, TransportFailure};
pub use options::CompletionOptions;
pub use payload::{GenerateRequest, GenerateResponse};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport};
pub use url::{generate_content_url, DEFAULT_BASE_URL};
