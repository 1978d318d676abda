//! Quick chat overlay core.
//!
//! This package holds the pieces every front-end shares: the message
//! [`format`]ter, environment [`config`], and [`logging`] bootstrap. Storage,
//! the completion client and the session controller live in the workspace
//! crates `chat_store`, `completion_api` and `chat_session`.

pub mod config;
pub mod format;
pub mod logging;

pub use config::EnvConfig;
pub use format::{format_message, format_timestamp, prewarm_highlighting};
pub use logging::{init_logging, LogSink};
