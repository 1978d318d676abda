//! Tracing subscriber bootstrap.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{EnvConfig, DEFAULT_LOG_FILTER};

static LOGGING_INIT: OnceLock<LogSink> = OnceLock::new();

/// Where log records end up after [`init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
    /// A global subscriber was already installed by someone else.
    External,
}

/// Installs the global fmt subscriber once. Later calls return the sink chosen
/// by the first call.
pub fn init_logging(config: &EnvConfig) -> LogSink {
    LOGGING_INIT
        .get_or_init(|| install_subscriber(config))
        .clone()
}

fn install_subscriber(config: &EnvConfig) -> LogSink {
    let filter = build_filter(&config.log_filter);

    let (writer, sink, ansi) = match config.log_file.as_ref() {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => (
                BoxMakeWriter::new(Mutex::new(file)),
                LogSink::File(path.clone()),
                false,
            ),
            Err(err) => {
                eprintln!(
                    "quick-chat: cannot open log file {}: {err}; logging to stderr",
                    path.display()
                );
                (BoxMakeWriter::new(io::stderr), LogSink::Stderr, true)
            }
        },
        None => (BoxMakeWriter::new(io::stderr), LogSink::Stderr, true),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish();

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => sink,
        Err(_) => LogSink::External,
    }
}

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
