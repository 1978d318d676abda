//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "QUICK_CHAT_DATA_DIR";
pub const API_BASE_URL_ENV: &str = "QUICK_CHAT_API_BASE_URL";
pub const TIMEOUT_SEC_ENV: &str = "QUICK_CHAT_TIMEOUT_SEC";
pub const LOG_FILTER_ENV: &str = "QUICK_CHAT_LOG";
pub const LOG_FILE_ENV: &str = "QUICK_CHAT_LOG_FILE";
pub const IN_MEMORY_ENV: &str = "QUICK_CHAT_IN_MEMORY";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Directory holding the embedded store. `None` means the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub api_base_url: Option<String>,
    /// Per-request timeout. Unset means no timeout beyond the retry schedule.
    pub request_timeout: Option<Duration>,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
    pub in_memory: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            api_base_url: None,
            request_timeout: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            in_memory: false,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: env_string_opt(DATA_DIR_ENV).map(PathBuf::from),
            api_base_url: env_string_opt(API_BASE_URL_ENV),
            request_timeout: env_string_opt(TIMEOUT_SEC_ENV)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_filter: env_string_opt(LOG_FILTER_ENV)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: env_string_opt(LOG_FILE_ENV).map(PathBuf::from),
            in_memory: env_flag(IN_MEMORY_ENV),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
