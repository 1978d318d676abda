use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result};
use chat_session::{
    parse_input, shortcut_for_control, PersistenceMode, SessionCommand, SessionController,
    SessionRuntime, TerminalUi,
};
use chat_store::{ChatStore, SqliteStore};
use completion_api::{CompletionApiConfig, CompletionClient};
use quick_chat::{init_logging, prewarm_highlighting, EnvConfig};
use tokio::sync::mpsc;
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = EnvConfig::from_env();
    let sink = init_logging(&config);
    info!(?sink, "starting quick-chat");

    let _ = std::thread::Builder::new()
        .name("code-highlight-prewarm".to_string())
        .spawn(prewarm_highlighting);

    let (store, persistence) = open_store(&config);
    let client = CompletionClient::new(api_config(&config))
        .context("failed to build the completion HTTP client")?;
    let ui = TerminalUi::stdout().context("terminal front end is incomplete")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let (command_tx, command_rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || read_commands(command_tx))
        .context("failed to spawn the input reader")?;

    runtime.block_on(async move {
        let controller = SessionController::start(ui, store, persistence);
        SessionRuntime::new(controller, Arc::new(client))
            .run(command_rx)
            .await;
    });

    Ok(())
}

fn open_store(config: &EnvConfig) -> (ChatStore, PersistenceMode) {
    if config.in_memory {
        info!("durable storage disabled");
        return (ChatStore::in_memory(), PersistenceMode::InMemory);
    }

    match SqliteStore::open_in_dir(config.data_dir.as_deref()) {
        Ok(store) => {
            info!(path = ?store.path(), "opened store");
            (ChatStore::boxed(store), PersistenceMode::Durable)
        }
        Err(err) => {
            warn!(error = %err, "cannot open store; this session will not be saved");
            (ChatStore::in_memory(), PersistenceMode::InMemory)
        }
    }
}

fn api_config(config: &EnvConfig) -> CompletionApiConfig {
    let mut api = CompletionApiConfig::default();
    if let Some(base_url) = &config.api_base_url {
        api = api.with_base_url(base_url.clone());
    }
    if let Some(timeout) = config.request_timeout {
        api = api.with_timeout(timeout);
    }
    api
}

fn read_commands(commands: mpsc::Sender<SessionCommand>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "stopped reading input");
                break;
            }
        };

        let command = match line.as_bytes() {
            [byte] => shortcut_for_control(*byte)
                .map(|shortcut| shortcut.command())
                .unwrap_or_else(|| parse_input(&line)),
            _ => parse_input(&line),
        };
        if commands.blocking_send(command).is_err() {
            break;
        }
    }
}
