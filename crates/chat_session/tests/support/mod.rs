#![allow(dead_code)]

use std::io;

use chat_session::{ChatUi, CompletionHost, CompletionJob, NotificationKind, RenderedMessage};
use chat_store::{ChatStore, Credential, KeyValueStore, MemoryStore, Role, Settings, StoreError};

pub const TEST_KEY: &str = "AIzaTestKey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Rendered { role: Role, html: String },
    Waiting(bool),
    Notified(String, NotificationKind),
    Cleared,
    SettingsOpened,
    Exported(String),
}

#[derive(Debug, Default)]
pub struct UiStub {
    pub events: Vec<UiEvent>,
}

impl UiStub {
    pub fn notifications(&self) -> Vec<(String, NotificationKind)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                UiEvent::Notified(text, kind) => Some((text.clone(), *kind)),
                _ => None,
            })
            .collect()
    }

    pub fn rendered(&self) -> Vec<(Role, String)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                UiEvent::Rendered { role, html } => Some((*role, html.clone())),
                _ => None,
            })
            .collect()
    }
}

impl ChatUi for UiStub {
    fn render_message(&mut self, message: &RenderedMessage) {
        self.events.push(UiEvent::Rendered {
            role: message.role,
            html: message.html.clone(),
        });
    }

    fn set_waiting(&mut self, waiting: bool) {
        self.events.push(UiEvent::Waiting(waiting));
    }

    fn notify(&mut self, text: &str, kind: NotificationKind) {
        self.events.push(UiEvent::Notified(text.to_string(), kind));
    }

    fn clear_messages(&mut self) {
        self.events.push(UiEvent::Cleared);
    }

    fn open_settings(&mut self) {
        self.events.push(UiEvent::SettingsOpened);
    }

    fn present_export(&mut self, format: &str, _contents: &str) {
        self.events.push(UiEvent::Exported(format.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct HostStub {
    pub jobs: Vec<CompletionJob>,
}

impl CompletionHost for HostStub {
    fn dispatch(&mut self, job: CompletionJob) {
        self.jobs.push(job);
    }
}

/// Serves reads from `inner` and rejects every write.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(read_only_error("writing record"))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(read_only_error("removing record"))
    }
}

fn read_only_error(operation: &'static str) -> StoreError {
    StoreError::io(
        operation,
        "/read-only/store.db",
        io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
    )
}

pub fn settings_with_key(key: &str) -> Settings {
    Settings {
        credential: Credential::new(key),
        ..Settings::default()
    }
}

/// Memory backend already holding `settings`.
pub fn seeded_memory(settings: &Settings) -> MemoryStore {
    let mut seed = ChatStore::new(MemoryStore::new());
    seed.save_settings(settings).expect("seed settings");
    seed.backend().clone()
}

pub fn store_with_key(key: &str) -> ChatStore {
    ChatStore::boxed(seeded_memory(&settings_with_key(key)))
}
