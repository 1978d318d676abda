use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::StoreError;
use crate::export;
use crate::kv::{KeyValueStore, MemoryStore};
use crate::obfuscate::{deobfuscate, obfuscate};
use crate::schema::{Credential, Message, Model, Settings, Theme};

pub const SETTINGS_KEY: &str = "raycast-chatbot-settings";
pub const CONVERSATION_KEY: &str = "raycast-chatbot-current";

const FIELD_API_KEY: &str = "apiKey";
const FIELD_OBFUSCATED: &str = "_encrypted";
const FIELD_MODEL: &str = "model";
const FIELD_TEMPERATURE: &str = "temperature";
const FIELD_MAX_TOKENS: &str = "maxTokens";
const FIELD_THEME: &str = "theme";
const FIELD_AUTO_SAVE: &str = "autoSave";

/// Settings and the current conversation on top of a [`KeyValueStore`].
///
/// Writes report failures. Reads never fail: missing or damaged records come
/// back as defaults or an empty conversation.
#[derive(Debug)]
pub struct ChatStore<S = Box<dyn KeyValueStore>> {
    backend: S,
}

impl ChatStore {
    /// Boxes `backend` so callers can pick the store at runtime.
    pub fn boxed(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::boxed(MemoryStore::new())
    }
}

impl<S: KeyValueStore> ChatStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        let record = settings_record(settings);
        let json = serde_json::to_string(&record)
            .map_err(|source| StoreError::serialize("settings", source))?;
        self.backend.set(SETTINGS_KEY, &json)
    }

    pub fn load_settings(&self) -> Settings {
        let raw = match self.backend.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(err) => {
                warn!(error = %err, "failed to read settings; using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(fields)) => settings_from_record(&fields),
            Ok(_) => {
                warn!("settings record is not an object; using defaults");
                Settings::default()
            }
            Err(err) => {
                warn!(error = %err, "settings record is not valid JSON; using defaults");
                Settings::default()
            }
        }
    }

    pub fn save_conversation(&mut self, messages: &[Message]) -> Result<(), StoreError> {
        let json = serde_json::to_string(messages)
            .map_err(|source| StoreError::serialize("conversation", source))?;
        self.backend.set(CONVERSATION_KEY, &json)
    }

    pub fn load_conversation(&self) -> Vec<Message> {
        let raw = match self.backend.get(CONVERSATION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read conversation; starting empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "conversation record is damaged; starting empty");
            Vec::new()
        })
    }

    pub fn clear_conversation(&mut self) -> Result<(), StoreError> {
        self.backend.remove(CONVERSATION_KEY)
    }

    pub fn export_conversation(&self, messages: &[Message], format: &str) -> Option<String> {
        export::export_conversation(messages, format)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsRecord {
    api_key: String,
    #[serde(rename = "_encrypted", skip_serializing_if = "std::ops::Not::not")]
    obfuscated: bool,
    model: &'static str,
    temperature: f32,
    max_tokens: u32,
    theme: Theme,
    auto_save: bool,
}

fn settings_record(settings: &Settings) -> SettingsRecord {
    let credential = settings.credential.expose();
    SettingsRecord {
        api_key: obfuscate(credential),
        obfuscated: !credential.is_empty(),
        model: settings.model.id(),
        temperature: settings.temperature,
        max_tokens: settings.max_output_tokens,
        theme: settings.theme,
        auto_save: settings.auto_persist,
    }
}

/// Field-by-field merge over [`Settings::default`]. A bad field is dropped
/// without discarding its neighbours.
fn settings_from_record(fields: &Map<String, Value>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = fields.get(FIELD_API_KEY).and_then(Value::as_str) {
        let obfuscated = fields
            .get(FIELD_OBFUSCATED)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        settings.credential = if obfuscated {
            Credential::new(deobfuscate(raw))
        } else {
            Credential::new(raw)
        };
    }

    if let Some(id) = fields.get(FIELD_MODEL).and_then(Value::as_str) {
        match id.parse::<Model>() {
            Ok(model) => settings.model = model,
            Err(err) => warn!(error = %err, "ignoring stored model"),
        }
    }

    if let Some(temperature) = fields.get(FIELD_TEMPERATURE).and_then(Value::as_f64) {
        settings.temperature = temperature as f32;
    }

    if let Some(max) = fields
        .get(FIELD_MAX_TOKENS)
        .and_then(Value::as_u64)
        .and_then(|max| u32::try_from(max).ok())
    {
        settings.max_output_tokens = max;
    }

    if let Some(theme) = fields
        .get(FIELD_THEME)
        .and_then(|value| serde_json::from_value::<Theme>(value.clone()).ok())
    {
        settings.theme = theme;
    }

    if let Some(auto_persist) = fields.get(FIELD_AUTO_SAVE).and_then(Value::as_bool) {
        settings.auto_persist = auto_persist;
    }

    settings.normalized()
}
