mod error;
mod export;
mod kv;
mod obfuscate;
mod paths;
mod schema;
mod sqlite;
mod store;

pub use error::StoreError;
pub use export::{export_conversation, export_conversation_at, ExportFormat, UnsupportedFormat};
pub use kv::{KeyValueStore, MemoryStore};
pub use obfuscate::{deobfuscate, obfuscate, OBFUSCATION_KEY};
pub use paths::{default_data_root, store_path, APP_DIR, STORE_FILE};
pub use schema::{
    Credential, Message, Model, Role, Settings, Theme, UnknownModel, DEFAULT_MAX_OUTPUT_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use sqlite::SqliteStore;
pub use store::{ChatStore, CONVERSATION_KEY, SETTINGS_KEY};
