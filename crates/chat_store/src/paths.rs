use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "quick-chat";
pub const STORE_FILE: &str = "store.db";

/// `<platform local data dir>/quick-chat`, or `./quick-chat` when the platform
/// has none.
#[must_use]
pub fn default_data_root() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[must_use]
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}
