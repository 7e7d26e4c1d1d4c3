use super::files::{atomic_write, read_file};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// One independently persisted slice of application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Tasks,
    Sessions,
    Settings,
    Timer,
    Ui,
}

impl StoreKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks.json",
            Self::Sessions => "sessions.json",
            Self::Settings => "settings.json",
            Self::Timer => "timer_state.json",
            Self::Ui => "ui_state.json",
        }
    }
}

/// Errors from a single load or save attempt
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] anyhow::Error),

    #[error("corrupt data: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON file per key inside the data directory.
///
/// Both `load` and `save` are best-effort: failures are logged and the caller
/// always gets a usable value back.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Load a slice, falling back to `default` when it is missing or unreadable
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key = key.file_name(), error = %e, "falling back to default state");
                default
            }
        }
    }

    /// Persist a slice; errors are logged and swallowed
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            warn!(key = key.file_name(), error = %e, "failed to save state");
        }
    }

    fn try_load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        let Some(content) = read_file(self.path_for(key))? else {
            return Ok(None);
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn try_save<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        atomic_write(self.path_for(key), &json)?;
        debug!(key = key.file_name(), "state saved");
        Ok(())
    }
}
