#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence adapters for Neon Snake.
//!
//! Storage follows a string key-value shape: every value is stored as text and
//! interpreted by the caller. The high score lives under [`HIGH_SCORE_KEY`] as a
//! decimal string.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;

/// Key under which the best score is persisted.
pub const HIGH_SCORE_KEY: &str = "neon_snake_highscore";

/// Errors raised by persistent stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File the store attempted to access.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backing file did not contain a JSON object of strings.
    #[error("malformed store {path}: {source}")]
    Json {
        /// File the store attempted to parse.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage used for persisting small settings.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// Volatile store kept entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let _ = self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// A missing file behaves like an empty store. The whole object is rewritten
/// on every update.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store that reads and writes the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.load()?;
        Ok(items.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.load()?;
        let _ = items.insert(key.to_owned(), Value::String(value.to_owned()));

        let text = serde_json::to_string_pretty(&items).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, text).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Reads the persisted high score, treating missing or unparsable values as zero.
///
/// Storage failures are logged and also read as zero.
pub fn read_high_score<S: KeyValueStore + ?Sized>(store: &S) -> u32 {
    match store.get_item(HIGH_SCORE_KEY) {
        Ok(Some(value)) => match value.trim().parse::<u32>() {
            Ok(score) => score,
            Err(_) => {
                log::debug!("ignoring unparsable high score {value:?}");
                0
            }
        },
        Ok(None) => 0,
        Err(error) => {
            log::warn!("failed to read high score: {error}");
            0
        }
    }
}

/// Persists `score` as the high score.
pub fn write_high_score<S: KeyValueStore + ?Sized>(
    store: &mut S,
    score: u32,
) -> Result<(), StorageError> {
    store.set_item(HIGH_SCORE_KEY, &score.to_string())
}
