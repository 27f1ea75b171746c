//! Durable key/value storage backing the session record.
//!
//! Plays the part browser local storage plays for a web console: a small set
//! of string keys that survive restarts. Access is synchronous.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const USERNAME_KEY: &str = "username";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One change in a batch: `Some` writes the value, `None` removes the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageWrite {
    pub key: &'static str,
    pub value: Option<String>,
}

impl StorageWrite {
    pub fn set(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: Some(value.into()),
        }
    }

    pub fn remove(key: &'static str) -> Self {
        Self { key, value: None }
    }
}

pub trait DurableStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Apply every write in `batch`, all or nothing.
    fn apply(&self, batch: &[StorageWrite]) -> Result<(), StorageError>;

    fn set(&self, key: &'static str, value: &str) -> Result<(), StorageError> {
        self.apply(&[StorageWrite::set(key, value)])
    }

    fn remove(&self, key: &'static str) -> Result<(), StorageError> {
        self.apply(&[StorageWrite::remove(key)])
    }

    /// Stored token, treating an empty value as absent.
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }
}
