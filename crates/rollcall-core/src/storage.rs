//! Durable client-side storage for persisted state blobs.
//!
//! Stores keep small JSON documents under fixed names (`auth-storage`,
//! `theme-storage`, `refresh-token`). The backend is swappable: a directory
//! on disk for real runs, memory for tests.
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::storage::{LocalStateStorage, StateStorage};
//!
//! let storage = LocalStateStorage::new(PathBuf::from("./.rollcall"));
//! storage.save("theme-storage", r#"{"theme":"dark"}"#).await?;
//! let blob = storage.load("theme-storage").await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::errors::ClientError;

/// Boxed future returned by [`StateStorage`] methods.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract trait for persisted state backends.
pub trait StateStorage: Send + Sync {
    /// Load the blob stored under `name`, or `None` if nothing was saved.
    fn load<'a>(&'a self, name: &'a str) -> StorageFuture<'a, Option<String>>;

    /// Replace the blob stored under `name`.
    fn save<'a>(&'a self, name: &'a str, contents: &'a str) -> StorageFuture<'a, ()>;

    /// Remove the blob. Removing a missing blob succeeds.
    fn remove<'a>(&'a self, name: &'a str) -> StorageFuture<'a, ()>;
}

#[derive(Debug)]
pub enum StorageError {
    /// I/O error from the underlying backend.
    IoError(std::io::Error),

    /// Invalid blob name.
    InvalidName(String),

    /// Backend state is unusable (poisoned lock).
    Unavailable,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidName(msg) => write!(f, "Invalid storage name: {}", msg),
            Self::Unavailable => write!(f, "Storage unavailable"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl From<StorageError> for ClientError {
    fn from(e: StorageError) -> Self {
        ClientError::Storage(e.to_string())
    }
}

fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName(
            "Name must not be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StorageError::InvalidName(format!(
            "'{}' contains invalid characters",
            name
        )));
    }

    Ok(())
}

/// Stores each blob as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct LocalStateStorage {
    base_dir: PathBuf,
}

impl LocalStateStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.base_dir.join(format!("{}.json", name)))
    }
}

impl StateStorage for LocalStateStorage {
    fn load<'a>(&'a self, name: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move {
            let path = self.path_for(name)?;
            match fs::read_to_string(&path).await {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn save<'a>(&'a self, name: &'a str, contents: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(name)?;
            fs::create_dir_all(&self.base_dir).await?;
            fs::write(&path, contents).await?;
            tracing::debug!(name, path = %path.display(), "persisted state");
            Ok(())
        })
    }

    fn remove<'a>(&'a self, name: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(name)?;
            match fs::remove_file(&path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// In-memory backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStateStorage {
    fn load<'a>(&'a self, name: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move {
            validate_name(name)?;
            let blobs = self.blobs.lock().map_err(|_| StorageError::Unavailable)?;
            Ok(blobs.get(name).cloned())
        })
    }

    fn save<'a>(&'a self, name: &'a str, contents: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            validate_name(name)?;
            let mut blobs = self.blobs.lock().map_err(|_| StorageError::Unavailable)?;
            blobs.insert(name.to_string(), contents.to_string());
            Ok(())
        })
    }

    fn remove<'a>(&'a self, name: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            validate_name(name)?;
            let mut blobs = self.blobs.lock().map_err(|_| StorageError::Unavailable)?;
            blobs.remove(name);
            Ok(())
        })
    }
}

/// Loads and decodes a JSON blob.
///
/// A blob that no longer parses is treated as absent and logged, so a
/// corrupt file never blocks startup.
pub async fn load_json<T: DeserializeOwned>(
    storage: &dyn StateStorage,
    name: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.load(name).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(name, error = %e, "discarding unreadable persisted state");
            Ok(None)
        }
    }
}

pub async fn save_json<T: Serialize>(
    storage: &dyn StateStorage,
    name: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StorageError::IoError(std::io::Error::other(e)))?;
    storage.save(name, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Blob {
        theme: String,
    }

    #[test]
    fn test_validate_name_accepts_store_names() {
        assert!(validate_name("auth-storage").is_ok());
        assert!(validate_name("refresh_token").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_paths() {
        assert!(validate_name("").is_err());
        assert!(validate_name("../etc/passwd").is_err());
        assert!(validate_name("a/b").is_err());
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStateStorage::new(dir.path().join("state"));

        assert_eq!(storage.load("theme-storage").await.unwrap(), None);

        storage.save("theme-storage", "{\"theme\":\"dark\"}").await.unwrap();
        assert_eq!(
            storage.load("theme-storage").await.unwrap().as_deref(),
            Some("{\"theme\":\"dark\"}")
        );

        storage.remove("theme-storage").await.unwrap();
        storage.remove("theme-storage").await.unwrap();
        assert_eq!(storage.load("theme-storage").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_json_discards_corrupt_blob() {
        let storage = MemoryStateStorage::new();
        storage.save("theme-storage", "not json").await.unwrap();

        let loaded: Option<Blob> = load_json(&storage, "theme-storage").await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_save_json_then_load_json() {
        let storage = MemoryStateStorage::new();
        let blob = Blob {
            theme: "light".to_string(),
        };
        save_json(&storage, "theme-storage", &blob).await.unwrap();

        let loaded: Option<Blob> = load_json(&storage, "theme-storage").await.unwrap();
        assert_eq!(loaded, Some(blob));
    }
}
