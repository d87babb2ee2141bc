use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use serde_json::Value;

use super::KeyValueStore;
use crate::error::StoreError;

/// `window.localStorage`, values kept as JSON text.
#[derive(Debug)]
pub struct LocalStorageBackend {
    _private: (),
}

impl LocalStorageBackend {
    /// Fails when there is no window or the browser refuses storage access
    /// (private mode, disabled cookies).
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no global window".to_string()))?;
        match window.local_storage() {
            Ok(Some(_)) => Ok(Self { _private: () }),
            Ok(None) => Err(StoreError::Unavailable(
                "localStorage is not available".to_string(),
            )),
            Err(e) => Err(StoreError::Unavailable(format!(
                "localStorage access denied: {:?}",
                e
            ))),
        }
    }
}

impl KeyValueStore for LocalStorageBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match LocalStorage::get::<Value>(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(source)) => Err(StoreError::Malformed {
                key: key.to_string(),
                source,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        LocalStorage::set(key, value)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        LocalStorage::delete(key);
        Ok(())
    }
}
