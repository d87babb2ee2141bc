mod local;
mod memory;

pub use local::LocalStorageBackend;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::StoreError;

/// Asynchronous key-value store holding JSON records.
///
/// Each call is independent: there is no transaction spanning two keys.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Returns `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;
    /// Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Backend picked at mount time.
#[derive(Debug)]
pub enum Backend {
    Local(LocalStorageBackend),
    Memory(MemoryStore),
}

impl Backend {
    /// Browser `localStorage` when the page may use it, otherwise an
    /// in-memory map that lives as long as the page.
    pub fn detect() -> Self {
        match LocalStorageBackend::open() {
            Ok(local) => Backend::Local(local),
            Err(e) => {
                log::warn!("{}; scenes will not outlive this page", e);
                Backend::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for Backend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self {
            Backend::Local(store) => store.get(key).await,
            Backend::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        match self {
            Backend::Local(store) => store.set(key, value).await,
            Backend::Memory(store) => store.set(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Backend::Local(store) => store.delete(key).await,
            Backend::Memory(store) => store.delete(key).await,
        }
    }
}
