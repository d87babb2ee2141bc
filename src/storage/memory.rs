use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
#[cfg(test)]
use std::collections::HashSet;

use super::KeyValueStore;
use crate::error::StoreError;

/// Page-lifetime store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<String, Value>>,
    #[cfg(test)]
    failing_reads: RefCell<HashSet<String>>,
    #[cfg(test)]
    failing_writes: RefCell<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    fn check(failing: &RefCell<HashSet<String>>, key: &str) -> Result<(), StoreError> {
        if failing.borrow().contains(key) {
            return Err(StoreError::Backend(format!("injected failure on {}", key)));
        }
        Ok(())
    }

    /// Make reads of `key` fail until `recover` is called.
    pub fn fail_reads(&self, key: &str) {
        self.failing_reads.borrow_mut().insert(key.to_string());
    }

    /// Make writes and deletes of `key` fail until `recover` is called.
    pub fn fail_writes(&self, key: &str) {
        self.failing_writes.borrow_mut().insert(key.to_string());
    }

    pub fn recover(&self, key: &str) {
        self.failing_reads.borrow_mut().remove(key);
        self.failing_writes.borrow_mut().remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.borrow().contains_key(key)
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .records
            .borrow()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn insert_raw(&self, key: &str, value: Value) {
        self.records.borrow_mut().insert(key.to_string(), value);
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        #[cfg(test)]
        Self::check(&self.failing_reads, key)?;
        Ok(self.records.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        #[cfg(test)]
        Self::check(&self.failing_writes, key)?;
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        #[cfg(test)]
        Self::check(&self.failing_writes, key)?;
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_get_set_delete() {
        let store = MemoryStore::new();
        block_on(async {
            assert_eq!(store.get("k").await.unwrap(), None);
            store.set("k", &json!([1, 2])).await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), Some(json!([1, 2])));
            store.delete("k").await.unwrap();
            store.delete("k").await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), None);
        });
    }

    #[test]
    fn test_injected_failure() {
        let store = MemoryStore::new();
        store.fail_writes("k");
        block_on(async {
            assert!(store.set("k", &json!(1)).await.is_err());
            assert!(store.delete("k").await.is_err());
            assert_eq!(store.get("k").await.unwrap(), None);

            store.fail_reads("k");
            assert!(store.get("k").await.is_err());

            store.recover("k");
            assert!(store.set("k", &json!(1)).await.is_ok());
            assert!(store.get("k").await.is_ok());
        });
    }
}
