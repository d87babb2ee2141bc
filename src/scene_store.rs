//! Scene persistence over a [`KeyValueStore`].
//!
//! Layout: one list record holding every [`SceneMetadata`], one data record
//! per scene under `<data prefix><id>`, and a pending index naming scenes
//! whose data was written before the list caught up. Writes to separate keys
//! are not atomic; [`SceneStore::reconcile`] repairs whatever a crash between
//! them leaves behind.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreKeys;
use crate::error::{SceneError, StoreError};
use crate::storage::KeyValueStore;
use crate::types::{SceneData, SceneId, SceneMetadata};
use crate::utils::now_millis;

/// Result of a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct SavedScene {
    /// Id the data was written under (reused or freshly minted)
    pub id: SceneId,
    pub scenes: Vec<SceneMetadata>,
}

pub struct SceneStore<S> {
    backend: S,
    keys: StoreKeys,
    clock: Box<dyn Fn() -> f64>,
}

impl<S: KeyValueStore> SceneStore<S> {
    pub fn new(backend: S, keys: StoreKeys) -> Self {
        Self::with_clock(backend, keys, now_millis)
    }

    pub fn with_clock(backend: S, keys: StoreKeys, clock: impl Fn() -> f64 + 'static) -> Self {
        Self {
            backend,
            keys,
            clock: Box::new(clock),
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// All saved scenes in stored order. Read failures are logged and yield
    /// an empty list.
    pub async fn list_scenes(&self) -> Vec<SceneMetadata> {
        match self.read_list().await {
            Ok(scenes) => {
                log::debug!("Loaded scene list with {} scene(s)", scenes.len());
                scenes
            }
            Err(e) => {
                log::error!("Failed to load scene list: {}", e);
                Vec::new()
            }
        }
    }

    /// Save `data` under `name`.
    ///
    /// `current_id` is reused only when it is listed with exactly this name;
    /// any other case is a save-as and gets a new id, even if another scene
    /// already carries the name.
    pub async fn save_scene(
        &self,
        name: &str,
        data: &SceneData,
        current_id: Option<&SceneId>,
    ) -> Result<SavedScene, SceneError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SceneError::InvalidInput("scene name must not be blank"));
        }

        let mut scenes = self.read_list().await?;
        let id = match current_id {
            Some(current) if scenes.iter().any(|s| &s.id == current && s.name == name) => {
                current.clone()
            }
            _ => SceneId::generate(),
        };
        let is_new = !scenes.iter().any(|s| s.id == id);

        if is_new {
            self.mark_pending(&id).await?;
        }
        self.write_record(&self.keys.data_key(&id), data).await?;

        let now = (self.clock)();
        match scenes.iter_mut().find(|s| s.id == id) {
            Some(existing) => {
                existing.name = name.to_string();
                existing.last_modified = now;
            }
            None => scenes.push(SceneMetadata::new(id.clone(), name.to_string(), now)),
        }
        self.write_list(&scenes).await?;

        if is_new {
            // The list already names the scene, so a stale pending entry is harmless.
            if let Err(e) = self.clear_pending(&id).await {
                log::warn!("Failed to clear pending marker for {}: {}", id, e);
            }
        }

        log::info!("Saved scene \"{}\" ({})", name, id);
        Ok(SavedScene { id, scenes })
    }

    pub async fn load_scene(&self, id: &SceneId) -> Result<SceneData, SceneError> {
        self.read_record(&self.keys.data_key(id))
            .await?
            .ok_or_else(|| SceneError::SceneNotFound(id.clone()))
    }

    /// Remove the scene's data and list entry. Deleting an unknown id is a
    /// no-op that returns the list unchanged.
    pub async fn delete_scene(&self, id: &SceneId) -> Result<Vec<SceneMetadata>, SceneError> {
        self.backend
            .delete(&self.keys.data_key(id))
            .await
            .map_err(SceneError::StoreWrite)?;

        let mut scenes = self.read_list().await?;
        let before = scenes.len();
        scenes.retain(|s| &s.id != id);
        if scenes.len() != before {
            self.write_list(&scenes).await?;
            log::info!("Scene {} deleted", id);
        }
        Ok(scenes)
    }

    /// Change a scene's name without touching its data.
    pub async fn rename_scene(
        &self,
        id: &SceneId,
        name: &str,
    ) -> Result<Vec<SceneMetadata>, SceneError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SceneError::InvalidInput("scene name must not be blank"));
        }

        let mut scenes = self.read_list().await?;
        let scene = scenes
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| SceneError::SceneNotFound(id.clone()))?;
        scene.name = name.to_string();
        scene.last_modified = (self.clock)();

        self.write_list(&scenes).await?;
        log::info!("Scene {} renamed to \"{}\"", id, name);
        Ok(scenes)
    }

    /// Bring list and data records back in line: drop data written for
    /// scenes that never reached the list, and list entries with no data.
    pub async fn reconcile(&self) -> Result<Vec<SceneMetadata>, SceneError> {
        let scenes = self.read_list().await?;
        let pending_index = self.read_pending().await?;
        let pending = pending_index.clone().unwrap_or_default();

        for id in &pending {
            if !scenes.iter().any(|s| &s.id == id) {
                self.backend
                    .delete(&self.keys.data_key(id))
                    .await
                    .map_err(SceneError::StoreWrite)?;
                log::info!("Removed orphaned scene data {}", id);
            }
        }

        let mut kept = Vec::with_capacity(scenes.len());
        for scene in &scenes {
            let data = self
                .backend
                .get(&self.keys.data_key(&scene.id))
                .await
                .map_err(SceneError::StoreRead)?;
            if data.is_some() {
                kept.push(scene.clone());
            } else {
                log::warn!("Dropping scene \"{}\" ({}): data record missing", scene.name, scene.id);
            }
        }

        if kept.len() != scenes.len() {
            self.write_list(&kept).await?;
        }
        if pending_index.is_some() {
            self.backend
                .delete(&self.keys.pending_key)
                .await
                .map_err(SceneError::StoreWrite)?;
        }
        Ok(kept)
    }

    async fn read_list(&self) -> Result<Vec<SceneMetadata>, SceneError> {
        Ok(self
            .read_record(&self.keys.list_key)
            .await?
            .unwrap_or_default())
    }

    async fn write_list(&self, scenes: &[SceneMetadata]) -> Result<(), SceneError> {
        self.write_record(&self.keys.list_key, scenes).await
    }

    /// Ids in the pending index, `None` when there is no index record. A
    /// malformed index reads as empty so it gets overwritten or removed.
    async fn read_pending(&self) -> Result<Option<Vec<SceneId>>, SceneError> {
        match self.read_record(&self.keys.pending_key).await {
            Ok(pending) => Ok(pending),
            Err(SceneError::StoreRead(StoreError::Malformed { key, source })) => {
                log::warn!("Discarding malformed pending index under {}: {}", key, source);
                Ok(Some(Vec::new()))
            }
            Err(e) => Err(e),
        }
    }

    async fn mark_pending(&self, id: &SceneId) -> Result<(), SceneError> {
        let mut pending = self.read_pending().await?.unwrap_or_default();
        if !pending.contains(id) {
            pending.push(id.clone());
            self.write_record(&self.keys.pending_key, &pending).await?;
        }
        Ok(())
    }

    async fn clear_pending(&self, id: &SceneId) -> Result<(), SceneError> {
        let mut pending = self.read_pending().await?.unwrap_or_default();
        pending.retain(|p| p != id);
        if pending.is_empty() {
            self.backend
                .delete(&self.keys.pending_key)
                .await
                .map_err(SceneError::StoreWrite)
        } else {
            self.write_record(&self.keys.pending_key, &pending).await
        }
    }

    async fn read_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SceneError> {
        let Some(value) = self.backend.get(key).await.map_err(SceneError::StoreRead)? else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| {
                SceneError::StoreRead(StoreError::Malformed {
                    key: key.to_string(),
                    source,
                })
            })
    }

    async fn write_record<T: Serialize + ?Sized>(&self, key: &str, record: &T) -> Result<(), SceneError> {
        let value = serde_json::to_value(record).map_err(|source| {
            SceneError::StoreWrite(StoreError::Malformed {
                key: key.to_string(),
                source,
            })
        })?;
        self.backend
            .set(key, &value)
            .await
            .map_err(SceneError::StoreWrite)
    }
}
