use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque scene identifier. Ids minted here are UUID v4 strings, but any
/// string read back from storage is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SceneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the persisted scene list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMetadata {
    pub id: SceneId,
    /// Display name, not unique
    pub name: String,
    /// Milliseconds since epoch
    pub last_modified: f64,
}

impl SceneMetadata {
    pub fn new(id: SceneId, name: String, last_modified: f64) -> Self {
        Self {
            id,
            name,
            last_modified,
        }
    }
}

/// Drawing content and view state of one scene, both owned by the canvas
/// library and stored verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneData {
    pub elements: Vec<Value>,
    #[serde(rename = "appState", default)]
    pub view_state: Value,
}

impl SceneData {
    pub fn new(elements: Vec<Value>, view_state: Value) -> Self {
        Self {
            elements,
            view_state,
        }
    }
}

/// Sort scenes most recently modified first.
pub fn sort_by_recent(scenes: &mut [SceneMetadata]) {
    scenes.sort_by(|a, b| b.last_modified.total_cmp(&a.last_modified));
}
