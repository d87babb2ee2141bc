use gloo_utils::format::JsValueSerdeExt;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::types::SceneId;

const DEFAULT_LIST_KEY: &str = "excalidraw-scene-list";
const DEFAULT_DATA_PREFIX: &str = "excalidraw-scene-data-";
const DEFAULT_PENDING_KEY: &str = "excalidraw-scene-pending";

/// Options accepted by `mount_scene_shelf`. Every field is optional on the JS side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShelfConfig {
    pub list_key: String,
    pub data_prefix: String,
    pub pending_key: String,
    pub log_level: String,
    pub reconcile_on_startup: bool,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            list_key: DEFAULT_LIST_KEY.to_string(),
            data_prefix: DEFAULT_DATA_PREFIX.to_string(),
            pending_key: DEFAULT_PENDING_KEY.to_string(),
            log_level: "info".to_string(),
            reconcile_on_startup: true,
        }
    }
}

impl ShelfConfig {
    /// Read options handed over from JS. `undefined` and `null` mean defaults.
    pub fn from_js(options: &JsValue) -> Result<Self, serde_json::Error> {
        if options.is_undefined() || options.is_null() {
            return Ok(Self::default());
        }
        options.into_serde()
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    pub fn keys(&self) -> StoreKeys {
        StoreKeys {
            list_key: self.list_key.clone(),
            data_prefix: self.data_prefix.clone(),
            pending_key: self.pending_key.clone(),
        }
    }
}

/// Record keys used by the scene store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreKeys {
    pub list_key: String,
    pub data_prefix: String,
    pub pending_key: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        ShelfConfig::default().keys()
    }
}

impl StoreKeys {
    pub fn data_key(&self, id: &SceneId) -> String {
        format!("{}{}", self.data_prefix, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_keep_defaults() {
        let config: ShelfConfig =
            serde_json::from_str(r#"{ "listKey": "my-list", "logLevel": "debug" }"#).unwrap();
        assert_eq!(config.list_key, "my-list");
        assert_eq!(config.data_prefix, DEFAULT_DATA_PREFIX);
        assert_eq!(config.log_level(), log::Level::Debug);
        assert!(config.reconcile_on_startup);
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = ShelfConfig {
            log_level: "loud".to_string(),
            ..ShelfConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn test_data_key_appends_id() {
        let keys = StoreKeys::default();
        assert_eq!(
            keys.data_key(&SceneId::from("42")),
            "excalidraw-scene-data-42"
        );
    }
}
