use gloo_utils::format::JsValueSerdeExt;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

use crate::types::SceneData;

/// The drawing surface scenes are captured from and restored into.
pub trait DrawingCanvas {
    fn elements(&self) -> Vec<Value>;
    fn view_state(&self) -> Value;
    fn replace_scene(&self, data: &SceneData);
    fn scroll_to_fit(&self, elements: &[Value]);

    fn snapshot(&self) -> SceneData {
        SceneData::new(self.elements(), self.view_state())
    }
}

#[wasm_bindgen]
extern "C" {
    /// Imperative API handle of an Excalidraw instance.
    pub type ExcalidrawApi;

    #[wasm_bindgen(method, js_name = getSceneElements)]
    fn get_scene_elements(this: &ExcalidrawApi) -> JsValue;

    #[wasm_bindgen(method, js_name = getAppState)]
    fn get_app_state(this: &ExcalidrawApi) -> JsValue;

    #[wasm_bindgen(method, js_name = updateScene)]
    fn update_scene(this: &ExcalidrawApi, scene: &JsValue);

    #[wasm_bindgen(method, js_name = scrollToContent)]
    fn scroll_to_content(this: &ExcalidrawApi, target: &JsValue, opts: &JsValue);
}

/// [`DrawingCanvas`] over an Excalidraw instance living in the host page.
pub struct ExcalidrawCanvas {
    api: ExcalidrawApi,
}

impl ExcalidrawCanvas {
    pub fn new(api: ExcalidrawApi) -> Self {
        Self { api }
    }
}

impl DrawingCanvas for ExcalidrawCanvas {
    fn elements(&self) -> Vec<Value> {
        self.api
            .get_scene_elements()
            .into_serde()
            .unwrap_or_else(|e| {
                log::error!("Failed to read canvas elements: {}", e);
                Vec::new()
            })
    }

    fn view_state(&self) -> Value {
        let mut state: Value = self.api.get_app_state().into_serde().unwrap_or_else(|e| {
            log::error!("Failed to read canvas app state: {}", e);
            Value::Null
        });
        // A JS Map, which JSON flattens into an object Excalidraw rejects.
        if let Value::Object(map) = &mut state {
            map.remove("collaborators");
        }
        state
    }

    fn replace_scene(&self, data: &SceneData) {
        let scene = json!({ "elements": data.elements, "appState": data.view_state });
        match JsValue::from_serde(&scene) {
            Ok(scene) => self.api.update_scene(&scene),
            Err(e) => log::error!("Failed to hand scene to canvas: {}", e),
        }
    }

    fn scroll_to_fit(&self, elements: &[Value]) {
        let target = JsValue::from_serde(&elements);
        let opts = JsValue::from_serde(&json!({ "fitToContent": true }));
        match (target, opts) {
            (Ok(target), Ok(opts)) => self.api.scroll_to_content(&target, &opts),
            (Err(e), _) | (_, Err(e)) => log::error!("Failed to fit canvas view: {}", e),
        }
    }
}
