mod app;
mod scene_panel;
mod utils;

pub mod canvas;
pub mod config;
pub mod controller;
pub mod error;
pub mod scene_store;
pub mod session;
pub mod storage;
pub mod types;

use app::{App, AppProps};
use canvas::{ExcalidrawApi, ExcalidrawCanvas};
use config::ShelfConfig;
use controller::SceneController;
use scene_store::SceneStore;
use std::rc::Rc;
use storage::Backend;
use wasm_bindgen::prelude::*;

/// Installs the console logger at its most verbose; `mountSceneShelf`
/// narrows the level from its options.
#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
}

/// Render the scene shelf into `toolbar_slot`, bound to the Excalidraw
/// instance behind `api`. `options` may be `undefined` or a partial
/// [`ShelfConfig`] object.
#[wasm_bindgen(js_name = mountSceneShelf)]
pub fn mount_scene_shelf(api: ExcalidrawApi, toolbar_slot: web_sys::Element, options: JsValue) {
    let parsed = ShelfConfig::from_js(&options);
    let config = parsed.as_ref().cloned().unwrap_or_default();
    log::set_max_level(config.log_level().to_level_filter());
    if let Err(e) = parsed {
        log::warn!("Ignoring invalid scene shelf options: {}", e);
    }

    let store = SceneStore::new(Backend::detect(), config.keys());
    let controller = SceneController::new(store, Rc::new(ExcalidrawCanvas::new(api)));

    yew::Renderer::<App>::with_root_and_props(
        toolbar_slot,
        AppProps {
            controller: Rc::new(controller),
            reconcile_on_startup: config.reconcile_on_startup,
        },
    )
    .render();
}
