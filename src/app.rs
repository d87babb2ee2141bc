use gloo::events::EventListener;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;

use crate::controller::SceneController;
use crate::scene_panel::ScenePanel;
use crate::session::SceneSession;
use crate::storage::Backend;
use crate::types::SceneId;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub controller: Rc<SceneController<Backend>>,
    #[prop_or(true)]
    pub reconcile_on_startup: bool,
}

/// Toolbar control plus the scene panel it opens. Owns the scene session.
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let session = use_reducer(SceneSession::default);
    let panel_open = use_state(|| false);

    // Load the scene list on mount
    {
        let controller = props.controller.clone();
        let session = session.clone();
        let reconcile = props.reconcile_on_startup;
        use_effect_with((), move |_| {
            spawn_local(async move {
                session.dispatch(controller.refresh(reconcile).await);
            });
            || ()
        });
    }

    // Escape closes the panel
    {
        let panel_open = panel_open.clone();
        use_effect_with(*panel_open, move |open| {
            let listener = open.then(|| {
                let document = window()
                    .and_then(|w| w.document())
                    .expect("should have a document");
                EventListener::new(&document, "keydown", move |event| {
                    if let Some(keyboard_event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                        if keyboard_event.key() == "Escape" {
                            panel_open.set(false);
                        }
                    }
                })
            });

            move || drop(listener)
        });
    }

    let on_toggle = {
        let panel_open = panel_open.clone();
        Callback::from(move |_: MouseEvent| panel_open.set(!*panel_open))
    };

    let on_close = {
        let panel_open = panel_open.clone();
        Callback::from(move |_: ()| panel_open.set(false))
    };

    let on_save = {
        let controller = props.controller.clone();
        let session = session.clone();
        let panel_open = panel_open.clone();
        Callback::from(move |name: String| {
            let controller = controller.clone();
            let session = session.clone();
            let panel_open = panel_open.clone();
            let current_id = session.current_id.clone();
            spawn_local(async move {
                match controller.save(&name, current_id.as_ref()).await {
                    Ok(action) => {
                        session.dispatch(action);
                        panel_open.set(false);
                    }
                    Err(e) => log::error!("Failed to save scene \"{}\": {}", name, e),
                }
            });
        })
    };

    let on_rename = {
        let controller = props.controller.clone();
        let session = session.clone();
        Callback::from(move |(id, name): (SceneId, String)| {
            let controller = controller.clone();
            let session = session.clone();
            spawn_local(async move {
                match controller.rename(&id, &name).await {
                    Ok(action) => session.dispatch(action),
                    Err(e) => log::error!("Failed to rename scene {}: {}", id, e),
                }
            });
        })
    };

    let on_load = {
        let controller = props.controller.clone();
        let session = session.clone();
        let panel_open = panel_open.clone();
        Callback::from(move |id: SceneId| {
            let controller = controller.clone();
            let session = session.clone();
            let panel_open = panel_open.clone();
            spawn_local(async move {
                match controller.load(&id).await {
                    Ok(action) => {
                        session.dispatch(action);
                        panel_open.set(false);
                    }
                    Err(e) if e.is_not_found() => log::warn!("Scene data not found for ID: {}", id),
                    Err(e) => log::error!("Failed to load scene ID {}: {}", id, e),
                }
            });
        })
    };

    let on_delete = {
        let controller = props.controller.clone();
        let session = session.clone();
        Callback::from(move |id: SceneId| {
            let controller = controller.clone();
            let session = session.clone();
            spawn_local(async move {
                match controller.delete(&id).await {
                    Ok(action) => session.dispatch(action),
                    Err(e) => log::error!("Failed to delete scene ID {}: {}", id, e),
                }
            });
        })
    };

    html! {
        <>
            <button
                onclick={on_toggle}
                title="Manage scenes"
                class="w-9 h-9 flex items-center justify-center rounded-lg border border-gray-300 bg-white hover:bg-gray-100 transition-colors"
            >
                // Folder icon
                <svg width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                    <path d="M3 7a2 2 0 0 1 2-2h4l2 2h8a2 2 0 0 1 2 2v8a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/>
                </svg>
            </button>
            <ScenePanel
                open={*panel_open}
                session={(*session).clone()}
                {on_close}
                {on_save}
                {on_rename}
                {on_load}
                {on_delete}
            />
        </>
    }
}
