use gloo::dialogs::{alert, confirm};
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

use crate::session::SceneSession;
use crate::types::SceneId;
use crate::utils::format_timestamp;

#[derive(Properties, PartialEq)]
pub struct ScenePanelProps {
    pub open: bool,
    pub session: SceneSession,
    pub on_close: Callback<()>,
    pub on_save: Callback<String>,
    pub on_rename: Callback<(SceneId, String)>,
    pub on_load: Callback<SceneId>,
    pub on_delete: Callback<SceneId>,
}

/// Side sheet listing saved scenes. Local state (drafts, rename mode) is
/// dropped whenever the panel closes.
#[function_component(ScenePanel)]
pub fn scene_panel(props: &ScenePanelProps) -> Html {
    if !props.open {
        return html! {};
    }

    html! {
        <ScenePanelBody
            open={props.open}
            session={props.session.clone()}
            on_close={props.on_close.clone()}
            on_save={props.on_save.clone()}
            on_rename={props.on_rename.clone()}
            on_load={props.on_load.clone()}
            on_delete={props.on_delete.clone()}
        />
    }
}

#[function_component(ScenePanelBody)]
fn scene_panel_body(props: &ScenePanelProps) -> Html {
    let scene_name = use_state(String::new);
    let editing_id = use_state(|| None::<SceneId>);
    let editing_name = use_state(String::new);

    let on_save_current = {
        let scene_name = scene_name.clone();
        let session = props.session.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |_: ()| match session.resolve_save_name(&scene_name) {
            Ok(name) => on_save.emit(name),
            Err(e) => alert(&e.to_string()),
        })
    };

    let on_name_input = {
        let scene_name = scene_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                scene_name.set(input.value());
            }
        })
    };

    let on_name_keydown = {
        let on_save_current = on_save_current.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                on_save_current.emit(());
            }
        })
    };

    let on_cancel_edit = {
        let editing_id = editing_id.clone();
        let editing_name = editing_name.clone();
        Callback::from(move |_: ()| {
            editing_id.set(None);
            editing_name.set(String::new());
        })
    };

    let on_confirm_edit = {
        let editing_id = editing_id.clone();
        let editing_name = editing_name.clone();
        let on_rename = props.on_rename.clone();
        let on_cancel_edit = on_cancel_edit.clone();
        Callback::from(move |_: ()| {
            let new_name = editing_name.trim().to_string();
            let Some(id) = (*editing_id).clone() else {
                return;
            };
            if new_name.is_empty() {
                return;
            }
            on_rename.emit((id, new_name));
            on_cancel_edit.emit(());
        })
    };

    let on_edit_input = {
        let editing_name = editing_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                editing_name.set(input.value());
            }
        })
    };

    let on_edit_keydown = {
        let on_confirm_edit = on_confirm_edit.clone();
        let on_cancel_edit = on_cancel_edit.clone();
        Callback::from(move |e: KeyboardEvent| match e.key().as_str() {
            "Enter" => {
                e.prevent_default();
                on_confirm_edit.emit(());
            }
            "Escape" => {
                e.stop_propagation();
                on_cancel_edit.emit(());
            }
            _ => {}
        })
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let scenes = props.session.sorted_scenes();

    html! {
        <div class="fixed inset-y-0 right-0 z-50 w-[90vw] sm:max-w-lg flex flex-col bg-white border-l border-gray-300 shadow-xl">
            // Header
            <div class="p-4 border-b border-gray-300">
                <h2 class="text-lg font-semibold">{"Manage Scenes"}</h2>
                <p class="text-xs text-gray-500 mt-1">
                    {"Load, save, rename, or delete your Excalidraw scenes."}
                </p>
            </div>

            // Save current scene
            <div class="p-4 border-b border-gray-300 space-y-2">
                <h3 class="font-medium text-sm">{"Save Current Scene"}</h3>
                <div class="flex gap-2">
                    <input
                        type="text"
                        value={(*scene_name).clone()}
                        placeholder={props.session.save_placeholder()}
                        oninput={on_name_input}
                        onkeydown={on_name_keydown}
                        class="flex-1 px-3 py-2 border border-gray-300 rounded-lg text-sm focus:outline-none focus:ring-2 focus:ring-blue-500"
                    />
                    <button
                        onclick={on_save_current.reform(|_: MouseEvent| ())}
                        title="Save current scene"
                        class="px-4 py-2 bg-blue-500 text-white rounded-lg text-sm font-medium hover:bg-blue-600 transition-colors"
                    >
                        {"Save"}
                    </button>
                </div>
                if let Some(current) = props.session.current_scene() {
                    <p class="text-xs text-gray-500">
                        {format!("Currently editing: {}", current.name)}
                    </p>
                }
            </div>

            // Scene list
            <div class="flex-1 overflow-y-auto p-4 space-y-2">
                <h3 class="font-medium text-sm mb-2">{"Load Scene"}</h3>
                if scenes.is_empty() {
                    <p class="text-sm text-gray-500 text-center py-4">
                        {"No saved scenes yet."}
                    </p>
                }
                {
                    scenes.iter().map(|scene| {
                        let is_current = props.session.is_current(&scene.id);
                        let is_editing = (*editing_id).as_ref() == Some(&scene.id);

                        let body = if is_editing {
                            html! {
                                <div class="flex-1 flex items-center gap-2">
                                    <input
                                        type="text"
                                        value={(*editing_name).clone()}
                                        oninput={on_edit_input.clone()}
                                        onkeydown={on_edit_keydown.clone()}
                                        class="flex-1 h-8 px-2 border border-gray-300 rounded text-sm focus:outline-none focus:ring-2 focus:ring-blue-500"
                                    />
                                    <button
                                        onclick={on_confirm_edit.reform(|_: MouseEvent| ())}
                                        title="Save name"
                                        class="px-2 h-8 text-sm rounded hover:bg-gray-100"
                                    >
                                        {"Save"}
                                    </button>
                                    <button
                                        onclick={on_cancel_edit.reform(|_: MouseEvent| ())}
                                        title="Cancel edit"
                                        class="px-2 h-8 text-sm rounded hover:bg-gray-100"
                                    >
                                        {"Cancel"}
                                    </button>
                                </div>
                            }
                        } else {
                            let onclick = {
                                let on_load = props.on_load.clone();
                                let id = scene.id.clone();
                                Callback::from(move |_: MouseEvent| on_load.emit(id.clone()))
                            };
                            let on_start_edit = {
                                let editing_id = editing_id.clone();
                                let editing_name = editing_name.clone();
                                let id = scene.id.clone();
                                let name = scene.name.clone();
                                Callback::from(move |_: MouseEvent| {
                                    editing_id.set(Some(id.clone()));
                                    editing_name.set(name.clone());
                                })
                            };
                            let on_delete_click = {
                                let on_delete = props.on_delete.clone();
                                let id = scene.id.clone();
                                let name = scene.name.clone();
                                Callback::from(move |_: MouseEvent| {
                                    let msg = format!(
                                        "Are you sure you want to delete \"{}\"? This cannot be undone.",
                                        name
                                    );
                                    if confirm(&msg) {
                                        on_delete.emit(id.clone());
                                    }
                                })
                            };

                            html! {
                                <>
                                    <div
                                        {onclick}
                                        title={format!("Load \"{}\"", scene.name)}
                                        class="flex-1 flex flex-col cursor-pointer mr-2 min-w-0"
                                    >
                                        <span class="font-medium text-sm truncate">{&scene.name}</span>
                                        <span class="text-xs text-gray-500">
                                            {format_timestamp(scene.last_modified)}
                                        </span>
                                    </div>
                                    <div class="flex items-center gap-1 flex-none">
                                        <button
                                            onclick={on_start_edit}
                                            title={format!("Rename \"{}\"", scene.name)}
                                            class="px-2 h-8 text-sm rounded hover:bg-gray-100"
                                        >
                                            {"Rename"}
                                        </button>
                                        <button
                                            onclick={on_delete_click}
                                            title={format!("Delete \"{}\"", scene.name)}
                                            class="px-2 h-8 text-sm rounded bg-red-500 text-white hover:bg-red-600"
                                        >
                                            {"Delete"}
                                        </button>
                                    </div>
                                </>
                            }
                        };

                        html! {
                            <div
                                key={scene.id.as_str().to_string()}
                                class={classes!(
                                    "flex",
                                    "items-center",
                                    "justify-between",
                                    "gap-2",
                                    "p-2",
                                    "rounded-lg",
                                    "border",
                                    "transition-colors",
                                    if is_current {
                                        "bg-blue-50 border-blue-300 font-semibold"
                                    } else {
                                        "bg-gray-50 border-gray-200 hover:bg-gray-100"
                                    }
                                )}
                            >
                                {body}
                            </div>
                        }
                    }).collect::<Html>()
                }
            </div>

            // Footer
            <div class="p-4 border-t border-gray-300">
                <button
                    onclick={on_close}
                    class="w-full px-4 py-2 border border-gray-300 rounded-lg text-sm font-medium hover:bg-gray-100 transition-colors"
                >
                    {"Close"}
                </button>
            </div>
        </div>
    }
}
