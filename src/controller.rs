use std::rc::Rc;

use crate::canvas::DrawingCanvas;
use crate::error::SceneError;
use crate::scene_store::SceneStore;
use crate::session::SessionAction;
use crate::storage::KeyValueStore;
use crate::types::SceneId;

/// Couples the scene store with the canvas. Each method performs one user
/// intent and returns the session update to apply.
pub struct SceneController<S> {
    store: SceneStore<S>,
    canvas: Rc<dyn DrawingCanvas>,
}

// Props compare by identity; a controller is never cloned.
impl<S> PartialEq for SceneController<S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<S: KeyValueStore> SceneController<S> {
    pub fn new(store: SceneStore<S>, canvas: Rc<dyn DrawingCanvas>) -> Self {
        Self { store, canvas }
    }

    #[cfg(test)]
    pub fn store(&self) -> &SceneStore<S> {
        &self.store
    }

    /// Fetch the scene list, optionally repairing the store first.
    pub async fn refresh(&self, reconcile: bool) -> SessionAction {
        if reconcile {
            match self.store.reconcile().await {
                Ok(scenes) => return SessionAction::ListReplaced(scenes),
                Err(e) => log::error!("Failed to reconcile scene store: {}", e),
            }
        }
        SessionAction::ListReplaced(self.store.list_scenes().await)
    }

    /// Save what the canvas shows under `name`.
    pub async fn save(
        &self,
        name: &str,
        current_id: Option<&SceneId>,
    ) -> Result<SessionAction, SceneError> {
        let data = self.canvas.snapshot();
        let saved = self.store.save_scene(name, &data, current_id).await?;
        Ok(SessionAction::Saved {
            id: saved.id,
            scenes: saved.scenes,
        })
    }

    /// Push a stored scene into the canvas. The canvas is left alone if the
    /// scene cannot be read.
    pub async fn load(&self, id: &SceneId) -> Result<SessionAction, SceneError> {
        let data = self.store.load_scene(id).await?;
        self.canvas.replace_scene(&data);
        self.canvas.scroll_to_fit(&data.elements);
        log::info!("Loaded scene {}", id);
        Ok(SessionAction::Loaded(id.clone()))
    }

    pub async fn delete(&self, id: &SceneId) -> Result<SessionAction, SceneError> {
        let scenes = self.store.delete_scene(id).await?;
        Ok(SessionAction::Deleted {
            id: id.clone(),
            scenes,
        })
    }

    pub async fn rename(&self, id: &SceneId, name: &str) -> Result<SessionAction, SceneError> {
        let scenes = self.store.rename_scene(id, name).await?;
        Ok(SessionAction::ListReplaced(scenes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreKeys;
    use crate::session::SceneSession;
    use crate::storage::MemoryStore;
    use crate::types::SceneData;
    use futures::executor::block_on;
    use serde_json::{json, Value};
    use std::cell::{Cell, RefCell};
    use yew::Reducible;

    /// Canvas double recording what it was asked to show
    #[derive(Default)]
    struct FakeCanvas {
        content: RefCell<SceneData>,
        fitted: RefCell<Vec<Vec<Value>>>,
    }

    impl FakeCanvas {
        fn draw(&self, tag: &str) {
            *self.content.borrow_mut() =
                SceneData::new(vec![json!({ "id": tag })], json!({ "zoom": 1 }));
        }
    }

    impl DrawingCanvas for FakeCanvas {
        fn elements(&self) -> Vec<Value> {
            self.content.borrow().elements.clone()
        }

        fn view_state(&self) -> Value {
            self.content.borrow().view_state.clone()
        }

        fn replace_scene(&self, data: &SceneData) {
            *self.content.borrow_mut() = data.clone();
        }

        fn scroll_to_fit(&self, elements: &[Value]) {
            self.fitted.borrow_mut().push(elements.to_vec());
        }
    }

    fn controller() -> (SceneController<MemoryStore>, Rc<FakeCanvas>) {
        let canvas = Rc::new(FakeCanvas::default());
        let tick = Cell::new(0.0);
        let store = SceneStore::with_clock(MemoryStore::new(), StoreKeys::default(), move || {
            tick.set(tick.get() + 1.0);
            tick.get()
        });
        (SceneController::new(store, canvas.clone()), canvas)
    }

    fn apply(session: Rc<SceneSession>, action: SessionAction) -> Rc<SceneSession> {
        session.reduce(action)
    }

    #[test]
    fn test_save_then_load_restores_canvas() {
        let (controller, canvas) = controller();
        block_on(async {
            canvas.draw("first");
            let session = apply(
                Rc::new(SceneSession::default()),
                controller.save("Draft", None).await.unwrap(),
            );
            let id = session.current_id.clone().unwrap();

            canvas.draw("scribble");
            let session = apply(session, controller.load(&id).await.unwrap());

            assert_eq!(canvas.elements(), vec![json!({ "id": "first" })]);
            assert_eq!(canvas.fitted.borrow().len(), 1);
            assert!(session.is_current(&id));
        });
    }

    #[test]
    fn test_load_missing_leaves_canvas_untouched() {
        let (controller, canvas) = controller();
        canvas.draw("keep");
        let err = block_on(controller.load(&SceneId::from("missing"))).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(canvas.elements(), vec![json!({ "id": "keep" })]);
        assert!(canvas.fitted.borrow().is_empty());
    }

    #[test]
    fn test_delete_current_scene_clears_marker() {
        let (controller, canvas) = controller();
        block_on(async {
            canvas.draw("x");
            let session = apply(
                Rc::new(SceneSession::default()),
                controller.save("X", None).await.unwrap(),
            );
            let id = session.current_id.clone().unwrap();

            let session = apply(session, controller.delete(&id).await.unwrap());
            assert!(session.current_id.is_none());
            assert!(session.scenes.is_empty());

            let session = apply(session, controller.delete(&id).await.unwrap());
            assert!(session.scenes.is_empty());
        });
    }

    #[test]
    fn test_rename_other_scene_keeps_its_content() {
        let (controller, canvas) = controller();
        block_on(async {
            canvas.draw("one");
            let session = apply(
                Rc::new(SceneSession::default()),
                controller.save("One", None).await.unwrap(),
            );
            let one = session.current_id.clone().unwrap();

            canvas.draw("two");
            let session = apply(session, controller.save("Two", None).await.unwrap());

            let session = apply(session, controller.rename(&one, "First").await.unwrap());
            let renamed = session.scenes.iter().find(|s| s.id == one).unwrap();
            assert_eq!(renamed.name, "First");

            let stored = controller.store().load_scene(&one).await.unwrap();
            assert_eq!(stored.elements, vec![json!({ "id": "one" })]);
        });
    }

    #[test]
    fn test_refresh_lists_saved_scenes() {
        let (controller, canvas) = controller();
        block_on(async {
            canvas.draw("a");
            controller.save("A", None).await.unwrap();
            controller.save("B", None).await.unwrap();
            match controller.refresh(true).await {
                SessionAction::ListReplaced(scenes) => assert_eq!(scenes.len(), 2),
                other => panic!("unexpected action {:?}", other),
            }
        });
    }
}
