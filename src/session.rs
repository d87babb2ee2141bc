use std::rc::Rc;
use yew::prelude::*;

use crate::error::SceneError;
use crate::types::{sort_by_recent, SceneId, SceneMetadata};

/// In-memory view of the scene shelf: the known scenes and which one the
/// canvas currently shows. Owned by the top-level component.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneSession {
    /// Scene list as last returned by the store
    pub scenes: Vec<SceneMetadata>,
    /// Scene the canvas was last loaded from or saved as
    pub current_id: Option<SceneId>,
}

/// Outcome of a store operation, applied to the session
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    ListReplaced(Vec<SceneMetadata>),
    Saved {
        id: SceneId,
        scenes: Vec<SceneMetadata>,
    },
    Loaded(SceneId),
    Deleted {
        id: SceneId,
        scenes: Vec<SceneMetadata>,
    },
}

impl Reducible for SceneSession {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SessionAction::ListReplaced(scenes) => {
                next.scenes = scenes;
            }
            SessionAction::Saved { id, scenes } => {
                next.scenes = scenes;
                next.current_id = Some(id);
            }
            SessionAction::Loaded(id) => {
                next.current_id = Some(id);
            }
            SessionAction::Deleted { id, scenes } => {
                next.scenes = scenes;
                if next.current_id.as_ref() == Some(&id) {
                    next.current_id = None;
                }
            }
        }
        Rc::new(next)
    }
}

impl SceneSession {
    pub fn current_scene(&self) -> Option<&SceneMetadata> {
        let id = self.current_id.as_ref()?;
        self.scenes.iter().find(|s| &s.id == id)
    }

    pub fn is_current(&self, id: &SceneId) -> bool {
        self.current_id.as_ref() == Some(id)
    }

    /// Scenes for display, most recent first.
    pub fn sorted_scenes(&self) -> Vec<SceneMetadata> {
        let mut scenes = self.scenes.clone();
        sort_by_recent(&mut scenes);
        scenes
    }

    /// Name to save under for the text typed in the save box. A blank draft
    /// means "save changes to the current scene".
    pub fn resolve_save_name(&self, draft: &str) -> Result<String, SceneError> {
        let draft = draft.trim();
        if !draft.is_empty() {
            return Ok(draft.to_string());
        }
        self.current_scene()
            .map(|scene| scene.name.clone())
            .ok_or(SceneError::InvalidInput("Please enter a name for the new scene."))
    }

    pub fn save_placeholder(&self) -> String {
        match self.current_scene() {
            Some(scene) => format!("Save changes to \"{}\" or enter new name", scene.name),
            None => "Enter name for new scene".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, name: &str, ts: f64) -> SceneMetadata {
        SceneMetadata::new(SceneId::from(id), name.to_string(), ts)
    }

    fn session_with(current: Option<&str>) -> SceneSession {
        SceneSession {
            scenes: vec![meta("a", "Alpha", 100.0), meta("b", "Beta", 300.0), meta("c", "Gamma", 200.0)],
            current_id: current.map(SceneId::from),
        }
    }

    #[test]
    fn test_new_session() {
        let session = SceneSession::default();
        assert!(session.scenes.is_empty());
        assert!(session.current_id.is_none());
        assert!(session.current_scene().is_none());
    }

    #[test]
    fn test_saved_marks_current() {
        let session = Rc::new(SceneSession::default());
        let scenes = vec![meta("a", "Alpha", 100.0)];
        let session = session.reduce(SessionAction::Saved {
            id: SceneId::from("a"),
            scenes: scenes.clone(),
        });
        assert_eq!(session.scenes, scenes);
        assert_eq!(session.current_scene().map(|s| s.name.as_str()), Some("Alpha"));
    }

    #[test]
    fn test_loaded_keeps_list() {
        let session = Rc::new(session_with(None));
        let session = session.reduce(SessionAction::Loaded(SceneId::from("c")));
        assert_eq!(session.scenes.len(), 3);
        assert!(session.is_current(&SceneId::from("c")));
    }

    #[test]
    fn test_deleting_current_clears_marker() {
        let session = Rc::new(session_with(Some("b")));
        let session = session.reduce(SessionAction::Deleted {
            id: SceneId::from("b"),
            scenes: vec![meta("a", "Alpha", 100.0), meta("c", "Gamma", 200.0)],
        });
        assert!(session.current_id.is_none());
        assert_eq!(session.scenes.len(), 2);
    }

    #[test]
    fn test_deleting_other_keeps_marker() {
        let session = Rc::new(session_with(Some("a")));
        let session = session.reduce(SessionAction::Deleted {
            id: SceneId::from("b"),
            scenes: vec![meta("a", "Alpha", 100.0)],
        });
        assert!(session.is_current(&SceneId::from("a")));
    }

    #[test]
    fn test_sorted_scenes_most_recent_first() {
        let session = session_with(None);
        let names: Vec<String> = session.sorted_scenes().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Beta", "Gamma", "Alpha"]);
        // Stored order is untouched
        assert_eq!(session.scenes[0].name, "Alpha");
    }

    #[test]
    fn test_resolve_save_name() {
        let loaded = session_with(Some("c"));
        assert_eq!(loaded.resolve_save_name("  New name ").unwrap(), "New name");
        assert_eq!(loaded.resolve_save_name("   ").unwrap(), "Gamma");

        let empty = session_with(None);
        let err = empty.resolve_save_name("").unwrap_err();
        assert!(matches!(err, SceneError::InvalidInput(_)));
    }

    #[test]
    fn test_save_placeholder() {
        assert_eq!(session_with(None).save_placeholder(), "Enter name for new scene");
        assert_eq!(
            session_with(Some("a")).save_placeholder(),
            "Save changes to \"Alpha\" or enter new name"
        );
    }
}
