use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::dataset::model::{Dialog, Play, SceneTurns};
use crate::foundation::core::compare_labels;

/// `(act, scene)` address of a scene.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SceneKey {
    /// Act label.
    pub act: String,
    /// Scene label.
    pub scene: String,
}

impl SceneKey {
    /// Build a key.
    pub fn new(act: impl Into<String>, scene: impl Into<String>) -> Self {
        Self {
            act: act.into(),
            scene: scene.into(),
        }
    }

    /// Whether a dialog belongs to this scene. Dialogs missing either label never match.
    pub fn matches_dialog(&self, d: &Dialog) -> bool {
        d.act.as_deref() == Some(self.act.as_str()) && d.scene.as_deref() == Some(self.scene.as_str())
    }

    /// Whether a scene-turn record belongs to this scene.
    pub fn matches_turns(&self, t: &SceneTurns) -> bool {
        t.act.as_deref() == Some(self.act.as_str()) && t.scene.as_deref() == Some(self.scene.as_str())
    }
}

impl Ord for SceneKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_labels(&self.act, &other.act).then_with(|| compare_labels(&self.scene, &other.scene))
    }
}

impl PartialOrd for SceneKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for SceneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.act, self.scene)
    }
}

/// Distinct scenes addressed by the play's dialogs and recorded turns, in act/scene order.
pub fn scene_index(play: &Play) -> Vec<SceneKey> {
    let from_dialogs = play
        .dialogs
        .iter()
        .filter_map(|d| Some(SceneKey::new(d.act.as_deref()?, d.scene.as_deref()?)));
    let from_turns = play
        .scene_turns
        .iter()
        .filter_map(|t| Some(SceneKey::new(t.act.as_deref()?, t.scene.as_deref()?)));
    from_dialogs
        .chain(from_turns)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Scenes of one act.
pub fn scenes_in_act(play: &Play, act: &str) -> Vec<SceneKey> {
    scene_index(play)
        .into_iter()
        .filter(|k| k.act == act)
        .collect()
}

/// Dialogs of a scene, in source order.
pub fn dialogs_in_scene<'a>(play: &'a Play, key: &SceneKey) -> Vec<&'a Dialog> {
    play.dialogs.iter().filter(|d| key.matches_dialog(d)).collect()
}

/// Dialogs of an act, in source order.
pub fn dialogs_in_act<'a>(play: &'a Play, act: &str) -> Vec<&'a Dialog> {
    play.dialogs
        .iter()
        .filter(|d| d.act.as_deref() == Some(act))
        .collect()
}

/// Recorded utterance order for a scene, if any.
pub fn recorded_turns<'a>(play: &'a Play, key: &SceneKey) -> Option<&'a SceneTurns> {
    play.scene_turns.iter().find(|t| key.matches_turns(t))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/select.rs"]
mod tests;
