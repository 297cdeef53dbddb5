use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::dataset::lenient;
use crate::foundation::core::display_title;

/// The whole precomputed corpus document.
///
/// Every optional collection degrades to empty when missing or `null`; numeric fields with an
/// unexpected JSON type read as absent. Loading never repairs records, it only tolerates them.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Dataset {
    /// External name → is-female lookup.
    #[serde(rename = "FEMALE_CHARACTERS", default)]
    pub female_characters: FemaleMap,
    /// Plays in source order.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub plays: Vec<Play>,
}

impl Dataset {
    /// Find a play by its selection key (see [`Play::key`]).
    pub fn play(&self, key: &str) -> Option<&Play> {
        self.plays.iter().find(|p| p.key() == key)
    }
}

/// External sex map keyed by character name (`true` = female).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FemaleMap(#[serde(deserialize_with = "lenient::truthy_map")] pub BTreeMap<String, bool>);

impl FemaleMap {
    /// Look up a name; `None` when the map has no opinion.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FemaleMap {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One play of the corpus.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Play {
    /// Optional stable identifier.
    #[serde(default, deserialize_with = "lenient::key")]
    pub id: Option<String>,
    /// Raw title (underscores in place of spaces).
    #[serde(default, deserialize_with = "lenient::key_or_empty")]
    pub title: String,
    /// Acts with act-scoped networks.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub acts: Vec<Act>,
    /// Speech-transition network for the whole play.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub speech_network: Network,
    /// Optional co-presence network.
    #[serde(default)]
    pub co_network: Option<Network>,
    /// Authoritative per-character word totals.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub word_counts: Vec<WordCount>,
    /// Optional pre-aggregated act → word counts.
    #[serde(default)]
    pub act_word_counts: Option<BTreeMap<String, Vec<WordCount>>>,
    /// Dialog exchanges.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub dialogs: Vec<Dialog>,
    /// Literal utterance order per scene, when recorded.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub scene_turns: Vec<SceneTurns>,
    /// Bechdel statistics.
    #[serde(default)]
    pub bechdel: Option<Bechdel>,
}

impl Play {
    /// Selection key: `id` when present, otherwise the title.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.title)
    }

    /// Title with underscores replaced by spaces.
    pub fn display_title(&self) -> String {
        display_title(&self.title)
    }

    /// Find an act by its label.
    pub fn act(&self, act_n: &str) -> Option<&Act> {
        self.acts.iter().find(|a| a.act_n == act_n)
    }

    /// Sum of authoritative word counts.
    pub fn total_words(&self) -> f64 {
        self.word_counts.iter().map(|r| r.words).sum()
    }
}

/// One act of a play.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Act {
    /// Act label (numbers are read as their JSON spelling).
    #[serde(default, deserialize_with = "lenient::key_or_empty")]
    pub act_n: String,
    /// Act-scoped speech network.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub speech_network: Network,
    /// Act-scoped word counts.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub word_counts: Vec<WordCount>,
}

/// A `{nodes, edges}` pair as stored in the document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Network {
    /// Node definitions.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub nodes: Vec<NodeDef>,
    /// Edge definitions.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub edges: Vec<EdgeDef>,
}

/// Raw node definition.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeDef {
    /// Character name (also accepted under `name`).
    #[serde(default, alias = "name", deserialize_with = "lenient::key")]
    pub id: Option<String>,
    /// Gender hint in whatever encoding the source used.
    #[serde(default, deserialize_with = "lenient::raw_gender")]
    pub gender: Option<RawGender>,
}

/// Gender hint as found in the source document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawGender {
    /// Boolean encoding, `true` meaning female.
    Flag(bool),
    /// String encoding; only `F`, `M` and `?` are meaningful.
    Code(String),
}

/// Raw edge definition.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeDef {
    /// Source character.
    #[serde(default, deserialize_with = "lenient::key")]
    pub source: Option<String>,
    /// Target character.
    #[serde(default, deserialize_with = "lenient::key")]
    pub target: Option<String>,
    /// Interaction / turn count.
    #[serde(default, deserialize_with = "lenient::finite")]
    pub count: Option<f64>,
    /// Alternative weight field.
    #[serde(default, deserialize_with = "lenient::finite")]
    pub weight: Option<f64>,
    /// Average utterance length on the source side.
    #[serde(default, rename = "avg_len_A", deserialize_with = "lenient::finite")]
    pub avg_len_a: Option<f64>,
    /// Average utterance length on the target side.
    #[serde(default, rename = "avg_len_B", deserialize_with = "lenient::finite")]
    pub avg_len_b: Option<f64>,
}

impl EdgeDef {
    /// `count`, falling back to `weight`, falling back to `0`.
    pub fn count_or_weight(&self) -> f64 {
        self.count.or(self.weight).unwrap_or(0.0)
    }

    /// Both endpoints, if present.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        Some((self.source.as_deref()?, self.target.as_deref()?))
    }
}

/// `{character, words}` row.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordCount {
    /// Character name.
    #[serde(default, deserialize_with = "lenient::key")]
    pub character: Option<String>,
    /// Word total.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub words: f64,
}

impl WordCount {
    /// Row for a named character.
    pub fn new(character: impl Into<String>, words: f64) -> Self {
        Self {
            character: Some(character.into()),
            words,
        }
    }
}

/// One recorded exchange between two or more speakers.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dialog {
    /// Speakers in order of appearance.
    #[serde(default, deserialize_with = "lenient::names")]
    pub speakers: SmallVec<[String; 4]>,
    /// Act label.
    #[serde(default, deserialize_with = "lenient::key")]
    pub act: Option<String>,
    /// Scene label.
    #[serde(default, deserialize_with = "lenient::key")]
    pub scene: Option<String>,
    /// Turn count.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub length: f64,
    /// Words spoken across the exchange.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub total_words: f64,
    /// Male pronoun occurrences.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub male_pron: f64,
    /// Female pronoun occurrences.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub female_pron: f64,
    /// Whether all speakers are female.
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub female_pair: bool,
}

/// Literal utterance order of one scene.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneTurns {
    /// Act label.
    #[serde(default, deserialize_with = "lenient::key")]
    pub act: Option<String>,
    /// Scene label.
    #[serde(default, deserialize_with = "lenient::key")]
    pub scene: Option<String>,
    /// Utterances in order.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub turns: Vec<TurnRecord>,
}

/// One recorded utterance.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TurnRecord {
    /// Speaking character.
    #[serde(default, deserialize_with = "lenient::key")]
    pub speaker: Option<String>,
    /// Words in the utterance.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub words: f64,
}

/// Precomputed Bechdel counters.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bechdel {
    /// Dialogs between female speakers only.
    #[serde(default, deserialize_with = "lenient::count")]
    pub female_dialog_count: u64,
    /// Of those, dialogs without male pronouns.
    #[serde(default, deserialize_with = "lenient::count")]
    pub female_dialogs_no_male_pron: u64,
    /// Status string as computed upstream.
    #[serde(default, deserialize_with = "lenient::key")]
    pub status: Option<String>,
    /// Upstream pass flag.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub passes: Option<bool>,
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/model.rs"]
mod tests;
