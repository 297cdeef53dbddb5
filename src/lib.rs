//! dramanet derives explorable networks from a precomputed corpus of plays.
//!
//! Everything is computed from one JSON document loaded at startup:
//!
//! - Resolve every character's gender once ([`GenderTable`])
//! - Aggregate speech volume per character ([`aggregate_speech`]) and lay it out on a circle
//!   ([`circular_layout`], [`graph_geometry`])
//! - Derive scene co-occurrence networks from dialogs ([`build_scene_network`])
//! - Project turn sequences ([`turns_for_scene`]) and replay them as a pulse animation
//!   ([`PulseSimulation`], [`Playback`])
//! - Roll up pairs, acts, plays and the whole corpus ([`pair_intensity`], [`act_word_matrix`],
//!   [`play_summaries`], [`corpus_stats`])
//!
//! [`Explorer`] ties these together behind a play/act/scene selection.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod config;
mod dataset;
mod explorer;
mod export;
mod foundation;
mod gender;
mod layout;
mod playback;
mod scene;
mod stats;
mod tables;
mod turns;

pub use crate::foundation::core::{
    Gender, PairKey, Point, Vec2, Viewport, compare_labels, display_title,
};
pub use crate::foundation::error::{DramaError, DramaResult};

pub use crate::cache::fingerprint::{Fingerprint, fingerprint_dialogs, fingerprint_speech};
pub use crate::cache::projection::ProjectionCache;
pub use crate::config::{ExplorerOpts, PlaybackOpts, PulseParams};
pub use crate::dataset::load::{BytesSource, DatasetSource, FileSource, load_dataset};
pub use crate::dataset::model::{
    Act, Bechdel, Dataset, Dialog, EdgeDef, FemaleMap, Network, NodeDef, Play, RawGender,
    SceneTurns, TurnRecord, WordCount,
};
pub use crate::explorer::{
    Explorer, NetworkView, PairWeight, PulseFrame, SceneView, StatsPanel,
};
pub use crate::export::{write_corpus, write_play_views};
pub use crate::gender::resolver::{GenderSource, GenderTable, resolve_gender};
pub use crate::layout::circular::{Positions, RADIUS_FACTOR, circular_layout};
pub use crate::layout::geometry::{
    EdgeGlyph, GraphGeometry, NodeGlyph, edge_width, geometry_with_positions, graph_geometry,
    node_radius,
};
pub use crate::playback::pulse::PulseSimulation;
pub use crate::playback::scheduler::{Playback, PlaybackState, TickOutcome, TickToken};
pub use crate::scene::network::{SceneNetwork, SceneNode, build_scene_network};
pub use crate::scene::select::{
    SceneKey, dialogs_in_act, dialogs_in_scene, recorded_turns, scene_index, scenes_in_act,
};
pub use crate::stats::speech::{
    AggregationMode, CharacterStats, NetworkEdge, SpeechStats, aggregate_speech,
};
pub use crate::tables::acts::{ActWordMatrix, ActWordRow, act_word_matrix};
pub use crate::tables::bechdel::{BechdelReport, BechdelStatus, bechdel_report, bechdel_status};
pub use crate::tables::corpus::{
    CharacterTotal, CorpusStats, PlaySortKey, PlaySummary, character_totals, corpus_stats,
    has_words, play_summaries, play_summary, sort_play_summaries,
};
pub use crate::tables::pairs::{PairIntensity, PairSortKey, pair_intensity, sort_pairs};
pub use crate::tables::sort::{SortDirection, SortState};
pub use crate::turns::projector::{
    Turn, TurnPair, TurnSegment, TurnSequence, TurnSource, project_turns, turns_for_scene,
};
