use std::collections::HashMap;

use crate::dataset::model::{Dialog, EdgeDef, Network, NodeDef, RawGender, WordCount};
use crate::foundation::core::{Gender, PairKey};
use crate::gender::resolver::GenderSource;
use crate::stats::speech::NetworkEdge;

/// Speaker discovered in a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneNode {
    /// Character name.
    pub id: String,
    /// Gender from the female map alone.
    pub gender: Gender,
    /// Accumulated word share.
    pub words: f64,
}

/// Co-occurrence network derived from a set of dialogs.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SceneNetwork {
    /// Speakers in discovery order.
    pub nodes: Vec<SceneNode>,
    /// Unordered pair edges in discovery order; `count` sums turns, `weight` sums words.
    pub edges: Vec<NetworkEdge>,
    /// `{character, round(words)}` rows in node order.
    pub word_counts: Vec<WordCount>,
}

impl SceneNetwork {
    /// Re-express as a document network so it can go through speech aggregation.
    pub fn to_network(&self) -> Network {
        Network {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeDef {
                    id: Some(n.id.clone()),
                    gender: Some(RawGender::Code(n.gender.code().to_string())),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| EdgeDef {
                    source: Some(e.source.clone()),
                    target: Some(e.target.clone()),
                    count: Some(e.count),
                    weight: e.weight,
                    avg_len_a: None,
                    avg_len_b: None,
                })
                .collect(),
        }
    }

    /// Whether no dialog qualified.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edge between two speakers, in either direction.
    pub fn edge(&self, x: &str, y: &str) -> Option<&NetworkEdge> {
        let key = PairKey::new(x, y);
        self.edges
            .iter()
            .find(|e| PairKey::new(&e.source, &e.target) == key)
    }
}

/// Derive a co-occurrence network from dialogs.
///
/// Only dialogs with two or more distinct speakers take part. Each dialog splits its
/// `total_words` evenly across its speakers and links every pair of them (not only neighbours):
/// the pair's `count` grows by the dialog `length` and its `weight` by the full `total_words`.
#[tracing::instrument(skip_all)]
pub fn build_scene_network<'a, I, G>(dialogs: I, genders: &G) -> SceneNetwork
where
    I: IntoIterator<Item = &'a Dialog>,
    G: GenderSource + ?Sized,
{
    let mut nodes: Vec<SceneNode> = Vec::new();
    let mut node_index: HashMap<String, usize> = HashMap::new();
    let mut edges: Vec<NetworkEdge> = Vec::new();
    let mut edge_index: HashMap<PairKey, usize> = HashMap::new();
    let mut used = 0usize;
    let mut skipped = 0usize;

    for dialog in dialogs {
        let speakers = distinct_speakers(dialog);
        if speakers.len() < 2 {
            skipped += 1;
            continue;
        }
        used += 1;

        let share = dialog.total_words / speakers.len() as f64;
        for &s in &speakers {
            let idx = *node_index.entry(s.to_string()).or_insert_with(|| {
                nodes.push(SceneNode {
                    id: s.to_string(),
                    gender: genders.resolve(s, None),
                    words: 0.0,
                });
                nodes.len() - 1
            });
            nodes[idx].words += share;
        }

        for (i, &x) in speakers.iter().enumerate() {
            for &y in &speakers[i + 1..] {
                let key = PairKey::new(x, y);
                let idx = *edge_index.entry(key).or_insert_with(|| {
                    edges.push(NetworkEdge {
                        source: x.to_string(),
                        target: y.to_string(),
                        count: 0.0,
                        weight: Some(0.0),
                        avg_len_a: None,
                        avg_len_b: None,
                    });
                    edges.len() - 1
                });
                let e = &mut edges[idx];
                e.count += dialog.length;
                e.weight = Some(e.weight.unwrap_or(0.0) + dialog.total_words);
            }
        }
    }

    tracing::debug!(used, skipped, nodes = nodes.len(), edges = edges.len(), "scene network built");

    let word_counts = nodes
        .iter()
        .map(|n| WordCount::new(n.id.clone(), n.words.round()))
        .collect();

    SceneNetwork {
        nodes,
        edges,
        word_counts,
    }
}

fn distinct_speakers(dialog: &Dialog) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(dialog.speakers.len());
    for s in &dialog.speakers {
        if !s.is_empty() && !out.contains(&s.as_str()) {
            out.push(s);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scene/network.rs"]
mod tests;
