use std::collections::HashMap;

use crate::dataset::model::{Network, RawGender, WordCount};
use crate::foundation::core::Gender;
use crate::gender::resolver::{GenderSource, explicit_gender};

/// Per-character speech volume, re-derived on every aggregation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CharacterStats {
    /// Character name.
    pub name: String,
    /// Resolved gender.
    pub gender: Gender,
    /// Speech count (or its word-count proxy).
    pub speeches: f64,
    /// Aggregate word volume.
    pub total_len: f64,
    /// `total_len / speeches`, `0` without speeches.
    pub avg_len: f64,
}

/// Normalized network edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NetworkEdge {
    /// Source character.
    pub source: String,
    /// Target character.
    pub target: String,
    /// Interaction count (`count`, else `weight`, else `0`).
    pub count: f64,
    /// Raw weight, when recorded.
    pub weight: Option<f64>,
    /// Average utterance length on the source side.
    pub avg_len_a: Option<f64>,
    /// Average utterance length on the target side.
    pub avg_len_b: Option<f64>,
}

impl NetworkEdge {
    /// Thickness driver: `count`, falling back to `weight`.
    pub fn strength(&self) -> f64 {
        if self.count > 0.0 {
            self.count
        } else {
            self.weight.unwrap_or(0.0)
        }
    }
}

/// Which source the node weights came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum AggregationMode {
    /// Authoritative per-character word counts.
    WordCounts,
    /// Estimated from edge transition counts and average lengths.
    EdgeEstimate,
}

/// Sorted node list plus retained edges.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpeechStats {
    /// Characters, descending by `total_len`, ties in discovery order.
    pub nodes: Vec<CharacterStats>,
    /// Well-formed edges in source order.
    pub edges: Vec<NetworkEdge>,
    /// Weight source.
    pub mode: AggregationMode,
}

impl SpeechStats {
    /// First `n` characters.
    pub fn top(&self, n: usize) -> &[CharacterStats] {
        &self.nodes[..n.min(self.nodes.len())]
    }

    /// Lookup by name.
    pub fn node(&self, name: &str) -> Option<&CharacterStats> {
        self.nodes.iter().find(|c| c.name == name)
    }

    /// Sum of `total_len` over all characters.
    pub fn total_len(&self) -> f64 {
        self.nodes.iter().map(|c| c.total_len).sum()
    }

    /// Sum of `total_len` over characters of `gender`.
    pub fn total_len_for(&self, gender: Gender) -> f64 {
        self.nodes
            .iter()
            .filter(|c| c.gender == gender)
            .map(|c| c.total_len)
            .sum()
    }

    /// Female share of `total_len`; `0` when there is no volume.
    pub fn female_share(&self) -> f64 {
        let total = self.total_len();
        if total > 0.0 {
            self.total_len_for(Gender::Female) / total
        } else {
            0.0
        }
    }

    /// Largest `total_len`.
    pub fn max_total_len(&self) -> f64 {
        self.nodes.iter().map(|c| c.total_len).fold(0.0, f64::max)
    }

    /// Largest edge strength.
    pub fn max_edge_strength(&self) -> f64 {
        self.edges.iter().map(NetworkEdge::strength).fold(0.0, f64::max)
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Build per-character speech weights for one network.
///
/// With `word_counts`, each row sets both `speeches` and `total_len` of its character and edges
/// never contribute weight. Without, every edge adds `count` speeches to both ends and
/// `count * avg_len` words to each side; a missing average counts one word per turn.
///
/// Declared nodes and edge endpoints always appear, with zero weight if nothing else applies.
/// Each name is resolved once through `genders`, passing the first explicit hint its node
/// declarations carry.
#[tracing::instrument(skip_all, fields(nodes = network.nodes.len(), edges = network.edges.len(), word_counts = word_counts.is_some()))]
pub fn aggregate_speech<G: GenderSource + ?Sized>(
    network: &Network,
    genders: &G,
    word_counts: Option<&[WordCount]>,
) -> SpeechStats {
    let mut acc = Accumulator::new(network, genders);

    for node in &network.nodes {
        if let Some(id) = node.id.as_deref() {
            acc.ensure(id);
        }
    }

    let mut edges = Vec::with_capacity(network.edges.len());
    let mut skipped = 0usize;
    for e in &network.edges {
        let Some((source, target)) = e.endpoints() else {
            skipped += 1;
            continue;
        };
        acc.ensure(source);
        acc.ensure(target);
        edges.push(NetworkEdge {
            source: source.to_string(),
            target: target.to_string(),
            count: e.count_or_weight(),
            weight: e.weight,
            avg_len_a: e.avg_len_a,
            avg_len_b: e.avg_len_b,
        });
    }
    if skipped > 0 {
        tracing::debug!(skipped, "edges without source/target skipped");
    }

    let mode = match word_counts {
        Some(rows) => {
            for row in rows {
                let Some(name) = row.character.as_deref() else {
                    continue;
                };
                let c = acc.ensure(name);
                c.speeches = row.words;
                c.total_len = row.words;
            }
            AggregationMode::WordCounts
        }
        None => {
            for e in &edges {
                let count = e.count;
                let from = acc.ensure(&e.source);
                from.speeches += count;
                from.total_len += count * e.avg_len_a.unwrap_or(1.0);
                let to = acc.ensure(&e.target);
                to.speeches += count;
                to.total_len += count * e.avg_len_b.unwrap_or(1.0);
            }
            AggregationMode::EdgeEstimate
        }
    };

    let mut nodes = acc.nodes;
    for c in &mut nodes {
        c.avg_len = if c.speeches > 0.0 {
            c.total_len / c.speeches
        } else {
            0.0
        };
    }
    nodes.sort_by(|a, b| b.total_len.total_cmp(&a.total_len));

    SpeechStats { nodes, edges, mode }
}

struct Accumulator<'a, G: ?Sized> {
    genders: &'a G,
    hints: HashMap<&'a str, &'a RawGender>,
    index: HashMap<String, usize>,
    nodes: Vec<CharacterStats>,
}

impl<'a, G: GenderSource + ?Sized> Accumulator<'a, G> {
    fn new(network: &'a Network, genders: &'a G) -> Self {
        let mut hints = HashMap::new();
        for n in &network.nodes {
            let (Some(id), Some(raw)) = (n.id.as_deref(), n.gender.as_ref()) else {
                continue;
            };
            if explicit_gender(raw).is_some() {
                hints.entry(id).or_insert(raw);
            }
        }
        Self {
            genders,
            hints,
            index: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    fn ensure(&mut self, name: &str) -> &mut CharacterStats {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let gender = self.genders.resolve(name, self.hints.get(name).copied());
                self.nodes.push(CharacterStats {
                    name: name.to_string(),
                    gender,
                    speeches: 0.0,
                    total_len: 0.0,
                    avg_len: 0.0,
                });
                self.index.insert(name.to_string(), self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[idx]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stats/speech.rs"]
mod tests;
