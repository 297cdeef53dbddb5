use std::collections::BTreeMap;

use crate::config::PulseParams;
use crate::foundation::core::{PairKey, Point, Viewport};
use crate::layout::circular::{Positions, circular_layout};
use crate::turns::projector::TurnPair;

/// Discrete relaxation replaying a turn sequence as "pulses" between speakers.
///
/// Each step pulls the step's two speakers toward each other, pulls every node back toward its
/// circular anchor, clamps everything into the viewport and bumps the pair's weight. The
/// simulation ends when every pair has been consumed.
#[derive(Clone, Debug)]
pub struct PulseSimulation {
    ids: Vec<String>,
    viewport: Viewport,
    params: PulseParams,
    seed: u64,
    anchors: Positions,
    positions: Positions,
    weights: BTreeMap<PairKey, u32>,
    pairs: Vec<TurnPair>,
    step_index: usize,
}

impl PulseSimulation {
    /// Set up a simulation over `ids` with positions at their anchors.
    pub fn new<I, S>(ids: I, pairs: Vec<TurnPair>, viewport: Viewport, params: PulseParams) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        ids.sort();
        ids.dedup();
        let anchors = circular_layout(ids.iter().map(String::as_str), viewport, 0);
        Self {
            positions: anchors.clone(),
            anchors,
            ids,
            viewport,
            params,
            seed: 0,
            weights: BTreeMap::new(),
            pairs,
            step_index: 0,
        }
    }

    /// Simulation with no nodes and no pairs.
    pub fn empty(viewport: Viewport, params: PulseParams) -> Self {
        Self::new(Vec::<String>::new(), Vec::new(), viewport, params)
    }

    /// Apply the next pair. Returns `false` once every pair has been consumed.
    pub fn step(&mut self) -> bool {
        let Some(pair) = self.pairs.get(self.step_index) else {
            return false;
        };
        let PulseParams {
            pull,
            restore,
            margin,
        } = self.params;

        let from = self.positions.get(&pair.from).copied();
        let to = self.positions.get(&pair.to).copied();
        if let (Some(a), Some(b)) = (from, to) {
            self.positions.insert(pair.from.clone(), a + (b - a) * pull);
            self.positions.insert(pair.to.clone(), b + (a - b) * pull);
        }

        for (id, p) in self.positions.iter_mut() {
            if let Some(anchor) = self.anchors.get(id) {
                *p += (*anchor - *p) * restore;
            }
            *p = self.viewport.clamp(*p, margin);
        }

        *self
            .weights
            .entry(PairKey::new(&pair.from, &pair.to))
            .or_insert(0) += 1;
        self.step_index += 1;
        true
    }

    /// Rewind to the first pair, keeping positions and weights.
    pub fn restart(&mut self) {
        self.step_index = 0;
    }

    /// Rewind, put every node back on its anchor and clear weights.
    pub fn reset(&mut self) {
        self.step_index = 0;
        self.positions = self.anchors.clone();
        self.weights.clear();
    }

    /// Reseed the anchor layout. Positions drift to the new anchors; weights are kept.
    pub fn reroll(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        self.anchors = circular_layout(self.ids.iter().map(String::as_str), self.viewport, self.seed);
    }

    /// Whether every pair has been consumed.
    pub fn is_complete(&self) -> bool {
        self.step_index >= self.pairs.len()
    }

    /// Index of the next pair.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Total number of steps.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Current layout seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Node ids.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Fixed anchor positions.
    pub fn anchors(&self) -> &Positions {
        &self.anchors
    }

    /// Current positions.
    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    /// Current position of one node.
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Accumulated pair weights.
    pub fn weights(&self) -> &BTreeMap<PairKey, u32> {
        &self.weights
    }

    /// Accumulated weight of one pair, in either order.
    pub fn weight(&self, x: &str, y: &str) -> u32 {
        self.weights.get(&PairKey::new(x, y)).copied().unwrap_or(0)
    }

    /// The pair the next step will apply.
    pub fn next_pair(&self) -> Option<&TurnPair> {
        self.pairs.get(self.step_index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/pulse.rs"]
mod tests;
