use std::collections::{BTreeMap, HashMap};

use crate::dataset::model::{Play, WordCount};
use crate::foundation::core::compare_labels;

/// One character's words per act.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ActWordRow {
    /// Character name.
    pub character: String,
    /// Act label → words.
    pub totals: BTreeMap<String, f64>,
    /// Row total.
    pub sum: f64,
}

impl ActWordRow {
    /// Words in `act`, zero when the character is silent there.
    pub fn cell(&self, act: &str) -> f64 {
        self.totals.get(act).copied().unwrap_or(0.0)
    }
}

/// Character × act word matrix.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ActWordMatrix {
    /// Column labels, numeric order first.
    pub acts: Vec<String>,
    /// Rows, largest sum first.
    pub rows: Vec<ActWordRow>,
    /// Largest single cell; `0` for an empty matrix.
    pub max_words: f64,
}

impl ActWordMatrix {
    /// Whether no character has a row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Default)]
struct MatrixBuilder {
    index: HashMap<String, usize>,
    rows: Vec<ActWordRow>,
}

impl MatrixBuilder {
    fn add(&mut self, act: &str, wc: &WordCount) {
        let Some(name) = wc.character.as_deref() else {
            return;
        };
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.rows.push(ActWordRow {
                    character: name.to_string(),
                    totals: BTreeMap::new(),
                    sum: 0.0,
                });
                self.index.insert(name.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        let row = &mut self.rows[i];
        *row.totals.entry(act.to_string()).or_insert(0.0) += wc.words;
        row.sum += wc.words;
    }
}

/// Build the matrix from `act_word_counts`, or from each act's own word counts when that map
/// is absent or empty.
pub fn act_word_matrix(play: &Play) -> ActWordMatrix {
    let mut builder = MatrixBuilder::default();
    let mut acts: Vec<String> = match play.act_word_counts.as_ref().filter(|m| !m.is_empty()) {
        Some(by_act) => {
            for (act, rows) in by_act {
                rows.iter().for_each(|wc| builder.add(act, wc));
            }
            by_act.keys().cloned().collect()
        }
        None => {
            for act in &play.acts {
                act.word_counts.iter().for_each(|wc| builder.add(&act.act_n, wc));
            }
            play.acts.iter().map(|a| a.act_n.clone()).collect()
        }
    };
    acts.sort_by(|a, b| compare_labels(a, b));
    acts.dedup();

    let max_words = builder
        .rows
        .iter()
        .flat_map(|r| r.totals.values().copied())
        .fold(0.0_f64, f64::max);
    let mut rows = builder.rows;
    rows.sort_by(|a, b| b.sum.total_cmp(&a.sum));

    ActWordMatrix {
        acts,
        rows,
        max_words,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tables/acts.rs"]
mod tests;
