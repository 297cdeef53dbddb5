use std::collections::HashMap;

use crate::dataset::model::Dialog;
use crate::foundation::core::PairKey;
use crate::tables::sort::SortState;

/// Dialog rollup of one unordered speaker pair.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PairIntensity {
    /// The two speakers.
    pub pair: PairKey,
    /// Number of two-speaker dialogs.
    pub dialogs: u64,
    /// Sum of `total_words`.
    pub total_words: f64,
    /// Sum of `length`.
    pub total_turns: f64,
    /// Longest single dialog, in turns.
    pub max_length: f64,
}

/// Sortable columns of the pair table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PairSortKey {
    /// Dialog count.
    #[default]
    Dialogs,
    /// Word total.
    TotalWords,
    /// Turn total.
    TotalTurns,
    /// Longest dialog.
    MaxLength,
}

impl PairIntensity {
    fn value(&self, key: PairSortKey) -> f64 {
        match key {
            PairSortKey::Dialogs => self.dialogs as f64,
            PairSortKey::TotalWords => self.total_words,
            PairSortKey::TotalTurns => self.total_turns,
            PairSortKey::MaxLength => self.max_length,
        }
    }
}

/// Group two-speaker dialogs by unordered pair.
///
/// A dialog counts only when it names exactly two distinct speakers; larger groups and
/// self-dialogs are skipped. Rows come back in discovery order; see [`sort_pairs`].
pub fn pair_intensity<'a, I>(dialogs: I) -> Vec<PairIntensity>
where
    I: IntoIterator<Item = &'a Dialog>,
{
    let mut index: HashMap<PairKey, usize> = HashMap::new();
    let mut rows: Vec<PairIntensity> = Vec::new();

    for d in dialogs {
        let [x, y] = d.speakers.as_slice() else {
            continue;
        };
        if x == y {
            continue;
        }
        let key = PairKey::new(x, y);
        let i = *index.entry(key.clone()).or_insert_with(|| {
            rows.push(PairIntensity {
                pair: key,
                dialogs: 0,
                total_words: 0.0,
                total_turns: 0.0,
                max_length: 0.0,
            });
            rows.len() - 1
        });
        let row = &mut rows[i];
        row.dialogs += 1;
        row.total_words += d.total_words;
        row.total_turns += d.length;
        row.max_length = row.max_length.max(d.length);
    }
    rows
}

/// Stable sort by the active column; equal rows keep discovery order.
pub fn sort_pairs(rows: &mut [PairIntensity], sort: SortState<PairSortKey>) {
    rows.sort_by(|l, r| {
        sort.direction
            .apply(l.value(sort.key).total_cmp(&r.value(sort.key)))
    });
}

#[cfg(test)]
#[path = "../../tests/unit/tables/pairs.rs"]
mod tests;
