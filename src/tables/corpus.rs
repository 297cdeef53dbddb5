use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;

use crate::dataset::model::{Dataset, FemaleMap, Play};
use crate::foundation::core::Gender;
use crate::gender::resolver::{GenderSource, GenderTable};
use crate::tables::bechdel::{BechdelStatus, bechdel_status};

/// Gender and Bechdel highlights of one play.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlaySummary {
    /// Selection key.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Speech-network nodes resolving to female.
    pub female_nodes: usize,
    /// Words spoken by female characters.
    pub female_words: f64,
    /// Words spoken by male characters.
    pub male_words: f64,
    /// Words spoken by characters of unknown gender.
    pub unknown_words: f64,
    /// All words.
    pub total_words: f64,
    /// `female_words / total_words`, `0` when there are no words.
    pub female_share: f64,
    /// Recomputed Bechdel status.
    pub bechdel_status: BechdelStatus,
    /// Rank of `bechdel_status`.
    pub bechdel_rank: u8,
    /// Female-only dialogs.
    pub dialog_count: u64,
    /// Female-only dialogs without male pronouns.
    pub no_male_count: u64,
    /// Dialogs flagged `female_pair`.
    pub female_pair_dialogs: usize,
}

/// Whether a play has a nonzero word total, and so takes part in the play list.
pub fn has_words(play: &Play) -> bool {
    play.total_words() > 0.0
}

/// Summarize one play. Nodes and word rows are classified by the play's resolved genders.
pub fn play_summary(play: &Play, female_map: &FemaleMap) -> PlaySummary {
    let genders = GenderTable::from_play(play, female_map);

    let female_nodes = play
        .speech_network
        .nodes
        .iter()
        .filter(|n| {
            let name = n.id.as_deref().unwrap_or_default();
            genders.resolve(name, n.gender.as_ref()) == Gender::Female
        })
        .count();

    let (mut female_words, mut male_words, mut unknown_words) = (0.0, 0.0, 0.0);
    for row in &play.word_counts {
        let gender = row
            .character
            .as_deref()
            .map(|c| genders.gender_of(c))
            .unwrap_or_default();
        match gender {
            Gender::Female => female_words += row.words,
            Gender::Male => male_words += row.words,
            Gender::Unknown => unknown_words += row.words,
        }
    }
    let total_words = female_words + male_words + unknown_words;

    let bechdel = play.bechdel.clone().unwrap_or_default();
    let status = bechdel_status(bechdel.female_dialog_count, bechdel.female_dialogs_no_male_pron);

    PlaySummary {
        key: play.key().to_string(),
        title: play.display_title(),
        female_nodes,
        female_words,
        male_words,
        unknown_words,
        total_words,
        female_share: share(female_words, total_words),
        bechdel_status: status,
        bechdel_rank: status.rank(),
        dialog_count: bechdel.female_dialog_count,
        no_male_count: bechdel.female_dialogs_no_male_pron,
        female_pair_dialogs: play.dialogs.iter().filter(|d| d.female_pair).count(),
    }
}

/// Summaries of every play with a nonzero word total, in source order.
#[tracing::instrument(skip_all, fields(plays = dataset.plays.len()))]
pub fn play_summaries(dataset: &Dataset) -> Vec<PlaySummary> {
    let out: Vec<PlaySummary> = dataset
        .plays
        .par_iter()
        .filter(|p| has_words(p))
        .map(|p| play_summary(p, &dataset.female_characters))
        .collect();
    tracing::debug!(kept = out.len(), "play summaries");
    out
}

/// Play-list orderings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
pub enum PlaySortKey {
    /// Female nodes desc, then female words desc.
    #[default]
    FemaleNodes,
    /// Female words desc, then female nodes desc.
    FemaleWords,
    /// Male words desc, then female words desc.
    MaleWords,
    /// Female share desc, then female words desc.
    FemaleShare,
    /// Passed first, then more no-male dialogs, then more female dialogs.
    Bechdel,
    /// Display title ascending.
    Title,
}

/// Stable sort of summaries by `key`.
pub fn sort_play_summaries(plays: &mut [PlaySummary], key: PlaySortKey) {
    plays.sort_by(|a, b| compare_summaries(a, b, key));
}

fn compare_summaries(a: &PlaySummary, b: &PlaySummary, key: PlaySortKey) -> Ordering {
    match key {
        PlaySortKey::FemaleNodes => b
            .female_nodes
            .cmp(&a.female_nodes)
            .then_with(|| b.female_words.total_cmp(&a.female_words)),
        PlaySortKey::FemaleWords => b
            .female_words
            .total_cmp(&a.female_words)
            .then_with(|| b.female_nodes.cmp(&a.female_nodes)),
        PlaySortKey::MaleWords => b
            .male_words
            .total_cmp(&a.male_words)
            .then_with(|| b.female_words.total_cmp(&a.female_words)),
        PlaySortKey::FemaleShare => b
            .female_share
            .total_cmp(&a.female_share)
            .then_with(|| b.female_words.total_cmp(&a.female_words)),
        PlaySortKey::Bechdel => a
            .bechdel_rank
            .cmp(&b.bechdel_rank)
            .then_with(|| b.no_male_count.cmp(&a.no_male_count))
            .then_with(|| b.dialog_count.cmp(&a.dialog_count)),
        PlaySortKey::Title => a.title.cmp(&b.title),
    }
}

/// Corpus-wide gender and Bechdel rollup.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct CorpusStats {
    /// Plays counted.
    pub plays: usize,
    /// Female words across the corpus.
    pub female_words: f64,
    /// Male words across the corpus.
    pub male_words: f64,
    /// Unknown-gender words across the corpus.
    pub unknown_words: f64,
    /// All words.
    pub total_words: f64,
    /// Plays passing.
    pub passed: usize,
    /// Plays failing.
    pub failed: usize,
    /// Plays without female-only dialogs.
    pub not_rated: usize,
}

impl CorpusStats {
    /// Female share of all corpus words.
    pub fn female_share(&self) -> f64 {
        share(self.female_words, self.total_words)
    }

    /// Plays with `status`.
    pub fn count(&self, status: BechdelStatus) -> usize {
        match status {
            BechdelStatus::Passed => self.passed,
            BechdelStatus::Failed => self.failed,
            BechdelStatus::NotRated => self.not_rated,
        }
    }
}

/// Fold summaries into corpus totals; zero-word plays are skipped.
pub fn corpus_stats(summaries: &[PlaySummary]) -> CorpusStats {
    summaries
        .iter()
        .filter(|s| s.total_words > 0.0)
        .fold(CorpusStats::default(), |mut acc, s| {
            acc.plays += 1;
            acc.female_words += s.female_words;
            acc.male_words += s.male_words;
            acc.unknown_words += s.unknown_words;
            acc.total_words += s.total_words;
            match s.bechdel_status {
                BechdelStatus::Passed => acc.passed += 1,
                BechdelStatus::Failed => acc.failed += 1,
                BechdelStatus::NotRated => acc.not_rated += 1,
            }
            acc
        })
}

/// One character's word total within a play.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CharacterTotal {
    /// Character name.
    pub character: String,
    /// Resolved gender.
    pub gender: Gender,
    /// Words spoken.
    pub words: f64,
    /// Fraction of the play's words.
    pub share: f64,
}

/// Per-character totals of a play, duplicates merged, largest first.
pub fn character_totals(play: &Play, genders: &GenderTable) -> Vec<CharacterTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CharacterTotal> = Vec::new();
    for row in &play.word_counts {
        let Some(name) = row.character.as_deref() else {
            continue;
        };
        match index.get(name) {
            Some(&i) => out[i].words += row.words,
            None => {
                index.insert(name, out.len());
                out.push(CharacterTotal {
                    character: name.to_string(),
                    gender: genders.gender_of(name),
                    words: row.words,
                    share: 0.0,
                });
            }
        }
    }
    let total: f64 = out.iter().map(|c| c.words).sum();
    for c in &mut out {
        c.share = share(c.words, total);
    }
    out.sort_by(|a, b| b.words.total_cmp(&a.words));
    out
}

fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 { part / total } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/tables/corpus.rs"]
mod tests;
