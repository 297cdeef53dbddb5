use crate::dataset::model::Play;

/// Three-state Bechdel classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BechdelStatus {
    /// At least one female-only dialog without male pronouns.
    #[serde(rename = "bestått")]
    Passed,
    /// Female-only dialogs exist but all reference men.
    #[serde(rename = "ikke bestått")]
    Failed,
    /// No female-only dialogs at all.
    #[serde(rename = "NR")]
    NotRated,
}

impl BechdelStatus {
    /// Label as used in the corpus.
    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "bestått",
            Self::Failed => "ikke bestått",
            Self::NotRated => "NR",
        }
    }

    /// Ordering rank: passed, then failed, then not rated.
    pub fn rank(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
            Self::NotRated => 2,
        }
    }
}

impl std::fmt::Display for BechdelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify from the two counters; no partial credit.
pub fn bechdel_status(female_dialog_count: u64, female_dialogs_no_male_pron: u64) -> BechdelStatus {
    if female_dialog_count == 0 {
        BechdelStatus::NotRated
    } else if female_dialogs_no_male_pron > 0 {
        BechdelStatus::Passed
    } else {
        BechdelStatus::Failed
    }
}

/// Bechdel panel of one play.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BechdelReport {
    /// Status recomputed from the counters.
    pub status: BechdelStatus,
    /// Status string shipped with the dataset, if any.
    pub recorded_status: Option<String>,
    /// Upstream pass flag, if any.
    pub recorded_passes: Option<bool>,
    /// Female-only dialogs.
    pub female_dialog_count: u64,
    /// Of those, without male pronouns.
    pub female_dialogs_no_male_pron: u64,
    /// All dialogs of the play.
    pub dialogs: usize,
    /// Dialogs flagged `female_pair`.
    pub female_pair_dialogs: usize,
}

/// Build the Bechdel panel; missing statistics count as zero.
pub fn bechdel_report(play: &Play) -> BechdelReport {
    let b = play.bechdel.clone().unwrap_or_default();
    BechdelReport {
        status: bechdel_status(b.female_dialog_count, b.female_dialogs_no_male_pron),
        recorded_status: b.status,
        recorded_passes: b.passes,
        female_dialog_count: b.female_dialog_count,
        female_dialogs_no_male_pron: b.female_dialogs_no_male_pron,
        dialogs: play.dialogs.len(),
        female_pair_dialogs: play.dialogs.iter().filter(|d| d.female_pair).count(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tables/bechdel.rs"]
mod tests;
