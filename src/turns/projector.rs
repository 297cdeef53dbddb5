use crate::dataset::model::{Dialog, Play, SceneTurns};
use crate::foundation::core::Gender;
use crate::gender::resolver::GenderSource;
use crate::scene::select::{SceneKey, dialogs_in_scene, recorded_turns};

/// Where a turn sequence came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TurnSource {
    /// Synthesized from dialog totals (uniform words, round-robin speakers).
    Estimated,
    /// Literal utterance order recorded for the scene.
    GroundTruth,
}

/// One unit of speech by a single speaker.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Turn {
    /// Speaking character.
    pub speaker: String,
    /// Resolved gender.
    pub gender: Gender,
    /// Words in this turn.
    pub words: f64,
}

/// Consecutive-speaker pair driving one pulse step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TurnPair {
    /// Previous speaker.
    pub from: String,
    /// Next speaker.
    pub to: String,
}

/// Stacked-bar segment of one turn, in cumulative words.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TurnSegment {
    /// Turn position.
    pub index: usize,
    /// Speaking character.
    pub speaker: String,
    /// Resolved gender.
    pub gender: Gender,
    /// Offset where the turn starts.
    pub start: f64,
    /// Offset where the turn ends (exclusive).
    pub end: f64,
}

/// Ordered turns of a scene (or any dialog selection).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TurnSequence {
    /// Provenance.
    pub source: TurnSource,
    /// Turns in playback order.
    pub turns: Vec<Turn>,
    /// Sum of turn words.
    pub total_words: f64,
}

impl TurnSequence {
    /// Use a recorded utterance list as-is (turns without a speaker are skipped).
    pub fn from_scene_turns<G: GenderSource + ?Sized>(record: &SceneTurns, genders: &G) -> Self {
        let turns: Vec<Turn> = record
            .turns
            .iter()
            .filter_map(|t| {
                let speaker = t.speaker.as_deref()?;
                Some(Turn {
                    speaker: speaker.to_string(),
                    gender: genders.resolve(speaker, None),
                    words: t.words,
                })
            })
            .collect();
        Self::from_turns(TurnSource::GroundTruth, turns)
    }

    fn from_turns(source: TurnSource, turns: Vec<Turn>) -> Self {
        let total_words = turns.iter().map(|t| t.words).sum();
        Self {
            source,
            turns,
            total_words,
        }
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether there are no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Consecutive turns with different speakers, in order.
    pub fn pulse_pairs(&self) -> Vec<TurnPair> {
        self.turns
            .windows(2)
            .filter(|w| w[0].speaker != w[1].speaker)
            .map(|w| TurnPair {
                from: w[0].speaker.clone(),
                to: w[1].speaker.clone(),
            })
            .collect()
    }

    /// Cumulative `[start, end)` word offsets per turn.
    pub fn segments(&self) -> Vec<TurnSegment> {
        let mut offset = 0.0;
        self.turns
            .iter()
            .enumerate()
            .map(|(index, t)| {
                let start = offset;
                offset += t.words;
                TurnSegment {
                    index,
                    speaker: t.speaker.clone(),
                    gender: t.gender,
                    start,
                    end: offset,
                }
            })
            .collect()
    }

    /// Words per speaker in first-appearance order.
    pub fn speaker_totals(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = Vec::new();
        for t in &self.turns {
            match out.iter_mut().find(|(s, _)| *s == t.speaker) {
                Some((_, w)) => *w += t.words,
                None => out.push((t.speaker.clone(), t.words)),
            }
        }
        out
    }

    /// Distinct speakers in first-appearance order.
    pub fn speakers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for t in &self.turns {
            if !out.contains(&t.speaker.as_str()) {
                out.push(&t.speaker);
            }
        }
        out
    }
}

/// Synthesize turns from dialog totals.
///
/// Each dialog yields `max(1, length)` turns, rounded up for fractional lengths, of
/// `total_words / turns` words assigned to its speakers round-robin. Dialogs without speakers yield nothing.
pub fn project_turns<'a, I, G>(dialogs: I, genders: &G) -> TurnSequence
where
    I: IntoIterator<Item = &'a Dialog>,
    G: GenderSource + ?Sized,
{
    let mut turns = Vec::new();
    for d in dialogs {
        if d.speakers.is_empty() {
            continue;
        }
        let count = d.length.max(1.0).ceil() as usize;
        let words = d.total_words / count as f64;
        let genders: Vec<Gender> = d
            .speakers
            .iter()
            .map(|s| genders.resolve(s, None))
            .collect();
        for i in 0..count {
            let k = i % d.speakers.len();
            turns.push(Turn {
                speaker: d.speakers[k].clone(),
                gender: genders[k],
                words,
            });
        }
    }
    TurnSequence::from_turns(TurnSource::Estimated, turns)
}

/// Turns for one scene: the recorded order when the play has one, the estimate otherwise.
///
/// A recorded list replaces the estimate entirely; the two are never blended.
pub fn turns_for_scene<G: GenderSource + ?Sized>(
    play: &Play,
    key: &SceneKey,
    genders: &G,
) -> TurnSequence {
    match recorded_turns(play, key) {
        Some(record) => TurnSequence::from_scene_turns(record, genders),
        None => project_turns(dialogs_in_scene(play, key), genders),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/turns/projector.rs"]
mod tests;
