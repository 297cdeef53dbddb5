use std::collections::BTreeMap;

use crate::dataset::model::{FemaleMap, Network, Play, RawGender};
use crate::foundation::core::Gender;

/// Resolve a character's gender.
///
/// First match wins:
/// 1. a canonical code (`F`, `M`, `?`) in `raw`
/// 2. a boolean `raw` (`true` is F)
/// 3. an entry for `name` in `female_map`
/// 4. unknown
pub fn resolve_gender(name: &str, raw: Option<&RawGender>, female_map: &FemaleMap) -> Gender {
    if let Some(g) = raw.and_then(explicit_gender) {
        return g;
    }
    match female_map.get(name) {
        Some(female) => Gender::from_female_flag(female),
        None => Gender::Unknown,
    }
}

pub(crate) fn explicit_gender(raw: &RawGender) -> Option<Gender> {
    match raw {
        RawGender::Code(code) => Gender::from_code(code),
        RawGender::Flag(female) => Some(Gender::from_female_flag(*female)),
    }
}

/// Where a projection looks up the gender of the names it meets.
///
/// A bare [`FemaleMap`] honours each node's own hint before the map; a [`GenderTable`] has
/// already settled every name of its play, so the hint only matters for names it never saw.
pub trait GenderSource {
    /// Gender of `name`, given the hint carried by the definition being projected.
    fn resolve(&self, name: &str, raw: Option<&RawGender>) -> Gender;

    /// Stable tag of the source kind.
    fn kind(&self) -> u8;

    /// Every entry that decides [`GenderSource::resolve`], in name order.
    fn visit_entries(&self, visit: &mut dyn FnMut(&str, Gender));
}

impl GenderSource for FemaleMap {
    fn resolve(&self, name: &str, raw: Option<&RawGender>) -> Gender {
        resolve_gender(name, raw, self)
    }

    fn kind(&self) -> u8 {
        0
    }

    fn visit_entries(&self, visit: &mut dyn FnMut(&str, Gender)) {
        for (name, female) in self.iter() {
            visit(name, Gender::from_female_flag(female));
        }
    }
}

/// Every character name of a play normalized once to its canonical gender.
///
/// The first node definition carrying an explicit hint decides a name; names without one fall
/// back to the female map. A session builds one table per selected play and resolves every
/// view of that play through it.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct GenderTable {
    by_name: BTreeMap<String, Gender>,
}

impl GenderTable {
    /// Normalize the names of a single play.
    pub fn from_play(play: &Play, female_map: &FemaleMap) -> Self {
        let mut collector = NameCollector::default();
        collector.play(play);
        collector.finish(female_map)
    }

    /// Gender of `name`, if the name was seen.
    pub fn lookup(&self, name: &str) -> Option<Gender> {
        self.by_name.get(name).copied()
    }

    /// Gender of `name`; unseen names are unknown.
    pub fn gender_of(&self, name: &str) -> Gender {
        self.lookup(name).unwrap_or_default()
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no names were seen.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Count of names per gender `(F, M, ?)`.
    pub fn census(&self) -> (usize, usize, usize) {
        self.by_name
            .values()
            .fold((0, 0, 0), |(f, m, u), g| match g {
                Gender::Female => (f + 1, m, u),
                Gender::Male => (f, m + 1, u),
                Gender::Unknown => (f, m, u + 1),
            })
    }

    /// Iterate `(name, gender)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Gender)> {
        self.by_name.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl GenderSource for GenderTable {
    fn resolve(&self, name: &str, raw: Option<&RawGender>) -> Gender {
        match self.lookup(name) {
            Some(g) => g,
            None => raw.and_then(explicit_gender).unwrap_or_default(),
        }
    }

    fn kind(&self) -> u8 {
        1
    }

    fn visit_entries(&self, visit: &mut dyn FnMut(&str, Gender)) {
        for (name, gender) in self.iter() {
            visit(name, gender);
        }
    }
}

#[derive(Default)]
struct NameCollector<'a> {
    hints: BTreeMap<&'a str, Option<&'a RawGender>>,
}

impl<'a> NameCollector<'a> {
    fn name(&mut self, name: &'a str) {
        self.hints.entry(name).or_insert(None);
    }

    fn hinted(&mut self, name: &'a str, raw: Option<&'a RawGender>) {
        let slot = self.hints.entry(name).or_insert(None);
        if slot.is_none() && raw.and_then(explicit_gender).is_some() {
            *slot = raw;
        }
    }

    fn network(&mut self, network: &'a Network) {
        for node in &network.nodes {
            if let Some(id) = node.id.as_deref() {
                self.hinted(id, node.gender.as_ref());
            }
        }
        for edge in &network.edges {
            if let Some(s) = edge.source.as_deref() {
                self.name(s);
            }
            if let Some(t) = edge.target.as_deref() {
                self.name(t);
            }
        }
    }

    fn play(&mut self, play: &'a Play) {
        self.network(&play.speech_network);
        if let Some(co) = &play.co_network {
            self.network(co);
        }
        for act in &play.acts {
            self.network(&act.speech_network);
            for row in &act.word_counts {
                if let Some(c) = row.character.as_deref() {
                    self.name(c);
                }
            }
        }
        let act_rows = play.act_word_counts.iter().flat_map(|m| m.values().flatten());
        for row in play.word_counts.iter().chain(act_rows) {
            if let Some(c) = row.character.as_deref() {
                self.name(c);
            }
        }
        for dialog in &play.dialogs {
            for s in &dialog.speakers {
                self.name(s);
            }
        }
        for scene in &play.scene_turns {
            for t in &scene.turns {
                if let Some(s) = t.speaker.as_deref() {
                    self.name(s);
                }
            }
        }
    }

    fn finish(self, female_map: &FemaleMap) -> GenderTable {
        let by_name = self
            .hints
            .into_iter()
            .map(|(name, raw)| (name.to_string(), resolve_gender(name, raw, female_map)))
            .collect();
        GenderTable { by_name }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gender/resolver.rs"]
mod tests;
