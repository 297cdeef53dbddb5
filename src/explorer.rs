use std::sync::Arc;

use crate::cache::fingerprint::{fingerprint_dialogs, fingerprint_speech};
use crate::cache::projection::ProjectionCache;
use crate::config::ExplorerOpts;
use crate::dataset::load::{DatasetSource, load_dataset};
use crate::dataset::model::{Dataset, Network, Play, WordCount};
use crate::foundation::core::{PairKey, Viewport};
use crate::foundation::error::{DramaError, DramaResult};
use crate::gender::resolver::GenderTable;
use crate::layout::circular::Positions;
use crate::layout::geometry::{GraphGeometry, geometry_with_positions, graph_geometry};
use crate::playback::pulse::PulseSimulation;
use crate::playback::scheduler::{Playback, PlaybackState, TickOutcome, TickToken};
use crate::scene::network::{SceneNetwork, build_scene_network};
use crate::scene::select::{SceneKey, dialogs_in_scene, scene_index, scenes_in_act};
use crate::stats::speech::{CharacterStats, SpeechStats, aggregate_speech};
use crate::tables::acts::{ActWordMatrix, act_word_matrix};
use crate::tables::bechdel::{BechdelReport, bechdel_report};
use crate::tables::corpus::{
    CharacterTotal, CorpusStats, PlaySortKey, PlaySummary, character_totals, corpus_stats,
    has_words, play_summaries, sort_play_summaries,
};
use crate::tables::pairs::{PairIntensity, PairSortKey, pair_intensity, sort_pairs};
use crate::tables::sort::SortState;
use crate::turns::projector::{TurnSegment, TurnSequence, turns_for_scene};

/// A laid-out network panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NetworkView {
    /// Panel title.
    pub title: String,
    /// Aggregated speech volumes.
    pub stats: Arc<SpeechStats>,
    /// Paint-ready glyphs.
    pub geometry: GraphGeometry,
    /// Top-N characters by volume.
    pub top: Vec<CharacterStats>,
    /// Female share of the panel's speech volume.
    pub female_share: f64,
}

/// Scene panel: co-occurrence network plus its turn sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneView {
    /// Selected scene.
    pub key: SceneKey,
    /// Network derived from the scene's dialogs.
    pub network: Arc<SceneNetwork>,
    /// Aggregation of that network in word-count mode.
    pub view: NetworkView,
    /// Turns in playback order.
    pub turns: TurnSequence,
    /// Stacked-bar segments of `turns`.
    pub segments: Vec<TurnSegment>,
    /// Words per speaker, first appearance order.
    pub speaker_totals: Vec<(String, f64)>,
}

/// Accumulated pulse weight of one pair.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PairWeight {
    /// The pair.
    pub pair: PairKey,
    /// Steps that pulled this pair together.
    pub weight: u32,
}

/// Snapshot of the running scene playback.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PulseFrame {
    /// Playback state.
    pub state: PlaybackState,
    /// Steps applied so far.
    pub step_index: usize,
    /// Steps available.
    pub steps: usize,
    /// Layout seed of the anchors.
    pub seed: u64,
    /// Current node positions.
    pub positions: Positions,
    /// Non-zero pair weights.
    pub weights: Vec<PairWeight>,
}

/// Statistics panel of the selected play.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StatsPanel {
    /// Display title.
    pub title: String,
    /// Bechdel classification and counters.
    pub bechdel: BechdelReport,
    /// Top-N characters by authoritative word count.
    pub characters: Vec<CharacterTotal>,
    /// Character × act words.
    pub act_matrix: ActWordMatrix,
    /// Two-speaker dialog rollup in the active sort order.
    pub pairs: Vec<PairIntensity>,
    /// Active pair sort.
    pub pair_sort: SortState<PairSortKey>,
}

/// Navigation session over one loaded corpus.
///
/// Holds the selection (play, act, scene), the selected play's [`GenderTable`], memoized
/// aggregations and the scene playback. Only plays with words can be selected, the same set
/// [`Explorer::plays`] lists. Every selection change replaces the playback, so ticks scheduled
/// for an earlier scene come back as [`TickOutcome::Stale`].
#[derive(Debug)]
pub struct Explorer {
    dataset: Dataset,
    genders: GenderTable,
    opts: ExplorerOpts,
    play: Option<usize>,
    act: Option<String>,
    scene: Option<SceneKey>,
    pair_sort: SortState<PairSortKey>,
    speech_cache: ProjectionCache<SpeechStats>,
    scene_cache: ProjectionCache<SceneNetwork>,
    playback: Playback,
}

impl Explorer {
    /// Start a session selecting the first play with words, its first act and the first scene
    /// of that act.
    #[tracing::instrument(skip_all, fields(plays = dataset.plays.len()))]
    pub fn new(dataset: Dataset, opts: ExplorerOpts) -> DramaResult<Self> {
        opts.validate()?;
        let playback = Playback::new(
            PulseSimulation::empty(opts.scene_viewport, opts.pulse),
            opts.playback,
        );
        let mut out = Self {
            dataset,
            genders: GenderTable::default(),
            opts,
            play: None,
            act: None,
            scene: None,
            pair_sort: SortState::new(PairSortKey::default()),
            speech_cache: ProjectionCache::new(),
            scene_cache: ProjectionCache::new(),
            playback,
        };
        match out.dataset.plays.iter().position(has_words) {
            Some(i) => out.focus_play(i),
            None => tracing::info!("no play with words to select"),
        }
        Ok(out)
    }

    /// Load a dataset from `source` and start a session.
    pub fn from_source(source: &dyn DatasetSource, opts: ExplorerOpts) -> DramaResult<Self> {
        Self::new(load_dataset(source)?, opts)
    }

    /// The loaded corpus.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Resolved genders of the selected play's characters.
    pub fn genders(&self) -> &GenderTable {
        &self.genders
    }

    /// Session options.
    pub fn opts(&self) -> &ExplorerOpts {
        &self.opts
    }

    /// Selected play.
    pub fn selected_play(&self) -> Option<&Play> {
        self.play.map(|i| &self.dataset.plays[i])
    }

    /// Selected act label.
    pub fn selected_act(&self) -> Option<&str> {
        self.act.as_deref()
    }

    /// Selected scene.
    pub fn selected_scene(&self) -> Option<&SceneKey> {
        self.scene.as_ref()
    }

    /// Select a play by key (`id`, or title when the play has no id).
    ///
    /// Plays without words are rejected like unknown keys.
    pub fn select_play(&mut self, key: &str) -> DramaResult<()> {
        let Some(i) = self.dataset.plays.iter().position(|p| p.key() == key) else {
            return Err(DramaError::validation(format!("unknown play '{key}'")));
        };
        if !has_words(&self.dataset.plays[i]) {
            return Err(DramaError::validation(format!("play '{key}' has no words")));
        }
        self.focus_play(i);
        Ok(())
    }

    /// Select an act of the current play; the scene moves to the act's first scene.
    pub fn select_act(&mut self, act: &str) -> DramaResult<()> {
        let play = self.current_play()?;
        let known = play.act(act).is_some() || !scenes_in_act(play, act).is_empty();
        if !known {
            return Err(DramaError::validation(format!(
                "play '{}' has no act '{act}'",
                play.key()
            )));
        }
        let scene = scenes_in_act(play, act).into_iter().next();
        self.act = Some(act.to_string());
        self.scene = scene;
        self.rebuild_playback();
        Ok(())
    }

    /// Select a scene of the current play; the act follows the scene.
    pub fn select_scene(&mut self, key: SceneKey) -> DramaResult<()> {
        let play = self.current_play()?;
        if !scene_index(play).contains(&key) {
            return Err(DramaError::validation(format!(
                "play '{}' has no scene {key}",
                play.key()
            )));
        }
        self.act = Some(key.act.clone());
        self.scene = Some(key);
        self.rebuild_playback();
        Ok(())
    }

    /// Put back an `(act, scene)` pair taken from [`Explorer::selected_act`] and
    /// [`Explorer::selected_scene`] on the same play. Playback is replaced.
    pub(crate) fn restore_selection(&mut self, act: Option<String>, scene: Option<SceneKey>) {
        self.act = act;
        self.scene = scene;
        self.rebuild_playback();
    }

    /// Distinct scenes of the current play, in act/scene order.
    pub fn scene_index(&self) -> DramaResult<Vec<SceneKey>> {
        Ok(scene_index(self.current_play()?))
    }

    /// Play-wide speech network. Uses the play's word counts when it has any.
    pub fn global_view(&mut self) -> DramaResult<NetworkView> {
        let i = self.current_index()?;
        let play = &self.dataset.plays[i];
        let word_counts = non_empty(&play.word_counts);
        let stats = aggregate_cached(
            &mut self.speech_cache,
            &play.speech_network,
            &self.genders,
            word_counts,
        );
        Ok(network_view(
            play.display_title(),
            stats,
            self.opts.global_viewport,
            self.opts.top_n,
        ))
    }

    /// One speech network per act, in act order.
    pub fn act_views(&mut self) -> DramaResult<Vec<NetworkView>> {
        let i = self.current_index()?;
        let play = &self.dataset.plays[i];
        let mut out = Vec::with_capacity(play.acts.len());
        for act in &play.acts {
            let stats = aggregate_cached(
                &mut self.speech_cache,
                &act.speech_network,
                &self.genders,
                non_empty(&act.word_counts),
            );
            out.push(network_view(
                format!("Act {}", act.act_n),
                stats,
                self.opts.act_viewport,
                self.opts.top_n,
            ));
        }
        Ok(out)
    }

    /// Co-presence network of the current play, if the corpus ships one.
    pub fn co_presence_view(&mut self) -> DramaResult<Option<NetworkView>> {
        let i = self.current_index()?;
        let play = &self.dataset.plays[i];
        let Some(network) = play.co_network.as_ref() else {
            return Ok(None);
        };
        let stats = aggregate_cached(&mut self.speech_cache, network, &self.genders, None);
        Ok(Some(network_view(
            format!("{} (co-presence)", play.display_title()),
            stats,
            self.opts.global_viewport,
            self.opts.top_n,
        )))
    }

    /// Scene panel of the selected scene; `None` when the play has no scenes.
    pub fn scene_view(&mut self) -> DramaResult<Option<SceneView>> {
        let i = self.current_index()?;
        let Some(key) = self.scene.clone() else {
            return Ok(None);
        };
        let play = &self.dataset.plays[i];
        let network = scene_network_cached(&mut self.scene_cache, play, &key, &self.genders);
        let stats = aggregate_cached(
            &mut self.speech_cache,
            &network.to_network(),
            &self.genders,
            Some(&network.word_counts),
        );
        let view = network_view(
            key.to_string(),
            stats,
            self.opts.scene_viewport,
            self.opts.top_n,
        );
        let turns = turns_for_scene(play, &key, &self.genders);
        Ok(Some(SceneView {
            key,
            network,
            view,
            segments: turns.segments(),
            speaker_totals: turns.speaker_totals(),
            turns,
        }))
    }

    /// Scene network glyphs at the playback's current positions.
    pub fn pulse_geometry(&mut self) -> DramaResult<Option<GraphGeometry>> {
        let Some(scene) = self.scene_view()? else {
            return Ok(None);
        };
        Ok(Some(geometry_with_positions(
            &scene.view.stats,
            self.playback.simulation().positions(),
        )))
    }

    /// Snapshot of the playback.
    pub fn pulse_frame(&self) -> PulseFrame {
        let sim = self.playback.simulation();
        PulseFrame {
            state: self.playback.state(),
            step_index: sim.step_index(),
            steps: sim.len(),
            seed: sim.seed(),
            positions: sim.positions().clone(),
            weights: sim
                .weights()
                .iter()
                .map(|(pair, &weight)| PairWeight {
                    pair: pair.clone(),
                    weight,
                })
                .collect(),
        }
    }

    /// Statistics panel of the current play.
    pub fn stats_panel(&self) -> DramaResult<StatsPanel> {
        let play = self.current_play()?;
        let mut characters = character_totals(play, &self.genders);
        characters.truncate(self.opts.top_n);
        let mut pairs = pair_intensity(&play.dialogs);
        sort_pairs(&mut pairs, self.pair_sort);
        Ok(StatsPanel {
            title: play.display_title(),
            bechdel: bechdel_report(play),
            characters,
            act_matrix: act_word_matrix(play),
            pairs,
            pair_sort: self.pair_sort,
        })
    }

    /// Header click on the pair table.
    pub fn sort_pairs_by(&mut self, key: PairSortKey) {
        self.pair_sort.toggle(key);
    }

    /// Summaries of every play with words, in source order.
    pub fn plays(&self) -> Vec<PlaySummary> {
        play_summaries(&self.dataset)
    }

    /// Summaries ordered by `key`.
    pub fn sorted_plays(&self, key: PlaySortKey) -> Vec<PlaySummary> {
        let mut out = self.plays();
        sort_play_summaries(&mut out, key);
        out
    }

    /// Corpus-wide totals.
    pub fn corpus_stats(&self) -> CorpusStats {
        corpus_stats(&self.plays())
    }

    /// Scene playback driver.
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Start or resume playback.
    pub fn play(&mut self) -> Option<TickToken> {
        self.playback.play()
    }

    /// Hold playback.
    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Play when stopped, stop (rewinding) when playing.
    pub fn toggle(&mut self) -> Option<TickToken> {
        self.playback.toggle()
    }

    /// Deliver a scheduled tick.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        self.playback.tick(token)
    }

    /// Reseed the playback anchors.
    pub fn reroll(&mut self) {
        self.playback.reroll();
    }

    /// Stop playback, restore anchors and clear weights.
    pub fn reset(&mut self) {
        self.playback.reset();
    }

    fn current_index(&self) -> DramaResult<usize> {
        self.play
            .ok_or_else(|| DramaError::validation("no play selected"))
    }

    fn current_play(&self) -> DramaResult<&Play> {
        Ok(&self.dataset.plays[self.current_index()?])
    }

    fn focus_play(&mut self, i: usize) {
        let play = &self.dataset.plays[i];
        let genders = GenderTable::from_play(play, &self.dataset.female_characters);
        let (f, m, u) = genders.census();
        let act = play.acts.first().map(|a| a.act_n.clone());
        let scene = match act.as_deref() {
            Some(a) => scenes_in_act(play, a).into_iter().next(),
            None => scene_index(play).into_iter().next(),
        };
        tracing::debug!(
            play = play.key(),
            act = ?act,
            scene = ?scene,
            characters = genders.len(),
            female = f,
            male = m,
            unknown = u,
            "play selected"
        );
        self.play = Some(i);
        self.genders = genders;
        self.act = act;
        self.scene = scene;
        self.rebuild_playback();
    }

    fn rebuild_playback(&mut self) {
        let viewport = self.opts.scene_viewport;
        let params = self.opts.pulse;
        let sim = match (self.play, self.scene.as_ref()) {
            (Some(i), Some(key)) => {
                let play = &self.dataset.plays[i];
                let network =
                    scene_network_cached(&mut self.scene_cache, play, key, &self.genders);
                let turns = turns_for_scene(play, key, &self.genders);
                let ids = network
                    .nodes
                    .iter()
                    .map(|n| n.id.clone())
                    .chain(turns.speakers().into_iter().map(str::to_string));
                PulseSimulation::new(ids, turns.pulse_pairs(), viewport, params)
            }
            _ => PulseSimulation::empty(viewport, params),
        };
        self.playback.replace(sim);
    }
}

fn non_empty(rows: &[WordCount]) -> Option<&[WordCount]> {
    (!rows.is_empty()).then_some(rows)
}

fn aggregate_cached(
    cache: &mut ProjectionCache<SpeechStats>,
    network: &Network,
    genders: &GenderTable,
    word_counts: Option<&[WordCount]>,
) -> Arc<SpeechStats> {
    let key = fingerprint_speech(network, genders, word_counts);
    cache.get_or_insert_with(key, || aggregate_speech(network, genders, word_counts))
}

fn scene_network_cached(
    cache: &mut ProjectionCache<SceneNetwork>,
    play: &Play,
    key: &SceneKey,
    genders: &GenderTable,
) -> Arc<SceneNetwork> {
    let dialogs = dialogs_in_scene(play, key);
    let fp = fingerprint_dialogs(dialogs.iter().copied(), genders);
    cache.get_or_insert_with(fp, || build_scene_network(dialogs.iter().copied(), genders))
}

fn network_view(
    title: String,
    stats: Arc<SpeechStats>,
    viewport: Viewport,
    top_n: usize,
) -> NetworkView {
    NetworkView {
        title,
        geometry: graph_geometry(&stats, viewport, 0),
        top: stats.top(top_n).to_vec(),
        female_share: stats.female_share(),
        stats,
    }
}

#[cfg(test)]
#[path = "../tests/unit/explorer.rs"]
mod tests;
