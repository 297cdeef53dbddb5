use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::explorer::{Explorer, NetworkView, SceneView, StatsPanel};
use crate::foundation::error::{DramaError, DramaResult};
use crate::tables::corpus::{CorpusStats, PlaySortKey, PlaySummary};

#[derive(Debug, serde::Serialize)]
struct PlayIndex<'a> {
    key: &'a str,
    title: String,
    acts: usize,
    scenes: usize,
    files: Vec<String>,
}

#[derive(Debug, serde::Serialize)]
struct CorpusExport {
    sort: PlaySortKey,
    plays: Vec<PlaySummary>,
    corpus: CorpusStats,
    female_share: f64,
}

/// Write every view of the selected play as JSON files into `out_dir`.
///
/// Files: `global.json`, `acts.json`, `co_presence.json` (when the play has a co-presence
/// network), `stats.json`, `scenes.json` and an `index.json` listing them. The act and scene
/// selection is restored afterwards, which resets playback.
#[tracing::instrument(skip(explorer), fields(out_dir = %out_dir.display()))]
pub fn write_play_views(explorer: &mut Explorer, out_dir: &Path) -> DramaResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let mut written = Vec::new();

    let global: NetworkView = explorer.global_view()?;
    written.push(write_json(&out_dir.join("global.json"), &global)?);

    let acts = explorer.act_views()?;
    written.push(write_json(&out_dir.join("acts.json"), &acts)?);

    if let Some(co) = explorer.co_presence_view()? {
        written.push(write_json(&out_dir.join("co_presence.json"), &co)?);
    }

    let stats: StatsPanel = explorer.stats_panel()?;
    written.push(write_json(&out_dir.join("stats.json"), &stats)?);

    let scenes = all_scene_views(explorer)?;
    written.push(write_json(&out_dir.join("scenes.json"), &scenes)?);

    let play = explorer
        .selected_play()
        .ok_or_else(|| DramaError::validation("no play selected"))?;
    let index = PlayIndex {
        key: play.key(),
        title: play.display_title(),
        acts: acts.len(),
        scenes: scenes.len(),
        files: written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect(),
    };
    written.push(write_json(&out_dir.join("index.json"), &index)?);

    tracing::info!(files = written.len(), "play views written");
    Ok(written)
}

/// Write the sorted play list and corpus totals to `path`.
pub fn write_corpus(explorer: &Explorer, sort: PlaySortKey, path: &Path) -> DramaResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let corpus = explorer.corpus_stats();
    let export = CorpusExport {
        sort,
        plays: explorer.sorted_plays(sort),
        female_share: corpus.female_share(),
        corpus,
    };
    write_json(path, &export)
}

fn all_scene_views(explorer: &mut Explorer) -> DramaResult<Vec<SceneView>> {
    let act = explorer.selected_act().map(str::to_string);
    let scene = explorer.selected_scene().cloned();
    let mut out = Vec::new();
    let mut walk = || -> DramaResult<()> {
        for key in explorer.scene_index()? {
            explorer.select_scene(key)?;
            if let Some(view) = explorer.scene_view()? {
                out.push(view);
            }
        }
        Ok(())
    };
    let walked = walk();
    explorer.restore_selection(act, scene);
    walked.map(|()| out)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> DramaResult<PathBuf> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| DramaError::serde(format!("serialize {}: {e}", path.display())))?;
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote");
    Ok(path.to_path_buf())
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
