use super::*;
use crate::foundation::core::Gender;
use crate::stats::speech::AggregationMode;
use crate::tables::bechdel::BechdelStatus;
use crate::turns::projector::TurnSource;

const CORPUS: &str = include_str!("../data/mini_corpus.json");

fn explorer() -> Explorer {
    let ds = Dataset::from_json_str(CORPUS).unwrap();
    Explorer::new(ds, ExplorerOpts::default()).unwrap()
}

#[test]
fn starts_on_first_play_act_and_scene() {
    let ex = explorer();
    assert_eq!(ex.selected_play().unwrap().key(), "dukkehjem");
    assert_eq!(ex.selected_act(), Some("1"));
    assert_eq!(ex.selected_scene(), Some(&SceneKey::new("1", "1")));
    assert_eq!(ex.playback().state(), PlaybackState::Idle);
}

#[test]
fn empty_corpus_has_no_selection() {
    let mut ex = Explorer::new(Dataset::default(), ExplorerOpts::default()).unwrap();
    assert!(ex.selected_play().is_none());
    assert!(ex.global_view().is_err());
    assert!(ex.plays().is_empty());
    assert!(ex.play().is_none());
}

#[test]
fn global_view_uses_word_counts() {
    let mut ex = explorer();
    let v = ex.global_view().unwrap();
    assert_eq!(v.title, "Et dukkehjem");
    assert_eq!(v.stats.mode, AggregationMode::WordCounts);
    assert_eq!(v.top[0].name, "Nora");
    assert_eq!(v.top[0].total_len, 120.0);
    assert!((v.female_share - 0.6).abs() < 1e-12);
    assert_eq!(v.geometry.nodes.len(), 3);
    assert_eq!(v.geometry.edges.len(), 2);
}

#[test]
fn repeated_views_are_memoized() {
    let mut ex = explorer();
    let a = ex.global_view().unwrap();
    let b = ex.global_view().unwrap();
    assert!(Arc::ptr_eq(&a.stats, &b.stats));
}

#[test]
fn act_views_fall_back_to_edge_estimates() {
    let mut ex = explorer();
    let acts = ex.act_views().unwrap();
    assert_eq!(acts.len(), 2);
    assert_eq!(acts[0].title, "Act 1");
    assert_eq!(acts[0].stats.mode, AggregationMode::WordCounts);
    assert_eq!(acts[1].stats.mode, AggregationMode::EdgeEstimate);
    assert_eq!(acts[1].top[0].name, "Nora");
    assert_eq!(acts[1].top[0].total_len, 18.0);
    assert_eq!(acts[1].top[1].total_len, 12.0);
}

#[test]
fn co_presence_view_counts_scene_weights() {
    let mut ex = explorer();
    let v = ex.co_presence_view().unwrap().unwrap();
    assert_eq!(v.top[0].name, "Nora");
    assert_eq!(v.top[0].speeches, 4.0);

    ex.select_play("Hedda_Gabler").unwrap();
    assert!(ex.co_presence_view().unwrap().is_none());
}

#[test]
fn scene_view_builds_clique_and_estimated_turns() {
    let mut ex = explorer();
    let s = ex.scene_view().unwrap().unwrap();
    assert_eq!(s.key, SceneKey::new("1", "1"));
    assert_eq!(s.network.nodes.len(), 3);
    let nh = s.network.edge("Helmer", "Nora").unwrap();
    assert_eq!(nh.count, 7.0);
    assert_eq!(nh.weight, Some(190.0));
    assert_eq!(s.view.stats.mode, AggregationMode::WordCounts);
    assert_eq!(s.view.stats.node("Linde").unwrap().total_len, 30.0);

    assert_eq!(s.turns.source, TurnSource::Estimated);
    assert_eq!(s.turns.len(), 7);
    assert_eq!(s.segments.last().unwrap().end, 190.0);
    assert_eq!(ex.playback().simulation().len(), 6);
}

#[test]
fn recorded_turns_win_for_their_scene() {
    let mut ex = explorer();
    ex.select_scene(SceneKey::new("1", "2")).unwrap();
    let s = ex.scene_view().unwrap().unwrap();
    assert_eq!(s.turns.source, TurnSource::GroundTruth);
    assert_eq!(s.turns.total_words, 40.0);
    assert_eq!(
        s.speaker_totals,
        vec![("Linde".to_string(), 20.0), ("Nora".to_string(), 20.0)]
    );
    assert_eq!(ex.playback().simulation().len(), 2);
}

#[test]
fn selection_is_validated() {
    let mut ex = explorer();
    assert!(ex.select_play("nope").is_err());
    assert!(ex.select_act("9").is_err());
    assert!(ex.select_scene(SceneKey::new("1", "7")).is_err());
    assert_eq!(ex.selected_play().unwrap().key(), "dukkehjem");

    ex.select_act("2").unwrap();
    assert_eq!(ex.selected_scene(), Some(&SceneKey::new("2", "1")));

    ex.select_play("Hedda_Gabler").unwrap();
    assert_eq!(ex.selected_act(), Some("1"));
    assert_eq!(ex.scene_index().unwrap(), vec![SceneKey::new("1", "1")]);
}

#[test]
fn navigation_makes_pending_ticks_stale() {
    let mut ex = explorer();
    let token = ex.play().unwrap();
    let TickOutcome::Continue(next) = ex.tick(token) else {
        panic!("expected the first tick to continue");
    };
    ex.select_scene(SceneKey::new("1", "2")).unwrap();
    assert_eq!(ex.tick(next), TickOutcome::Stale);
    assert_eq!(ex.playback().state(), PlaybackState::Idle);
    assert_eq!(ex.pulse_frame().step_index, 0);
}

#[test]
fn playback_runs_to_completion_and_collects_weights() {
    let mut ex = explorer();
    let mut token = ex.play().unwrap();
    let mut ticks = 0;
    loop {
        ticks += 1;
        match ex.tick(token) {
            TickOutcome::Continue(next) => token = next,
            TickOutcome::Completed => break,
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(ticks, 6);

    let frame = ex.pulse_frame();
    assert_eq!(frame.state, PlaybackState::Complete);
    assert_eq!(frame.step_index, 6);
    let nh = frame
        .weights
        .iter()
        .find(|w| w.pair == PairKey::new("Nora", "Helmer"))
        .unwrap();
    assert_eq!(nh.weight, 4);

    let geometry = ex.pulse_geometry().unwrap().unwrap();
    assert_eq!(geometry.nodes.len(), 3);

    ex.reroll();
    assert_eq!(ex.pulse_frame().seed, 1);
    assert_eq!(ex.pulse_frame().weights.len(), frame.weights.len());

    ex.reset();
    let frame = ex.pulse_frame();
    assert_eq!(frame.state, PlaybackState::Idle);
    assert!(frame.weights.is_empty());
}

#[test]
fn toggle_stops_and_rewinds() {
    let mut ex = explorer();
    let token = ex.toggle().unwrap();
    let _ = ex.tick(token);
    assert!(ex.toggle().is_none());
    assert_eq!(ex.pulse_frame().step_index, 0);
    assert_eq!(ex.tick(token), TickOutcome::Stale);
}

#[test]
fn stats_panel_rolls_up_the_play() {
    let mut ex = explorer();
    let panel = ex.stats_panel().unwrap();
    assert_eq!(panel.bechdel.status, BechdelStatus::Passed);
    assert_eq!(panel.bechdel.female_pair_dialogs, 1);
    assert_eq!(panel.characters[0].character, "Nora");
    assert_eq!(panel.act_matrix.acts, vec!["1", "2"]);
    assert_eq!(panel.pairs.len(), 3);
    assert_eq!(panel.pairs[0].pair, PairKey::new("Nora", "Helmer"));

    ex.sort_pairs_by(PairSortKey::TotalWords);
    let words: Vec<f64> = ex
        .stats_panel()
        .unwrap()
        .pairs
        .iter()
        .map(|p| p.total_words)
        .collect();
    assert_eq!(words, vec![100.0, 50.0, 40.0]);

    ex.sort_pairs_by(PairSortKey::TotalWords);
    assert_eq!(ex.stats_panel().unwrap().pairs[0].total_words, 40.0);
}

#[test]
fn corpus_rollups_skip_wordless_plays() {
    let ex = explorer();
    let plays = ex.plays();
    assert_eq!(plays.len(), 2);
    let hedda = ex.sorted_plays(PlaySortKey::FemaleWords);
    assert_eq!(hedda[0].key, "Hedda_Gabler");
    assert_eq!(hedda[0].female_nodes, 2);

    let stats = ex.corpus_stats();
    assert_eq!(stats.plays, 2);
    assert_eq!(stats.female_words, 420.0);
    assert_eq!(stats.male_words, 180.0);
    assert_eq!(stats.passed, 1);
    assert_eq!(stats.failed, 1);
}

fn two_plays(first: &str) -> Explorer {
    let json = format!(
        r#"{{
            "FEMALE_CHARACTERS": {{ "Anna": true }},
            "plays": [
                {first},
                {{
                    "id": "real",
                    "title": "Real",
                    "speech_network": {{ "nodes": [{{ "id": "Anna" }}, {{ "id": "Per" }}] }},
                    "word_counts": [{{ "character": "Anna", "words": 100 }}]
                }}
            ]
        }}"#
    );
    Explorer::new(Dataset::from_json_str(&json).unwrap(), ExplorerOpts::default()).unwrap()
}

#[test]
fn one_gender_per_name_across_every_view_of_a_play() {
    let mut ex = two_plays(
        r#"{
            "id": "other",
            "title": "Other",
            "speech_network": { "nodes": [{ "id": "Anna", "gender": "M" }] },
            "word_counts": [{ "character": "Anna", "words": 50 }]
        }"#,
    );
    ex.select_play("real").unwrap();
    let net = ex.global_view().unwrap().stats.node("Anna").unwrap().gender;
    let panel = ex.stats_panel().unwrap().characters[0].gender;
    let summary = ex.plays().into_iter().find(|p| p.key == "real").unwrap();
    assert_eq!(net, Gender::Female);
    assert_eq!(panel, net);
    assert_eq!(ex.genders().gender_of("Anna"), net);
    assert_eq!(summary.female_words, 100.0);

    ex.select_play("other").unwrap();
    let net = ex.global_view().unwrap().stats.node("Anna").unwrap().gender;
    let panel = ex.stats_panel().unwrap().characters[0].gender;
    let summary = ex.plays().into_iter().find(|p| p.key == "other").unwrap();
    assert_eq!(net, Gender::Male);
    assert_eq!(panel, net);
    assert_eq!(summary.male_words, 50.0);
}

#[test]
fn wordless_plays_are_never_selected() {
    let mut ex = two_plays(r#"{ "id": "empty", "title": "Empty", "word_counts": [] }"#);
    let listed: Vec<String> = ex.plays().into_iter().map(|p| p.key).collect();
    assert_eq!(listed, vec!["real"]);
    assert_eq!(ex.selected_play().unwrap().key(), "real");

    assert!(ex.select_play("empty").is_err());
    assert_eq!(ex.selected_play().unwrap().key(), "real");
}

#[test]
fn corpus_without_words_has_no_selection() {
    let ds = Dataset::from_json_str(
        r#"{ "plays": [{ "title": "Tomt", "word_counts": [{ "character": "A", "words": 0 }] }] }"#,
    )
    .unwrap();
    let ex = Explorer::new(ds, ExplorerOpts::default()).unwrap();
    assert!(ex.selected_play().is_none());
    assert!(ex.stats_panel().is_err());
}
