use super::*;
use crate::config::ExplorerOpts;
use crate::dataset::model::Dataset;
use crate::scene::select::SceneKey;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "dramanet_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn explorer() -> Explorer {
    let ds = Dataset::from_json_str(include_str!("../data/mini_corpus.json")).unwrap();
    Explorer::new(ds, ExplorerOpts::default()).unwrap()
}

#[test]
fn play_views_land_as_json_files() {
    let tmp = temp_dir("play_views");
    let mut ex = explorer();
    ex.select_scene(SceneKey::new("1", "2")).unwrap();

    let files = write_play_views(&mut ex, &tmp).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["global.json", "acts.json", "co_presence.json", "stats.json", "scenes.json", "index.json"]
    );

    let scenes: serde_json::Value =
        serde_json::from_slice(&std::fs::read(tmp.join("scenes.json")).unwrap()).unwrap();
    assert_eq!(scenes.as_array().unwrap().len(), 3);

    let index: serde_json::Value =
        serde_json::from_slice(&std::fs::read(tmp.join("index.json")).unwrap()).unwrap();
    assert_eq!(index["key"], "dukkehjem");
    assert_eq!(index["files"].as_array().unwrap().len(), 5);

    assert_eq!(ex.selected_scene(), Some(&SceneKey::new("1", "2")));
    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn export_leaves_an_empty_scene_selection_alone() {
    let tmp = temp_dir("no_scene");
    let ds = Dataset::from_json_str(
        r#"{
            "plays": [{
                "id": "p",
                "title": "P",
                "acts": [ { "act_n": 1 }, { "act_n": 2 } ],
                "word_counts": [ { "character": "A", "words": 10 } ],
                "dialogs": [
                    { "speakers": ["A", "B"], "act": "2", "scene": "1", "length": 2, "total_words": 10 },
                    { "speakers": ["A", "B"], "act": "2", "scene": "2", "length": 2, "total_words": 10 }
                ]
            }]
        }"#,
    )
    .unwrap();
    let mut ex = Explorer::new(ds, ExplorerOpts::default()).unwrap();
    assert_eq!(ex.selected_act(), Some("1"));
    assert_eq!(ex.selected_scene(), None);

    write_play_views(&mut ex, &tmp).unwrap();
    let scenes: serde_json::Value =
        serde_json::from_slice(&std::fs::read(tmp.join("scenes.json")).unwrap()).unwrap();
    assert_eq!(scenes.as_array().unwrap().len(), 2);
    assert_eq!(ex.selected_act(), Some("1"));
    assert_eq!(ex.selected_scene(), None);
    assert_eq!(ex.pulse_frame().steps, 0);
    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn corpus_export_is_sorted() {
    let tmp = temp_dir("corpus");
    let path = tmp.join("nested").join("corpus.json");
    let ex = explorer();
    write_corpus(&ex, PlaySortKey::Bechdel, &path).unwrap();

    let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(v["sort"], "Bechdel");
    assert_eq!(v["plays"][0]["key"], "dukkehjem");
    assert_eq!(v["plays"][0]["bechdel_status"], "bestått");
    assert_eq!(v["corpus"]["plays"], 2);
    let _ = std::fs::remove_dir_all(&tmp);
}
