use super::*;

#[test]
fn viewport_rejects_degenerate_sides() {
    assert!(Viewport::new(0.0, 10.0).is_err());
    assert!(Viewport::new(10.0, f64::NAN).is_err());
    assert!(Viewport::square(-1.0).is_err());
    let v = Viewport::new(200.0, 100.0).unwrap();
    assert_eq!(v.center(), Point::new(100.0, 50.0));
    assert_eq!(v.min_side(), 100.0);
}

#[test]
fn viewport_clamp_keeps_margin() {
    let v = Viewport::square(100.0).unwrap();
    assert_eq!(v.clamp(Point::new(-5.0, 500.0), 8.0), Point::new(8.0, 92.0));
    assert_eq!(v.clamp(Point::new(40.0, 60.0), 8.0), Point::new(40.0, 60.0));

    let tiny = Viewport::square(10.0).unwrap();
    assert_eq!(tiny.clamp(Point::new(0.0, 9.0), 8.0), Point::new(5.0, 5.0));
}

#[test]
fn gender_codes_round_trip() {
    for g in [Gender::Female, Gender::Male, Gender::Unknown] {
        assert_eq!(Gender::from_code(g.code()), Some(g));
    }
    assert_eq!(Gender::from_code("f"), None);
    assert_eq!(
        serde_json::to_string(&Gender::Female).unwrap(),
        "\"F\"".to_string()
    );
}

#[test]
fn pair_key_is_unordered() {
    let k1 = PairKey::new("Nora", "Helmer");
    let k2 = PairKey::new("Helmer", "Nora");
    assert_eq!(k1, k2);
    assert_eq!(k1.label(), "Helmer|Nora");
    assert!(k1.contains("Nora"));
    assert!(!k1.contains("Rank"));
}

#[test]
fn labels_sort_numerically_first() {
    let mut acts = vec!["10", "2", "epilog", "1"];
    acts.sort_by(|a, b| compare_labels(a, b));
    assert_eq!(acts, vec!["1", "2", "10", "epilog"]);
}

#[test]
fn display_title_replaces_underscores() {
    assert_eq!(display_title("Et_dukkehjem"), "Et dukkehjem");
}
