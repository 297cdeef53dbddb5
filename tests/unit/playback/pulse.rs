use super::*;

fn pair(from: &str, to: &str) -> TurnPair {
    TurnPair {
        from: from.into(),
        to: to.into(),
    }
}

fn sim(pairs: Vec<TurnPair>) -> PulseSimulation {
    PulseSimulation::new(
        ["Nora", "Helmer", "Rank", "Kristine"],
        pairs,
        Viewport::square(420.0).unwrap(),
        PulseParams::default(),
    )
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn first_step_pulls_pair_together_then_restores() {
    let mut s = sim(vec![pair("Nora", "Helmer")]);
    let a = s.anchors()["Nora"];
    let b = s.anchors()["Helmer"];
    assert!(s.step());

    // mutual pull from pre-step positions, then 4% back toward the anchor
    let pulled_a = a + (b - a) * 0.07;
    let expected_a = pulled_a + (a - pulled_a) * 0.04;
    assert!(close(s.position("Nora").unwrap(), expected_a));
    let pulled_b = b + (a - b) * 0.07;
    let expected_b = pulled_b + (b - pulled_b) * 0.04;
    assert!(close(s.position("Helmer").unwrap(), expected_b));

    // untouched nodes stay on their anchors
    assert_eq!(s.position("Rank"), Some(s.anchors()["Rank"]));
    assert_eq!(s.weight("Helmer", "Nora"), 1);
    assert!(s.is_complete());
    assert!(!s.step());
}

#[test]
fn coordinates_stay_within_margin() {
    let pairs: Vec<TurnPair> = (0..500)
        .map(|i| if i % 2 == 0 { pair("Nora", "Rank") } else { pair("Kristine", "Helmer") })
        .collect();
    let mut s = PulseSimulation::new(
        ["Nora", "Helmer", "Rank", "Kristine"],
        pairs,
        Viewport::square(40.0).unwrap(),
        PulseParams {
            pull: 1.0,
            restore: 0.0,
            margin: 8.0,
        },
    );
    while s.step() {
        for p in s.positions().values() {
            assert!((8.0..=32.0).contains(&p.x), "x out of range: {p:?}");
            assert!((8.0..=32.0).contains(&p.y), "y out of range: {p:?}");
        }
    }
    assert_eq!(s.step_index(), 500);
    assert_eq!(s.weight("Nora", "Rank"), 250);
}

#[test]
fn unknown_speakers_are_a_no_op_but_still_counted() {
    let mut s = sim(vec![pair("Nora", "Ghost")]);
    let before = s.positions().clone();
    assert!(s.step());
    assert_eq!(s.positions(), &before);
    assert_eq!(s.weight("Nora", "Ghost"), 1);
}

#[test]
fn restart_reset_and_reroll() {
    let mut s = sim(vec![pair("Nora", "Helmer"), pair("Helmer", "Rank")]);
    while s.step() {}
    let moved = s.positions().clone();

    s.restart();
    assert_eq!(s.step_index(), 0);
    assert_eq!(s.positions(), &moved);
    assert_eq!(s.weight("Nora", "Helmer"), 1);

    let anchors_before = s.anchors().clone();
    s.reroll();
    assert_eq!(s.seed(), 1);
    assert_eq!(s.weight("Nora", "Helmer"), 1);
    assert_eq!(s.positions(), &moved);
    assert_eq!(s.anchors().len(), anchors_before.len());

    s.reset();
    assert_eq!(s.positions(), s.anchors());
    assert!(s.weights().is_empty());
    assert_eq!(s.next_pair(), Some(&pair("Nora", "Helmer")));
}

#[test]
fn empty_simulation_is_complete_immediately() {
    let mut s = PulseSimulation::empty(Viewport::square(100.0).unwrap(), PulseParams::default());
    assert!(s.is_empty());
    assert!(s.is_complete());
    assert!(!s.step());
}
