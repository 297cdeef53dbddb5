use super::*;
use crate::dataset::model::{EdgeDef, FemaleMap, NodeDef, RawGender};

fn edge(s: &str, t: &str, count: f64, a: Option<f64>, b: Option<f64>) -> EdgeDef {
    EdgeDef {
        source: Some(s.into()),
        target: Some(t.into()),
        count: Some(count),
        weight: None,
        avg_len_a: a,
        avg_len_b: b,
    }
}

fn node(id: &str) -> NodeDef {
    NodeDef {
        id: Some(id.into()),
        gender: None,
    }
}

fn doll_house() -> (Network, FemaleMap) {
    let network = Network {
        nodes: vec![node("Nora"), node("Helmer"), node("Anne-Marie")],
        edges: vec![
            edge("Nora", "Helmer", 10.0, Some(12.0), Some(8.0)),
            edge("Helmer", "Rank", 2.0, Some(5.0), None),
        ],
    };
    let map = [("Nora", true), ("Helmer", false), ("Anne-Marie", true)]
        .into_iter()
        .collect();
    (network, map)
}

#[test]
fn estimate_mode_weights_both_sides() {
    let (network, map) = doll_house();
    let stats = aggregate_speech(&network, &map, None);
    assert_eq!(stats.mode, AggregationMode::EdgeEstimate);

    let names: Vec<&str> = stats.nodes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Nora", "Helmer", "Rank", "Anne-Marie"]);

    let nora = stats.node("Nora").unwrap();
    assert_eq!(nora.speeches, 10.0);
    assert_eq!(nora.total_len, 120.0);
    assert_eq!(nora.avg_len, 12.0);

    let helmer = stats.node("Helmer").unwrap();
    assert_eq!(helmer.speeches, 12.0);
    assert_eq!(helmer.total_len, 80.0 + 10.0);

    // missing average length counts one word per turn
    let rank = stats.node("Rank").unwrap();
    assert_eq!(rank.total_len, 2.0);
    assert_eq!(rank.gender, Gender::Unknown);

    let anne = stats.node("Anne-Marie").unwrap();
    assert_eq!(anne.speeches, 0.0);
    assert_eq!(anne.avg_len, 0.0);
    assert_eq!(anne.gender, Gender::Female);
}

#[test]
fn estimate_mode_conserves_edge_volume() {
    let (network, map) = doll_house();
    let stats = aggregate_speech(&network, &map, None);
    let expected: f64 = network
        .edges
        .iter()
        .map(|e| {
            let c = e.count_or_weight();
            c * e.avg_len_a.unwrap_or(1.0) + c * e.avg_len_b.unwrap_or(1.0)
        })
        .sum();
    assert_eq!(stats.total_len(), expected);
}

#[test]
fn word_counts_override_edges() {
    let (network, map) = doll_house();
    let rows = vec![
        WordCount::new("Helmer", 80.0),
        WordCount::new("Nora", 120.0),
        WordCount {
            character: None,
            words: 999.0,
        },
    ];
    let stats = aggregate_speech(&network, &map, Some(&rows));
    assert_eq!(stats.mode, AggregationMode::WordCounts);
    assert_eq!(stats.nodes[0].name, "Nora");
    assert_eq!(stats.nodes[0].speeches, 120.0);
    assert_eq!(stats.nodes[0].total_len, 120.0);
    assert_eq!(stats.nodes[0].avg_len, 1.0);
    assert_eq!(stats.nodes[1].name, "Helmer");
    assert_eq!(stats.nodes[1].total_len, 80.0);
    // edge endpoint without a row is still present, with zero weight
    assert_eq!(stats.node("Rank").unwrap().total_len, 0.0);
    assert_eq!(stats.edges.len(), 2);
    assert!((stats.female_share() - 0.6).abs() < 1e-12);
}

#[test]
fn ties_keep_discovery_order() {
    let network = Network {
        nodes: vec![node("C"), node("A"), node("B")],
        edges: vec![],
    };
    let rows = vec![WordCount::new("B", 5.0), WordCount::new("A", 5.0)];
    let stats = aggregate_speech(&network, &FemaleMap::default(), Some(&rows));
    let names: Vec<&str> = stats.nodes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn aggregation_is_deterministic() {
    let (network, map) = doll_house();
    let a = aggregate_speech(&network, &map, None);
    let b = aggregate_speech(&network, &map, None);
    assert_eq!(a, b);
}

#[test]
fn malformed_edges_are_skipped_and_weight_fallback_applies() {
    let network = Network {
        nodes: vec![NodeDef {
            id: Some("Hedda".into()),
            gender: Some(RawGender::Code("F".into())),
        }],
        edges: vec![
            EdgeDef {
                source: Some("Hedda".into()),
                target: None,
                count: Some(3.0),
                ..EdgeDef::default()
            },
            EdgeDef {
                source: Some("Hedda".into()),
                target: Some("Tesman".into()),
                weight: Some(4.0),
                avg_len_a: Some(2.0),
                avg_len_b: Some(3.0),
                ..EdgeDef::default()
            },
        ],
    };
    let stats = aggregate_speech(&network, &FemaleMap::default(), None);
    assert_eq!(stats.edges.len(), 1);
    assert_eq!(stats.edges[0].count, 4.0);
    assert_eq!(stats.node("Hedda").unwrap().total_len, 8.0);
    assert_eq!(stats.node("Hedda").unwrap().gender, Gender::Female);
    assert_eq!(stats.node("Tesman").unwrap().total_len, 12.0);
    assert_eq!(stats.max_edge_strength(), 4.0);
    assert_eq!(stats.top(1).len(), 1);
    assert_eq!(stats.top(10).len(), 2);
}

#[test]
fn empty_network_is_nothing_to_show() {
    let stats = aggregate_speech(&Network::default(), &FemaleMap::default(), None);
    assert!(stats.is_empty());
    assert_eq!(stats.female_share(), 0.0);
    assert_eq!(stats.max_total_len(), 0.0);
}
