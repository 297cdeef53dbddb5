use super::*;
use crate::dataset::model::{EdgeDef, FemaleMap, Network, NodeDef, WordCount};
use crate::stats::speech::aggregate_speech;

fn stats() -> SpeechStats {
    let network = Network {
        nodes: vec![
            NodeDef {
                id: Some("Nora".into()),
                gender: None,
            },
            NodeDef {
                id: Some("Helmer".into()),
                gender: None,
            },
        ],
        edges: vec![
            EdgeDef {
                source: Some("Nora".into()),
                target: Some("Helmer".into()),
                count: Some(6.0),
                ..EdgeDef::default()
            },
            EdgeDef {
                source: Some("Nora".into()),
                target: Some("Rank".into()),
                count: Some(3.0),
                ..EdgeDef::default()
            },
        ],
    };
    let rows = vec![WordCount::new("Nora", 120.0), WordCount::new("Helmer", 60.0)];
    aggregate_speech(&network, &FemaleMap::default(), Some(&rows))
}

#[test]
fn glyphs_scale_with_volume_and_strength() {
    let vp = Viewport::square(420.0).unwrap();
    let g = graph_geometry(&stats(), vp, 0);
    assert_eq!(g.nodes.len(), 3);
    assert_eq!(g.nodes[0].id, "Nora");
    assert_eq!(g.nodes[0].radius, 14.0);
    assert_eq!(g.nodes[1].radius, 9.0);
    assert_eq!(g.nodes[2].radius, 4.0);
    assert_eq!(
        g.nodes[0].label_anchor,
        Point::new(g.nodes[0].center.x, g.nodes[0].center.y - 18.0)
    );

    assert_eq!(g.edges.len(), 2);
    assert_eq!(g.edges[0].stroke_width, 3.5);
    assert_eq!(g.edges[1].stroke_width, 2.0);
}

#[test]
fn edges_without_positions_are_dropped() {
    let mut positions = Positions::new();
    positions.insert("Nora".into(), Point::new(10.0, 10.0));
    positions.insert("Helmer".into(), Point::new(20.0, 20.0));
    let g = geometry_with_positions(&stats(), &positions);
    assert_eq!(g.nodes.len(), 2);
    assert_eq!(g.edges.len(), 1);
    assert_eq!(g.edges[0].from, Point::new(10.0, 10.0));
}

#[test]
fn flat_scales_when_nothing_has_volume() {
    assert_eq!(node_radius(0.0, 0.0), 6.0);
    assert_eq!(edge_width(0.0, 0.0), 1.0);
}
