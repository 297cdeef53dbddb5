use crate::foundation::core::{Gender, Point, Viewport};
use crate::layout::circular::{Positions, circular_layout};
use crate::stats::speech::SpeechStats;

const NODE_RADIUS_MIN: f64 = 4.0;
const NODE_RADIUS_SPAN: f64 = 10.0;
const NODE_RADIUS_FLAT: f64 = 6.0;
const EDGE_WIDTH_MIN: f64 = 0.5;
const EDGE_WIDTH_SPAN: f64 = 3.0;
const EDGE_WIDTH_FLAT: f64 = 1.0;
const LABEL_GAP: f64 = 4.0;

/// Paint-ready node.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NodeGlyph {
    /// Character name.
    pub id: String,
    /// Fill category.
    pub gender: Gender,
    /// Circle center.
    pub center: Point,
    /// Circle radius, scaled by speech volume.
    pub radius: f64,
    /// Label baseline anchor, centered above the circle.
    pub label_anchor: Point,
}

/// Paint-ready edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EdgeGlyph {
    /// Source character.
    pub source: String,
    /// Target character.
    pub target: String,
    /// Segment start.
    pub from: Point,
    /// Segment end.
    pub to: Point,
    /// Stroke width, scaled by interaction strength.
    pub stroke_width: f64,
}

/// Geometry of one network panel.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct GraphGeometry {
    /// Nodes in the stats' volume order.
    pub nodes: Vec<NodeGlyph>,
    /// Edges whose both ends have a position.
    pub edges: Vec<EdgeGlyph>,
}

/// Lay out `stats` on a circle and size glyphs by volume.
pub fn graph_geometry(stats: &SpeechStats, viewport: Viewport, seed: u64) -> GraphGeometry {
    let positions = circular_layout(stats.nodes.iter().map(|c| c.name.as_str()), viewport, seed);
    geometry_with_positions(stats, &positions)
}

/// Size glyphs for `stats` at externally supplied positions (e.g. a running pulse simulation).
pub fn geometry_with_positions(stats: &SpeechStats, positions: &Positions) -> GraphGeometry {
    let max_len = stats.max_total_len();
    let max_strength = stats.max_edge_strength();

    let nodes = stats
        .nodes
        .iter()
        .filter_map(|c| {
            let center = *positions.get(&c.name)?;
            let radius = node_radius(c.total_len, max_len);
            Some(NodeGlyph {
                id: c.name.clone(),
                gender: c.gender,
                center,
                radius,
                label_anchor: Point::new(center.x, center.y - radius - LABEL_GAP),
            })
        })
        .collect();

    let edges = stats
        .edges
        .iter()
        .filter_map(|e| {
            Some(EdgeGlyph {
                source: e.source.clone(),
                target: e.target.clone(),
                from: *positions.get(&e.source)?,
                to: *positions.get(&e.target)?,
                stroke_width: edge_width(e.strength(), max_strength),
            })
        })
        .collect();

    GraphGeometry { nodes, edges }
}

/// `4 + 10 * len / max`, or `6` when nothing has volume.
pub fn node_radius(total_len: f64, max_total_len: f64) -> f64 {
    if max_total_len > 0.0 {
        NODE_RADIUS_MIN + NODE_RADIUS_SPAN * (total_len / max_total_len)
    } else {
        NODE_RADIUS_FLAT
    }
}

/// `0.5 + 3 * w / max`, or `1` when no edge has strength.
pub fn edge_width(strength: f64, max_strength: f64) -> f64 {
    if max_strength > 0.0 {
        EDGE_WIDTH_MIN + EDGE_WIDTH_SPAN * (strength / max_strength)
    } else {
        EDGE_WIDTH_FLAT
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
