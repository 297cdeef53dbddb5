use std::collections::BTreeMap;

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::foundation::core::{Point, Viewport};

/// Circle radius as a fraction of the viewport's shorter side.
pub const RADIUS_FACTOR: f64 = 0.35;

/// Node positions keyed by id.
pub type Positions = BTreeMap<String, Point>;

/// Place nodes evenly on a circle centered in `viewport`.
///
/// The first node sits at the top and the rest follow clockwise. Placement order is derived from
/// the ids alone, so input order never matters: seed `0` orders ids lexicographically, any other
/// seed orders them by a seeded hash of the id (ties by id). Duplicate ids are placed once.
pub fn circular_layout<'a, I>(ids: I, viewport: Viewport, seed: u64) -> Positions
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&str> = ids.into_iter().collect();
    order.sort_unstable();
    order.dedup();
    if seed != 0 {
        order.sort_by_key(|id| (xxh3_64_with_seed(id.as_bytes(), seed), *id));
    }

    let n = order.len();
    let center = viewport.center();
    let radius = viewport.min_side() * RADIUS_FACTOR;

    order
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            let angle = std::f64::consts::TAU * (i as f64) / (n as f64) - std::f64::consts::FRAC_PI_2;
            let p = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            (id.to_string(), p)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/circular.rs"]
mod tests;
