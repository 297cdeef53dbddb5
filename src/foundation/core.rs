use std::cmp::Ordering;

use crate::foundation::error::{DramaError, DramaResult};

pub use kurbo::{Point, Vec2};

/// Drawable area a layout is computed for.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in user units.
    pub width: f64,
    /// Height in user units.
    pub height: f64,
}

impl Viewport {
    /// Build a viewport, rejecting non-finite or non-positive sides.
    pub fn new(width: f64, height: f64) -> DramaResult<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(DramaError::validation("Viewport width must be finite and > 0"));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(DramaError::validation("Viewport height must be finite and > 0"));
        }
        Ok(Self { width, height })
    }

    /// Square viewport of side `size`.
    pub fn square(size: f64) -> DramaResult<Self> {
        Self::new(size, size)
    }

    /// Center point.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Shorter side.
    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }

    /// Clamp `p` into `[margin, side - margin]` on both axes.
    ///
    /// An axis shorter than `2 * margin` collapses to its midpoint.
    pub fn clamp(self, p: Point, margin: f64) -> Point {
        fn clamp_axis(v: f64, side: f64, margin: f64) -> f64 {
            let lo = margin;
            let hi = side - margin;
            if lo > hi { side / 2.0 } else { v.clamp(lo, hi) }
        }

        Point::new(
            clamp_axis(p.x, self.width, margin),
            clamp_axis(p.y, self.height, margin),
        )
    }
}

/// Canonical three-state character gender.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub enum Gender {
    /// `F`
    #[serde(rename = "F")]
    Female,
    /// `M`
    #[serde(rename = "M")]
    Male,
    /// `?`
    #[default]
    #[serde(rename = "?")]
    Unknown,
}

impl Gender {
    /// Single-character source code (`F`, `M`, `?`).
    pub fn code(self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male => "M",
            Self::Unknown => "?",
        }
    }

    /// Parse one of the canonical codes; anything else is `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "F" => Some(Self::Female),
            "M" => Some(Self::Male),
            "?" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Map a female flag to a gender (`true` is F, `false` is M).
    pub fn from_female_flag(female: bool) -> Self {
        if female { Self::Female } else { Self::Male }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Unordered pair of character names; `a <= b` always holds.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct PairKey {
    /// Lexicographically smaller name.
    pub a: String,
    /// Lexicographically larger (or equal) name.
    pub b: String,
}

impl PairKey {
    /// Build the key for `x` and `y` in either order.
    pub fn new(x: &str, y: &str) -> Self {
        if x <= y {
            Self {
                a: x.to_string(),
                b: y.to_string(),
            }
        } else {
            Self {
                a: y.to_string(),
                b: x.to_string(),
            }
        }
    }

    /// `"a|b"` label.
    pub fn label(&self) -> String {
        format!("{}|{}", self.a, self.b)
    }

    /// Whether `name` is one of the two ends.
    pub fn contains(&self, name: &str) -> bool {
        self.a == name || self.b == name
    }
}

/// Order act/scene labels numerically when both parse as numbers, lexicographically otherwise.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Human-facing title: underscores become spaces.
pub fn display_title(title: &str) -> String {
    title.replace('_', " ")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
