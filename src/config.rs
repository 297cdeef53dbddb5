use std::io::Read;
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::Viewport;
use crate::foundation::error::{DramaError, DramaResult};

/// Relaxation constants of the pulse simulation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PulseParams {
    /// Fraction of the gap two consecutive speakers close per step.
    pub pull: f64,
    /// Fraction of the distance to its anchor every node recovers per step.
    pub restore: f64,
    /// Minimum distance to the viewport edge.
    pub margin: f64,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            pull: 0.07,
            restore: 0.04,
            margin: 8.0,
        }
    }
}

/// Timing handed to the host scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackOpts {
    /// Delay between two playback ticks, in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for PlaybackOpts {
    fn default() -> Self {
        Self {
            tick_interval_ms: 700,
        }
    }
}

impl PlaybackOpts {
    /// Tick interval as a duration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Options for an [`crate::Explorer`] session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExplorerOpts {
    /// Viewport of the play-wide network.
    pub global_viewport: Viewport,
    /// Viewport of each act network.
    pub act_viewport: Viewport,
    /// Viewport of the scene network and its pulse playback.
    pub scene_viewport: Viewport,
    /// Pulse relaxation constants.
    pub pulse: PulseParams,
    /// Playback timing.
    pub playback: PlaybackOpts,
    /// Rows kept in top-N character tables.
    pub top_n: usize,
}

impl Default for ExplorerOpts {
    fn default() -> Self {
        Self {
            global_viewport: Viewport {
                width: 520.0,
                height: 520.0,
            },
            act_viewport: Viewport {
                width: 380.0,
                height: 380.0,
            },
            scene_viewport: Viewport {
                width: 420.0,
                height: 420.0,
            },
            pulse: PulseParams::default(),
            playback: PlaybackOpts::default(),
            top_n: 10,
        }
    }
}

impl ExplorerOpts {
    /// Parse option overrides from a JSON reader; omitted fields keep their defaults.
    pub fn from_reader<R: Read>(r: R) -> DramaResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| DramaError::parse(format!("parse explorer options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read option overrides from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> DramaResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            DramaError::load(format!("open explorer options '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Reject degenerate viewports and out-of-range relaxation constants.
    pub fn validate(&self) -> DramaResult<()> {
        for vp in [self.global_viewport, self.act_viewport, self.scene_viewport] {
            Viewport::new(vp.width, vp.height)?;
        }
        for (name, v) in [("pull", self.pulse.pull), ("restore", self.pulse.restore)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(DramaError::validation(format!(
                    "pulse.{name} must be within [0, 1]"
                )));
            }
        }
        if !(self.pulse.margin.is_finite() && self.pulse.margin >= 0.0) {
            return Err(DramaError::validation("pulse.margin must be finite and >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
