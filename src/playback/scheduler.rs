use std::time::Duration;

use crate::config::PlaybackOpts;
use crate::playback::pulse::PulseSimulation;

/// Playback state; indices point at the next step to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackState {
    /// Not started (or stopped), at step 0.
    Idle,
    /// Advancing; a tick is expected.
    Playing(usize),
    /// Held at a step; no tick is expected.
    Paused(usize),
    /// Every step applied.
    Complete,
}

/// Permission for one scheduled tick, bound to the generation it was issued in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

impl TickToken {
    /// Generation the token belongs to.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of delivering a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token predates the last cancellation; nothing happened.
    Stale,
    /// Playback is not running; nothing happened.
    NotPlaying,
    /// One step applied; schedule the returned token after the tick interval.
    Continue(TickToken),
    /// The last step was applied; playback stopped.
    Completed,
}

/// Drives a [`PulseSimulation`] one tick at a time for a host timer.
///
/// The host schedules a callback for every token it receives and hands the token back in
/// [`Playback::tick`]. Every cancellation (stop, pause, new scene) bumps the generation, so a
/// callback that fires late is recognized as stale and ignored.
#[derive(Clone, Debug)]
pub struct Playback {
    state: PlaybackState,
    generation: u64,
    sim: PulseSimulation,
    opts: PlaybackOpts,
}

impl Playback {
    /// Idle playback over `sim`.
    pub fn new(sim: PulseSimulation, opts: PlaybackOpts) -> Self {
        Self {
            state: PlaybackState::Idle,
            generation: 0,
            sim,
            opts,
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick is expected.
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing(_))
    }

    /// Delay the host should wait between ticks.
    pub fn tick_interval(&self) -> Duration {
        self.opts.tick_interval()
    }

    /// The driven simulation.
    pub fn simulation(&self) -> &PulseSimulation {
        &self.sim
    }

    /// Start or resume. Returns the token to schedule, or `None` when already playing or when
    /// there is nothing to play.
    pub fn play(&mut self) -> Option<TickToken> {
        let index = match self.state {
            PlaybackState::Playing(_) => return None,
            PlaybackState::Idle => 0,
            PlaybackState::Paused(i) => i,
            PlaybackState::Complete => {
                self.sim.restart();
                0
            }
        };
        if self.sim.is_complete() {
            self.state = PlaybackState::Complete;
            return None;
        }
        self.state = PlaybackState::Playing(index);
        Some(self.token())
    }

    /// Hold at the current step, cancelling the pending tick.
    pub fn pause(&mut self) {
        if let PlaybackState::Playing(i) = self.state {
            self.cancel();
            self.state = PlaybackState::Paused(i);
        }
    }

    /// Stop: cancel the pending tick and rewind to step 0.
    pub fn stop(&mut self) {
        self.cancel();
        self.sim.restart();
        self.state = PlaybackState::Idle;
    }

    /// Play when not playing, stop when playing.
    pub fn toggle(&mut self) -> Option<TickToken> {
        if self.is_playing() {
            self.stop();
            None
        } else {
            self.play()
        }
    }

    /// Stop and restore positions to anchors, clearing weights.
    pub fn reset(&mut self) {
        self.stop();
        self.sim.reset();
    }

    /// Reseed the anchor layout; state and weights are untouched.
    pub fn reroll(&mut self) {
        self.sim.reroll();
    }

    /// Swap in the simulation of a newly selected scene, cancelling everything pending.
    pub fn replace(&mut self, sim: PulseSimulation) {
        self.cancel();
        self.sim = sim;
        self.state = PlaybackState::Idle;
    }

    /// Deliver a scheduled tick.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if token.generation != self.generation {
            tracing::debug!(
                token = token.generation,
                current = self.generation,
                "stale playback tick ignored"
            );
            return TickOutcome::Stale;
        }
        if !self.is_playing() {
            return TickOutcome::NotPlaying;
        }

        self.sim.step();
        if self.sim.is_complete() {
            self.state = PlaybackState::Complete;
            tracing::debug!(steps = self.sim.len(), "playback complete");
            TickOutcome::Completed
        } else {
            self.state = PlaybackState::Playing(self.sim.step_index());
            TickOutcome::Continue(self.token())
        }
    }

    fn token(&self) -> TickToken {
        TickToken {
            generation: self.generation,
        }
    }

    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
