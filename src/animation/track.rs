//! A single time-driven numeric track.
//!
//! Tracks never own a clock. The caller feeds elapsed time through
//! [`Track::advance`] and reads the value back; [`TrackSpec::sample`] is the
//! pure mapping from elapsed time to value underneath it.

use std::time::Duration;

use super::TimingFunction;

/// What happens when a track reaches the end of its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Play once and finish on `to`
    Once,
    /// Jump back to `from` and play again, forever
    Restart,
    /// Alternate `from -> to` and `to -> from`, forever
    Reverse,
}

/// Immutable description of a track.
#[derive(Debug, Clone)]
pub struct TrackSpec {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub timing: TimingFunction,
    pub repeat: Repeat,
}

impl TrackSpec {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            timing: TimingFunction::default(),
            repeat: Repeat::Once,
        }
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Value at `elapsed` time since the start, and whether a one-shot track
    /// has reached its end.
    pub fn sample(&self, elapsed: Duration) -> (f32, bool) {
        if self.duration.is_zero() {
            return (self.end_value(), self.repeat == Repeat::Once);
        }

        let period = self.duration.as_secs_f64();
        let cycles = elapsed.as_secs_f64() / period;

        let (fraction, finished) = match self.repeat {
            Repeat::Once => (cycles.min(1.0), cycles >= 1.0),
            Repeat::Restart => (cycles.fract(), false),
            Repeat::Reverse => {
                let fraction = cycles.fract();
                if (cycles.floor() as u64) % 2 == 1 {
                    (1.0 - fraction, false)
                } else {
                    (fraction, false)
                }
            }
        };

        let eased = self.timing.evaluate(fraction as f32);
        (self.from + (self.to - self.from) * eased, finished)
    }

    /// Value a track snaps to when it is ended early.
    ///
    /// Restarting tracks wrap, so their end coincides with `from`.
    pub fn end_value(&self) -> f32 {
        match self.repeat {
            Repeat::Restart => self.from,
            Repeat::Once | Repeat::Reverse => self.to,
        }
    }

    /// Length after which the value sequence repeats exactly.
    fn cycle(&self) -> Option<Duration> {
        match self.repeat {
            Repeat::Once => None,
            Repeat::Restart => Some(self.duration),
            Repeat::Reverse => Some(self.duration * 2),
        }
    }
}

/// Liveness of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Stopped,
    Running { elapsed: Duration },
}

/// Outcome of advancing a track by one time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackStep {
    /// The track is not running
    Idle,
    /// The track produced a new value and keeps running
    Ticked(f32),
    /// A one-shot track reached its end; `overflow` is the part of the step
    /// that fell past the end
    Finished { value: f32, overflow: Duration },
}

#[derive(Debug, Clone)]
pub struct Track {
    spec: TrackSpec,
    state: TrackState,
    value: f32,
}

impl Track {
    pub fn new(spec: TrackSpec) -> Self {
        let value = spec.from;
        Self {
            spec,
            state: TrackState::Stopped,
            value,
        }
    }

    pub fn spec(&self) -> &TrackSpec {
        &self.spec
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TrackState::Running { .. })
    }

    /// Start from the beginning. Restarting a running track rewinds it.
    pub fn start(&mut self) {
        self.state = TrackState::Running {
            elapsed: Duration::ZERO,
        };
        self.value = self.spec.from;
    }

    /// Change the duration without rewinding. The value catches up on the
    /// next step.
    pub fn set_duration(&mut self, duration: Duration) {
        self.spec.duration = duration;
    }

    pub fn advance(&mut self, delta: Duration) -> TrackStep {
        let TrackState::Running { elapsed } = self.state else {
            return TrackStep::Idle;
        };

        let mut elapsed = elapsed + delta;
        if let Some(cycle) = self.spec.cycle().filter(|c| !c.is_zero()) {
            elapsed = wrap(elapsed, cycle);
        }

        let (value, finished) = self.spec.sample(elapsed);
        self.value = value;

        if finished {
            self.state = TrackState::Stopped;
            TrackStep::Finished {
                value,
                overflow: elapsed.saturating_sub(self.spec.duration),
            }
        } else {
            self.state = TrackState::Running { elapsed };
            TrackStep::Ticked(value)
        }
    }

    /// End immediately, snapping to the end value. Returns whether the track
    /// was running.
    pub fn end(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = TrackState::Stopped;
        self.value = self.spec.end_value();
        true
    }
}

fn wrap(elapsed: Duration, cycle: Duration) -> Duration {
    let nanos = elapsed.as_nanos() % cycle.as_nanos();
    Duration::from_nanos(nanos as u64)
}
