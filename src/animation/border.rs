//! The rotating border animation: one spinning track plus two arcs that grow
//! once and then breathe forever.

use std::time::Duration;

use super::track::{Repeat, Track, TrackSpec, TrackStep};
use super::TimingFunction;

/// Sweep reached by the solid arc at the end of its growth stage.
pub const SOLID_TRACK_MAX_ANGLE: f32 = 216.0;
/// Shortest sweep of the solid arc while breathing.
pub const SOLID_TRACK_MIN_ANGLE: f32 = 36.0;
/// Sweep reached by the dotted arc at the end of its growth stage.
pub const DOTTED_TRACK_MAX_ANGLE: f32 = 360.0;
/// Shortest sweep of the dotted arc while breathing.
pub const DOTTED_TRACK_MIN_ANGLE: f32 = 108.0;

/// Snapshot of the animated angles, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    /// Spin applied to the whole arc pair, in `[0, 360)`
    pub rotation: f32,
    /// Sweep of the solid gradient arc
    pub solid_sweep: f32,
    /// Sweep of the dashed arc
    pub dotted_sweep: f32,
}

/// Stage of a two-stage arc track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// One-shot growth from zero
    Growth,
    /// Endless ping-pong after growth completed
    Breathing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcState {
    Stopped,
    Running(Phase),
}

/// A growth track chained into a breathing track.
///
/// The chain only moves forward: growth hands over to breathing when it
/// completes on its own, and an early stop ends the whole chain.
#[derive(Debug, Clone)]
pub struct ArcTrack {
    state: ArcState,
    growth: Track,
    breathing: Track,
    value: f32,
}

impl ArcTrack {
    fn new(growth: TrackSpec, breathing: TrackSpec) -> Self {
        Self {
            state: ArcState::Stopped,
            value: growth.from,
            growth: Track::new(growth),
            breathing: Track::new(breathing),
        }
    }

    pub fn state(&self) -> ArcState {
        self.state
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    fn start(&mut self) {
        self.growth.start();
        self.value = self.growth.value();
        self.state = ArcState::Running(Phase::Growth);
    }

    fn advance(&mut self, delta: Duration) -> bool {
        match self.state {
            ArcState::Stopped => false,
            ArcState::Running(Phase::Growth) => match self.growth.advance(delta) {
                TrackStep::Idle => false,
                TrackStep::Ticked(value) => self.update(value),
                TrackStep::Finished { value, overflow } => {
                    log::trace!("arc growth finished at {value}, breathing");
                    self.state = ArcState::Running(Phase::Breathing);
                    self.breathing.start();
                    let changed = self.update(value);
                    if overflow.is_zero() {
                        changed
                    } else {
                        let advanced = self.advance(overflow);
                        advanced || changed
                    }
                }
            },
            ArcState::Running(Phase::Breathing) => match self.breathing.advance(delta) {
                TrackStep::Ticked(value) | TrackStep::Finished { value, .. } => self.update(value),
                TrackStep::Idle => false,
            },
        }
    }

    fn update(&mut self, value: f32) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }

    fn stop(&mut self) -> bool {
        let track = match self.state {
            ArcState::Stopped => return false,
            ArcState::Running(Phase::Growth) => &mut self.growth,
            ArcState::Running(Phase::Breathing) => &mut self.breathing,
        };
        track.end();
        self.value = track.value();
        self.state = ArcState::Stopped;
        true
    }
}

/// Durations and easing used to build the border tracks.
#[derive(Debug, Clone)]
pub struct BorderTimings {
    pub rotate_duration: Duration,
    pub track_duration: Duration,
    /// Easing of the solid arc; the spin and the dotted arc are always linear
    pub solid_easing: TimingFunction,
}

impl Default for BorderTimings {
    fn default() -> Self {
        Self {
            rotate_duration: Duration::from_millis(1200),
            track_duration: Duration::from_millis(2000),
            solid_easing: TimingFunction::AccelerateDecelerate,
        }
    }
}

/// Drives the four angle tracks of the rotating border.
///
/// All tracks share one start and one stop but advance independently; every
/// call to [`advance`](Self::advance) steps each running track by the same
/// delta and reports whether any angle changed.
#[derive(Debug, Clone)]
pub struct BorderAnimation {
    timings: BorderTimings,
    rotation: Track,
    solid: ArcTrack,
    dotted: ArcTrack,
    running: bool,
}

impl BorderAnimation {
    pub fn new(timings: BorderTimings) -> Self {
        let (rotation, solid, dotted) = build_tracks(&timings);
        Self {
            timings,
            rotation,
            solid,
            dotted,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn timings(&self) -> &BorderTimings {
        &self.timings
    }

    pub fn solid_state(&self) -> ArcState {
        self.solid.state()
    }

    pub fn dotted_state(&self) -> ArcState {
        self.dotted.state()
    }

    /// Start all tracks from zero. Returns `false` without touching anything
    /// if the animation is already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        let (rotation, solid, dotted) = build_tracks(&self.timings);
        self.rotation = rotation;
        self.solid = solid;
        self.dotted = dotted;

        self.rotation.start();
        self.solid.start();
        self.dotted.start();
        self.running = true;
        log::debug!("border animation started ({:?})", self.timings);
        true
    }

    /// End all tracks immediately, snapping each to the end of its current
    /// stage. Returns `false` if nothing was running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.rotation.end();
        self.solid.stop();
        self.dotted.stop();
        self.running = false;
        log::debug!("border animation stopped at {:?}", self.state());
        true
    }

    /// Step every running track by `delta`. Returns whether any angle changed.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }
        let rotated = match self.rotation.advance(delta) {
            TrackStep::Idle => false,
            TrackStep::Ticked(_) | TrackStep::Finished { .. } => true,
        };
        let solid = self.solid.advance(delta);
        let dotted = self.dotted.advance(delta);
        rotated || solid || dotted
    }

    pub fn state(&self) -> AnimationState {
        AnimationState {
            rotation: self.rotation.value(),
            solid_sweep: self.solid.value(),
            dotted_sweep: self.dotted.value(),
        }
    }

    /// Takes effect on the running spin immediately.
    pub fn set_rotate_duration(&mut self, duration: Duration) {
        self.timings.rotate_duration = duration;
        self.rotation.set_duration(duration);
    }

    /// Takes effect on the growth stages immediately; breathing stages pick
    /// it up on the next start.
    pub fn set_track_duration(&mut self, duration: Duration) {
        self.timings.track_duration = duration;
        self.solid.growth.set_duration(duration);
        self.dotted.growth.set_duration(duration);
    }

    /// Used from the next start.
    pub fn set_solid_easing(&mut self, easing: TimingFunction) {
        self.timings.solid_easing = easing;
    }
}

impl Default for BorderAnimation {
    fn default() -> Self {
        Self::new(BorderTimings::default())
    }
}

fn build_tracks(timings: &BorderTimings) -> (Track, ArcTrack, ArcTrack) {
    let rotation = Track::new(
        TrackSpec::new(0.0, 360.0, timings.rotate_duration)
            .timing(TimingFunction::Linear)
            .repeat(Repeat::Restart),
    );

    let solid = ArcTrack::new(
        TrackSpec::new(0.0, SOLID_TRACK_MAX_ANGLE, timings.track_duration)
            .timing(timings.solid_easing),
        TrackSpec::new(
            SOLID_TRACK_MAX_ANGLE,
            SOLID_TRACK_MIN_ANGLE,
            timings.track_duration,
        )
        .timing(timings.solid_easing)
        .repeat(Repeat::Reverse),
    );

    let dotted = ArcTrack::new(
        TrackSpec::new(0.0, DOTTED_TRACK_MAX_ANGLE, timings.track_duration)
            .timing(TimingFunction::Linear),
        TrackSpec::new(
            DOTTED_TRACK_MAX_ANGLE,
            DOTTED_TRACK_MIN_ANGLE,
            timings.track_duration,
        )
        .timing(TimingFunction::Linear)
        .repeat(Repeat::Reverse),
    );

    (rotation, solid, dotted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-2
    }

    fn linear_timings() -> BorderTimings {
        BorderTimings {
            solid_easing: TimingFunction::Linear,
            ..BorderTimings::default()
        }
    }

    #[test]
    fn test_idle_until_started() {
        let mut animation = BorderAnimation::default();
        assert!(!animation.advance(ms(16)));
        assert_eq!(animation.state(), AnimationState::default());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut animation = BorderAnimation::new(linear_timings());
        assert!(animation.start());
        animation.advance(ms(600));
        let before = animation.state();

        assert!(!animation.start());
        assert_eq!(animation.state(), before);

        animation.advance(ms(100));
        // One set of tracks: a single step of 100ms on the spin.
        assert!(approx_eq(animation.state().rotation, 210.0));
    }

    #[test]
    fn test_rotation_is_linear_and_wraps() {
        let mut animation = BorderAnimation::default();
        animation.start();
        animation.advance(ms(300));
        assert!(approx_eq(animation.state().rotation, 90.0));
        animation.advance(ms(1200));
        assert!(approx_eq(animation.state().rotation, 90.0));
        assert!(animation.state().rotation < 360.0);
    }

    #[test]
    fn test_dotted_growth_is_linear() {
        let mut animation = BorderAnimation::default();
        animation.start();
        animation.advance(ms(500));
        assert!(approx_eq(animation.state().dotted_sweep, 90.0));
    }

    #[test]
    fn test_solid_growth_eases_by_default() {
        let mut animation = BorderAnimation::default();
        animation.start();
        animation.advance(ms(500));
        assert!(animation.state().solid_sweep < 54.0);
    }

    #[test]
    fn test_growth_hands_over_to_breathing() {
        let mut animation = BorderAnimation::new(linear_timings());
        animation.start();
        assert_eq!(animation.solid_state(), ArcState::Running(Phase::Growth));

        animation.advance(ms(2000));
        assert_eq!(animation.solid_state(), ArcState::Running(Phase::Breathing));
        assert_eq!(animation.dotted_state(), ArcState::Running(Phase::Breathing));
        assert!(approx_eq(animation.state().solid_sweep, 216.0));
        assert!(approx_eq(animation.state().dotted_sweep, 360.0));

        animation.advance(ms(500));
        assert!(approx_eq(animation.state().solid_sweep, 216.0 - 180.0 * 0.25));
        assert!(approx_eq(animation.state().dotted_sweep, 360.0 - 252.0 * 0.25));
    }

    #[test]
    fn test_overflow_carries_into_breathing() {
        let mut animation = BorderAnimation::new(linear_timings());
        animation.start();
        assert!(animation.advance(ms(2500)));
        assert_eq!(animation.solid_state(), ArcState::Running(Phase::Breathing));
        assert!(approx_eq(animation.state().solid_sweep, 171.0));
        assert!(approx_eq(animation.state().dotted_sweep, 297.0));
    }

    #[test]
    fn test_breathing_stays_in_range() {
        let mut animation = BorderAnimation::default();
        animation.start();
        animation.advance(ms(2000));
        for _ in 0..500 {
            animation.advance(ms(17));
            let state = animation.state();
            assert!((SOLID_TRACK_MIN_ANGLE - 1e-3..=SOLID_TRACK_MAX_ANGLE + 1e-3)
                .contains(&state.solid_sweep));
            assert!((DOTTED_TRACK_MIN_ANGLE - 1e-3..=DOTTED_TRACK_MAX_ANGLE + 1e-3)
                .contains(&state.dotted_sweep));
            assert!((0.0..360.0).contains(&state.rotation));
        }
        assert_eq!(animation.solid_state(), ArcState::Running(Phase::Breathing));
    }

    #[test]
    fn test_stop_during_growth_does_not_chain() {
        let mut animation = BorderAnimation::new(linear_timings());
        animation.start();
        animation.advance(ms(700));
        assert!(animation.stop());

        let state = animation.state();
        assert_eq!(state.rotation, 0.0);
        assert_eq!(state.solid_sweep, SOLID_TRACK_MAX_ANGLE);
        assert_eq!(state.dotted_sweep, DOTTED_TRACK_MAX_ANGLE);
        assert_eq!(animation.solid_state(), ArcState::Stopped);

        // Stopped tracks stay put.
        assert!(!animation.advance(ms(5000)));
        assert_eq!(animation.state(), state);
    }

    #[test]
    fn test_stop_during_breathing_snaps_to_breathing_end() {
        let mut animation = BorderAnimation::new(linear_timings());
        animation.start();
        animation.advance(ms(2000));
        animation.advance(ms(700));
        animation.stop();
        let state = animation.state();
        assert_eq!(state.solid_sweep, SOLID_TRACK_MIN_ANGLE);
        assert_eq!(state.dotted_sweep, DOTTED_TRACK_MIN_ANGLE);
        assert!(!animation.stop());
    }

    #[test]
    fn test_restart_resets_angles() {
        let mut animation = BorderAnimation::new(linear_timings());
        animation.start();
        animation.advance(ms(2500));
        animation.stop();
        animation.start();
        assert_eq!(animation.state(), AnimationState::default());
        assert_eq!(animation.solid_state(), ArcState::Running(Phase::Growth));
    }

    #[test]
    fn test_duration_changes_apply_live() {
        let mut animation = BorderAnimation::new(linear_timings());
        animation.start();
        animation.advance(ms(300));
        animation.set_rotate_duration(ms(600));
        animation.set_track_duration(ms(1000));
        animation.advance(ms(0));
        let state = animation.state();
        assert!(approx_eq(state.rotation, 180.0));
        assert!(approx_eq(state.dotted_sweep, 108.0));
        assert!(animation.is_running());
    }
}
