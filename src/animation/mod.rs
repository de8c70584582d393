mod border;
mod timing;
mod track;

pub use border::{
    AnimationState, ArcState, ArcTrack, BorderAnimation, BorderTimings, Phase,
    DOTTED_TRACK_MAX_ANGLE, DOTTED_TRACK_MIN_ANGLE, SOLID_TRACK_MAX_ANGLE, SOLID_TRACK_MIN_ANGLE,
};
pub use timing::TimingFunction;
pub use track::{Repeat, Track, TrackSpec, TrackState, TrackStep};
