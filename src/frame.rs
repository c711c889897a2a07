use bevy::prelude::*;

/// Simulation tick rate. All timing config is written in seconds and
/// converted to frame counts at this rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Duration of one tick in seconds, used by the velocity integration step.
pub const TICK_SECONDS: f32 = 1.0 / TICKS_PER_SECOND as f32;

#[derive(Resource, Default, Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct FrameCount {
    pub frame: u32,
}

impl std::fmt::Display for FrameCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}|{}", self.frame, self.frame % TICKS_PER_SECOND)
    }
}

/// Convert a duration in seconds to a whole number of frames, rounding to
/// the nearest frame.
pub fn secs_to_frames(secs: f32) -> u32 {
    if secs <= 0.0 {
        return 0;
    }
    (secs * TICKS_PER_SECOND as f32).round() as u32
}

/// Runs last in the tick chain.
pub fn increase_frame_system(mut frame: ResMut<FrameCount>) {
    frame.frame = frame.frame.wrapping_add(1);
}
