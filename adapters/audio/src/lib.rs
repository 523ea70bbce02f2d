#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Audio boundary that turns celebration cue events into playback calls.

use maze_escape_core::{AudioCue, Event};

/// Master volume level clamped to the unit range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Volume applied before any user adjustment.
    pub const DEFAULT: Self = Self(0.9);

    /// Fully muted volume.
    pub const MUTED: Self = Self(0.0);

    /// Creates a volume level, clamping the input into `[0.0, 1.0]`.
    #[must_use]
    pub fn new(level: f32) -> Self {
        Self(level.clamp(0.0, 1.0))
    }

    /// Returns the level as a fraction in `[0.0, 1.0]`.
    #[must_use]
    pub const fn level(&self) -> f32 {
        self.0
    }

    /// Returns `true` when playback is fully muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.0 == 0.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Playback boundary implemented by platform audio backends.
pub trait AudioService {
    /// Plays the crowd cheer that opens a celebration.
    fn play_cheer(&mut self);

    /// Plays one explosion boom.
    fn play_boom(&mut self);

    /// Applies a new master volume to subsequent playback.
    fn set_master_volume(&mut self, volume: Volume);

    /// Returns the master volume currently applied.
    fn master_volume(&self) -> Volume;
}

/// Audio sink that swallows playback while still tracking volume.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio {
    volume: Volume,
}

impl NullAudio {
    /// Creates a muted-capable sink at the given volume.
    #[must_use]
    pub const fn new(volume: Volume) -> Self {
        Self { volume }
    }
}

impl AudioService for NullAudio {
    fn play_cheer(&mut self) {}

    fn play_boom(&mut self) {}

    fn set_master_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn master_volume(&self) -> Volume {
        self.volume
    }
}

/// Forwards every requested audio cue in `events` to `service`.
pub fn route_cues(service: &mut impl AudioService, events: &[Event]) {
    for event in events {
        if let Event::AudioCueRequested { cue } = event {
            match cue {
                AudioCue::Cheer => service.play_cheer(),
                AudioCue::Boom => service.play_boom(),
            }
        }
    }
}
