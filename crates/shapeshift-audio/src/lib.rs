//! Looping sound cues for shapeshift.
//!
//! Growth only needs to start, stop and query a single looping effect per
//! block. Playback itself belongs to the host; [`LoopingCue`] is the
//! in-process stand-in that tracks state and counts transitions.

use tracing::trace;

/// A continuous sound effect that can be started and stopped.
pub trait AudioCue {
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// Looping cue that records its play state.
#[derive(Debug, Clone, Default)]
pub struct LoopingCue {
    name: String,
    playing: bool,
    plays: u32,
    stops: u32,
}

impl LoopingCue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many times playback was started.
    pub const fn plays(&self) -> u32 {
        self.plays
    }

    /// How many times playback was stopped.
    pub const fn stops(&self) -> u32 {
        self.stops
    }
}

impl AudioCue for LoopingCue {
    fn play(&mut self) {
        if !self.playing {
            trace!(cue = %self.name, "cue started");
            self.playing = true;
            self.plays += 1;
        }
    }

    fn stop(&mut self) {
        if self.playing {
            trace!(cue = %self.name, "cue stopped");
            self.playing = false;
            self.stops += 1;
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_stop_transitions() {
        let mut cue = LoopingCue::new("grinding");
        assert!(!cue.is_playing());

        cue.play();
        cue.play();
        assert!(cue.is_playing());
        assert_eq!(cue.plays(), 1);

        cue.stop();
        cue.stop();
        assert!(!cue.is_playing());
        assert_eq!(cue.stops(), 1);
    }
}
