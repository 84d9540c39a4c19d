//! Pitch tracking boundary.
//!
//! The scoring engine only ever sees a [`PitchTrack`]; how one is obtained is
//! an injected capability. [`PyinTracker`] estimates f0 from decoded audio,
//! [`import`] reads tracks produced by external analysis tools.

pub mod import;
mod pyin;

pub use pyin::PyinTracker;

use crate::error::{Result, ToneError};
use crate::types::{DecodedAudio, PitchTrack};

/// Produces a pitch track from a complete recording.
pub trait PitchTracker {
    fn track(&self, audio: &DecodedAudio) -> Result<PitchTrack>;
}

impl<F> PitchTracker for F
where
    F: Fn(&DecodedAudio) -> Result<PitchTrack>,
{
    fn track(&self, audio: &DecodedAudio) -> Result<PitchTrack> {
        self(audio)
    }
}

/// Analysis parameters for [`PyinTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchSettings {
    /// Rate the recording is resampled to before analysis.
    pub sample_rate: u32,
    /// Lowest f0 considered, in Hz.
    pub floor_hz: f64,
    /// Highest f0 considered, in Hz.
    pub ceiling_hz: f64,
    /// Analysis frame length in samples at `sample_rate`.
    pub frame_length: usize,
}

impl Default for PitchSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            floor_hz: 60.0,
            ceiling_hz: 500.0,
            frame_length: 1024,
        }
    }
}

impl PitchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneError::invalid_input("pitch sample rate must be positive"));
        }
        if !(self.floor_hz.is_finite() && self.floor_hz > 0.0) {
            return Err(ToneError::invalid_input(format!(
                "pitch floor must be a positive frequency, got {}",
                self.floor_hz
            )));
        }
        if !(self.ceiling_hz.is_finite() && self.ceiling_hz > self.floor_hz) {
            return Err(ToneError::invalid_input(format!(
                "pitch ceiling ({}) must exceed the floor ({})",
                self.ceiling_hz, self.floor_hz
            )));
        }
        // Two periods of the floor frequency have to fit in a frame.
        let longest_period = (self.sample_rate as f64 / self.floor_hz).ceil() as usize;
        if self.frame_length < longest_period * 2 {
            return Err(ToneError::invalid_input(format!(
                "frame length {} is too short for a {} Hz floor at {} Hz (need {})",
                self.frame_length,
                self.floor_hz,
                self.sample_rate,
                longest_period * 2
            )));
        }
        Ok(())
    }
}
