use aus::analysis;
use tracing::debug;

use crate::error::{Result, ToneError};
use crate::types::{DecodedAudio, PitchSample, PitchTrack};

use super::{PitchSettings, PitchTracker};

/// Probabilistic YIN f0 tracker.
#[derive(Debug, Clone, Default)]
pub struct PyinTracker {
    settings: PitchSettings,
}

impl PyinTracker {
    pub fn new(settings: PitchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &PitchSettings {
        &self.settings
    }
}

impl PitchTracker for PyinTracker {
    fn track(&self, audio: &DecodedAudio) -> Result<PitchTrack> {
        if audio.sample_rate == 0 {
            return Err(ToneError::invalid_input(
                "recording has no sample rate; cannot track pitch",
            ));
        }
        let duration = audio.duration_secs();
        let signal = resample(&audio.samples, audio.sample_rate, self.settings.sample_rate);
        if signal.len() < self.settings.frame_length {
            debug!(
                samples = signal.len(),
                frame_length = self.settings.frame_length,
                "recording shorter than one analysis frame; returning empty track"
            );
            return Ok(PitchTrack::new(Vec::new(), duration));
        }

        let (timestamps, pitches, voiced_flags, _confidence) = analysis::pyin_pitch_estimator(
            &signal,
            self.settings.sample_rate,
            self.settings.floor_hz,
            self.settings.ceiling_hz,
            self.settings.frame_length,
        );
        let samples: Vec<PitchSample> = timestamps
            .iter()
            .zip(pitches.iter())
            .zip(voiced_flags.iter())
            .map(|((&time, &pitch), &voiced)| PitchSample {
                time: f64::from(time),
                frequency: (voiced && pitch.is_finite() && pitch > 0.0).then_some(pitch),
            })
            .collect();
        let track = PitchTrack::new(samples, duration);
        debug!(
            frames = track.samples().len(),
            voiced = track.voiced_count(),
            duration_secs = duration,
            "pitch track extracted"
        );
        Ok(track)
    }
}

/// Linear interpolation onto `target_rate`, widened to f64 for analysis.
fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f64> {
    if samples.is_empty() || source_rate == target_rate {
        return samples.iter().map(|&s| f64::from(s)).collect();
    }
    let step = source_rate as f64 / target_rate as f64;
    let output_len = (samples.len() as f64 / step).floor().max(1.0) as usize;
    let last = samples.len() - 1;
    (0..output_len)
        .map(|i| {
            let position = i as f64 * step;
            let left = (position.floor() as usize).min(last);
            let right = (left + 1).min(last);
            let t = position - left as f64;
            f64::from(samples[left]) * (1.0 - t) + f64::from(samples[right]) * t
        })
        .collect()
}
