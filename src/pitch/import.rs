use std::fs;
use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use serde::Deserialize;

use crate::error::{Result, ToneError};
use crate::types::{PitchSample, PitchTrack};

/// Pitch track as written by external analysis tools.
///
/// `duration` may be omitted, in which case the track ends at its last frame.
/// Unvoiced frames are written as `null` or `0`.
#[derive(Debug, Deserialize)]
struct RawPitchTrack {
    #[serde(default, alias = "duration_secs")]
    duration: Option<f64>,
    #[serde(alias = "frames")]
    samples: Vec<PitchSample>,
}

/// Parses a JSON pitch track, rejecting frames without a usable timestamp.
pub fn parse_pitch_track(raw: &str) -> Result<PitchTrack> {
    let parsed: RawPitchTrack = serde_json::from_str(raw)
        .map_err(|err| ToneError::format("failed to parse pitch track JSON", err))?;
    if let Some(index) = parsed.samples.iter().position(|s| !s.time.is_finite()) {
        return Err(ToneError::invalid_track(format!(
            "pitch frame {index} has a non-finite timestamp"
        )));
    }
    if let Some(index) = parsed
        .samples
        .windows(2)
        .position(|pair| pair[1].time < pair[0].time)
    {
        return Err(ToneError::invalid_track(format!(
            "pitch frame {} goes back in time",
            index + 1
        )));
    }
    Ok(match parsed.duration {
        Some(duration) => PitchTrack::new(parsed.samples, duration),
        None => PitchTrack::from_samples(parsed.samples),
    })
}

pub fn load_pitch_track(path: &Path) -> AnyResult<PitchTrack> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pitch track {:?}", path))?;
    let track = parse_pitch_track(&raw)
        .with_context(|| format!("Invalid pitch track in {:?}", path))?;
    Ok(track)
}
