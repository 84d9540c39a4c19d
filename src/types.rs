//! Core types for the tone scoring pipeline

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToneError};
use crate::scoring::tones::{tone_of, Tone};

/// Decoded recording (mono, f32 samples)
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100)
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Length of the recording in seconds; zero when the sample rate is unknown.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// One pitch-tracker frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSample {
    #[serde(alias = "t")]
    pub time: f64, // seconds
    /// `None` marks an unvoiced frame
    #[serde(default, alias = "f0", alias = "hz")]
    pub frequency: Option<f64>,
}

impl PitchSample {
    pub fn voiced(time: f64, frequency: f64) -> Self {
        Self {
            time,
            frequency: Some(frequency),
        }
    }

    pub fn unvoiced(time: f64) -> Self {
        Self {
            time,
            frequency: None,
        }
    }

    /// Frequency of the frame when it carries a usable pitch value.
    ///
    /// Non-finite and non-positive values count as unvoiced: trackers commonly
    /// write `0` for frames without pitch.
    pub fn voiced_hz(&self) -> Option<f64> {
        self.frequency.filter(|hz| hz.is_finite() && *hz > 0.0)
    }
}

/// Pitch track for a complete recording, as produced by a pitch tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchTrack {
    samples: Vec<PitchSample>,
    duration: f64, // seconds
}

impl PitchTrack {
    /// Builds a track; a negative or non-finite duration collapses to zero.
    pub fn new(samples: Vec<PitchSample>, duration: f64) -> Self {
        Self {
            samples,
            duration: clamp_duration(duration),
        }
    }

    /// Builds a track whose duration ends at the latest finite timestamp.
    pub fn from_samples(samples: Vec<PitchSample>) -> Self {
        let duration = samples
            .iter()
            .map(|sample| sample.time)
            .filter(|time| time.is_finite())
            .fold(0.0_f64, f64::max);
        Self::new(samples, duration)
    }

    pub fn samples(&self) -> &[PitchSample] {
        &self.samples
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn voiced_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|sample| sample.voiced_hz().is_some())
            .count()
    }
}

fn clamp_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

/// A romanized syllable paired with the tone it is expected to carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllable {
    pub text: String,
    pub tone: Tone,
}

impl Syllable {
    /// Reads the expected tone off the syllable's diacritics.
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        let tone = tone_of(&text);
        Self { text, tone }
    }
}

/// Phrase the learner is asked to pronounce.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPhrase {
    pub id: String,
    /// Display text (hanzi)
    pub text: String,
    syllables: Vec<Syllable>,
}

impl TargetPhrase {
    /// Builds a phrase from already split syllables. At least one non-blank
    /// syllable is required.
    pub fn new<I, S>(id: impl Into<String>, text: impl Into<String>, syllables: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let syllables: Vec<Syllable> = syllables
            .into_iter()
            .map(|syllable| {
                let syllable: String = syllable.into();
                Syllable::classify(syllable.trim())
            })
            .collect();
        if syllables.is_empty() {
            return Err(ToneError::invalid_phrase(format!(
                "phrase {id} has no syllables"
            )));
        }
        if let Some(position) = syllables.iter().position(|s| s.text.is_empty()) {
            return Err(ToneError::invalid_phrase(format!(
                "phrase {id} has a blank syllable at position {position}"
            )));
        }
        Ok(Self {
            id,
            text: text.into(),
            syllables,
        })
    }

    /// Splits a space-delimited romanization into syllables.
    pub fn from_romanization(
        id: impl Into<String>,
        text: impl Into<String>,
        romanization: &str,
    ) -> Result<Self> {
        Self::new(id, text, romanization.split_whitespace())
    }

    /// Like [`TargetPhrase::from_romanization`], but a romanization with no
    /// syllables becomes one neutral-tone syllable spanning the whole track
    /// instead of an error.
    pub fn from_romanization_or_neutral(
        id: impl Into<String>,
        text: impl Into<String>,
        romanization: &str,
    ) -> Self {
        let id = id.into();
        let text = text.into();
        match Self::from_romanization(id.clone(), text.clone(), romanization) {
            Ok(phrase) => phrase,
            Err(_) => Self {
                id,
                text,
                syllables: vec![Syllable {
                    text: romanization.trim().to_string(),
                    tone: Tone::Neutral,
                }],
            },
        }
    }

    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.syllables.iter().map(|s| s.tone).collect()
    }

    /// Syllables joined back into a space-delimited romanization.
    pub fn romanization(&self) -> String {
        self.syllables
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Time interval of the track presumed to hold one syllable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyllableWindow {
    pub index: usize,
    pub syllable: String,
    pub tone: Tone,
    pub start: f64, // seconds, inclusive
    pub end: f64,   // seconds, exclusive unless `closes_track`
    /// The final window also owns a sample sitting exactly on the track end.
    #[serde(skip)]
    pub closes_track: bool,
}

impl SyllableWindow {
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && (time < self.end || (self.closes_track && time <= self.end))
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Measurements a window verdict was based on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourStats {
    pub voiced: usize,
    pub start_hz: f64,
    pub end_hz: f64,
    pub min_hz: f64,
    pub max_hz: f64,
    /// log2(end) - log2(start), in octaves
    pub slope: f64,
    /// log2(max) - log2(min), in octaves
    pub range: f64,
}

/// Verdict for one syllable window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyllableResult {
    pub index: usize,
    pub syllable: String,
    pub tone: Tone,
    pub score: u8,
    pub label: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contour: Option<ContourStats>,
}

/// Window interval flagged for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BadSpan {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

/// Output of a scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    pub overall: u8,
    pub syllables: Vec<SyllableResult>,
    pub bad_spans: Vec<BadSpan>,
}

impl ScoringReport {
    pub fn is_clean(&self) -> bool {
        self.bad_spans.is_empty()
    }
}
