//! Mandarin tone contour scoring.
//!
//! A learner's pitch track is split into one window per syllable of the
//! target phrase, each window is graded against the expected tone shape, and
//! the grades are reduced to an overall score plus the spans to highlight.

pub mod attempts;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod phrases;
pub mod pitch;
pub mod render;
pub mod scoring;
pub mod types;

pub use error::{Result, ToneError, ToneErrorKind};
pub use scoring::{tone_of, Tone, ToneScorer};
pub use types::{PitchSample, PitchTrack, ScoringReport, SyllableResult, TargetPhrase};
