pub mod report;
pub mod segmenter;
pub mod tones;
pub mod window;


use tracing::{debug, info};

use crate::error::Result;
use crate::pitch::PitchTracker;
use crate::types::{DecodedAudio, PitchTrack, ScoringReport, SyllableResult, SyllableWindow, TargetPhrase};

pub use report::{aggregate, MISTAKE_THRESHOLD};
pub use segmenter::{segment, window_edges};
pub use tones::{tone_of, Tone};
pub use window::{score_window, Verdict};

/// Scores a learner's pitch track against the tones of a target phrase.
///
/// Holds no state; one instance can serve any number of concurrent calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToneScorer {}

impl ToneScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, track: &PitchTrack, phrase: &TargetPhrase) -> Result<ScoringReport> {
        let windows = segment(track.duration(), phrase.syllables());
        let results = windows
            .iter()
            .map(|window| score_syllable(track, window))
            .collect();
        let report = aggregate(results)?;
        info!(
            phrase_id = %phrase.id,
            syllables = report.syllables.len(),
            overall = report.overall,
            bad_spans = report.bad_spans.len(),
            "scored attempt"
        );
        Ok(report)
    }

    /// Runs `tracker` over the recording, then scores the resulting track.
    pub fn score_audio<T>(
        &self,
        tracker: &T,
        audio: &DecodedAudio,
        phrase: &TargetPhrase,
    ) -> Result<(PitchTrack, ScoringReport)>
    where
        T: PitchTracker + ?Sized,
    {
        let track = tracker.track(audio)?;
        let report = self.score(&track, phrase)?;
        Ok((track, report))
    }
}

fn score_syllable(track: &PitchTrack, window: &SyllableWindow) -> SyllableResult {
    let frequencies = segmenter::window_frequencies(track, window);
    let verdict = score_window(&frequencies, window.tone);
    debug!(
        index = window.index,
        syllable = %window.syllable,
        tone = window.tone.number(),
        frames = frequencies.len(),
        score = verdict.score,
        label = verdict.label,
        "scored syllable window"
    );
    SyllableResult {
        index: window.index,
        syllable: window.syllable.clone(),
        tone: window.tone,
        score: verdict.score,
        label: verdict.label.to_string(),
        start: window.start,
        end: window.end,
        contour: verdict.contour,
    }
}
