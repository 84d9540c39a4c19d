//! What a chart of an attempt should show. Drawing it is left to the caller's
//! plotting library.

use serde::Serialize;

use crate::types::{BadSpan, PitchTrack, ScoringReport, TargetPhrase};

const BOUNDS_PADDING: f64 = 0.05;

/// Plot-ready view of one scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotData {
    pub title: String,
    /// Every tracker frame; unvoiced frames break the drawn line.
    pub points: Vec<PlotPoint>,
    /// Regions to shade as mistakes
    pub bad_spans: Vec<BadSpan>,
    /// Window edges, for drawing syllable separators
    pub syllable_edges: Vec<f64>,
    pub time_bounds: (f64, f64),
    pub frequency_bounds: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub time: f64,
    pub frequency: Option<f64>,
}

impl PlotData {
    pub fn new(track: &PitchTrack, phrase: &TargetPhrase, report: &ScoringReport) -> Self {
        let points: Vec<PlotPoint> = track
            .samples()
            .iter()
            .map(|sample| PlotPoint {
                time: sample.time,
                frequency: sample.voiced_hz(),
            })
            .collect();
        let mut syllable_edges: Vec<f64> = report.syllables.iter().map(|s| s.start).collect();
        if let Some(last) = report.syllables.last() {
            syllable_edges.push(last.end);
        }
        Self {
            title: plot_title(phrase, report.overall),
            frequency_bounds: frequency_bounds(&points),
            time_bounds: (0.0, track.duration()),
            points,
            bad_spans: report.bad_spans.clone(),
            syllable_edges,
        }
    }
}

/// `"{display text} ({romanization}) - score {overall}"`
pub fn plot_title(phrase: &TargetPhrase, overall: u8) -> String {
    format!(
        "{} ({}) - score {}",
        phrase.text,
        phrase.romanization(),
        overall
    )
}

fn frequency_bounds(points: &[PlotPoint]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for hz in points.iter().filter_map(|p| p.frequency) {
        min = min.min(hz);
        max = max.max(hz);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < 1e-3 {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * BOUNDS_PADDING;
    (min - pad, max + pad)
}
