use crate::scoring::tones::Tone;
use crate::types::ContourStats;

/// Fewest voiced frames a window needs before its contour is judged.
pub const MIN_VOICED_SAMPLES: usize = 5;
pub const UNVOICED_SCORE: u8 = 20;
pub const UNVOICED_LABEL: &str = "too unvoiced/no pitch";

// Calibration constants, in octaves (log2 units) except DIP_RATIO.
const LEVEL_MAX_SLOPE: f64 = 0.05;
const LEVEL_MAX_RANGE: f64 = 0.10;
const CONTOUR_MIN_SLOPE: f64 = 0.08;
const DIP_RATIO: f64 = 0.92;
const DIP_MIN_RANGE: f64 = 0.10;

/// Score and label for one syllable window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub score: u8,
    pub label: &'static str,
    /// `None` when the window had too little voiced signal to measure.
    pub contour: Option<ContourStats>,
}

/// Grades the pitch movement inside one window against the expected tone.
///
/// Frames are read in track order; `None`, non-finite and non-positive
/// frequencies are dropped before measuring.
pub fn score_window(frequencies: &[Option<f64>], tone: Tone) -> Verdict {
    match measure(frequencies) {
        Some(stats) => {
            let (score, label) = grade(&stats, tone);
            Verdict {
                score,
                label,
                contour: Some(stats),
            }
        }
        None => Verdict {
            score: UNVOICED_SCORE,
            label: UNVOICED_LABEL,
            contour: None,
        },
    }
}

fn measure(frequencies: &[Option<f64>]) -> Option<ContourStats> {
    let voiced: Vec<f64> = frequencies
        .iter()
        .flatten()
        .copied()
        .filter(|hz| hz.is_finite() && *hz > 0.0)
        .collect();
    if voiced.len() < MIN_VOICED_SAMPLES {
        return None;
    }
    let start_hz = voiced[0];
    let end_hz = voiced[voiced.len() - 1];
    let (min_hz, max_hz) = voiced
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &hz| {
            (lo.min(hz), hi.max(hz))
        });
    Some(ContourStats {
        voiced: voiced.len(),
        start_hz,
        end_hz,
        min_hz,
        max_hz,
        slope: end_hz.log2() - start_hz.log2(),
        range: max_hz.log2() - min_hz.log2(),
    })
}

fn grade(stats: &ContourStats, tone: Tone) -> (u8, &'static str) {
    match tone {
        Tone::Level => {
            if stats.slope.abs() < LEVEL_MAX_SLOPE && stats.range < LEVEL_MAX_RANGE {
                (95, "ok (level)")
            } else {
                (60, "too much movement (tone 1 should be level)")
            }
        }
        Tone::Rising => {
            if stats.slope > CONTOUR_MIN_SLOPE {
                (95, "ok (rising)")
            } else {
                (55, "not rising enough (tone 2)")
            }
        }
        Tone::Falling => {
            if stats.slope < -CONTOUR_MIN_SLOPE {
                (95, "ok (falling)")
            } else {
                (55, "not falling enough (tone 4)")
            }
        }
        Tone::Dip => {
            let edge = stats.start_hz.min(stats.end_hz);
            if stats.min_hz < edge * DIP_RATIO && stats.range > DIP_MIN_RANGE {
                (90, "ok (dip)")
            } else {
                (55, "missing dip (tone 3-ish)")
            }
        }
        Tone::Neutral => (75, "neutral/unknown tone"),
    }
}
