use crate::error::{Result, ToneError};
use crate::types::{BadSpan, ScoringReport, SyllableResult};

/// Windows scoring strictly below this are highlighted as mistakes.
pub const MISTAKE_THRESHOLD: u8 = 70;

/// Reduces per-syllable results to the final report.
///
/// The overall score is the mean rounded half up. An empty result list is a
/// caller error; the segmenter never produces one.
pub fn aggregate(results: Vec<SyllableResult>) -> Result<ScoringReport> {
    let overall = overall_score(results.iter().map(|r| r.score))
        .ok_or_else(|| ToneError::invalid_input("cannot aggregate an empty result list"))?;
    let bad_spans = results
        .iter()
        .filter(|result| result.score < MISTAKE_THRESHOLD)
        .map(|result| BadSpan {
            index: result.index,
            start: result.start,
            end: result.end,
        })
        .collect();
    Ok(ScoringReport {
        overall,
        syllables: results,
        bad_spans,
    })
}

/// Rounded mean of the scores, or `None` for an empty sequence.
pub fn overall_score<I>(scores: I) -> Option<u8>
where
    I: IntoIterator<Item = u8>,
{
    let (total, count) = scores
        .into_iter()
        .fold((0u64, 0u64), |(total, count), score| {
            (total + u64::from(score), count + 1)
        });
    if count == 0 {
        return None;
    }
    // Non-negative mean, so `round` (half away from zero) is round half up.
    let mean = total as f64 / count as f64;
    Some(mean.round().clamp(0.0, 100.0) as u8)
}
