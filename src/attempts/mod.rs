//! Attempt records and stored-artifact naming.
//!
//! Persisting attempts is the caller's business; this module only shapes the
//! record handed over and keeps stored file names from colliding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{BadSpan, ScoringReport, SyllableResult};

const STEM_MAX_CHARS: usize = 40;
const DEFAULT_STEM: &str = "rec";
const DEFAULT_EXTENSION: &str = ".webm";

/// One scored (or not yet scored) learner attempt at a phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub phrase_id: String,
    pub created_at: DateTime<Utc>,
    /// Where the recording (or imported pitch track) lives
    pub file_url: String,
    /// `None` until the attempt has been compared
    pub score: Option<u8>,
    #[serde(default)]
    pub syllables: Vec<SyllableResult>,
    #[serde(default)]
    pub bad_spans: Vec<BadSpan>,
    #[serde(default)]
    pub plot_url: String,
}

impl AttemptRecord {
    pub fn new(phrase_id: impl Into<String>, file_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phrase_id: phrase_id.into(),
            created_at: Utc::now(),
            file_url: file_url.into(),
            score: None,
            syllables: Vec::new(),
            bad_spans: Vec::new(),
            plot_url: String::new(),
        }
    }

    pub fn with_report(mut self, report: &ScoringReport) -> Self {
        self.score = Some(report.overall);
        self.syllables = report.syllables.clone();
        self.bad_spans = report.bad_spans.clone();
        self
    }

    pub fn with_plot(mut self, plot_url: impl Into<String>) -> Self {
        self.plot_url = plot_url.into();
        self
    }

    /// Per-syllable results as a JSON string, for stores with a text column.
    pub fn syllables_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.syllables)
    }

    /// File name for this record inside an output directory.
    pub fn file_name(&self) -> String {
        format!("{}__attempt.json", self.id.simple())
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self).context("Failed to serialize attempt")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write attempt record {:?}", path))?;
        Ok(path)
    }
}

/// Collision-free name for storing an uploaded recording:
/// `{uuid}__{sanitized stem}{extension}`.
pub fn stored_name(original: &str) -> String {
    stored_name_with(Uuid::new_v4(), original)
}

pub fn stored_name_with(id: Uuid, original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize_stem)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string());
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}__{}{}", id.simple(), stem, extension)
}

/// Keeps `[A-Za-z0-9_.-]`, turns whitespace runs into `_`, trims leading and
/// trailing `.`/`_`, and caps the length.
pub fn sanitize_stem(stem: &str) -> String {
    let joined = stem.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_')
        .chars()
        .take(STEM_MAX_CHARS)
        .collect()
}

#[derive(Serialize)]
struct Sidecar<'a> {
    phrase_id: &'a str,
}

/// Writes `{stored_name}.json` holding the phrase id next to a stored recording.
pub fn write_sidecar(dir: &Path, stored_name: &str, phrase_id: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{stored_name}.json"));
    let json = serde_json::to_string_pretty(&Sidecar { phrase_id })
        .context("Failed to serialize sidecar")?;
    fs::write(&path, json).with_context(|| format!("Failed to write sidecar {:?}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Tone;
    use tempfile::tempdir;

    fn id() -> Uuid {
        Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
    }

    #[test]
    fn stored_name_keeps_safe_stem_and_extension() {
        assert_eq!(
            stored_name_with(id(), "My Take 1.WAV"),
            "67e5504410b1426f9247bb680e5fe0c8__My_Take_1.wav"
        );
    }

    #[test]
    fn stored_name_falls_back_to_defaults() {
        assert_eq!(
            stored_name_with(id(), "你好"),
            "67e5504410b1426f9247bb680e5fe0c8__rec.webm"
        );
        assert_eq!(
            stored_name_with(id(), ""),
            "67e5504410b1426f9247bb680e5fe0c8__rec.webm"
        );
    }

    #[test]
    fn stored_names_do_not_collide() {
        assert_ne!(stored_name("take.webm"), stored_name("take.webm"));
    }

    #[test]
    fn sanitize_strips_paths_and_caps_length() {
        assert_eq!(sanitize_stem("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_stem("__.hidden_"), "hidden");
        assert_eq!(sanitize_stem(&"a".repeat(60)).len(), 40);
    }

    #[test]
    fn record_carries_report() {
        let report = ScoringReport {
            overall: 58,
            syllables: vec![SyllableResult {
                index: 0,
                syllable: "xiè".into(),
                tone: Tone::Falling,
                score: 55,
                label: "not falling enough (tone 4)".into(),
                start: 0.0,
                end: 0.4,
                contour: None,
            }],
            bad_spans: vec![BadSpan {
                index: 0,
                start: 0.0,
                end: 0.4,
            }],
        };
        let record = AttemptRecord::new("p002", "uploads/take.webm")
            .with_report(&report)
            .with_plot("uploads/take__plot.json");
        assert_eq!(record.score, Some(58));
        assert_eq!(record.bad_spans.len(), 1);
        let json = record.syllables_json().unwrap();
        assert!(json.contains("\"tone\":4"));
        assert!(record.file_name().ends_with("__attempt.json"));
    }

    #[test]
    fn writes_record_and_sidecar() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();

        let record = AttemptRecord::new("p001", "take.webm");
        let path = record.write_to(dir).unwrap();
        let read: AttemptRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.id, record.id);
        assert_eq!(read.score, None);

        let sidecar = write_sidecar(dir, "abc__take.webm", "p001").unwrap();
        assert!(sidecar.ends_with("abc__take.webm.json"));
        assert!(fs::read_to_string(&sidecar)
            .unwrap()
            .contains("\"phrase_id\": \"p001\""));
    }
}
