//! Phrase bank: the read-only catalogue of phrases a learner can practise.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToneError};
use crate::types::TargetPhrase;

/// One catalogue entry, in the shape phrase banks are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseEntry {
    #[serde(alias = "id")]
    pub phrase_id: String,
    #[serde(alias = "text")]
    pub hanzi: String,
    /// Space-delimited pinyin with tone marks
    pub pinyin: String,
}

impl PhraseEntry {
    pub fn new(phrase_id: &str, hanzi: &str, pinyin: &str) -> Self {
        Self {
            phrase_id: phrase_id.to_string(),
            hanzi: hanzi.to_string(),
            pinyin: pinyin.to_string(),
        }
    }

    pub fn to_target(&self) -> Result<TargetPhrase> {
        TargetPhrase::from_romanization(&self.phrase_id, &self.hanzi, &self.pinyin)
    }
}

/// Read-only access to phrase definitions.
pub trait PhraseRepository {
    fn get(&self, phrase_id: &str) -> Option<&PhraseEntry>;

    fn all(&self) -> &[PhraseEntry];

    /// Looks up a phrase and splits it into scoreable syllables.
    fn target(&self, phrase_id: &str) -> Result<TargetPhrase> {
        self.get(phrase_id)
            .ok_or_else(|| ToneError::invalid_input(format!("unknown phrase id \"{phrase_id}\"")))?
            .to_target()
    }
}

/// In-memory phrase bank. Never empty, ids unique, every entry scoreable.
#[derive(Debug, Clone)]
pub struct PhraseBank {
    entries: Vec<PhraseEntry>,
}

impl PhraseBank {
    /// The bank shipped with the application.
    pub fn starter() -> Self {
        Self {
            entries: vec![
                PhraseEntry::new("p001", "你好", "nǐ hǎo"),
                PhraseEntry::new("p002", "谢谢", "xiè xie"),
                PhraseEntry::new("p003", "中文", "zhōng wén"),
            ],
        }
    }

    pub fn from_entries(entries: Vec<PhraseEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ToneError::invalid_input("phrase bank contains no phrases"));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.phrase_id.as_str()) {
                return Err(ToneError::invalid_phrase(format!(
                    "duplicate phrase id \"{}\"",
                    entry.phrase_id
                )));
            }
            entry.to_target()?;
        }
        Ok(Self { entries })
    }

    /// Parses a JSON array of `{phrase_id, hanzi, pinyin}` objects.
    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<PhraseEntry> = serde_json::from_str(raw)
            .map_err(|err| ToneError::format("failed to parse phrase bank", err))?;
        Self::from_entries(entries)
    }

    pub fn load(path: &Path) -> AnyResult<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read phrase bank {:?}", path))?;
        let bank =
            Self::from_json(&raw).with_context(|| format!("Invalid phrase bank in {:?}", path))?;
        Ok(bank)
    }

    /// Chooses a phrase from a caller-supplied seed, e.g. a random number.
    pub fn pick(&self, seed: u64) -> &PhraseEntry {
        let index = (seed % self.entries.len() as u64) as usize;
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed bank; pairs with [`PhraseBank::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PhraseBank {
    fn default() -> Self {
        Self::starter()
    }
}

impl PhraseRepository for PhraseBank {
    fn get(&self, phrase_id: &str) -> Option<&PhraseEntry> {
        self.entries.iter().find(|entry| entry.phrase_id == phrase_id)
    }

    fn all(&self) -> &[PhraseEntry] {
        &self.entries
    }
}
