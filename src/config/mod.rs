use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::phrases::PhraseBank;

const DEFAULT_OUTPUT_DIR: &str = "uploads";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where attempt records, plot data and stored recordings are written
    pub output_root: PathBuf,
    /// Optional JSON phrase bank replacing the starter bank
    pub phrase_bank: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_overrides(output: Option<PathBuf>, phrase_bank: Option<PathBuf>) -> Result<Self> {
        let output_root = match output {
            Some(custom) => prepare_dir(&custom)?,
            None => default_output_root()?,
        };
        let phrase_bank = phrase_bank.map(|path| canonicalize_file(&path)).transpose()?;
        Ok(Self {
            output_root,
            phrase_bank,
        })
    }

    pub fn load_phrase_bank(&self) -> Result<PhraseBank> {
        match &self.phrase_bank {
            Some(path) => PhraseBank::load(path),
            None => Ok(PhraseBank::starter()),
        }
    }
}

fn prepare_dir(path: &Path) -> Result<PathBuf> {
    if path.exists() && !path.is_dir() {
        return Err(anyhow!("output path {:?} is not a directory", path));
    }
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create output directory {:?}", path))?;
    path.canonicalize()
        .with_context(|| format!("failed to resolve output directory at {:?}", path))
}

fn canonicalize_file(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve phrase bank at {:?}", path))?;
    if canonical.is_file() {
        Ok(canonical)
    } else {
        Err(anyhow!("phrase bank path {:?} is not a file", canonical))
    }
}

fn default_output_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("unable to resolve current directory")?;
    prepare_dir(&cwd.join(DEFAULT_OUTPUT_DIR))
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::phrases::PhraseRepository;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn creates_output_override() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("attempts").join("today");
        let config = AppConfig::from_overrides(Some(target.clone()), None).unwrap();
        assert!(target.is_dir());
        assert!(config.output_root.ends_with("today"));
        assert_eq!(config.load_phrase_bank().unwrap().len(), 3);
    }

    #[test]
    fn rejects_file_as_output_dir() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("report.json");
        fs::write(&file, "{}").unwrap();
        assert!(AppConfig::from_overrides(Some(file), None).is_err());
    }

    #[test]
    fn loads_custom_phrase_bank() {
        let tmp = tempdir().unwrap();
        let bank = tmp.path().join("bank.json");
        fs::write(
            &bank,
            r#"[{"phrase_id": "p100", "hanzi": "老师", "pinyin": "lǎo shī"}]"#,
        )
        .unwrap();
        let config =
            AppConfig::from_overrides(Some(tmp.path().join("out")), Some(bank)).unwrap();
        let phrases = config.load_phrase_bank().unwrap();
        assert_eq!(phrases.all()[0].phrase_id, "p100");
    }

    #[test]
    fn missing_phrase_bank_is_an_error() {
        let tmp = tempdir().unwrap();
        let result = AppConfig::from_overrides(
            Some(tmp.path().join("out")),
            Some(tmp.path().join("nope.json")),
        );
        assert!(result.is_err());
    }
}
