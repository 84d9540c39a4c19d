use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};

use crate::phrases::{PhraseBank, PhraseRepository};
use crate::pitch::PitchSettings;
use crate::types::TargetPhrase;

const AD_HOC_PHRASE_ID: &str = "adhoc";

#[derive(Parser, Debug)]
#[command(
    name = "tonemark",
    version,
    about = "Scores Mandarin tone contours of a recording against a target phrase"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Filter directive used when `RUST_LOG` is not set.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one attempt and write its record and plot data.
    Score(ScoreArgs),
    /// List the phrases in the bank.
    Phrases(PhrasesArgs),
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["audio", "pitch_json"])))]
#[command(group(ArgGroup::new("target").required(true).args(["phrase", "pinyin"])))]
pub struct ScoreArgs {
    /// Recording to analyse (any format the decoder understands).
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,
    /// Pre-extracted pitch track as JSON.
    #[arg(long = "pitch-json", value_name = "PATH")]
    pub pitch_json: Option<PathBuf>,
    /// Phrase id from the bank.
    #[arg(long, value_name = "ID")]
    pub phrase: Option<String>,
    /// Ad-hoc phrase romanization, e.g. "nǐ hǎo".
    #[arg(long, value_name = "PINYIN")]
    pub pinyin: Option<String>,
    /// Display text for an ad-hoc phrase.
    #[arg(long, requires = "pinyin")]
    pub text: Option<String>,
    /// Directory receiving attempt records and plot data.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Phrase bank JSON replacing the starter bank.
    #[arg(long, value_name = "PATH")]
    pub bank: Option<PathBuf>,
    /// Copy the recording into the output directory with a phrase sidecar.
    #[arg(long = "keep-audio", requires = "audio")]
    pub keep_audio: bool,
    /// Print the scoring report as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub pitch: PitchArgs,
}

impl ScoreArgs {
    pub fn target_phrase(&self, bank: &PhraseBank) -> Result<TargetPhrase> {
        match (&self.phrase, &self.pinyin) {
            (Some(id), _) => Ok(bank.target(id)?),
            (None, Some(pinyin)) => {
                let text = self.text.clone().unwrap_or_else(|| pinyin.clone());
                Ok(TargetPhrase::from_romanization(
                    AD_HOC_PHRASE_ID,
                    text,
                    pinyin,
                )?)
            }
            (None, None) => bail!("provide --phrase or --pinyin"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PitchArgs {
    /// Analysis sample rate in Hz.
    #[arg(long = "pitch-rate", default_value_t = 16_000)]
    pub sample_rate: u32,
    /// Lowest f0 to track, in Hz.
    #[arg(long = "pitch-floor", default_value_t = 60.0)]
    pub floor_hz: f64,
    /// Highest f0 to track, in Hz.
    #[arg(long = "pitch-ceiling", default_value_t = 500.0)]
    pub ceiling_hz: f64,
    /// Analysis frame length in samples.
    #[arg(long = "frame-length", default_value_t = 1024)]
    pub frame_length: usize,
}

impl PitchArgs {
    pub fn settings(&self) -> Result<PitchSettings> {
        let settings = PitchSettings {
            sample_rate: self.sample_rate,
            floor_hz: self.floor_hz,
            ceiling_hz: self.ceiling_hz,
            frame_length: self.frame_length,
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PhrasesArgs {
    /// Phrase bank JSON replacing the starter bank.
    #[arg(long, value_name = "PATH")]
    pub bank: Option<PathBuf>,
    /// Print the bank as JSON.
    #[arg(long)]
    pub json: bool,
    /// Show only the phrase chosen by this seed, e.g. a random number.
    #[arg(long, value_name = "SEED")]
    pub pick: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use crate::phrases::PhraseBank;
    use crate::scoring::Tone;
    use clap::Parser;

    #[test]
    fn parses_score_with_bank_phrase() {
        let cli = Cli::try_parse_from([
            "tonemark",
            "score",
            "--pitch-json",
            "take.json",
            "--phrase",
            "p003",
        ])
        .unwrap();
        let Command::Score(args) = cli.command else {
            panic!("expected score command");
        };
        let phrase = args.target_phrase(&PhraseBank::starter()).unwrap();
        assert_eq!(phrase.text, "中文");
        assert_eq!(args.pitch.settings().unwrap().frame_length, 1024);
    }

    #[test]
    fn ad_hoc_phrase_defaults_text_to_pinyin() {
        let cli = Cli::try_parse_from([
            "tonemark", "score", "--audio", "take.wav", "--pinyin", "mā ma",
        ])
        .unwrap();
        let Command::Score(args) = cli.command else {
            panic!("expected score command");
        };
        let phrase = args.target_phrase(&PhraseBank::starter()).unwrap();
        assert_eq!(phrase.id, "adhoc");
        assert_eq!(phrase.text, "mā ma");
        assert_eq!(phrase.tones(), vec![Tone::Level, Tone::Neutral]);
    }

    #[test]
    fn requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["tonemark", "score", "--phrase", "p001"]).is_err());
        assert!(Cli::try_parse_from([
            "tonemark",
            "score",
            "--phrase",
            "p001",
            "--audio",
            "a.wav",
            "--pitch-json",
            "a.json",
        ])
        .is_err());
    }

    #[test]
    fn keep_audio_needs_a_recording() {
        assert!(Cli::try_parse_from([
            "tonemark",
            "score",
            "--phrase",
            "p001",
            "--pitch-json",
            "a.json",
            "--keep-audio",
        ])
        .is_err());
    }

    #[test]
    fn rejects_invalid_pitch_settings() {
        let cli = Cli::try_parse_from([
            "tonemark",
            "score",
            "--audio",
            "a.wav",
            "--phrase",
            "p001",
            "--pitch-floor",
            "600",
        ])
        .unwrap();
        let Command::Score(args) = cli.command else {
            panic!("expected score command");
        };
        assert!(args.pitch.settings().is_err());
    }

    #[test]
    fn counts_verbosity_anywhere() {
        let cli = Cli::try_parse_from(["tonemark", "phrases", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_directive(), "debug");
    }

    #[test]
    fn quiet_by_default_and_capped_at_trace() {
        let quiet = Cli::try_parse_from(["tonemark", "phrases"]).unwrap();
        assert_eq!(quiet.log_directive(), "warn");
        let loud = Cli::try_parse_from(["tonemark", "-vvvvv", "phrases"]).unwrap();
        assert_eq!(loud.log_directive(), "trace");
    }

    #[test]
    fn phrases_accepts_pick_seed() {
        let cli = Cli::try_parse_from(["tonemark", "phrases", "--pick", "7"]).unwrap();
        let Command::Phrases(args) = cli.command else {
            panic!("expected phrases command");
        };
        assert_eq!(args.pick, Some(7));
        assert_eq!(PhraseBank::starter().pick(7).phrase_id, "p002");
    }
}
