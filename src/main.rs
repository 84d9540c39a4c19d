use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tonemark::attempts::{self, AttemptRecord};
use tonemark::audio::decoder::decode_audio;
use tonemark::cli::{Cli, Command, PhrasesArgs, ScoreArgs};
use tonemark::config::AppConfig;
use tonemark::phrases::{PhraseBank, PhraseRepository};
use tonemark::pitch::import::load_pitch_track;
use tonemark::pitch::PyinTracker;
use tonemark::render::PlotData;
use tonemark::{ScoringReport, ToneScorer};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_directive());
    match cli.command {
        Command::Score(args) => handle_score(&args),
        Command::Phrases(args) => handle_phrases(&args),
    }
}

fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_score(args: &ScoreArgs) -> Result<()> {
    let config = AppConfig::from_overrides(args.output_dir.clone(), args.bank.clone())
        .context("Failed to prepare configuration")?;
    let bank = config.load_phrase_bank()?;
    let phrase = args.target_phrase(&bank)?;
    let scorer = ToneScorer::new();

    let (source, track, report) = if let Some(audio_path) = &args.audio {
        let tracker = PyinTracker::new(args.pitch.settings()?)?;
        let audio = decode_audio(audio_path)
            .with_context(|| format!("Failed to decode {:?}", audio_path))?;
        info!(
            path = %audio_path.display(),
            samples = audio.samples.len(),
            sample_rate = audio.sample_rate,
            "recording loaded"
        );
        let (track, report) = scorer.score_audio(&tracker, &audio, &phrase)?;
        let source = if args.keep_audio {
            store_recording(audio_path, &config.output_root, &phrase.id)?
        } else {
            audio_path.display().to_string()
        };
        (source, track, report)
    } else if let Some(pitch_path) = &args.pitch_json {
        let track = load_pitch_track(pitch_path)?;
        info!(
            path = %pitch_path.display(),
            frames = track.samples().len(),
            duration_secs = track.duration(),
            "pitch track loaded"
        );
        let report = scorer.score(&track, &phrase)?;
        (pitch_path.display().to_string(), track, report)
    } else {
        bail!("Provide a recording via --audio or a pitch track via --pitch-json");
    };

    let record = AttemptRecord::new(phrase.id.clone(), source);
    let plot = PlotData::new(&track, &phrase, &report);
    let plot_path = config
        .output_root
        .join(format!("{}__plot.json", record.id.simple()));
    let plot_json = serde_json::to_string_pretty(&plot).context("Failed to serialize plot data")?;
    fs::write(&plot_path, plot_json)
        .with_context(|| format!("Failed to write plot data {:?}", plot_path))?;

    let record = record
        .with_report(&report)
        .with_plot(plot_path.display().to_string());
    let record_path = record.write_to(&config.output_root)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_summary(&plot.title, &report, &record_path);
    }
    Ok(())
}

/// Copies the recording under a collision-free name next to its phrase sidecar.
fn store_recording(audio_path: &Path, output_root: &Path, phrase_id: &str) -> Result<String> {
    let original = audio_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let stored = attempts::stored_name(original);
    let destination = output_root.join(&stored);
    fs::copy(audio_path, &destination)
        .with_context(|| format!("Failed to store recording at {:?}", destination))?;
    attempts::write_sidecar(output_root, &stored, phrase_id)?;
    info!(stored = %destination.display(), "recording stored");
    Ok(destination.display().to_string())
}

fn print_summary(title: &str, report: &ScoringReport, record_path: &Path) {
    println!("{title}");
    for syllable in &report.syllables {
        println!(
            "  {:>2}. {:<8} tone {}  {:>3}  {} ({:.2}s - {:.2}s)",
            syllable.index + 1,
            syllable.syllable,
            syllable.tone,
            syllable.score,
            syllable.label,
            syllable.start,
            syllable.end
        );
    }
    println!("overall: {}", report.overall);
    if !report.bad_spans.is_empty() {
        let spans: Vec<String> = report
            .bad_spans
            .iter()
            .map(|span| format!("{:.2}s-{:.2}s", span.start, span.end))
            .collect();
        println!("mistakes: {}", spans.join(", "));
    }
    println!("attempt record: {}", record_path.display());
}

fn handle_phrases(args: &PhrasesArgs) -> Result<()> {
    let bank = match &args.bank {
        Some(path) => PhraseBank::load(path)?,
        None => PhraseBank::starter(),
    };
    let entries = match args.pick {
        Some(seed) => std::slice::from_ref(bank.pick(seed)),
        None => bank.all(),
    };
    if args.json {
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize bank")?;
        println!("{json}");
        return Ok(());
    }
    for entry in entries {
        let tones: Vec<String> = entry
            .to_target()?
            .tones()
            .iter()
            .map(|tone| tone.to_string())
            .collect();
        println!(
            "{}  {}  {}  (tones {})",
            entry.phrase_id,
            entry.hanzi,
            entry.pinyin,
            tones.join(" ")
        );
    }
    Ok(())
}
