use anyhow::Result;
use clap::Parser;
use eval2000_prep::config::Overrides;
use eval2000_prep::{prepare_eval2000, Config};
use std::path::PathBuf;
use tracing::info;

/// Build recording and supervision manifests for the Switchboard Eval2000 corpus
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (extension optional); missing files fall back to defaults
    #[arg(long, default_value = "config/eval2000")]
    config: String,

    /// Directory searched recursively for .sph audio files
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// Directory searched recursively for ISIP .txt transcripts
    #[arg(long)]
    transcripts_dir: Option<PathBuf>,

    /// LDC2020T14 sentiment corpus root (contains data/sentiment_labels.tsv)
    #[arg(long)]
    sentiment_dir: Option<PathBuf>,

    /// Where recordings_eval.jsonl and supervisions_eval.jsonl are written
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Drop segments that start with [silence] (true/false)
    #[arg(long, value_name = "BOOL")]
    omit_silence: Option<bool>,

    /// Store absolute audio paths in the recording manifest (true/false)
    #[arg(long, value_name = "BOOL")]
    absolute_paths: Option<bool>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;

    cfg.apply_overrides(Overrides {
        audio_dir: args.audio_dir,
        transcripts_dir: args.transcripts_dir,
        sentiment_dir: args.sentiment_dir,
        output_dir: args.output_dir,
        omit_silence: args.omit_silence,
        absolute_paths: args.absolute_paths,
    });

    info!("Eval2000 manifest preparation v{}", env!("CARGO_PKG_VERSION"));
    info!("Audio: {}", cfg.corpus.audio_dir.display());
    info!("Transcripts: {}", cfg.corpus.transcripts_dir.display());
    if let Some(dir) = &cfg.corpus.sentiment_dir {
        info!("Sentiment labels: {}", dir.display());
    }

    let manifests = prepare_eval2000(
        &cfg.corpus.audio_dir,
        &cfg.corpus.transcripts_dir,
        cfg.corpus.sentiment_dir.as_deref(),
        cfg.corpus.output_dir.as_deref(),
        &cfg.prepare_options(),
    )?;

    info!(
        "Done: {} recordings, {} supervisions",
        manifests.recordings.len(),
        manifests.supervisions.len()
    );

    Ok(())
}
