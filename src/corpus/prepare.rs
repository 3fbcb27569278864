use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::scan::check_and_rglob;
use super::sentiment::parse_and_add_sentiment_labels;
use super::transcript::make_segments;
use crate::manifest::{
    fix_manifests, validate_recordings_and_supervisions, Recording, RecordingSet, SupervisionSet,
};

pub const RECORDINGS_FILE: &str = "recordings_eval.jsonl";
pub const SUPERVISIONS_FILE: &str = "supervisions_eval.jsonl";

/// Only the first channel is paired with a transcript; the channel count
/// of the audio is not checked against it.
const CHANNEL: u16 = 0;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("No transcript found for recording {recording_id} ({audio_path})")]
    MissingTranscript {
        recording_id: String,
        audio_path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrepareOptions {
    /// Skip segments whose first word is `[silence]`
    pub omit_silence: bool,

    /// Store canonical absolute audio paths instead of truncated relative ones
    pub absolute_paths: bool,

    /// Number of trailing path components kept when `absolute_paths` is off
    pub relative_path_depth: usize,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            omit_silence: true,
            absolute_paths: false,
            relative_path_depth: 3,
        }
    }
}

/// The two manifests produced by a preparation run
#[derive(Debug, Clone)]
pub struct Manifests {
    pub recordings: RecordingSet,
    pub supervisions: SupervisionSet,
}

impl Manifests {
    pub fn write(&self, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

        self.recordings.to_file(output_dir.join(RECORDINGS_FILE))?;
        self.supervisions.to_file(output_dir.join(SUPERVISIONS_FILE))?;

        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            recordings: RecordingSet::from_file(dir.join(RECORDINGS_FILE))?,
            supervisions: SupervisionSet::from_file(dir.join(SUPERVISIONS_FILE))?,
        })
    }
}

/// Transcript paths keyed by the file-name prefix before the first `-`.
///
/// Several transcripts may share a prefix (e.g. per-channel files); they
/// are kept in path order.
#[derive(Debug, Default)]
pub struct TranscriptIndex {
    by_call: HashMap<String, Vec<PathBuf>>,
}

impl TranscriptIndex {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut by_call: HashMap<String, Vec<PathBuf>> = HashMap::new();
        for path in paths {
            by_call.entry(call_key(&path)).or_default().push(path);
        }
        for paths in by_call.values_mut() {
            paths.sort();
        }
        Self { by_call }
    }

    pub fn get(&self, call_id: &str) -> Option<&[PathBuf]> {
        self.by_call.get(call_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_call.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_call.is_empty()
    }
}

fn call_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    stem.split('-').next().unwrap_or_default().to_string()
}

/// Build recording and supervision manifests for the Eval2000 corpus.
///
/// Every `.sph` file under `audio_dir` must have a transcript under
/// `transcripts_dir` whose name starts with the audio file stem.
pub fn prepare_eval2000(
    audio_dir: impl AsRef<Path>,
    transcripts_dir: impl AsRef<Path>,
    sentiment_dir: Option<&Path>,
    output_dir: Option<&Path>,
    options: &PrepareOptions,
) -> Result<Manifests> {
    let audio_paths = check_and_rglob(audio_dir.as_ref(), "sph")?;
    let transcripts = TranscriptIndex::new(check_and_rglob(transcripts_dir.as_ref(), "txt")?);

    info!(
        "Found {} audio files and transcripts for {} calls",
        audio_paths.len(),
        transcripts.len()
    );

    let relative_path_depth = if options.absolute_paths {
        None
    } else {
        Some(options.relative_path_depth)
    };

    let mut recordings = Vec::with_capacity(audio_paths.len());
    let mut segments = Vec::new();

    for audio_path in &audio_paths {
        let recording = Recording::from_file(audio_path, relative_path_depth)
            .with_context(|| format!("Failed to read recording {}", audio_path.display()))?;

        let transcript_paths =
            transcripts
                .get(&recording.id)
                .ok_or_else(|| PrepareError::MissingTranscript {
                    recording_id: recording.id.clone(),
                    audio_path: audio_path.clone(),
                })?;
        if transcript_paths.len() > 1 {
            warn!(
                "{} transcripts match {}, using {}",
                transcript_paths.len(),
                recording.id,
                transcript_paths[0].display()
            );
        }

        segments.extend(make_segments(
            &transcript_paths[0],
            &recording,
            CHANNEL,
            options.omit_silence,
        )?);
        recordings.push(recording);
    }

    let recordings = RecordingSet::from_recordings(recordings)?;
    let supervisions = SupervisionSet::from_segments(segments)?;

    let (recordings, mut supervisions) = fix_manifests(recordings, supervisions);
    validate_recordings_and_supervisions(&recordings, &supervisions)
        .context("Recordings and supervisions are inconsistent")?;

    if let Some(sentiment_dir) = sentiment_dir {
        parse_and_add_sentiment_labels(sentiment_dir, &mut supervisions)?;
    }

    info!(
        "Prepared {} recordings and {} supervisions",
        recordings.len(),
        supervisions.len()
    );

    let manifests = Manifests {
        recordings,
        supervisions,
    };

    if let Some(output_dir) = output_dir {
        manifests.write(output_dir)?;
        info!("Manifests written to {}", output_dir.display());
    }

    Ok(manifests)
}
