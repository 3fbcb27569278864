//! ISIP transcript parsing
//!
//! Transcript files hold one utterance per line:
//!
//! ```text
//! # comment
//! 0.00 2.81 A: hi how are you
//! 2.81 3.40 B: [silence]
//! ```
//!
//! Comment lines and lines with fewer than four fields are dropped, the
//! remaining lines are numbered from zero and each numbered line becomes
//! one supervision segment.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::manifest::{round_secs, Recording, SupervisionSegment};

pub const SILENCE_TOKEN: &str = "[silence]";
pub const LANGUAGE: &str = "English";

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Failed to read transcript {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Malformed transcript line {path}:{line}: {source}")]
    Line {
        path: PathBuf,
        line: usize,
        #[source]
        source: LineError,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    #[error("expected id, start, end and speaker, got {0} field(s)")]
    TooFewFields(usize),

    #[error("invalid {field} time {value:?}")]
    InvalidTime { field: &'static str, value: String },

    #[error("no words after the speaker field")]
    MissingWords,
}

/// One numbered transcript line: `id start end speaker words...`
#[derive(Debug, Clone, PartialEq)]
pub struct IsipLine<'a> {
    pub segment_id: &'a str,
    pub start: f64,
    pub end: f64,
    pub speaker: &'a str,
    pub words: Vec<&'a str>,
}

impl<'a> IsipLine<'a> {
    pub fn is_silence(&self) -> bool {
        self.words.first() == Some(&SILENCE_TOKEN)
    }

    pub fn into_segment(self, recording_id: &str, channel: u16) -> SupervisionSegment {
        SupervisionSegment {
            id: format!("{}_{}", recording_id, self.segment_id),
            recording_id: recording_id.to_string(),
            start: self.start,
            duration: round_secs(self.end - self.start),
            channel,
            text: self.words.join(" "),
            language: LANGUAGE.to_string(),
            speaker: format!(
                "{}_{}_{}",
                recording_id,
                self.segment_id,
                self.speaker.replace(':', "")
            ),
            custom: None,
        }
    }
}

pub fn parse_isip_line(line: &str) -> Result<IsipLine<'_>, LineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [segment_id, start, end, speaker, words @ ..] = fields.as_slice() else {
        return Err(LineError::TooFewFields(fields.len()));
    };

    if words.is_empty() {
        return Err(LineError::MissingWords);
    }

    Ok(IsipLine {
        segment_id: *segment_id,
        start: parse_time("start", start)?,
        end: parse_time("end", end)?,
        speaker: *speaker,
        words: words.to_vec(),
    })
}

fn parse_time(field: &'static str, value: &str) -> Result<f64, LineError> {
    value.parse().map_err(|_| LineError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// Whether a raw (unnumbered) transcript line carries an utterance
pub fn is_utterance_line(line: &str) -> bool {
    !line.starts_with('#') && line.split_whitespace().count() >= 4
}

/// Parse one transcript file into supervision segments for `channel`
/// of `recording`. Segments starting with `[silence]` are skipped when
/// `omit_silence` is set; numbering is unaffected by the skip.
pub fn make_segments(
    transcript_path: &Path,
    recording: &Recording,
    channel: u16,
    omit_silence: bool,
) -> Result<Vec<SupervisionSegment>, TranscriptError> {
    let text = std::fs::read_to_string(transcript_path)
        .map_err(|e| TranscriptError::Io(transcript_path.to_path_buf(), e))?;

    let mut segments = Vec::new();
    let mut silences = 0usize;

    let utterances = text
        .lines()
        .enumerate()
        .filter(|(_, line)| is_utterance_line(line));

    for (segment_idx, (line_idx, line)) in utterances.enumerate() {
        let numbered = format!("{} {}", segment_idx, line);
        let parsed = parse_isip_line(&numbered).map_err(|source| TranscriptError::Line {
            path: transcript_path.to_path_buf(),
            line: line_idx + 1,
            source,
        })?;

        if omit_silence && parsed.is_silence() {
            silences += 1;
            continue;
        }
        segments.push(parsed.into_segment(&recording.id, channel));
    }

    debug!(
        "{}: {} segments, {} silences omitted",
        transcript_path.display(),
        segments.len(),
        silences
    );

    Ok(segments)
}
