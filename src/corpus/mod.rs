//! Eval2000 corpus preparation
//!
//! This module turns the raw corpus layout into manifests:
//! - File discovery under the audio and transcript roots
//! - ISIP transcript parsing into supervision segments
//! - Optional sentiment label overlay (LDC2020T14)
//! - Assembly, fixing, validation and output of both manifests

mod prepare;
mod scan;
mod sentiment;
mod transcript;

pub use prepare::{
    prepare_eval2000, Manifests, PrepareError, PrepareOptions, TranscriptIndex, RECORDINGS_FILE,
    SUPERVISIONS_FILE,
};
pub use scan::{check_and_rglob, ScanError};
pub use sentiment::{
    apply_sentiment_rows, parse_and_add_sentiment_labels, read_sentiment_rows, SentimentError,
    SentimentRow, SentimentStats, LABELS_RELATIVE_PATH, MATCH_TOLERANCE_SECS,
};
pub use transcript::{
    is_utterance_line, make_segments, parse_isip_line, IsipLine, LineError, TranscriptError,
    LANGUAGE, SILENCE_TOKEN,
};
