//! Sentiment annotations (LDC2020T14) overlaid on parsed supervisions
//!
//! The label file is a headerless TSV of `id start end sentiment` rows.
//! The call id is the part of `id` before the first `_`; the sentiment
//! column holds one label per annotator, separated by `#`.
//!
//! Rows are matched to existing segments by time containment rather than
//! by id, since the annotation spans were cut independently of the ISIP
//! transcripts. A small fraction of rows (about 1%) matches nothing and
//! is skipped.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::manifest::SupervisionSet;

pub const LABELS_RELATIVE_PATH: &str = "data/sentiment_labels.tsv";

/// Slack applied on both ends of an annotated span
pub const MATCH_TOLERANCE_SECS: f64 = 1e-2;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("Sentiment directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Sentiment labels file not found: {0}")]
    MissingLabels(PathBuf),

    #[error("Failed to read sentiment labels {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentimentRow {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub sentiment: String,
}

impl SentimentRow {
    pub fn call_id(&self) -> &str {
        self.id.split('_').next().unwrap_or_default()
    }

    /// `sentiment0`, `sentiment1`, ... for each annotator's label
    pub fn labels(&self) -> BTreeMap<String, String> {
        self.sentiment
            .split('#')
            .enumerate()
            .map(|(i, label)| (format!("sentiment{}", i), label.to_string()))
            .collect()
    }
}

/// Outcome of one labelling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentStats {
    pub rows: usize,
    pub matched_rows: usize,
    pub labelled_segments: usize,
}

pub fn read_sentiment_rows(path: &Path) -> Result<Vec<SentimentRow>, SentimentError> {
    let csv_err = |source: csv::Error| SentimentError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    reader
        .deserialize::<SentimentRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)
}

/// Overwrite the `custom` mapping of every segment falling inside a
/// labelled span. A segment covered by several rows keeps the labels of
/// the last one.
pub fn apply_sentiment_rows(rows: &[SentimentRow], supervisions: &mut SupervisionSet) -> SentimentStats {
    let mut stats = SentimentStats {
        rows: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let labels = row.labels();
        let mut matched = 0usize;

        for segment in supervisions.find_mut(
            row.call_id(),
            row.start - MATCH_TOLERANCE_SECS,
            row.end + MATCH_TOLERANCE_SECS,
        ) {
            segment.set_custom(labels.clone());
            matched += 1;
        }

        if matched == 0 {
            debug!("No segment inside {} [{}, {}]", row.id, row.start, row.end);
            continue;
        }
        stats.matched_rows += 1;
        stats.labelled_segments += matched;
    }

    stats
}

pub fn parse_and_add_sentiment_labels(
    sentiment_dir: impl AsRef<Path>,
    supervisions: &mut SupervisionSet,
) -> Result<SentimentStats, SentimentError> {
    let sentiment_dir = sentiment_dir.as_ref();
    if !sentiment_dir.is_dir() {
        return Err(SentimentError::MissingDirectory(sentiment_dir.to_path_buf()));
    }
    let labels_path = sentiment_dir.join(LABELS_RELATIVE_PATH);
    if !labels_path.is_file() {
        return Err(SentimentError::MissingLabels(labels_path));
    }

    let rows = read_sentiment_rows(&labels_path)?;
    let stats = apply_sentiment_rows(&rows, supervisions);

    info!(
        "Sentiment labels: {}/{} rows matched, {} segments labelled",
        stats.matched_rows, stats.rows, stats.labelled_segments
    );

    Ok(stats)
}
