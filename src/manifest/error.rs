use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Failed to access manifest {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid manifest entry at {path}:{line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Every consistency problem found between a recording set and a
/// supervision set
#[derive(Debug, Error)]
#[error("{} manifest validation problem(s):\n  {}", .problems.len(), .problems.join("\n  "))]
pub struct ValidationError {
    pub problems: Vec<String>,
}
