//! Recording and supervision manifests
//!
//! This module provides the two collections produced by corpus
//! preparation, their JSON Lines form, and the fix/validate steps that
//! keep them consistent with each other.

mod error;
mod io;
mod recording;
mod supervision;
mod validate;

pub use error::{ManifestError, ValidationError};
pub use io::{read_jsonl, write_jsonl};
pub use recording::{truncate_path, AudioSource, Recording, RecordingSet};
pub use supervision::{round_secs, SupervisionSegment, SupervisionSet};
pub use validate::{fix_manifests, validate_recordings_and_supervisions};
