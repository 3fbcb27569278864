pub mod audio;
pub mod config;
pub mod corpus;
pub mod manifest;

pub use audio::{AudioError, AudioFile, AudioInfo, SphereHeader};
pub use config::Config;
pub use corpus::{
    make_segments, parse_and_add_sentiment_labels, prepare_eval2000, Manifests, PrepareError,
    PrepareOptions,
};
pub use manifest::{
    fix_manifests, validate_recordings_and_supervisions, Recording, RecordingSet,
    SupervisionSegment, SupervisionSet, ValidationError,
};
