use hound::WavReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::sphere::SphereHeader;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid audio header in {path}: {reason}")]
    InvalidHeader { path: PathBuf, reason: String },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Stream properties read from an audio file header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: u16,
    /// Samples per channel
    pub num_samples: u64,
    pub duration_seconds: f64,
}

/// An audio file on disk whose header has been probed.
///
/// Sample data is never decoded.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: PathBuf,
    pub info: AudioInfo,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        debug!("Probing audio file: {}", path.display());

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let info = match ext.as_deref() {
            Some("sph") => {
                let header = SphereHeader::read(path)?;
                if let Some(coding) = header.string("sample_coding") {
                    debug!("{}: sample_coding={}", path.display(), coding);
                }
                header
                    .audio_info()
                    .map_err(|reason| AudioError::InvalidHeader {
                        path: path.to_path_buf(),
                        reason,
                    })?
            }
            Some("wav") => wav_info(path)?,
            _ => return Err(AudioError::UnsupportedFormat(path.to_path_buf())),
        };

        debug!(
            "Audio header: {:.2}s, {}Hz, {} channels, {} samples",
            info.duration_seconds, info.sample_rate, info.channels, info.num_samples
        );

        Ok(Self {
            path: path.to_path_buf(),
            info,
        })
    }

    /// File stem, used as the recording id
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn wav_info(path: &Path) -> Result<AudioInfo, AudioError> {
    let reader = WavReader::open(path).map_err(|e| AudioError::InvalidHeader {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let spec = reader.spec();
    // duration() is in frames, i.e. samples per channel
    let num_samples = reader.duration() as u64;

    Ok(AudioInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        num_samples,
        duration_seconds: num_samples as f64 / spec.sample_rate as f64,
    })
}
