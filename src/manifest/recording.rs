use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path};

use super::error::ManifestError;
use super::io::{read_jsonl, write_jsonl};
use crate::audio::{AudioError, AudioFile};

/// Where a recording's samples live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    /// Source kind; always "file" for on-disk corpora
    #[serde(rename = "type")]
    pub kind: String,
    pub channels: Vec<u16>,
    pub source: String,
}

/// Metadata describing one audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    pub sources: Vec<AudioSource>,
    pub sampling_rate: u32,
    pub num_samples: u64,
    pub duration: f64,
    pub channel_ids: Vec<u16>,
}

impl Recording {
    /// Build a recording from an audio file header.
    ///
    /// With `relative_path_depth: None` the stored path is absolute;
    /// otherwise only its last `depth` components are kept.
    pub fn from_file(
        path: impl AsRef<Path>,
        relative_path_depth: Option<usize>,
    ) -> Result<Self, AudioError> {
        let audio = AudioFile::open(path.as_ref())?;

        let source = match relative_path_depth {
            None => std::fs::canonicalize(&audio.path)
                .map_err(|e| AudioError::Io(audio.path.clone(), e))?
                .display()
                .to_string(),
            Some(depth) => truncate_path(&audio.path, depth),
        };

        let channel_ids: Vec<u16> = (0..audio.info.channels).collect();

        Ok(Self {
            id: audio.stem(),
            sources: vec![AudioSource {
                kind: "file".to_string(),
                channels: channel_ids.clone(),
                source,
            }],
            sampling_rate: audio.info.sample_rate,
            num_samples: audio.info.num_samples,
            duration: audio.info.duration_seconds,
            channel_ids,
        })
    }

    pub fn has_channel(&self, channel: u16) -> bool {
        self.channel_ids.contains(&channel)
    }
}

/// Keep the last `depth` normal components of a path, joined with '/'
pub fn truncate_path(path: &Path, depth: usize) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let skip = parts.len().saturating_sub(depth);
    parts[skip..].join("/")
}

/// Recordings in insertion order, indexed by id
#[derive(Debug, Clone, Default)]
pub struct RecordingSet {
    recordings: Vec<Recording>,
    index: HashMap<String, usize>,
}

impl RecordingSet {
    pub fn from_recordings(
        recordings: impl IntoIterator<Item = Recording>,
    ) -> Result<Self, ManifestError> {
        let mut set = Self::default();
        for recording in recordings {
            if set.index.contains_key(&recording.id) {
                return Err(ManifestError::DuplicateId {
                    kind: "recording",
                    id: recording.id,
                });
            }
            set.index.insert(recording.id.clone(), set.recordings.len());
            set.recordings.push(recording);
        }
        Ok(set)
    }

    pub fn get(&self, id: &str) -> Option<&Recording> {
        self.index.get(id).map(|&i| &self.recordings[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recording> {
        self.recordings.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.recordings.iter().map(|r| r.id.as_str())
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Recording) -> bool) {
        self.recordings.retain(|r| keep(r));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .recordings
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<usize, ManifestError> {
        write_jsonl(path.as_ref(), &self.recordings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        Self::from_recordings(read_jsonl::<Recording>(path.as_ref())?)
    }
}

impl<'a> IntoIterator for &'a RecordingSet {
    type Item = &'a Recording;
    type IntoIter = std::slice::Iter<'a, Recording>;

    fn into_iter(self) -> Self::IntoIter {
        self.recordings.iter()
    }
}
