use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::error::ManifestError;
use super::io::{read_jsonl, write_jsonl};

/// Round seconds to 8 decimal places.
///
/// Rounding goes through the exact decimal expansion of `value`, so
/// `1.000000005` (stored just below the midpoint) becomes `1.0`.
pub fn round_secs(value: f64) -> f64 {
    format!("{:.8}", value).parse().unwrap_or(value)
}

/// A time-bounded annotated span of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionSegment {
    pub id: String,
    pub recording_id: String,
    pub start: f64,
    pub duration: f64,
    pub channel: u16,
    pub text: String,
    pub language: String,
    pub speaker: String,
    /// Free-form string attributes attached after parsing (sentiment labels)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<BTreeMap<String, String>>,
}

impl SupervisionSegment {
    pub fn end(&self) -> f64 {
        round_secs(self.start + self.duration)
    }

    /// Replace the whole custom mapping. Previous entries are discarded,
    /// so the last caller wins.
    pub fn set_custom(&mut self, custom: BTreeMap<String, String>) {
        self.custom = Some(custom);
    }

    pub fn custom_value(&self, key: &str) -> Option<&str> {
        self.custom.as_ref()?.get(key).map(String::as_str)
    }
}

/// Supervision segments in insertion order, indexed by id
#[derive(Debug, Clone, Default)]
pub struct SupervisionSet {
    segments: Vec<SupervisionSegment>,
    index: HashMap<String, usize>,
}

impl SupervisionSet {
    pub fn from_segments(
        segments: impl IntoIterator<Item = SupervisionSegment>,
    ) -> Result<Self, ManifestError> {
        let mut set = Self::default();
        for segment in segments {
            if set.index.contains_key(&segment.id) {
                return Err(ManifestError::DuplicateId {
                    kind: "supervision",
                    id: segment.id,
                });
            }
            set.index.insert(segment.id.clone(), set.segments.len());
            set.segments.push(segment);
        }
        Ok(set)
    }

    pub fn get(&self, id: &str) -> Option<&SupervisionSegment> {
        self.index.get(id).map(|&i| &self.segments[i])
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SupervisionSegment> {
        self.segments.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SupervisionSegment> {
        self.segments.iter_mut()
    }

    /// Segments of `recording_id` lying entirely inside
    /// `[start_after, end_before]`
    pub fn find<'a>(
        &'a self,
        recording_id: &'a str,
        start_after: f64,
        end_before: f64,
    ) -> impl Iterator<Item = &'a SupervisionSegment> + 'a {
        self.segments
            .iter()
            .filter(move |s| contained(s, recording_id, start_after, end_before))
    }

    /// Mutable variant of [`find`](Self::find)
    pub fn find_mut<'a>(
        &'a mut self,
        recording_id: &'a str,
        start_after: f64,
        end_before: f64,
    ) -> impl Iterator<Item = &'a mut SupervisionSegment> + 'a {
        self.segments
            .iter_mut()
            .filter(move |s| contained(s, recording_id, start_after, end_before))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&SupervisionSegment) -> bool) {
        self.segments.retain(|s| keep(s));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<usize, ManifestError> {
        write_jsonl(path.as_ref(), &self.segments)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        Self::from_segments(read_jsonl::<SupervisionSegment>(path.as_ref())?)
    }
}

fn contained(s: &SupervisionSegment, recording_id: &str, start_after: f64, end_before: f64) -> bool {
    s.recording_id == recording_id && s.start >= start_after && s.end() <= end_before
}

impl<'a> IntoIterator for &'a SupervisionSet {
    type Item = &'a SupervisionSegment;
    type IntoIter = std::slice::Iter<'a, SupervisionSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
