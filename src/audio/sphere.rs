//! NIST SPHERE header reader
//!
//! SPHERE files start with a plain-text header:
//!
//! ```text
//! NIST_1A
//!    1024
//! sample_rate -i 8000
//! channel_count -i 2
//! sample_count -i 4000000
//! end_head
//! ```
//!
//! Only the header is read; the sample data (often shorten-compressed in
//! LDC releases) is never touched.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use super::file::{AudioError, AudioInfo};

const MAGIC: &str = "NIST_1A";

/// A typed header value
#[derive(Debug, Clone, PartialEq)]
pub enum SphereValue {
    Int(i64),
    Real(f64),
    Str(String),
}

/// Parsed SPHERE header fields
#[derive(Debug, Clone, Default)]
pub struct SphereHeader {
    pub header_size: usize,
    pub fields: HashMap<String, SphereValue>,
}

impl SphereHeader {
    pub fn read(path: &Path) -> Result<Self, AudioError> {
        let file = File::open(path).map_err(|e| AudioError::Io(path.to_path_buf(), e))?;
        Self::from_reader(BufReader::new(file)).map_err(|reason| AudioError::InvalidHeader {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse a header from any reader positioned at the start of the file
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, String> {
        let mut lines = reader.lines();

        let magic = next_line(&mut lines)?;
        if magic.trim() != MAGIC {
            return Err(format!("bad magic {:?}, expected {}", magic.trim(), MAGIC));
        }

        let size_line = next_line(&mut lines)?;
        let header_size: usize = size_line
            .trim()
            .parse()
            .map_err(|_| format!("bad header size {:?}", size_line.trim()))?;

        // Everything after the header block is sample data and must not be read
        let mut consumed = magic.len() + size_line.len() + 2;
        let mut fields = HashMap::new();

        loop {
            if consumed > header_size {
                return Err("header ended without end_head".to_string());
            }
            let line = next_line(&mut lines)?;
            consumed += line.len() + 1;

            let line = line.trim();
            if line == "end_head" {
                break;
            }
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let (key, value) = parse_field(line)?;
            fields.insert(key, value);
        }

        Ok(Self { header_size, fields })
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(SphereValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(SphereValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Extract the stream properties a Recording needs
    pub fn audio_info(&self) -> Result<AudioInfo, String> {
        let sample_rate = u32::try_from(self.positive("sample_rate")?)
            .map_err(|_| "sample_rate out of range".to_string())?;
        let channels = u16::try_from(self.positive("channel_count")?)
            .map_err(|_| "channel_count out of range".to_string())?;
        let sample_count = self
            .int("sample_count")
            .filter(|v| *v >= 0)
            .ok_or_else(|| "missing or negative sample_count".to_string())? as u64;

        Ok(AudioInfo {
            sample_rate,
            channels,
            num_samples: sample_count,
            duration_seconds: sample_count as f64 / sample_rate as f64,
        })
    }

    fn positive(&self, key: &str) -> Result<i64, String> {
        self.int(key)
            .filter(|v| *v > 0)
            .ok_or_else(|| format!("missing or non-positive {}", key))
    }
}

fn next_line<R: BufRead>(lines: &mut Lines<R>) -> Result<String, String> {
    match lines.next() {
        Some(Ok(line)) => Ok(line),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("unexpected end of header".to_string()),
    }
}

fn parse_field(line: &str) -> Result<(String, SphereValue), String> {
    let mut parts = line.split_whitespace();
    let key = parts.next().unwrap_or_default();
    let kind = parts
        .next()
        .ok_or_else(|| format!("field {:?} has no type", key))?;
    let raw = parts.collect::<Vec<_>>().join(" ");
    let raw = raw.as_str();

    let value = match kind {
        "-i" => SphereValue::Int(
            raw.parse()
                .map_err(|_| format!("field {} is not an integer: {:?}", key, raw))?,
        ),
        "-r" => SphereValue::Real(
            raw.parse()
                .map_err(|_| format!("field {} is not a real: {:?}", key, raw))?,
        ),
        k if k.starts_with("-s") => SphereValue::Str(raw.to_string()),
        other => return Err(format!("field {} has unknown type {}", key, other)),
    };

    Ok((key.to_string(), value))
}
