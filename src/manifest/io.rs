//! JSON Lines reading and writing shared by both manifest kinds

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::error::ManifestError;

pub fn write_jsonl<'a, T, I>(path: &Path, items: I) -> Result<usize, ManifestError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let io_err = |e: std::io::Error| ManifestError::Io(path.to_path_buf(), e);

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0usize;

    for item in items {
        serde_json::to_writer(&mut writer, item).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            line: count + 1,
            source,
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        count += 1;
    }

    writer.flush().map_err(io_err)?;
    info!("Wrote {} entries to {}", count, path.display());

    Ok(count)
}

/// Read one JSON object per line; blank lines are ignored
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ManifestError> {
    let io_err = |e: std::io::Error| ManifestError::Io(path.to_path_buf(), e);

    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut items = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        items.push(item);
    }

    Ok(items)
}
