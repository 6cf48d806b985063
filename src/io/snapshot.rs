//! Read/write snapshot JSON files.
//!
//! The snapshot is one flat object: indicator keys first, then `source_*`
//! provenance, then `generated_at_utc`. Writes go to a temporary sibling that
//! is renamed into place, so a failed run never leaves a truncated file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::domain::{IndicatorValue, Snapshot};
use crate::error::AppError;

const GENERATED_AT_KEY: &str = "generated_at_utc";
/// Bare `source` is what older snapshots used for the feed URL.
const SOURCE_KEY: &str = "source";
const SOURCE_PREFIX: &str = "source_";

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.indicators.len() + self.sources.len() + 1))?;
        for (key, value) in &self.indicators {
            map.serialize_entry(key, value)?;
        }
        for (key, value) in &self.sources {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(GENERATED_AT_KEY, &self.generated_at_utc)?;
        map.end()
    }
}

/// Pretty-printed JSON for a snapshot.
pub fn snapshot_to_string(snapshot: &Snapshot) -> Result<String, AppError> {
    serde_json::to_string_pretty(snapshot)
        .map_err(|e| AppError::new(2, format!("Failed to serialize snapshot: {e}")))
}

/// Write a snapshot JSON file, creating parent directories as needed.
pub fn write_snapshot_json(path: &Path, snapshot: &Snapshot) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::new(2, format!("Failed to create output directory '{}': {e}", parent.display()))
        })?;
    }

    let tmp = tmp_path(path);
    let result = write_file(&tmp, snapshot).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| {
            AppError::new(2, format!("Failed to move snapshot into '{}': {e}", path.display()))
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_file(path: &Path, snapshot: &Snapshot) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create snapshot '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, snapshot)
        .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;
    writeln!(writer).map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a snapshot JSON file.
pub fn read_snapshot_json(path: &Path) -> Result<Snapshot, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open snapshot '{}': {e}", path.display())))?;
    let value: Value = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid snapshot JSON: {e}")))?;
    snapshot_from_value(value)
}

/// Split a flat snapshot object back into indicators and provenance.
pub fn snapshot_from_value(value: Value) -> Result<Snapshot, AppError> {
    let Value::Object(map) = value else {
        return Err(AppError::new(2, "Invalid snapshot JSON: expected an object."));
    };

    let mut indicators = Vec::new();
    let mut sources = Vec::new();
    let mut generated_at_utc = None;

    for (key, value) in map {
        if key == GENERATED_AT_KEY {
            generated_at_utc = value.as_str().map(str::to_string);
        } else if key == SOURCE_KEY || key.starts_with(SOURCE_PREFIX) {
            let source = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
            sources.push((key, source));
        } else {
            let parsed: IndicatorValue = serde_json::from_value(value)
                .map_err(|e| AppError::new(2, format!("Invalid snapshot entry '{key}': {e}")))?;
            indicators.push((key, parsed));
        }
    }

    let generated_at_utc = generated_at_utc
        .ok_or_else(|| AppError::new(2, format!("Invalid snapshot JSON: missing '{GENERATED_AT_KEY}'.")))?;

    Ok(Snapshot {
        indicators,
        sources,
        generated_at_utc,
    })
}
