//! Corpus loading from JSON files.
//!
//! A corpus file is a JSON array of record objects. A directory is walked for
//! `*.json` files which are concatenated in sorted path order.
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{synthesize_id, QaRecord};

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub path: PathBuf,
    pub records: Vec<QaRecord>,
    pub skipped: usize,
}

#[derive(Default)]
pub struct CorpusLoader;

impl CorpusLoader {
    pub fn new() -> Self { Self }

    /// Try each candidate in order and return the first that loads.
    pub fn load_first_available(&self, candidates: &[PathBuf]) -> Result<LoadReport> {
        let mut last_err = None;
        for path in candidates {
            match self.load(path) {
                Ok(report) => return Ok(report),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "corpus candidate rejected");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| Error::unavailable(PathBuf::new(), "no corpus location configured")))
    }

    pub fn load(&self, path: &Path) -> Result<LoadReport> {
        let files = if path.is_dir() { self.list_json_files(path) } else { vec![path.to_path_buf()] };
        if files.is_empty() {
            return Err(Error::unavailable(path, "no .json files found"));
        }
        let mut records = Vec::new();
        let mut skipped = 0;
        let mut position = 0;
        for file in &files {
            let entries = self.read_entries(file)?;
            for entry in entries {
                match self.parse_entry(entry, position) {
                    Ok(record) => records.push(record),
                    Err(reason) => {
                        tracing::warn!(file = %file.display(), position = position + 1, reason = %reason, "skipping record");
                        skipped += 1;
                    }
                }
                position += 1;
            }
        }
        tracing::info!(path = %path.display(), loaded = records.len(), skipped, "corpus loaded");
        Ok(LoadReport { path: path.to_path_buf(), records, skipped })
    }

    fn read_entries(&self, file: &Path) -> Result<Vec<Value>> {
        let bytes = fs::read(file).map_err(|e| Error::unavailable(file, e))?;
        let content = String::from_utf8_lossy(&bytes);
        let content = content.trim_start_matches('\u{feff}');
        match serde_json::from_str::<Value>(content).map_err(|e| Error::unavailable(file, e))? {
            Value::Array(entries) => Ok(entries),
            _ => Err(Error::unavailable(file, "expected a JSON array of records")),
        }
    }

    /// Err carries the reason the entry was rejected.
    fn parse_entry(&self, entry: Value, position: usize) -> std::result::Result<QaRecord, String> {
        let mut record: QaRecord = serde_json::from_value(entry).map_err(|e| e.to_string())?;
        if !record.is_searchable() {
            return Err("empty question or answer".to_string());
        }
        if record.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            record.id = Some(synthesize_id(position));
        }
        Ok(record)
    }

    fn list_json_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut json_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("json") { json_files.push(path.to_path_buf()); }
        }
        json_files.sort(); json_files
    }
}

/// Write records as pretty JSON, the same shape [`CorpusLoader`] reads.
pub fn write_records(path: &Path, records: &[QaRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| Error::Operation(e.to_string()))?;
    fs::write(path, json).map_err(|e| Error::Operation(format!("write {}: {}", path.display(), e)))
}
