//! Training corpus: one JSON file per accepted training call.

use std::path::{Path, PathBuf};
use stylecast_core::error::ProfileError;
use stylecast_core::profile::TrainingRecord;
use tracing::{debug, warn};

const MAX_SLUG_LEN: usize = 40;

pub struct TrainingCorpus {
    dir: PathBuf,
}

impl TrainingCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `record` as `<timestamp>-<source-slug>.json`.
    pub fn write(&self, record: &TrainingRecord) -> Result<PathBuf, ProfileError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ProfileError::Write {
            path: self.dir.clone(),
            reason: e.to_string(),
        })?;

        let stem = format!(
            "{}-{}",
            record.timestamp.format("%Y%m%dT%H%M%S%.3fZ"),
            slug(&record.source)
        );
        let mut path = self.dir.join(format!("{stem}.json"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{stem}-{n}.json"));
            n += 1;
        }

        let json = serde_json::to_string_pretty(record).map_err(|e| ProfileError::Write {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| ProfileError::Write {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "Training record written");
        Ok(path)
    }

    /// Every readable record, oldest first. A missing directory is an empty
    /// corpus.
    pub fn list(&self) -> Vec<TrainingRecord> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut records: Vec<TrainingRecord> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                let parsed = std::fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()));
                match parsed {
                    Ok(record) => Some(record),
                    Err(reason) => {
                        warn!(path = %path.display(), %reason, "Skipping unreadable training record");
                        None
                    }
                }
            })
            .collect();

        records.sort_by_key(|r| r.timestamp);
        records
    }
}

/// Lowercase ASCII alphanumerics, everything else collapsed to `-`.
fn slug(source: &str) -> String {
    let mut out = String::new();
    for ch in source.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
        if out.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
