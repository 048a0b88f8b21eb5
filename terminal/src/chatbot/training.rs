//! # Training Book
//!
//! Patterns taught to Sparky, persisted as JSON:
//!
//! ```json
//! {
//!   "patterns": [
//!     { "pattern": "refund", "response": "Refunds take 5 days.", "category": "custom" }
//!   ]
//! }
//! ```
//!
//! Entries are matched in insertion order by case-insensitive substring
//! containment, so older patterns shadow newer overlapping ones.

use crate::core::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CUSTOM_CATEGORY: &str = "custom";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingEntry {
    pub pattern: String,
    pub response: String,
    pub category: String,
}

impl TrainingEntry {
    pub fn custom(pattern: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            response: response.into(),
            category: CUSTOM_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BookFile {
    #[serde(default)]
    patterns: Vec<TrainingEntry>,
}

#[derive(Debug)]
pub struct TrainingBook {
    /// `None` keeps the book in memory only.
    path: Option<PathBuf>,
    entries: Vec<TrainingEntry>,
}

impl TrainingBook {
    /// Load the book at `path`. A missing or unreadable file yields an empty book.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BookFile>(&raw) {
                Ok(file) => file.patterns,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "[TRAINING] Corrupt training file, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "[TRAINING] No training file yet");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "[TRAINING] Could not read training file, starting empty");
                Vec::new()
            }
        };

        info!(path = %path.display(), patterns = entries.len(), "[TRAINING] Loaded");
        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
        }
    }

    /// Write the book as pretty JSON, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = BookFile {
            patterns: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::write(path, json)?;

        debug!(path = %path.display(), patterns = self.entries.len(), "[TRAINING] Saved");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn entries(&self) -> &[TrainingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: TrainingEntry) {
        self.entries.push(entry);
    }

    pub fn remove(&mut self, index: usize) -> Option<TrainingEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Drop every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// First entry whose pattern appears in `text`, ignoring case.
    pub fn find_match(&self, text: &str) -> Option<&TrainingEntry> {
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .find(|entry| lower.contains(&entry.pattern.to_lowercase()))
    }
}
