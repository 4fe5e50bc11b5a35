//! Durable storage for ATH records
//!
//! One JSON document keyed by token identifier. Writes go through a
//! temp file and rename so a crash mid-write leaves the previous state
//! intact.

use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::errors::{OracleError, OracleResult};
use crate::types::AthRecord;

pub struct AthStore {
    path: PathBuf,
}

impl AthStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read all records. A missing file is an empty store, not an error.
    pub fn load(&self) -> OracleResult<HashMap<String, AthRecord>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))
            .map_err(|e| self.storage_error(e))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed ATH state in {}", self.path.display()))
            .map_err(|e| self.storage_error(e))
    }

    /// Atomically replace the stored document.
    pub fn persist(&self, records: &HashMap<String, AthRecord>) -> OracleResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))
                .map_err(|e| self.storage_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(records)
            .context("Failed to serialize ATH state")
            .map_err(|e| self.storage_error(e))?;

        fs::write(&tmp, body)
            .with_context(|| format!("Failed to write {}", tmp.display()))
            .map_err(|e| self.storage_error(e))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))
            .map_err(|e| self.storage_error(e))
    }

    fn storage_error(&self, source: anyhow::Error) -> OracleError {
        OracleError::Storage {
            context: self.path.display().to_string(),
            source,
        }
    }
}
