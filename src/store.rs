//! Keyed JSON document store.
//!
//! A single file holds the append-only sample log and results log:
//! ```json
//! { "traffic_data": [...], "results": [...] }
//! ```
//! Semantics are read-all / append / find-by-id; appends rewrite the whole
//! file. The core never mutates or deletes existing records.

use crate::engine::types::AnalysisResult;
use crate::sample::TrafficSample;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk shape of the store file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub traffic_data: Vec<TrafficSample>,
    #[serde(default)]
    pub results: Vec<AnalysisResult>,
}

/// Handle to the JSON document store at a fixed path.
#[derive(Debug, Clone)]
pub struct DataStore {
    path: PathBuf,
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole store. A missing file is an empty store, not an error.
    pub fn load(&self) -> Result<Database> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Store file missing, starting empty");
            return Ok(Database::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let db = serde_json::from_str(&content)
            .with_context(|| format!("corrupt store file {}", self.path.display()))?;
        Ok(db)
    }

    fn save(&self, db: &Database) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(db)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Appends one traffic sample to the sample log.
    pub fn append_sample(&self, sample: TrafficSample) -> Result<()> {
        let mut db = self.load()?;
        debug!(sample_id = %sample.id, "Appending traffic sample");
        db.traffic_data.push(sample);
        self.save(&db)
    }

    /// Appends a batch of samples in one read-modify-write.
    pub fn append_samples(&self, samples: Vec<TrafficSample>) -> Result<()> {
        let mut db = self.load()?;
        debug!(count = samples.len(), "Appending traffic samples");
        db.traffic_data.extend(samples);
        self.save(&db)
    }

    /// Appends one analysis result to the results log.
    pub fn append_result(&self, result: &AnalysisResult) -> Result<()> {
        let mut db = self.load()?;
        debug!(result_id = %result.id, "Appending analysis result");
        db.results.push(result.clone());
        self.save(&db)
    }

    /// Retrieves a stored result by id, for report regeneration.
    pub fn find_result(&self, id: &str) -> Result<Option<AnalysisResult>> {
        let db = self.load()?;
        Ok(db.results.into_iter().find(|r| r.id == id))
    }
}
