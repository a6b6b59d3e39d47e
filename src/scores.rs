//! Session score ledger
//!
//! The collaborator side of score delivery: an append-only record of
//! finished sessions, persisted as a JSON list. Load failures fall back to
//! an empty ledger; save failures are the caller's to log. The simulation
//! never depends on any of this succeeding.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::remote::{ScoreError, ScoreSink};
use crate::sim::{SessionOutcome, SessionResult};

/// One finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u64,
    pub total_food_eaten: u32,
    pub rotten_food_eaten: u32,
    pub corruption_percent: f32,
    pub super_corrupted: bool,
    pub result: SessionResult,
    /// Unix timestamp (ms) when recorded
    pub recorded_at: u64,
}

/// Ledger of finished sessions, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreLedger {
    pub entries: Vec<ScoreRecord>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome, stamped with `recorded_at`
    pub fn record(&mut self, outcome: &SessionOutcome, recorded_at: u64) -> &ScoreRecord {
        self.entries.push(ScoreRecord {
            score: outcome.score,
            total_food_eaten: outcome.total_food_eaten,
            rotten_food_eaten: outcome.rotten_food_eaten,
            corruption_percent: outcome.corruption_percent,
            super_corrupted: outcome.super_corrupted,
            result: outcome.result,
            recorded_at,
        });
        self.entries.last().expect("just pushed")
    }

    /// The highest-scoring record, if any
    pub fn best(&self) -> Option<&ScoreRecord> {
        self.entries.iter().max_by_key(|r| r.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a ledger from disk. A missing file is an empty ledger; a
    /// malformed one is logged and replaced by an empty ledger.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(ledger) => ledger,
                Err(err) => {
                    log::warn!("score ledger at {} is malformed: {err}", path.display());
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    /// Write the ledger to disk
    pub fn save(&self, path: &Path) -> Result<(), ScoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("score ledger saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// [`ScoreSink`] that appends each outcome to a ledger file
pub struct FileScoreSink {
    path: PathBuf,
}

impl FileScoreSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreSink for FileScoreSink {
    fn submit(&mut self, outcome: &SessionOutcome) -> Result<(), ScoreError> {
        let mut ledger = ScoreLedger::load(&self.path);
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let _ = ledger.record(outcome, stamp);
        ledger.save(&self.path)
    }
}
