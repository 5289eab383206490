//! Seed and snapshot files.
//!
//! A snapshot is the list of primitive facts in a store, written as JSON:
//!
//! ```json
//! {"version": 1, "facts": [{"kind": "parent", "parent": "John", "child": "Mary"}]}
//! ```
//!
//! Snapshots taken from a store also carry `recorded_through`, the transaction
//! time of the newest fact they hold. The same format seeds a fresh engine at
//! startup; hand-written seeds may leave the timestamp out.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeedError;
use crate::fact::Fact;
use crate::storage::{FactStore, StorageError};

/// Current snapshot format version.
pub const SEED_VERSION: u32 = 1;

/// A serializable list of primitive facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// Facts in recording order.
    pub facts: Vec<Fact>,
    /// When the newest captured fact was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_through: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Snapshot {
    /// Creates a snapshot of the current version.
    #[must_use]
    pub fn new(facts: Vec<Fact>) -> Self {
        Self {
            version: SEED_VERSION,
            facts,
            recorded_through: None,
        }
    }

    /// Captures every primitive fact in `store`, in log order, stamped with
    /// the newest record's transaction time.
    ///
    /// Sibling facts are logged once per direction; only the direction with
    /// the smaller name first is kept.
    pub fn from_store(store: &dyn FactStore) -> Result<Self, StorageError> {
        let records = store.records()?;
        let recorded_through = records.last().map(|record| record.recorded_at);
        let facts = records
            .into_iter()
            .map(|record| record.fact)
            .filter(|fact| !matches!(fact, Fact::Sibling { a, b } if a > b))
            .collect();
        Ok(Self {
            recorded_through,
            ..Self::new(facts)
        })
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SeedError> {
        let snapshot: Self = serde_json::from_str(text)?;
        if snapshot.version != SEED_VERSION {
            return Err(SeedError::UnsupportedVersion {
                found: snapshot.version,
                expected: SEED_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SeedError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Writes the snapshot to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SeedError> {
        let mut text = self.to_json()?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// True when the snapshot holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
