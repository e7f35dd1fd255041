//! # Computation History
//!
//! Every call to
//! [`Session::compute_results`](crate::session::Session::compute_results)
//! that found at least one conductor appends a snapshot here: when it ran,
//! the full configuration it ran with, and what it produced (including an
//! aggregate failure, if there was one).
//!
//! The log is bounded. Once `capacity` entries are held, recording a new one
//! evicts the oldest. [`History::clear`] drops everything.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calculations::AveragingMode;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::Point;
use crate::materials::ConductorMaterial;
use crate::phase::PerPhase;
use crate::session::LineResults;
use crate::units::LengthUnit;

/// Entries kept when no capacity is configured
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Copy of the session configuration at the time of a computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub unit: LengthUnit,
    pub material: ConductorMaterial,
    pub length_km: f64,
    pub radius_m: f64,
    pub frequency_hz: f64,
    pub averaging: AveragingMode,
    /// Conductor positions per phase (m)
    pub bundles: PerPhase<Vec<Point>>,
    /// Self-GMR per phase (m)
    pub self_gmr_m: PerPhase<f64>,
}

/// One recorded computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub config: ConfigSnapshot,
    pub results: LineResults,
}

/// Bounded, append-only log of computations, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(deserialize_with = "deserialize_capacity")]
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl History {
    /// Create an empty history holding at most `capacity` entries.
    pub fn new(capacity: usize) -> CalcResult<Self> {
        validate_capacity(capacity)?;
        Ok(History {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        })
    }

    /// Append a computation, evicting the oldest entry when full.
    pub fn record(&mut self, config: ConfigSnapshot, results: LineResults) -> &HistoryEntry {
        while self.entries.len() >= self.capacity.max(1) {
            match self.entries.pop_front() {
                Some(evicted) => debug!(id = %evicted.id, "history full, evicting oldest entry"),
                None => break,
            }
        }
        self.entries.push_back(HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            config,
            results,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Change the capacity, evicting the oldest entries if needed.
    ///
    /// Returns the number of evicted entries.
    pub fn set_capacity(&mut self, capacity: usize) -> CalcResult<usize> {
        validate_capacity(capacity)?;
        self.capacity = capacity;
        let excess = self.entries.len().saturating_sub(capacity);
        self.entries.drain(..excess);
        Ok(excess)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned copy of all entries, oldest first
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        History {
            capacity: DEFAULT_HISTORY_CAPACITY,
            entries: VecDeque::new(),
        }
    }
}

fn validate_capacity(capacity: usize) -> CalcResult<()> {
    if capacity == 0 {
        return Err(CalcError::invalid_input(
            "history_capacity",
            "0",
            "History must hold at least one entry",
        ));
    }
    Ok(())
}

fn deserialize_capacity<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let capacity = usize::deserialize(deserializer)?;
    validate_capacity(capacity).map_err(serde::de::Error::custom)?;
    Ok(capacity)
}
