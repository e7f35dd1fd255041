//! Result types returned by [`Session::compute_results`](super::Session::compute_results).

use serde::{Deserialize, Serialize};

use crate::calculations::LineParameters;
use crate::errors::CalcError;
use crate::history::HistoryEntry;
use crate::phase::Phase;

/// GMR of one configured phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmrEntry {
    pub label: Phase,
    pub value_m: f64,
    pub conductor_count: usize,
}

/// GMD of one pair of configured phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmdEntry {
    /// Pair name, e.g. "A-B"
    pub pair: String,
    pub value_m: f64,
}

/// Outcome of the aggregate R/L/C step.
///
/// ## JSON Example
///
/// ```json
/// { "status": "failed", "value": { "type": "DomainError", "details": { ... } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ParameterOutcome {
    /// No phase has any conductors
    NoData,
    Computed(LineParameters),
    /// GMR/GMD were computed but the parameters could not be
    Failed(CalcError),
}

/// Structured result of one computation.
///
/// GMR and GMD entries are always present for the phases that have
/// conductors, even when the aggregate step failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResults {
    pub gmr: Vec<GmrEntry>,
    pub gmd: Vec<GmdEntry>,
    pub params: ParameterOutcome,

    /// Full history, only filled by
    /// [`Session::compute_results_with_history`](super::Session::compute_results_with_history)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEntry>,
}

impl LineResults {
    pub fn no_data() -> Self {
        LineResults {
            gmr: Vec::new(),
            gmd: Vec::new(),
            params: ParameterOutcome::NoData,
            history: Vec::new(),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self.params, ParameterOutcome::NoData)
    }

    /// Computed parameters, if the aggregate step succeeded
    pub fn parameters(&self) -> Option<&LineParameters> {
        match &self.params {
            ParameterOutcome::Computed(params) => Some(params),
            _ => None,
        }
    }

    /// Aggregate-step error, if it failed
    pub fn error(&self) -> Option<&CalcError> {
        match &self.params {
            ParameterOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// GMR of a phase, if it has conductors
    pub fn gmr_of(&self, phase: Phase) -> Option<f64> {
        self.gmr.iter().find(|e| e.label == phase).map(|e| e.value_m)
    }

    /// GMD of a pair such as "A-C", if both phases have conductors
    pub fn gmd_of(&self, pair: &str) -> Option<f64> {
        self.gmd.iter().find(|e| e.pair == pair).map(|e| e.value_m)
    }
}
