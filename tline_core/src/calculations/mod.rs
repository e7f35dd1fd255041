//! # Line Parameter Calculations
//!
//! Derivation of per-phase electrical parameters from the geometric
//! quantities produced by [`geometry`](crate::geometry). Follows the pattern:
//!
//! - `LineParametersInput` - aggregated GMR/GMD values plus line data
//! - `LineParameters` - R, L, C and reactances (JSON-serializable)
//! - `calculate(input) -> CalcResult<LineParameters>` - pure function
//!
//! The model is the textbook fully transposed line: the per-phase mutual
//! terms are collapsed into one equivalent GMD and one equivalent GMR.

pub mod line_parameters;

use serde::{Deserialize, Serialize};

use crate::geometry::{arithmetic_mean, geometric_mean};

pub use line_parameters::{
    bundle_equivalent_radius, calculate, LineParameters, LineParametersInput,
};

/// μ0 / 2π in H/m
pub const MU0_OVER_2PI: f64 = 2e-7;

/// Permittivity of free space ε0 in F/m
pub const VACUUM_PERMITTIVITY: f64 = 8.854e-12;

/// How per-phase GMRs and per-pair GMDs are collapsed into one value each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragingMode {
    /// Geometric mean of GMDs and GMRs (transposed-line theory)
    #[default]
    Geometric,
    /// Arithmetic mean of GMDs and GMRs, for parity with older results
    Arithmetic,
}

impl AveragingMode {
    pub fn mean(&self, values: &[f64]) -> f64 {
        match self {
            AveragingMode::Geometric => geometric_mean(values),
            AveragingMode::Arithmetic => arithmetic_mean(values),
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> crate::errors::CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "geometric" | "geo" | "gm" => Ok(AveragingMode::Geometric),
            "arithmetic" | "arith" | "am" | "legacy" => Ok(AveragingMode::Arithmetic),
            _ => Err(crate::errors::CalcError::invalid_input(
                "averaging",
                s,
                "Expected geometric or arithmetic",
            )),
        }
    }
}

impl std::fmt::Display for AveragingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AveragingMode::Geometric => write!(f, "geometric"),
            AveragingMode::Arithmetic => write!(f, "arithmetic"),
        }
    }
}
