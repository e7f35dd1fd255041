//! # Phases
//!
//! The three phases of the line, the unordered phase pairs used for GMD,
//! and [`PerPhase`], a fixed A/B/C container.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// One phase of a three-phase line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    A,
    B,
    C,
}

impl Phase {
    /// All phases in canonical order
    pub const ALL: [Phase; 3] = [Phase::A, Phase::B, Phase::C];

    /// Unordered phase pairs in canonical order: A-B, A-C, B-C
    pub const PAIRS: [(Phase, Phase); 3] = [
        (Phase::A, Phase::B),
        (Phase::A, Phase::C),
        (Phase::B, Phase::C),
    ];

    /// Single-letter label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::A => "A",
            Phase::B => "B",
            Phase::C => "C",
        }
    }

    /// Parse a phase label ("A", "b", ...)
    pub fn from_label(label: &str) -> CalcResult<Self> {
        match label.trim().to_uppercase().as_str() {
            "A" => Ok(Phase::A),
            "B" => Ok(Phase::B),
            "C" => Ok(Phase::C),
            _ => Err(CalcError::unknown_phase(label)),
        }
    }

    /// Pair name as shown in results, e.g. "A-B"
    pub fn pair_name(a: Phase, b: Phase) -> String {
        format!("{}-{}", a.label(), b.label())
    }
}

impl FromStr for Phase {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::from_label(s)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One value per phase, serialized as `{"A": .., "B": .., "C": ..}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerPhase<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
    #[serde(rename = "C")]
    pub c: T,
}

impl<T> PerPhase<T> {
    pub fn new(a: T, b: T, c: T) -> Self {
        PerPhase { a, b, c }
    }

    pub fn get(&self, phase: Phase) -> &T {
        match phase {
            Phase::A => &self.a,
            Phase::B => &self.b,
            Phase::C => &self.c,
        }
    }

    pub fn get_mut(&mut self, phase: Phase) -> &mut T {
        match phase {
            Phase::A => &mut self.a,
            Phase::B => &mut self.b,
            Phase::C => &mut self.c,
        }
    }

    /// Values paired with their phase, in A, B, C order
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &T)> {
        Phase::ALL.into_iter().map(move |phase| (phase, self.get(phase)))
    }
}

impl<T: Clone> PerPhase<T> {
    /// Same value on every phase
    pub fn splat(value: T) -> Self {
        PerPhase::new(value.clone(), value.clone(), value)
    }
}
