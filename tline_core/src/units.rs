//! # Display Units
//!
//! Coordinates and self-GMR values arrive in whatever unit the user is
//! working in, and are converted to meters exactly once, on entry. Everything
//! stored in a [`Session`](crate::session::Session) is in meters.
//!
//! | Key    | Factor to meters |
//! |--------|------------------|
//! | `m`    | 1.0              |
//! | `ft`   | 0.3048           |
//! | `inch` | 0.0254           |
//! | `cm`   | 0.01             |
//! | `mm`   | 0.001            |
//!
//! ## Example
//!
//! ```rust
//! use tline_core::units::LengthUnit;
//!
//! let unit = LengthUnit::from_key("ft").unwrap();
//! assert!((unit.to_meters(10.0) - 3.048).abs() < 1e-12);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Length unit used to interpret incoming coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "inch")]
    Inches,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "mm")]
    Millimeters,
}

impl LengthUnit {
    /// All units for UI selection
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Meters,
        LengthUnit::Feet,
        LengthUnit::Inches,
        LengthUnit::Centimeters,
        LengthUnit::Millimeters,
    ];

    /// Short key used on the wire ("m", "ft", ...)
    pub fn key(&self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "inch",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
        }
    }

    /// Multiplier that converts a value in this unit to meters
    pub fn factor(&self) -> f64 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::Feet => 0.3048,
            LengthUnit::Inches => 0.0254,
            LengthUnit::Centimeters => 0.01,
            LengthUnit::Millimeters => 0.001,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LengthUnit::Meters => "Meters",
            LengthUnit::Feet => "Feet",
            LengthUnit::Inches => "Inches",
            LengthUnit::Centimeters => "Centimeters",
            LengthUnit::Millimeters => "Millimeters",
        }
    }

    /// Parse a unit key. Only the exact table keys are accepted.
    pub fn from_key(key: &str) -> CalcResult<Self> {
        LengthUnit::ALL
            .iter()
            .copied()
            .find(|unit| unit.key() == key.trim())
            .ok_or_else(|| CalcError::unknown_unit(key))
    }

    /// Convert a value in this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        value * self.factor()
    }

    /// Convert a value in meters to this unit
    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.factor()
    }
}

impl FromStr for LengthUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LengthUnit::from_key(s)
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
