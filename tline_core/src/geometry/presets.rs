//! Standard bundle layouts.
//!
//! A preset places 2, 3 or 4 sub-conductors on a circle around a center so
//! that adjacent sub-conductors sit exactly `spacing` apart.

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, require_positive, CalcError, CalcResult};
use crate::geometry::Point;

/// Regular bundle layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BundlePreset {
    /// Two sub-conductors side by side
    Twin,
    /// Three sub-conductors on an equilateral triangle, apex up
    Triangle,
    /// Four sub-conductors on a square
    Square,
}

impl BundlePreset {
    pub const ALL: [BundlePreset; 3] = [
        BundlePreset::Twin,
        BundlePreset::Triangle,
        BundlePreset::Square,
    ];

    /// Number of sub-conductors placed
    pub fn conductor_count(&self) -> usize {
        match self {
            BundlePreset::Twin => 2,
            BundlePreset::Triangle => 3,
            BundlePreset::Square => 4,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BundlePreset::Twin => "2-Conductor Bundle",
            BundlePreset::Triangle => "3-Conductor Bundle",
            BundlePreset::Square => "4-Conductor Bundle",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "twin" | "two" | "2" => Ok(BundlePreset::Twin),
            "triangle" | "three" | "3" => Ok(BundlePreset::Triangle),
            "square" | "four" | "4" => Ok(BundlePreset::Square),
            _ => Err(CalcError::invalid_input(
                "preset",
                s,
                "Expected twin, triangle or square",
            )),
        }
    }

    /// Radius of the circle the sub-conductors sit on
    fn circumradius(&self, spacing: f64) -> f64 {
        match self {
            BundlePreset::Twin => spacing / 2.0,
            BundlePreset::Triangle => spacing / 3f64.sqrt(),
            BundlePreset::Square => spacing / 2f64.sqrt(),
        }
    }

    /// Angle of the first sub-conductor, radians from +x
    fn start_angle(&self) -> f64 {
        match self {
            BundlePreset::Twin => 0.0,
            BundlePreset::Triangle => std::f64::consts::FRAC_PI_2,
            BundlePreset::Square => std::f64::consts::FRAC_PI_4,
        }
    }

    /// Sub-conductor positions centred on (`center_x`, `center_y`).
    ///
    /// Coordinates come out in the same unit as the inputs.
    pub fn points(&self, center_x: f64, center_y: f64, spacing: f64) -> CalcResult<Vec<Point>> {
        require_finite("center_x", center_x)?;
        require_finite("center_y", center_y)?;
        require_positive("spacing", spacing)?;

        let n = self.conductor_count();
        let radius = self.circumradius(spacing);
        let step = std::f64::consts::TAU / n as f64;
        Ok((0..n)
            .map(|i| {
                let angle = self.start_angle() + step * i as f64;
                Point::new(
                    center_x + radius * angle.cos(),
                    center_y + radius * angle.sin(),
                )
            })
            .collect())
    }
}

impl std::fmt::Display for BundlePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
