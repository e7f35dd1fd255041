//! # Conductor Materials
//!
//! Fixed resistivity table for the conductor materials the engine knows.
//! Values are DC resistivity at 20 °C in Ω·m.
//!
//! | Material | Resistivity (Ω·m) |
//! |----------|-------------------|
//! | Copper   | 1.68e-8           |
//! | Aluminum | 2.82e-8           |
//! | Steel    | 1.43e-7           |
//! | ACSR     | 3.2e-8            |
//!
//! ## Example
//!
//! ```rust
//! use tline_core::materials::ConductorMaterial;
//!
//! let mat = ConductorMaterial::from_str_flexible("acsr").unwrap();
//! assert_eq!(mat, ConductorMaterial::Acsr);
//! println!("rho = {} ohm-m", mat.resistivity_ohm_m());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Conductor material, selecting a resistivity from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConductorMaterial {
    #[default]
    Copper,
    Aluminum,
    Steel,
    /// Aluminum conductor, steel reinforced
    #[serde(rename = "ACSR")]
    Acsr,
}

impl ConductorMaterial {
    /// All materials for UI selection
    pub const ALL: [ConductorMaterial; 4] = [
        ConductorMaterial::Copper,
        ConductorMaterial::Aluminum,
        ConductorMaterial::Steel,
        ConductorMaterial::Acsr,
    ];

    /// Resistivity at 20 °C (Ω·m)
    pub fn resistivity_ohm_m(&self) -> f64 {
        match self {
            ConductorMaterial::Copper => 1.68e-8,
            ConductorMaterial::Aluminum => 2.82e-8,
            ConductorMaterial::Steel => 1.43e-7,
            ConductorMaterial::Acsr => 3.2e-8,
        }
    }

    /// Table key ("Copper", "ACSR", ...)
    pub fn key(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "Copper",
            ConductorMaterial::Aluminum => "Aluminum",
            ConductorMaterial::Steel => "Steel",
            ConductorMaterial::Acsr => "ACSR",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "Copper",
            ConductorMaterial::Aluminum => "Aluminum",
            ConductorMaterial::Steel => "Steel",
            ConductorMaterial::Acsr => "ACSR (Aluminum Conductor Steel Reinforced)",
        }
    }

    /// Parse from common string representations (case-insensitive)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "COPPER" | "CU" => Ok(ConductorMaterial::Copper),
            "ALUMINUM" | "ALUMINIUM" | "AL" => Ok(ConductorMaterial::Aluminum),
            "STEEL" => Ok(ConductorMaterial::Steel),
            "ACSR" => Ok(ConductorMaterial::Acsr),
            _ => Err(CalcError::material_not_found(s)),
        }
    }
}

impl std::fmt::Display for ConductorMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for ConductorMaterial {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConductorMaterial::from_str_flexible(s)
    }
}
