//! # Per-Phase Line Parameters
//!
//! Resistance, inductance, capacitance and reactances of a transposed
//! three-phase line, per kilometer and for the full length.
//!
//! ## Formulas
//!
//! - `R/km = ρ·1000 / (π r² n)` with n sub-conductors per phase
//! - `L/km = 2e-7 · ln(GMD / GMR) · 1000` (H/km)
//! - `C/km = 2π ε0 · 1000 / ln(GMD / r_eq)` (F/km)
//! - `r_eq = r` for a single conductor, otherwise
//!   `(n · r · gm(d_ij)^(n-1))^(1/n)` over the sub-conductor spacings
//! - `XL = ωL`, `XC = 1/(ωC)` with `ω = 2πf`
//!
//! Inductance and capacitance need at least two phases with conductors;
//! with one phase they are reported as zero.
//!
//! ## Example
//!
//! ```rust
//! use tline_core::calculations::{calculate, AveragingMode, LineParametersInput};
//! use tline_core::geometry::Point;
//! use tline_core::materials::ConductorMaterial;
//! use tline_core::phase::Phase;
//!
//! let input = LineParametersInput {
//!     material: ConductorMaterial::Acsr,
//!     length_km: 150.0,
//!     radius_m: 0.04,
//!     frequency_hz: 60.0,
//!     averaging: AveragingMode::Geometric,
//!     phases: Phase::ALL.to_vec(),
//!     phase_gmr_m: vec![0.035, 0.035, 0.035],
//!     pair_gmd_m: vec![20.0, 40.0, 20.0],
//!     bundle_sizes: vec![1, 1, 1],
//!     representative_bundle: vec![Point::new(-20.0, 0.0)],
//! };
//!
//! let params = calculate(&input).unwrap();
//! assert!(params.l_per_km_mh > 1.3 && params.l_per_km_mh < 1.33);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{AveragingMode, MU0_OVER_2PI, VACUUM_PERMITTIVITY};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::geometry::{geometric_mean, pairwise_distances, Point};
use crate::materials::ConductorMaterial;
use crate::phase::Phase;

/// Inputs for the aggregate parameter step.
///
/// `phases`, `phase_gmr_m` and `bundle_sizes` hold one entry per phase that
/// has conductors, in A, B, C order; `pair_gmd_m` one entry per pair of such
/// phases, in the order of [`LineParametersInput::pair_names`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineParametersInput {
    pub material: ConductorMaterial,

    /// Line length in kilometers
    pub length_km: f64,

    /// Physical radius of one sub-conductor in meters
    pub radius_m: f64,

    /// Operating frequency in hertz
    pub frequency_hz: f64,

    pub averaging: AveragingMode,

    /// Phases that have conductors
    pub phases: Vec<Phase>,

    /// GMR of each configured phase (m)
    pub phase_gmr_m: Vec<f64>,

    /// GMD of each pair of configured phases (m)
    pub pair_gmd_m: Vec<f64>,

    /// Sub-conductor count of each configured phase
    pub bundle_sizes: Vec<usize>,

    /// Sub-conductor positions of the phase used for the capacitance radius (m)
    pub representative_bundle: Vec<Point>,
}

impl LineParametersInput {
    /// Validate input parameters.
    ///
    /// Returns the common sub-conductor count of the configured phases.
    pub fn validate(&self) -> CalcResult<usize> {
        require_positive("length_km", self.length_km)?;
        require_positive("radius_m", self.radius_m)?;
        require_positive("frequency_hz", self.frequency_hz)?;

        let n = self.conductors_per_phase()?;
        if self.representative_bundle.len() != n {
            return Err(CalcError::Internal {
                message: format!(
                    "representative bundle has {} conductors, expected {}",
                    self.representative_bundle.len(),
                    n
                ),
            });
        }
        if self.phase_gmr_m.len() != self.bundle_sizes.len()
            || self.phases.len() != self.bundle_sizes.len()
        {
            return Err(CalcError::Internal {
                message: "one label and one GMR are required per configured phase".to_string(),
            });
        }
        if self.pair_gmd_m.len() != self.pair_names().len() {
            return Err(CalcError::Internal {
                message: "one GMD is required per pair of configured phases".to_string(),
            });
        }
        Ok(n)
    }

    /// Names of the configured phase pairs, matching `pair_gmd_m`.
    pub fn pair_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for (i, &a) in self.phases.iter().enumerate() {
            for &b in &self.phases[i + 1..] {
                names.push(Phase::pair_name(a, b));
            }
        }
        names
    }

    /// Every per-phase GMR and per-pair GMD must be strictly positive.
    ///
    /// Checked before averaging, since an arithmetic mean can hide a zero.
    fn check_distances(&self) -> CalcResult<()> {
        for (phase, &gmr) in self.phases.iter().zip(&self.phase_gmr_m) {
            if !(gmr.is_finite() && gmr > 0.0) {
                return Err(CalcError::domain(
                    "inductance",
                    format!("GMR of phase {phase} is zero; its sub-conductors coincide"),
                ));
            }
        }
        for (pair, &gmd) in self.pair_names().iter().zip(&self.pair_gmd_m) {
            if !(gmd.is_finite() && gmd > 0.0) {
                return Err(CalcError::domain(
                    "inductance",
                    format!("GMD of pair {pair} is zero; conductors of these phases coincide"),
                ));
            }
        }
        Ok(())
    }

    /// Common sub-conductor count of all configured phases.
    ///
    /// Phases with different bundle sizes cannot share one resistance or
    /// capacitance figure, so mixed arity is a domain error.
    pub fn conductors_per_phase(&self) -> CalcResult<usize> {
        let first = match self.bundle_sizes.first() {
            Some(&n) if n > 0 => n,
            _ => {
                return Err(CalcError::domain(
                    "line parameters",
                    "no phase has any conductors",
                ))
            }
        };
        if let Some(&other) = self.bundle_sizes.iter().find(|&&n| n != first) {
            return Err(CalcError::domain(
                "line parameters",
                format!(
                    "phases have different bundle sizes ({} and {} conductors); \
                     use the same number of sub-conductors on every phase",
                    first, other
                ),
            ));
        }
        Ok(first)
    }
}

/// Calculated line parameters. Units are fixed regardless of display unit.
///
/// ## JSON Example
///
/// ```json
/// {
///   "R_per_km": 0.00637,
///   "R_total": 0.955,
///   "L_per_km_mH": 1.3158,
///   "L_total_mH": 197.38,
///   "C_per_km_nF": 8.631,
///   "C_total_uF": 1.2946,
///   "XL": 74.41,
///   "XC": 2049.0,
///   "GMD_equivalent_m": 25.198,
///   "GMR_equivalent_m": 0.035,
///   "conductors_per_phase": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineParameters {
    /// Resistance per kilometer (Ω/km)
    #[serde(rename = "R_per_km")]
    pub r_per_km_ohm: f64,

    /// Resistance of the full line (Ω)
    #[serde(rename = "R_total")]
    pub r_total_ohm: f64,

    /// Inductance per kilometer (mH/km)
    #[serde(rename = "L_per_km_mH")]
    pub l_per_km_mh: f64,

    /// Inductance of the full line (mH)
    #[serde(rename = "L_total_mH")]
    pub l_total_mh: f64,

    /// Capacitance per kilometer (nF/km)
    #[serde(rename = "C_per_km_nF")]
    pub c_per_km_nf: f64,

    /// Capacitance of the full line (μF)
    #[serde(rename = "C_total_uF")]
    pub c_total_uf: f64,

    /// Inductive reactance of the full line (Ω); 0 when L is 0
    #[serde(rename = "XL")]
    pub xl_ohm: f64,

    /// Capacitive reactance of the full line (Ω); 0 when C is 0 (not applicable)
    #[serde(rename = "XC")]
    pub xc_ohm: f64,

    /// Equivalent GMD used for L and C (m), absent with fewer than two phases
    #[serde(rename = "GMD_equivalent_m")]
    pub gmd_equivalent_m: Option<f64>,

    /// Equivalent GMR used for L (m), absent with fewer than two phases
    #[serde(rename = "GMR_equivalent_m")]
    pub gmr_equivalent_m: Option<f64>,

    /// Sub-conductors per phase used for R
    pub conductors_per_phase: usize,
}

impl LineParameters {
    /// True when inductance and capacitance were computed (two or more phases)
    pub fn has_reactive_terms(&self) -> bool {
        self.gmd_equivalent_m.is_some()
    }
}

/// Equivalent radius of a bundle for the capacitance formula.
///
/// A single conductor uses its physical radius; n > 1 sub-conductors use
/// `(n · r · gm(d_ij)^(n-1))^(1/n)` over the unique sub-conductor spacings.
pub fn bundle_equivalent_radius(bundle_points: &[Point], radius_m: f64) -> f64 {
    let n = bundle_points.len();
    if n <= 1 {
        return radius_m;
    }
    let n_f = n as f64;
    let spacing_gm = geometric_mean(&pairwise_distances(bundle_points));
    let log_r = (n_f.ln() + radius_m.ln() + (n_f - 1.0) * spacing_gm.ln()) / n_f;
    log_r.exp()
}

/// Calculate line parameters.
///
/// # Returns
///
/// * `Ok(LineParameters)` - all values finite and non-negative
/// * `Err(CalcError::DomainError)` - geometry makes L or C undefined
///   (coincident conductors, GMD not exceeding GMR, mixed bundle sizes)
/// * `Err(CalcError::InvalidInput)` - non-positive length, radius or frequency
pub fn calculate(input: &LineParametersInput) -> CalcResult<LineParameters> {
    let n = input.validate()?;

    // === Resistance ===
    let area_m2 = std::f64::consts::PI * input.radius_m.powi(2);
    let r_per_km_ohm = input.material.resistivity_ohm_m() * 1000.0 / (area_m2 * n as f64);
    let r_total_ohm = r_per_km_ohm * input.length_km;

    // === Inductance and capacitance (H/km, F/km) ===
    let (l_per_km, c_per_km, gmd_equivalent_m, gmr_equivalent_m) = if input.phase_gmr_m.len() >= 2 {
        input.check_distances()?;
        let avg_gmd = input.averaging.mean(&input.pair_gmd_m);
        let avg_gmr = input.averaging.mean(&input.phase_gmr_m);

        if !(avg_gmr.is_finite() && avg_gmr > 0.0) {
            return Err(CalcError::domain(
                "inductance",
                "equivalent GMR is zero; sub-conductors of a phase coincide",
            ));
        }
        if !(avg_gmd.is_finite() && avg_gmd > 0.0) {
            return Err(CalcError::domain(
                "inductance",
                "equivalent GMD is zero; conductors of different phases coincide",
            ));
        }
        if avg_gmd <= avg_gmr {
            return Err(CalcError::domain(
                "inductance",
                format!(
                    "equivalent GMD ({:.6} m) must exceed equivalent GMR ({:.6} m)",
                    avg_gmd, avg_gmr
                ),
            ));
        }
        let l_per_km = MU0_OVER_2PI * (avg_gmd / avg_gmr).ln() * 1000.0;

        let r_equiv = bundle_equivalent_radius(&input.representative_bundle, input.radius_m);
        if !(r_equiv.is_finite() && r_equiv > 0.0) {
            return Err(CalcError::domain(
                "capacitance",
                "equivalent bundle radius is zero; sub-conductors coincide",
            ));
        }
        if avg_gmd <= r_equiv {
            return Err(CalcError::domain(
                "capacitance",
                format!(
                    "equivalent GMD ({:.6} m) must exceed equivalent bundle radius ({:.6} m)",
                    avg_gmd, r_equiv
                ),
            ));
        }
        let c_per_km =
            2.0 * std::f64::consts::PI * VACUUM_PERMITTIVITY * 1000.0 / (avg_gmd / r_equiv).ln();

        (l_per_km, c_per_km, Some(avg_gmd), Some(avg_gmr))
    } else {
        (0.0, 0.0, None, None)
    };

    let l_total = l_per_km * input.length_km;
    let c_total = c_per_km * input.length_km;

    // === Reactances ===
    let omega = 2.0 * std::f64::consts::PI * input.frequency_hz;
    let xl_ohm = if l_total > 0.0 { omega * l_total } else { 0.0 };
    let xc_ohm = if c_total > 0.0 { 1.0 / (omega * c_total) } else { 0.0 };

    let params = LineParameters {
        r_per_km_ohm,
        r_total_ohm,
        l_per_km_mh: l_per_km * 1e3,
        l_total_mh: l_total * 1e3,
        c_per_km_nf: c_per_km * 1e9,
        c_total_uf: c_total * 1e6,
        xl_ohm,
        xc_ohm,
        gmd_equivalent_m,
        gmr_equivalent_m,
        conductors_per_phase: n,
    };

    let all_finite = [
        params.r_per_km_ohm,
        params.r_total_ohm,
        params.l_per_km_mh,
        params.l_total_mh,
        params.c_per_km_nf,
        params.c_total_uf,
        params.xl_ohm,
        params.xc_ohm,
    ]
    .iter()
    .all(|v| v.is_finite());
    if !all_finite {
        return Err(CalcError::domain(
            "line parameters",
            "result is not a finite number",
        ));
    }

    Ok(params)
}
