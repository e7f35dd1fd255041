//! # Line Parameter Session
//!
//! The `Session` struct is the root container for one line being designed:
//! the line configuration, the conductor positions of phases A, B and C,
//! the self-GMR of each phase's sub-conductors, and the history of past
//! computations.
//!
//! ## Structure
//!
//! ```text
//! Session
//! ├── config: LineConfig (material, length, radius, frequency, display unit)
//! ├── settings: SessionSettings (averaging mode, snap grid, history capacity)
//! ├── bundles: PerPhase<Vec<Point>> (meters)
//! ├── self_gmr_m: PerPhase<f64> (meters)
//! └── history: History (bounded, oldest first)
//! ```
//!
//! Setters validate their arguments and reject bad input before touching any
//! state. [`Session::compute_results`] never fails: it returns whatever
//! GMR/GMD values it could compute and reports the aggregate R/L/C outcome
//! separately.
//!
//! A session is plain data. To share one between threads, wrap it in a
//! `Mutex` so setters and `compute_results` never interleave.
//!
//! ## Example
//!
//! ```rust
//! use tline_core::materials::ConductorMaterial;
//! use tline_core::phase::Phase;
//! use tline_core::session::Session;
//!
//! let mut session = Session::new();
//! session.add_point(-20.0, 0.0, Phase::A).unwrap();
//! session.add_point(0.0, 0.0, Phase::B).unwrap();
//! session.add_point(20.0, 0.0, Phase::C).unwrap();
//! for phase in Phase::ALL {
//!     session.set_self_gmr(phase, 0.035).unwrap();
//! }
//! session
//!     .set_line_params(ConductorMaterial::Acsr, 150.0, 0.04, 60.0)
//!     .unwrap();
//!
//! let results = session.compute_results();
//! let params = results.parameters().unwrap();
//! println!("L = {:.4} mH/km", params.l_per_km_mh);
//! assert_eq!(session.history().len(), 1);
//! ```

mod results;

pub use results::{GmdEntry, GmrEntry, LineResults, ParameterOutcome};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculations::{calculate, AveragingMode, LineParametersInput};
use crate::errors::{require_finite, require_positive, CalcError, CalcResult};
use crate::geometry::{
    compute_gmd, compute_gmr, self_gmr_from_radius, BundlePreset, Point,
    SOLID_CONDUCTOR_GMR_FACTOR,
};
use crate::history::{ConfigSnapshot, History, DEFAULT_HISTORY_CAPACITY};
use crate::materials::ConductorMaterial;
use crate::phase::{Phase, PerPhase};
use crate::units::LengthUnit;

/// Physical radius of a sub-conductor in a new session (m)
pub const DEFAULT_RADIUS_M: f64 = 0.01;

/// Physical line data plus the active display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    pub material: ConductorMaterial,

    /// Line length in kilometers
    pub length_km: f64,

    /// Physical radius of one sub-conductor in meters (not the self-GMR)
    pub radius_m: f64,

    /// Operating frequency in hertz
    pub frequency_hz: f64,

    /// Unit used to interpret incoming coordinates and self-GMR values
    pub unit: LengthUnit,
}

impl Default for LineConfig {
    fn default() -> Self {
        LineConfig {
            material: ConductorMaterial::Copper,
            length_km: 100.0,
            radius_m: DEFAULT_RADIUS_M,
            frequency_hz: 60.0,
            unit: LengthUnit::Meters,
        }
    }
}

impl LineConfig {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("length_km", self.length_km)?;
        require_positive("radius_m", self.radius_m)?;
        require_positive("frequency_hz", self.frequency_hz)?;
        Ok(())
    }
}

/// Rounding of incoming coordinates to a grid in the display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    pub enabled: bool,
    /// Grid pitch in the display unit
    pub grid: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        SnapSettings {
            enabled: false,
            grid: 1.0,
        }
    }
}

impl SnapSettings {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("snap.grid", self.grid)?;
        Ok(())
    }

    /// Round a coordinate to the nearest grid line when enabled
    pub fn apply(&self, value: f64) -> f64 {
        if self.enabled {
            (value / self.grid).round() * self.grid
        } else {
            value
        }
    }
}

/// Session-wide behaviour that is not part of the line itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Maximum number of history entries kept
    pub history_capacity: usize,

    /// How GMDs and GMRs are averaged across phases
    pub averaging: AveragingMode,

    pub snap: SnapSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            averaging: AveragingMode::Geometric,
            snap: SnapSettings::default(),
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if self.history_capacity == 0 {
            return Err(CalcError::invalid_input(
                "history_capacity",
                "0",
                "History must hold at least one entry",
            ));
        }
        self.snap.validate()
    }
}

/// Stateful line-parameter session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    config: LineConfig,
    settings: SessionSettings,
    bundles: PerPhase<Vec<Point>>,
    self_gmr_m: PerPhase<f64>,
    history: History,
}

impl Session {
    /// Create a session with default settings.
    ///
    /// Defaults: meters, empty bundles, Copper, 100 km, 1 cm radius, 60 Hz,
    /// and a self-GMR of 0.7788 cm on every phase.
    pub fn new() -> Self {
        Session {
            config: LineConfig::default(),
            settings: SessionSettings::default(),
            bundles: PerPhase::default(),
            self_gmr_m: PerPhase::splat(SOLID_CONDUCTOR_GMR_FACTOR * DEFAULT_RADIUS_M),
            history: History::default(),
        }
    }

    /// Create a session with custom settings.
    pub fn with_settings(settings: SessionSettings) -> CalcResult<Self> {
        settings.validate()?;
        let history = History::new(settings.history_capacity)?;
        Ok(Session {
            settings,
            history,
            ..Session::new()
        })
    }

    // === Readback ===

    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Active display unit
    pub fn unit(&self) -> LengthUnit {
        self.config.unit
    }

    /// Stored conductor positions of a phase, in meters, insertion order
    pub fn bundle(&self, phase: Phase) -> &[Point] {
        self.bundles.get(phase)
    }

    /// Self-GMR of a phase in meters
    pub fn self_gmr(&self, phase: Phase) -> f64 {
        *self.self_gmr_m.get(phase)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // === Mutators ===

    /// Set the unit used for subsequent coordinates and self-GMR values.
    ///
    /// Already stored points are not converted.
    pub fn set_unit(&mut self, unit: LengthUnit) {
        debug!(from = %self.config.unit, to = %unit, "display unit changed");
        self.config.unit = unit;
    }

    /// Set a phase's self-GMR, given in the current display unit.
    ///
    /// Returns the stored value in meters.
    pub fn set_self_gmr(&mut self, phase: Phase, value: f64) -> CalcResult<f64> {
        require_positive("self_gmr", value)?;
        let meters = self.config.unit.to_meters(value);
        *self.self_gmr_m.get_mut(phase) = meters;
        debug!(%phase, value, unit = %self.config.unit, meters, "self-GMR set");
        Ok(meters)
    }

    /// Set a phase's self-GMR from the physical radius of a solid round
    /// conductor, given in the current display unit.
    ///
    /// Returns the stored self-GMR in meters.
    pub fn set_self_gmr_from_radius(&mut self, phase: Phase, radius: f64) -> CalcResult<f64> {
        require_positive("radius", radius)?;
        let meters = self_gmr_from_radius(self.config.unit.to_meters(radius));
        *self.self_gmr_m.get_mut(phase) = meters;
        debug!(%phase, radius, unit = %self.config.unit, meters, "self-GMR set from radius");
        Ok(meters)
    }

    /// Set the physical line data.
    ///
    /// Length is in km, radius in m and frequency in Hz, independent of the
    /// display unit.
    pub fn set_line_params(
        &mut self,
        material: ConductorMaterial,
        length_km: f64,
        radius_m: f64,
        frequency_hz: f64,
    ) -> CalcResult<()> {
        let candidate = LineConfig {
            material,
            length_km,
            radius_m,
            frequency_hz,
            unit: self.config.unit,
        };
        candidate.validate()?;
        self.config = candidate;
        debug!(%material, length_km, radius_m, frequency_hz, "line parameters set");
        Ok(())
    }

    /// Append a conductor at (x, y), given in the current display unit.
    ///
    /// Returns the stored point in meters.
    pub fn add_point(&mut self, x: f64, y: f64, phase: Phase) -> CalcResult<Point> {
        require_finite("x", x)?;
        require_finite("y", y)?;
        let snap = self.settings.snap;
        let unit = self.config.unit;
        let point = Point::new(unit.to_meters(snap.apply(x)), unit.to_meters(snap.apply(y)));
        self.bundles.get_mut(phase).push(point);
        debug!(%phase, x, y, %unit, x_m = point.x, y_m = point.y, "conductor added");
        Ok(point)
    }

    /// Append a regular bundle centred on (`center_x`, `center_y`).
    ///
    /// Center and spacing are in the current display unit. Only the center
    /// is snapped. Returns the stored points in meters.
    pub fn add_bundle_preset(
        &mut self,
        phase: Phase,
        preset: BundlePreset,
        center_x: f64,
        center_y: f64,
        spacing: f64,
    ) -> CalcResult<Vec<Point>> {
        let snap = self.settings.snap;
        let unit = self.config.unit;
        let points: Vec<Point> = preset
            .points(snap.apply(center_x), snap.apply(center_y), spacing)?
            .into_iter()
            .map(|p| p.scaled(unit.factor()))
            .collect();
        self.bundles.get_mut(phase).extend_from_slice(&points);
        debug!(%phase, %preset, center_x, center_y, spacing, %unit, "bundle preset added");
        Ok(points)
    }

    /// Remove and return the most recently added conductor of a phase.
    pub fn undo_point(&mut self, phase: Phase) -> Option<Point> {
        let removed = self.bundles.get_mut(phase).pop();
        if let Some(point) = removed {
            debug!(%phase, x_m = point.x, y_m = point.y, "conductor removed");
        }
        removed
    }

    /// Remove all conductors of one phase.
    pub fn clear_bundle(&mut self, phase: Phase) {
        self.bundles.get_mut(phase).clear();
        debug!(%phase, "bundle cleared");
    }

    /// Remove all conductors of every phase. Self-GMR and line data stay.
    pub fn clear_all(&mut self) {
        self.bundles = PerPhase::default();
        debug!("all bundles cleared");
    }

    pub fn set_averaging(&mut self, averaging: AveragingMode) {
        self.settings.averaging = averaging;
        debug!(%averaging, "averaging mode set");
    }

    pub fn set_snap(&mut self, snap: SnapSettings) -> CalcResult<()> {
        snap.validate()?;
        self.settings.snap = snap;
        debug!(enabled = snap.enabled, grid = snap.grid, "snap settings set");
        Ok(())
    }

    /// Change how many history entries are kept, evicting the oldest.
    pub fn set_history_capacity(&mut self, capacity: usize) -> CalcResult<()> {
        let evicted = self.history.set_capacity(capacity)?;
        self.settings.history_capacity = capacity;
        debug!(capacity, evicted, "history capacity set");
        Ok(())
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        debug!("history cleared");
    }

    // === Computation ===

    /// Compute GMR per phase, GMD per phase pair and the line parameters,
    /// and record the computation in the history.
    ///
    /// With no conductors at all the result is [`ParameterOutcome::NoData`]
    /// and nothing is recorded.
    pub fn compute_results(&mut self) -> LineResults {
        let gmr: Vec<GmrEntry> = self
            .bundles
            .iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(phase, points)| GmrEntry {
                label: phase,
                value_m: compute_gmr(points, self.self_gmr(phase)),
                conductor_count: points.len(),
            })
            .collect();

        let gmd: Vec<GmdEntry> = Phase::PAIRS
            .iter()
            .filter_map(|&(a, b)| {
                let (pa, pb) = (self.bundle(a), self.bundle(b));
                if pa.is_empty() || pb.is_empty() {
                    return None;
                }
                Some(GmdEntry {
                    pair: Phase::pair_name(a, b),
                    value_m: compute_gmd(pa, pb),
                })
            })
            .collect();

        if gmr.is_empty() {
            debug!("compute_results called with no conductors");
            return LineResults::no_data();
        }

        let representative_bundle = self
            .bundles
            .iter()
            .map(|(_, points)| points)
            .find(|points| !points.is_empty())
            .cloned()
            .unwrap_or_default();

        let input = LineParametersInput {
            material: self.config.material,
            length_km: self.config.length_km,
            radius_m: self.config.radius_m,
            frequency_hz: self.config.frequency_hz,
            averaging: self.settings.averaging,
            phases: gmr.iter().map(|e| e.label).collect(),
            phase_gmr_m: gmr.iter().map(|e| e.value_m).collect(),
            pair_gmd_m: gmd.iter().map(|e| e.value_m).collect(),
            bundle_sizes: gmr.iter().map(|e| e.conductor_count).collect(),
            representative_bundle,
        };

        let params = match calculate(&input) {
            Ok(params) => {
                info!(
                    phases = gmr.len(),
                    r_per_km = params.r_per_km_ohm,
                    l_per_km_mh = params.l_per_km_mh,
                    c_per_km_nf = params.c_per_km_nf,
                    "line parameters computed"
                );
                ParameterOutcome::Computed(params)
            }
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "line parameters could not be computed");
                ParameterOutcome::Failed(err)
            }
        };

        let results = LineResults {
            gmr,
            gmd,
            params,
            history: Vec::new(),
        };
        let snapshot = self.snapshot();
        self.history.record(snapshot, results.clone());
        results
    }

    /// [`compute_results`](Self::compute_results), with the full history
    /// (including this computation) attached.
    pub fn compute_results_with_history(&mut self) -> LineResults {
        let mut results = self.compute_results();
        results.history = self.history.to_vec();
        results
    }

    /// Copy of the current configuration for the history log
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            unit: self.config.unit,
            material: self.config.material,
            length_km: self.config.length_km,
            radius_m: self.config.radius_m,
            frequency_hz: self.config.frequency_hz,
            averaging: self.settings.averaging,
            bundles: self.bundles.clone(),
            self_gmr_m: self.self_gmr_m.clone(),
        }
    }

    // === Serialization ===

    /// Serialize the whole session, history included, to pretty JSON.
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a session from JSON produced by [`Session::to_json`].
    ///
    /// The restored state is validated like setter input.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let mut session: Session = serde_json::from_str(json)?;
        session.config.validate()?;
        session.settings.validate()?;
        for (phase, value) in session.self_gmr_m.iter() {
            require_positive(&format!("self_gmr_m.{phase}"), *value)?;
        }
        for (phase, points) in session.bundles.iter() {
            for point in points {
                require_finite(&format!("bundles.{phase}.x"), point.x)?;
                require_finite(&format!("bundles.{phase}.y"), point.y)?;
            }
        }
        session.history.set_capacity(session.settings.history_capacity)?;
        Ok(session)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_line() -> Session {
        let mut session = Session::new();
        session.add_point(-20.0, 0.0, Phase::A).unwrap();
        session.add_point(0.0, 0.0, Phase::B).unwrap();
        session.add_point(20.0, 0.0, Phase::C).unwrap();
        for phase in Phase::ALL {
            session.set_self_gmr(phase, 0.035).unwrap();
        }
        session
            .set_line_params(ConductorMaterial::Acsr, 150.0, 0.04, 60.0)
            .unwrap();
        session
    }

    #[test]
    fn test_defaults() {
        let session = Session::new();
        assert_eq!(session.unit(), LengthUnit::Meters);
        assert_eq!(session.config().material, ConductorMaterial::Copper);
        assert_eq!(session.config().length_km, 100.0);
        assert_eq!(session.config().radius_m, 0.01);
        assert_eq!(session.config().frequency_hz, 60.0);
        for phase in Phase::ALL {
            assert!(session.bundle(phase).is_empty());
            assert!((session.self_gmr(phase) - 0.007788).abs() < 1e-15);
        }
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_add_point_converts_units() {
        let mut session = Session::new();
        session.set_unit(LengthUnit::Feet);
        let p = session.add_point(10.0, -5.0, Phase::A).unwrap();
        assert!((p.x - 3.048).abs() < 1e-12);
        assert!((p.y + 1.524).abs() < 1e-12);
        assert_eq!(session.bundle(Phase::A), &[p]);
    }

    #[test]
    fn test_unit_change_is_not_retroactive() {
        let mut session = Session::new();
        session.set_unit(LengthUnit::Centimeters);
        session.add_point(50.0, 0.0, Phase::B).unwrap();
        session.set_unit(LengthUnit::Millimeters);
        session.add_point(50.0, 0.0, Phase::B).unwrap();
        let stored = session.bundle(Phase::B);
        assert!((stored[0].x - 0.5).abs() < 1e-12);
        assert!((stored[1].x - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_set_self_gmr_in_current_unit() {
        let mut session = Session::new();
        session.set_unit(LengthUnit::Millimeters);
        let meters = session.set_self_gmr(Phase::C, 35.0).unwrap();
        assert!((meters - 0.035).abs() < 1e-12);
        assert_eq!(session.self_gmr(Phase::C), meters);
    }

    #[test]
    fn test_set_self_gmr_from_radius() {
        let mut session = Session::new();
        session.set_unit(LengthUnit::Centimeters);
        let meters = session.set_self_gmr_from_radius(Phase::A, 2.0).unwrap();
        assert!((meters - 0.7788 * 0.02).abs() < 1e-15);
    }

    #[test]
    fn test_rejected_input_leaves_state_unchanged() {
        let mut session = flat_line();
        let before = session.snapshot();

        assert!(session.set_self_gmr(Phase::A, 0.0).is_err());
        assert!(session.set_self_gmr(Phase::A, -1.0).is_err());
        assert!(session.add_point(f64::NAN, 0.0, Phase::A).is_err());
        assert!(session
            .set_line_params(ConductorMaterial::Copper, 100.0, 0.0, 60.0)
            .is_err());
        assert!(session
            .set_line_params(ConductorMaterial::Copper, -1.0, 0.01, 60.0)
            .is_err());
        assert!(session
            .add_bundle_preset(Phase::B, BundlePreset::Twin, 0.0, 0.0, 0.0)
            .is_err());
        assert!(session
            .set_snap(SnapSettings {
                enabled: true,
                grid: 0.0
            })
            .is_err());

        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_clear_bundle_and_all() {
        let mut session = flat_line();
        session.clear_bundle(Phase::B);
        assert!(session.bundle(Phase::B).is_empty());
        assert_eq!(session.bundle(Phase::A).len(), 1);

        session.clear_all();
        for phase in Phase::ALL {
            assert!(session.bundle(phase).is_empty());
            assert_eq!(session.self_gmr(phase), 0.035);
        }
        assert_eq!(session.config().material, ConductorMaterial::Acsr);
    }

    #[test]
    fn test_undo_point() {
        let mut session = Session::new();
        session.add_point(1.0, 1.0, Phase::A).unwrap();
        let last = session.add_point(2.0, 2.0, Phase::A).unwrap();
        assert_eq!(session.undo_point(Phase::A), Some(last));
        assert_eq!(session.bundle(Phase::A).len(), 1);
        assert_eq!(session.undo_point(Phase::B), None);
    }

    #[test]
    fn test_snap_to_grid() {
        let mut session = Session::new();
        session
            .set_snap(SnapSettings {
                enabled: true,
                grid: 0.5,
            })
            .unwrap();
        let p = session.add_point(1.26, -0.74, Phase::A).unwrap();
        assert_eq!(p, Point::new(1.5, -0.5));
    }

    #[test]
    fn test_bundle_preset_in_display_unit() {
        let mut session = Session::new();
        session.set_unit(LengthUnit::Centimeters);
        let pts = session
            .add_bundle_preset(Phase::A, BundlePreset::Square, 0.0, 1000.0, 45.0)
            .unwrap();
        assert_eq!(pts.len(), 4);
        assert_eq!(session.bundle(Phase::A).len(), 4);
        let side = crate::geometry::distance(pts[0], pts[1]);
        assert!((side - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_compute_no_data() {
        let mut session = Session::new();
        let results = session.compute_results();
        assert!(results.is_no_data());
        assert!(results.gmr.is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_compute_flat_line() {
        let mut session = flat_line();
        let results = session.compute_results();

        assert_eq!(results.gmr.len(), 3);
        for entry in &results.gmr {
            assert_eq!(entry.value_m, 0.035);
            assert_eq!(entry.conductor_count, 1);
        }
        assert!((results.gmd_of("A-B").unwrap() - 20.0).abs() < 1e-12);
        assert!((results.gmd_of("B-C").unwrap() - 20.0).abs() < 1e-12);
        assert!((results.gmd_of("A-C").unwrap() - 40.0).abs() < 1e-12);

        let params = results.parameters().unwrap();
        assert!((params.l_per_km_mh - 1.3158).abs() < 1e-3);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_single_phase_only_resistance() {
        let mut session = Session::new();
        session.add_point(0.0, 10.0, Phase::B).unwrap();
        let results = session.compute_results();
        assert!(results.gmd.is_empty());
        let params = results.parameters().unwrap();
        assert!(params.r_total_ohm > 0.0);
        assert_eq!(params.l_total_mh, 0.0);
        assert_eq!(params.xc_ohm, 0.0);
    }

    #[test]
    fn test_partial_failure_keeps_gmr_gmd() {
        let mut session = Session::new();
        session.add_point(0.0, 0.0, Phase::A).unwrap();
        session.add_point(0.0, 0.0, Phase::A).unwrap();
        session.add_point(5.0, 0.0, Phase::B).unwrap();
        session.add_point(5.4, 0.0, Phase::B).unwrap();

        let results = session.compute_results();
        assert_eq!(results.gmr_of(Phase::A), Some(0.0));
        assert!(results.gmr_of(Phase::B).unwrap() > 0.0);
        assert!(results.gmd_of("A-B").is_some());
        let err = results.error().unwrap();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        // Failed computations are still logged
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_mixed_arity_reported_as_domain_error() {
        let mut session = Session::new();
        session
            .add_bundle_preset(Phase::A, BundlePreset::Twin, -10.0, 20.0, 0.4)
            .unwrap();
        session
            .add_bundle_preset(Phase::B, BundlePreset::Triangle, 0.0, 20.0, 0.4)
            .unwrap();
        let results = session.compute_results();
        assert_eq!(results.gmr.len(), 2);
        assert_eq!(results.gmd.len(), 1);
        assert!(results.error().unwrap().to_string().contains("bundle sizes"));
    }

    #[test]
    fn test_history_capacity_setting() {
        let settings = SessionSettings {
            history_capacity: 2,
            ..SessionSettings::default()
        };
        let mut session = Session::with_settings(settings).unwrap();
        session.add_point(0.0, 0.0, Phase::A).unwrap();
        for _ in 0..4 {
            session.compute_results();
        }
        assert_eq!(session.history().len(), 2);

        session.set_history_capacity(1).unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.settings().history_capacity, 1);

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = SessionSettings {
            history_capacity: 0,
            ..SessionSettings::default()
        };
        assert!(Session::with_settings(settings).is_err());
    }

    #[test]
    fn test_compute_with_history() {
        let mut session = flat_line();
        session.compute_results();
        let results = session.compute_results_with_history();
        assert_eq!(results.history.len(), 2);
        let latest = results.history.last().unwrap();
        assert_eq!(latest.config.material, ConductorMaterial::Acsr);
        assert_eq!(latest.config.bundles.a, vec![Point::new(-20.0, 0.0)]);
        assert!(latest.results.history.is_empty());
    }

    #[test]
    fn test_history_snapshot_is_a_copy() {
        let mut session = flat_line();
        session.compute_results();
        session.clear_all();
        let entry = session.history().latest().unwrap();
        assert_eq!(entry.config.bundles.b.len(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut session = flat_line();
        session.compute_results();
        let json = session.to_json().unwrap();
        let restored = Session::from_json(&json).unwrap();
        assert_eq!(restored.config().material, ConductorMaterial::Acsr);
        assert_eq!(restored.bundle(Phase::C), session.bundle(Phase::C));
        assert_eq!(restored.history().len(), 1);
    }

    #[test]
    fn test_from_json_validates() {
        let mut session = Session::new();
        session.add_point(1.0, 2.0, Phase::A).unwrap();
        let json = session.to_json().unwrap().replace("\"radius_m\": 0.01", "\"radius_m\": -0.01");
        let err = Session::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = Session::from_json("{not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_session_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Session>();
    }
}
