//! End-to-end tests driving a `Session` through its public API.

use tline_core::calculations::AveragingMode;
use tline_core::geometry::{compute_gmr, BundlePreset, Point};
use tline_core::{CalcError, ConductorMaterial, LengthUnit, ParameterOutcome, Phase, Session};

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

/// Flat horizontal single-conductor line, 20 m phase spacing, ACSR, 150 km.
fn flat_acsr_line() -> Session {
    let mut session = Session::new();
    session.set_unit(LengthUnit::Meters);
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
fn flat_line_gmr_and_gmd() {
    let mut session = flat_acsr_line();
    let results = session.compute_results();

    for phase in Phase::ALL {
        assert_eq!(results.gmr_of(phase), Some(0.035));
    }
    assert_close(results.gmd_of("A-B").unwrap(), 20.0, 1e-12);
    assert_close(results.gmd_of("B-C").unwrap(), 20.0, 1e-12);
    assert_close(results.gmd_of("A-C").unwrap(), 40.0, 1e-12);
}

#[test]
fn flat_line_parameters_geometric() {
    let mut session = flat_acsr_line();
    let results = session.compute_results();
    let params = results.parameters().expect("parameters should compute");

    let gmd = (20.0f64 * 20.0 * 40.0).cbrt();
    assert_close(params.gmd_equivalent_m.unwrap(), gmd, 1e-9);

    // ~1.316 mH/km and ~197.4 mH over 150 km
    assert_close(params.l_per_km_mh, 2e-4 * (gmd / 0.035).ln() * 1000.0, 1e-9);
    assert_close(params.l_total_mh, 197.38, 0.1);

    let r_per_km = 3.2e-8 * 1000.0 / (std::f64::consts::PI * 0.04 * 0.04);
    assert_close(params.r_per_km_ohm, r_per_km, 1e-12);
    assert_close(params.r_total_ohm, r_per_km * 150.0, 1e-10);

    assert!(params.c_per_km_nf > 8.0 && params.c_per_km_nf < 9.0);
    assert!(params.xl_ohm > 70.0 && params.xl_ohm < 80.0);
    assert!(params.xc_ohm > 1900.0 && params.xc_ohm < 2200.0);
}

#[test]
fn flat_line_parameters_arithmetic_compatibility() {
    let mut session = flat_acsr_line();
    session.set_averaging(AveragingMode::Arithmetic);
    let results = session.compute_results();
    let params = results.parameters().unwrap();

    assert_close(params.gmd_equivalent_m.unwrap(), 80.0 / 3.0, 1e-9);
    // Arithmetic averaging: ~1.325 mH/km, ~198.7 mH
    assert_close(params.l_per_km_mh, 1.325, 0.005);
    assert_close(params.l_total_mh, 198.7, 0.5);
}

#[test]
fn resistance_scales_with_length_and_radius() {
    let mut session = Session::new();
    session.add_point(0.0, 0.0, Phase::A).unwrap();

    session
        .set_line_params(ConductorMaterial::Copper, 50.0, 0.01, 50.0)
        .unwrap();
    let base = session.compute_results().parameters().unwrap().clone();

    session
        .set_line_params(ConductorMaterial::Copper, 100.0, 0.01, 50.0)
        .unwrap();
    let long = session.compute_results().parameters().unwrap().clone();
    assert_close(long.r_total_ohm, 2.0 * base.r_total_ohm, 1e-12);

    session
        .set_line_params(ConductorMaterial::Copper, 50.0, 0.02, 50.0)
        .unwrap();
    let thick = session.compute_results().parameters().unwrap().clone();
    assert_close(thick.r_per_km_ohm, base.r_per_km_ohm / 4.0, 1e-15);
}

#[test]
fn unit_round_trip() {
    let mut session = Session::new();
    let cases = [
        (LengthUnit::Meters, 12.5),
        (LengthUnit::Feet, 12.5),
        (LengthUnit::Inches, 12.5),
        (LengthUnit::Centimeters, 12.5),
        (LengthUnit::Millimeters, 12.5),
    ];
    for (unit, value) in cases {
        session.set_unit(unit);
        session.add_point(value, -value, Phase::A).unwrap();
    }
    session.set_unit(LengthUnit::Meters);

    let stored = session.bundle(Phase::A);
    assert_eq!(stored.len(), cases.len());
    for (point, (unit, value)) in stored.iter().zip(cases) {
        assert_eq!(point.x, value * unit.factor());
        assert_eq!(point.y, -value * unit.factor());
    }
}

#[test]
fn bundle_gmr_is_order_independent() {
    let mut forward = Session::new();
    let mut reversed = Session::new();
    let pts = [(0.0, 0.0), (0.45, 0.0), (0.45, 0.45), (0.0, 0.45)];
    for &(x, y) in &pts {
        forward.add_point(x, y, Phase::A).unwrap();
    }
    for &(x, y) in pts.iter().rev() {
        reversed.add_point(x, y, Phase::A).unwrap();
    }
    let a = forward.compute_results().gmr_of(Phase::A).unwrap();
    let b = reversed.compute_results().gmr_of(Phase::A).unwrap();
    assert_close(a, b, 1e-15);
}

#[test]
fn quad_bundle_line() {
    let mut session = Session::new();
    session.set_unit(LengthUnit::Centimeters);
    for (phase, cx) in [(Phase::A, -1200.0), (Phase::B, 0.0), (Phase::C, 1200.0)] {
        session
            .add_bundle_preset(phase, BundlePreset::Square, cx, 2500.0, 45.0)
            .unwrap();
        session.set_self_gmr_from_radius(phase, 1.5).unwrap();
    }
    session
        .set_line_params(ConductorMaterial::Acsr, 200.0, 0.015, 50.0)
        .unwrap();

    let results = session.compute_results();
    let expected_gmr = compute_gmr(session.bundle(Phase::A), session.self_gmr(Phase::A));
    for entry in &results.gmr {
        assert_eq!(entry.conductor_count, 4);
        assert_close(entry.value_m, expected_gmr, 1e-12);
    }

    // Square bundle, side s: GMR = (r' * s^3 * sqrt(2))^(1/4)
    let r_self = 0.7788 * 0.015;
    let analytic = (r_self * 0.45f64.powi(3) * 2f64.sqrt()).powf(0.25);
    assert_close(expected_gmr, analytic, 1e-12);

    let params = results.parameters().unwrap();
    assert_eq!(params.conductors_per_phase, 4);
    // Bundling lowers inductance well below a single-conductor line
    assert!(params.l_per_km_mh > 0.5 && params.l_per_km_mh < 1.0);
    assert!(params.c_per_km_nf > 10.0);
}

#[test]
fn partial_geometry_then_completion() {
    let mut session = Session::new();
    session.add_point(0.0, 10.0, Phase::A).unwrap();

    let one_phase = session.compute_results();
    assert_eq!(one_phase.gmr.len(), 1);
    assert!(one_phase.gmd.is_empty());
    assert_eq!(one_phase.parameters().unwrap().l_per_km_mh, 0.0);

    session.add_point(6.0, 10.0, Phase::C).unwrap();
    let two_phase = session.compute_results();
    assert_eq!(two_phase.gmd.len(), 1);
    assert_eq!(two_phase.gmd[0].pair, "A-C");
    assert!(two_phase.parameters().unwrap().l_per_km_mh > 0.0);

    assert_eq!(session.history().len(), 2);
}

#[test]
fn coincident_phases_fail_without_losing_entries() {
    let mut session = Session::new();
    session.add_point(3.0, 3.0, Phase::A).unwrap();
    session.add_point(3.0, 3.0, Phase::B).unwrap();

    let results = session.compute_results();
    assert_eq!(results.gmr.len(), 2);
    assert_eq!(results.gmd_of("A-B"), Some(0.0));
    match &results.params {
        ParameterOutcome::Failed(CalcError::DomainError { quantity, .. }) => {
            assert_eq!(quantity, "inductance");
        }
        other => panic!("expected a domain error, got {other:?}"),
    }
}

fn expect_inductance_failure(results: &tline_core::LineResults, mentions: &str) {
    match &results.params {
        ParameterOutcome::Failed(CalcError::DomainError { quantity, reason }) => {
            assert_eq!(quantity, "inductance");
            assert!(reason.contains(mentions), "{reason}");
        }
        other => panic!("expected a domain error, got {other:?}"),
    }
}

#[test]
fn arithmetic_mode_rejects_coincident_sub_conductors() {
    let mut session = Session::new();
    session.set_averaging(AveragingMode::Arithmetic);
    session.add_point(0.0, 0.0, Phase::A).unwrap();
    session.add_point(0.4, 0.0, Phase::A).unwrap();
    session.add_point(5.0, 0.0, Phase::B).unwrap();
    session.add_point(5.0, 0.0, Phase::B).unwrap();

    let results = session.compute_results();
    assert_eq!(results.gmr_of(Phase::B), Some(0.0));
    assert!(results.gmr_of(Phase::A).unwrap() > 0.0);
    expect_inductance_failure(&results, "phase B");
}

#[test]
fn arithmetic_mode_rejects_coincident_phases() {
    let mut session = Session::new();
    session.set_averaging(AveragingMode::Arithmetic);
    session.add_point(0.0, 0.0, Phase::A).unwrap();
    session.add_point(0.0, 0.0, Phase::B).unwrap();
    session.add_point(10.0, 0.0, Phase::C).unwrap();

    let results = session.compute_results();
    assert_eq!(results.gmd_of("A-B"), Some(0.0));
    assert_eq!(results.gmd.len(), 3);
    expect_inductance_failure(&results, "A-B");
}

#[test]
fn no_data_is_not_an_error() {
    let mut session = Session::new();
    session.add_point(1.0, 1.0, Phase::B).unwrap();
    session.clear_all();
    let results = session.compute_results();
    assert!(results.is_no_data());
    assert!(session.history().is_empty());
}

#[test]
fn results_json_schema() {
    let mut session = flat_acsr_line();
    let results = session.compute_results_with_history();
    let value: serde_json::Value = serde_json::to_value(&results).unwrap();

    assert_eq!(value["gmr"][0]["label"], "A");
    assert_eq!(value["gmr"][0]["conductor_count"], 1);
    assert_eq!(value["gmd"][0]["pair"], "A-B");
    assert_eq!(value["params"]["status"], "computed");
    assert!(value["params"]["value"]["L_total_mH"].is_number());
    assert!(value["history"][0]["timestamp"].is_string());
    assert_eq!(value["history"][0]["config"]["material"], "ACSR");
    assert_eq!(value["history"][0]["config"]["unit"], "m");
}

#[test]
fn stored_points_survive_json() {
    let mut session = flat_acsr_line();
    session
        .add_bundle_preset(Phase::A, BundlePreset::Twin, 0.0, 30.0, 0.4)
        .unwrap();
    let json = session.to_json().unwrap();
    let restored = Session::from_json(&json).unwrap();
    assert_eq!(restored.bundle(Phase::A).len(), 3);
    assert_eq!(restored.bundle(Phase::B), &[Point::new(0.0, 0.0)]);
}
