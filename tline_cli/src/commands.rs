//! Line-oriented command language for driving a [`Session`] from stdin.

use std::io::Write;

use anyhow::{bail, Context, Result};
use tline_core::calculations::AveragingMode;
use tline_core::errors::CalcError;
use tline_core::geometry::BundlePreset;
use tline_core::{ConductorMaterial, LengthUnit, LineResults, ParameterOutcome, Phase, Session, SnapSettings};

pub const HELP: &str = "\
Commands (lengths in the current unit unless noted):
  unit <m|ft|inch|cm|mm>                  set display unit
  add <phase> <x> <y>                     add a conductor
  preset <phase> <twin|triangle|square> <cx> <cy> <spacing>
  undo <phase>                            remove last conductor of a phase
  clear <phase>                           remove all conductors of a phase
  clear-all                               remove all conductors
  gmr <phase> <r'>                        set self-GMR
  gmr-radius <phase> <radius>             set self-GMR of a solid conductor
  params <material> <length_km> <radius_m> <freq_hz>
  averaging <geometric|arithmetic>
  snap <on|off> [grid]
  compute                                 compute and print results
  json                                    compute and print results with history as JSON
  history                                 list past computations
  clear-history
  help
  quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Unit(LengthUnit),
    Add { phase: Phase, x: f64, y: f64 },
    Preset {
        phase: Phase,
        preset: BundlePreset,
        center_x: f64,
        center_y: f64,
        spacing: f64,
    },
    Undo(Phase),
    Clear(Phase),
    ClearAll,
    SelfGmr { phase: Phase, value: f64 },
    SelfGmrFromRadius { phase: Phase, radius: f64 },
    Params {
        material: ConductorMaterial,
        length_km: f64,
        radius_m: f64,
        frequency_hz: f64,
    },
    Averaging(AveragingMode),
    Snap(SnapSettings),
    Compute,
    Json,
    History,
    ClearHistory,
    Help,
    Quit,
}

/// Whether the input loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

fn number(field: &str, token: Option<&&str>) -> Result<f64> {
    let token = token.with_context(|| format!("missing value for {field}"))?;
    token
        .parse::<f64>()
        .map_err(|_| CalcError::invalid_input(field, *token, "Not a number").into())
}

fn phase(token: Option<&&str>) -> Result<Phase> {
    let token = token.context("missing phase (A, B or C)")?;
    Ok(Phase::from_label(token)?)
}

fn expect_arity(tokens: &[&str], n: usize, usage: &str) -> Result<()> {
    if tokens.len() != n {
        bail!("usage: {usage}");
    }
    Ok(())
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let args = &tokens[1..];

    let command = match tokens[0].to_lowercase().as_str() {
        "unit" => {
            expect_arity(args, 1, "unit <m|ft|inch|cm|mm>")?;
            Command::Unit(LengthUnit::from_key(args[0])?)
        }
        "add" => {
            expect_arity(args, 3, "add <phase> <x> <y>")?;
            Command::Add {
                phase: phase(args.first())?,
                x: number("x", args.get(1))?,
                y: number("y", args.get(2))?,
            }
        }
        "preset" => {
            expect_arity(args, 5, "preset <phase> <twin|triangle|square> <cx> <cy> <spacing>")?;
            Command::Preset {
                phase: phase(args.first())?,
                preset: BundlePreset::from_str_flexible(args[1])?,
                center_x: number("cx", args.get(2))?,
                center_y: number("cy", args.get(3))?,
                spacing: number("spacing", args.get(4))?,
            }
        }
        "undo" => {
            expect_arity(args, 1, "undo <phase>")?;
            Command::Undo(phase(args.first())?)
        }
        "clear" => {
            expect_arity(args, 1, "clear <phase>")?;
            Command::Clear(phase(args.first())?)
        }
        "clear-all" => {
            expect_arity(args, 0, "clear-all")?;
            Command::ClearAll
        }
        "gmr" => {
            expect_arity(args, 2, "gmr <phase> <r'>")?;
            Command::SelfGmr {
                phase: phase(args.first())?,
                value: number("self_gmr", args.get(1))?,
            }
        }
        "gmr-radius" => {
            expect_arity(args, 2, "gmr-radius <phase> <radius>")?;
            Command::SelfGmrFromRadius {
                phase: phase(args.first())?,
                radius: number("radius", args.get(1))?,
            }
        }
        "params" => {
            expect_arity(args, 4, "params <material> <length_km> <radius_m> <freq_hz>")?;
            Command::Params {
                material: ConductorMaterial::from_str_flexible(args[0])?,
                length_km: number("length_km", args.get(1))?,
                radius_m: number("radius_m", args.get(2))?,
                frequency_hz: number("frequency_hz", args.get(3))?,
            }
        }
        "averaging" => {
            expect_arity(args, 1, "averaging <geometric|arithmetic>")?;
            Command::Averaging(AveragingMode::from_str_flexible(args[0])?)
        }
        "snap" => {
            if args.is_empty() || args.len() > 2 {
                bail!("usage: snap <on|off> [grid]");
            }
            let enabled = match args.first().map(|s| s.to_lowercase()) {
                Some(ref s) if s == "on" => true,
                Some(ref s) if s == "off" => false,
                _ => bail!("usage: snap <on|off> [grid]"),
            };
            let grid = match args.get(1) {
                Some(_) => number("grid", args.get(1))?,
                None => SnapSettings::default().grid,
            };
            Command::Snap(SnapSettings { enabled, grid })
        }
        "compute" => {
            expect_arity(args, 0, "compute")?;
            Command::Compute
        }
        "json" => {
            expect_arity(args, 0, "json")?;
            Command::Json
        }
        "history" => {
            expect_arity(args, 0, "history")?;
            Command::History
        }
        "clear-history" => {
            expect_arity(args, 0, "clear-history")?;
            Command::ClearHistory
        }
        "help" | "?" => {
            expect_arity(args, 0, "help")?;
            Command::Help
        }
        "quit" | "exit" => {
            expect_arity(args, 0, "quit")?;
            Command::Quit
        }
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

/// Apply a command to the session, writing any output to `out`.
pub fn execute(session: &mut Session, command: Command, out: &mut impl Write) -> Result<Flow> {
    match command {
        Command::Unit(unit) => {
            session.set_unit(unit);
            writeln!(out, "Units set to {unit}")?;
        }
        Command::Add { phase, x, y } => {
            let p = session.add_point(x, y, phase)?;
            writeln!(
                out,
                "Added ({x}, {y}) {} to {phase} -> ({:.4}, {:.4}) m",
                session.unit(),
                p.x,
                p.y
            )?;
        }
        Command::Preset {
            phase,
            preset,
            center_x,
            center_y,
            spacing,
        } => {
            let points = session.add_bundle_preset(phase, preset, center_x, center_y, spacing)?;
            writeln!(out, "Added {} ({} conductors) to {phase}", preset, points.len())?;
        }
        Command::Undo(phase) => match session.undo_point(phase) {
            Some(p) => writeln!(out, "Removed ({:.4}, {:.4}) m from {phase}", p.x, p.y)?,
            None => writeln!(out, "Bundle {phase} is empty")?,
        },
        Command::Clear(phase) => {
            session.clear_bundle(phase);
            writeln!(out, "Cleared bundle {phase}")?;
        }
        Command::ClearAll => {
            session.clear_all();
            writeln!(out, "All bundles cleared")?;
        }
        Command::SelfGmr { phase, value } => {
            let meters = session.set_self_gmr(phase, value)?;
            writeln!(
                out,
                "Set self GMR (r') for {phase} = {value} {} ({meters:.6} m)",
                session.unit()
            )?;
        }
        Command::SelfGmrFromRadius { phase, radius } => {
            let meters = session.set_self_gmr_from_radius(phase, radius)?;
            writeln!(out, "Set self GMR (r') for {phase} = {meters:.6} m")?;
        }
        Command::Params {
            material,
            length_km,
            radius_m,
            frequency_hz,
        } => {
            session.set_line_params(material, length_km, radius_m, frequency_hz)?;
            writeln!(out, "Line parameters updated")?;
        }
        Command::Averaging(mode) => {
            session.set_averaging(mode);
            writeln!(out, "Averaging set to {mode}")?;
        }
        Command::Snap(snap) => {
            session.set_snap(snap)?;
            if snap.enabled {
                writeln!(out, "Snap enabled (grid {} {})", snap.grid, session.unit())?;
            } else {
                writeln!(out, "Snap disabled")?;
            }
        }
        Command::Compute => {
            let results = session.compute_results();
            print_results(&results, out)?;
        }
        Command::Json => {
            let results = session.compute_results_with_history();
            writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
        }
        Command::History => {
            if session.history().is_empty() {
                writeln!(out, "No computations yet")?;
            }
            for (i, entry) in session.history().iter().enumerate() {
                let summary = match &entry.results.params {
                    ParameterOutcome::Computed(p) => {
                        format!("L = {:.4} mH/km, C = {:.4} nF/km", p.l_per_km_mh, p.c_per_km_nf)
                    }
                    ParameterOutcome::Failed(err) => format!("failed: {err}"),
                    ParameterOutcome::NoData => "no data".to_string(),
                };
                writeln!(
                    out,
                    "{:>3}  {}  {} {} km  {}",
                    i + 1,
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.config.material,
                    entry.config.length_km,
                    summary
                )?;
            }
        }
        Command::ClearHistory => {
            session.clear_history();
            writeln!(out, "History cleared")?;
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Stop),
    }
    Ok(Flow::Continue)
}

fn print_results(results: &LineResults, out: &mut impl Write) -> Result<()> {
    if results.is_no_data() {
        writeln!(out, "No conductors added. Cannot calculate parameters.")?;
        return Ok(());
    }

    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out, "  LINE PARAMETERS")?;
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out, "GMR:")?;
    for entry in &results.gmr {
        writeln!(
            out,
            "  {}: {:.6} m ({} conductor{})",
            entry.label,
            entry.value_m,
            entry.conductor_count,
            if entry.conductor_count == 1 { "" } else { "s" }
        )?;
    }
    if !results.gmd.is_empty() {
        writeln!(out, "GMD:")?;
        for entry in &results.gmd {
            writeln!(out, "  {}: {:.6} m", entry.pair, entry.value_m)?;
        }
    }

    match &results.params {
        ParameterOutcome::Computed(p) => {
            writeln!(out, "Parameters:")?;
            writeln!(out, "  R  = {:.6} Ω/km  ({:.4} Ω total)", p.r_per_km_ohm, p.r_total_ohm)?;
            writeln!(out, "  L  = {:.4} mH/km  ({:.3} mH total)", p.l_per_km_mh, p.l_total_mh)?;
            writeln!(out, "  C  = {:.4} nF/km  ({:.4} μF total)", p.c_per_km_nf, p.c_total_uf)?;
            writeln!(out, "  XL = {:.3} Ω", p.xl_ohm)?;
            writeln!(out, "  XC = {:.3} Ω", p.xc_ohm)?;
        }
        ParameterOutcome::Failed(err) => {
            writeln!(out, "Parameters: not available")?;
            writeln!(out, "  {err}")?;
        }
        ParameterOutcome::NoData => {}
    }
    writeln!(out, "═══════════════════════════════════════")?;
    Ok(())
}
