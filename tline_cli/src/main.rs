//! # tline CLI
//!
//! Line-oriented driver for a transmission-line session. Commands are read
//! from stdin one per line, so the same binary serves interactive use and
//! scripted input (`tline_cli < layout.txt`). Type `help` for the command list.

mod commands;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tline_core::calculations::AveragingMode;
use tline_core::{LengthUnit, Session, SessionSettings};
use tracing::{debug, info};

use crate::commands::{execute, parse_command, Flow};

#[derive(Parser, Debug)]
#[command(author, version, about = "Transmission line parameter calculator", long_about = None)]
struct Cli {
    /// Initial display unit (m, ft, inch, cm, mm)
    #[arg(long, default_value = "m", value_parser = parse_unit)]
    unit: LengthUnit,

    /// Averaging used for the aggregate GMR/GMD (geometric, arithmetic)
    #[arg(long, default_value = "geometric", value_parser = parse_averaging)]
    averaging: AveragingMode,

    /// Maximum number of computations kept in history
    #[arg(long, default_value_t = tline_core::history::DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Stop at the first command that fails instead of reporting and continuing
    #[arg(long)]
    fail_fast: bool,
}

fn parse_unit(s: &str) -> Result<LengthUnit, String> {
    LengthUnit::from_key(s).map_err(|e| e.to_string())
}

fn parse_averaging(s: &str) -> Result<AveragingMode, String> {
    AveragingMode::from_str_flexible(s).map_err(|e| e.to_string())
}

fn run(cli: Cli) -> Result<()> {
    let settings = SessionSettings {
        history_capacity: cli.history_capacity,
        averaging: cli.averaging,
        ..SessionSettings::default()
    };
    let mut session = Session::with_settings(settings).context("invalid session settings")?;
    session.set_unit(cli.unit);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();

    if interactive {
        writeln!(stdout, "tline - transmission line parameters (type 'help')")?;
    }

    let mut line = String::new();
    let mut input = stdin.lock();
    loop {
        if interactive {
            write!(stdout, "> ")?;
            stdout.flush()?;
        }
        line.clear();
        if input.read_line(&mut line).context("failed to read stdin")? == 0 {
            break;
        }

        let outcome = parse_command(&line).and_then(|cmd| match cmd {
            Some(cmd) => {
                debug!(?cmd, "executing");
                execute(&mut session, cmd, &mut stdout)
            }
            None => Ok(Flow::Continue),
        });

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => break,
            Err(err) if cli.fail_fast => return Err(err),
            Err(err) => eprintln!("Error: {err:#}"),
        }
    }

    info!(computations = session.history().len(), "session finished");
    Ok(())
}

fn main() -> Result<()> {
    // Respects RUST_LOG; quiet by default so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    run(Cli::parse())
}
