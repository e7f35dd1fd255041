//! # tline_core - Transmission Line Parameter Engine
//!
//! `tline_core` turns the conductor layout of a three-phase overhead line
//! into its per-phase electrical parameters: resistance, inductance,
//! capacitance and the reactances at the operating frequency. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure geometry**: GMR/GMD and the parameter formulas are plain functions
//! - **One owner**: a [`Session`] holds all mutable state; setters validate first
//! - **Graceful results**: partial GMR/GMD survive a failed parameter step
//! - **Rich Errors**: Structured error types, not just strings
//!
//! The model is the textbook transposed line. Skin effect, corona and earth
//! return are not modelled.
//!
//! ## Quick Start
//!
//! ```rust
//! use tline_core::{Phase, Session};
//!
//! let mut session = Session::new();
//! session.add_point(-5.0, 0.0, Phase::A).unwrap();
//! session.add_point(5.0, 0.0, Phase::B).unwrap();
//!
//! let results = session.compute_results();
//! let json = serde_json::to_string_pretty(&results).unwrap();
//! assert!(json.contains("L_per_km_mH"));
//! ```
//!
//! ## Modules
//!
//! - [`session`] - Stateful session, line configuration and results
//! - [`geometry`] - Distance, geometric mean, GMR, GMD, bundle presets
//! - [`calculations`] - R/L/C/X derivation
//! - [`history`] - Bounded log of past computations
//! - [`materials`] - Conductor resistivity table
//! - [`units`] - Display unit table
//! - [`phase`] - Phase labels and per-phase storage
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod geometry;
pub mod history;
pub mod materials;
pub mod phase;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{AveragingMode, LineParameters};
pub use errors::{CalcError, CalcResult};
pub use geometry::{compute_gmd, compute_gmr, distance, geometric_mean, BundlePreset, Point};
pub use materials::ConductorMaterial;
pub use phase::Phase;
pub use session::{LineConfig, LineResults, ParameterOutcome, Session, SessionSettings, SnapSettings};
pub use units::LengthUnit;
