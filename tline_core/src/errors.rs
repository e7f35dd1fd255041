//! # Error Types
//!
//! Structured error types for tline_core. Errors serialize to JSON next to
//! results, so a front-end can show them without string parsing.
//!
//! Two families matter to callers:
//!
//! - **Input errors** (`InvalidInput`, `UnknownUnit`, `MaterialNotFound`,
//!   `UnknownPhase`) are raised by setters before any state changes.
//! - **Domain errors** (`DomainError`) come out of the parameter derivation
//!   when the geometry makes a logarithm or division meaningless. They are
//!   reported alongside whatever GMR/GMD entries were already computed.
//!
//! ## Example
//!
//! ```rust
//! use tline_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_km: f64) -> CalcResult<()> {
//!     if !(length_km > 0.0) {
//!         return Err(CalcError::invalid_input(
//!             "length_km",
//!             length_km.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tline_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for engine operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Display unit key is not in the unit table
    #[error("Unknown unit: '{unit}' (expected one of m, ft, inch, cm, mm)")]
    UnknownUnit { unit: String },

    /// Material not found in the resistivity table
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Phase label is not A, B or C
    #[error("Unknown phase: '{phase}' (expected A, B or C)")]
    UnknownPhase { phase: String },

    /// A derived quantity could not be computed from the current geometry
    #[error("Cannot compute {quantity}: {reason}")]
    DomainError { quantity: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(unit: impl Into<String>) -> Self {
        CalcError::UnknownUnit { unit: unit.into() }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create an UnknownPhase error
    pub fn unknown_phase(phase: impl Into<String>) -> Self {
        CalcError::UnknownPhase {
            phase: phase.into(),
        }
    }

    /// Create a DomainError
    pub fn domain(quantity: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DomainError {
            quantity: quantity.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by a rejected setter argument.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::UnknownUnit { .. }
                | CalcError::MaterialNotFound { .. }
                | CalcError::UnknownPhase { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::UnknownPhase { .. } => "UNKNOWN_PHASE",
            CalcError::DomainError { .. } => "DOMAIN_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Reject NaN and infinities for a named numeric input.
pub(crate) fn require_finite(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite number",
        ))
    }
}

/// Reject zero, negative and non-finite values for a named numeric input.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a positive, finite number",
        ))
    }
}
