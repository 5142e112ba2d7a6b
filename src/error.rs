//! Error types for the diode lab.
//!
//! This module provides a unified error type [`LabError`] that covers
//! every failure a measurement, sweep, or mystery round can report, plus
//! the I/O and serialization failures of the CLI and server frontends.

use thiserror::Error;

/// Result type alias using [`LabError`].
pub type Result<T> = std::result::Result<T, LabError>;

/// Unified error type for all diode lab operations.
#[derive(Error, Debug)]
pub enum LabError {
    // ============ Request Errors ============
    /// Material label is not one of the supported diodes
    #[error("Invalid material '{material}' (expected one of Si, Ge, RedLED, BlueLED, Zener)")]
    InvalidMaterial { material: String },

    /// Non-numeric or out-of-range temperature, voltage or sweep range
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Guess submitted before a mystery round was started
    #[error("No active mystery game - start one before submitting a guess")]
    NoActiveGame,

    // ============ Frontend Errors ============
    /// Socket or stream failure
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LabError {
    /// Create an invalid material error
    pub fn invalid_material(material: impl Into<String>) -> Self {
        Self::InvalidMaterial {
            material: material.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with a short description of what was being done
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Stable tag identifying the error kind, used in structured responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidMaterial { .. } => "InvalidMaterial",
            Self::InvalidInput { .. } => "InvalidInput",
            Self::NoActiveGame => "NoActiveGame",
            Self::Io { .. } => "Io",
            Self::Serialization(_) => "Serialization",
        }
    }
}

/// Reject NaN and infinities for a named numeric input.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LabError::invalid_input(field, format!("{value} is not a finite number")))
    }
}
