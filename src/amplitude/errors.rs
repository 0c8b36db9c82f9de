/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for amplitude-parameter validation

use thiserror::Error;

/// Errors that can occur while validating signal amplitude parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmplitudeError {
    /// The input is not an object of known numeric keys
    #[error("Malformed amplitude parameters: {0}")]
    Schema(String),

    /// A required key is absent
    #[error("Missing amplitude parameter: {0}")]
    Missing(&'static str),

    /// Both the physical and the plus/cross parameterisation were given
    #[error("Amplitude parameters mix {{h0, cosi}} with {{aPlus, aCross}}")]
    MixedParameterisation,

    /// Only one half of a parameter pair was given
    #[error("Incomplete amplitude parameterisation: {0}")]
    Incomplete(String),

    /// A value is outside its physical range
    #[error("Amplitude parameter {name}={value} out of range: {reason}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Result type for amplitude-parameter validation
pub type Result<T> = std::result::Result<T, AmplitudeError>;
