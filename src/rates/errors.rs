/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for rate estimation

use thiserror::Error;

/// Errors that can occur during rate estimation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    #[error("Confidence level must lie in (0, 1), got {0}")]
    InvalidConfidence(f64),

    #[error("Invalid counts: {successes} successes out of {trials} trials")]
    InvalidCounts { successes: u64, trials: u64 },

    #[error("Sample {0} is NaN")]
    NanSample(usize),
}

/// Result type for rate estimation
pub type Result<T> = std::result::Result<T, RateError>;
