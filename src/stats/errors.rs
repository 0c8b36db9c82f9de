/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for the statistical functions

use thiserror::Error;

/// Errors that can occur while evaluating statistical functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Input arrays cannot be broadcast to a common shape
    #[error("Shape mismatch: cannot broadcast shapes {shapes:?} together")]
    ShapeMismatch { shapes: Vec<Vec<usize>> },

    /// An argument is outside the domain of the function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A series did not reach the convergence tolerance within the sweep cap
    #[error(
        "Series failed to converge after {iterations} iterations for {} element(s): {indices:?}",
        .indices.len()
    )]
    NumericalNonConvergence {
        /// Flat (row-major) indices into the broadcast shape
        indices: Vec<usize>,
        iterations: usize,
    },
}

/// A specialized Result type for statistical operations
pub type Result<T> = std::result::Result<T, StatsError>;
