/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for histogram lookups

use thiserror::Error;

/// Errors that can occur when building or querying a histogram
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    #[error("Invalid bin edges: {0}")]
    InvalidEdges(String),

    #[error("Invalid bin counts: {0}")]
    InvalidCounts(String),

    #[error("Percentile must lie in [0, 100], got {0}")]
    InvalidPercentile(f64),
}

/// Result type for histogram operations
pub type Result<T> = std::result::Result<T, HistogramError>;
