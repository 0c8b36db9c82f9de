/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for segment lists

use thiserror::Error;

/// Errors that can occur when building a segment list
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    #[error("Invalid segment [{start}, {end}): {reason}")]
    InvalidSegment {
        start: f64,
        end: f64,
        reason: &'static str,
    },

    #[error("Segments [{0}, {1}) and [{2}, {3}) overlap")]
    Overlap(f64, f64, f64, f64),
}

/// Result type for segment operations
pub type Result<T> = std::result::Result<T, SegmentError>;
