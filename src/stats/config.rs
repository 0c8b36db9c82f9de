/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Configuration for the non-central chi-square evaluator

use serde::{Deserialize, Serialize};

/// Relative tolerance on the running partial sum of the Poisson-mixture series.
///
/// A series element stops once its newest increment is no larger than this
/// fraction of the running sum.
pub const SERIES_TOLERANCE: f64 = 1e-6;

/// Default cap on the number of series sweeps
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Default number of active elements from which a sweep runs on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Evaluator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ncx2Config {
    /// Maximum number of series sweeps before giving up with
    /// [`StatsError::NumericalNonConvergence`](super::StatsError::NumericalNonConvergence)
    pub max_iterations: usize,
    /// Minimum number of still-active series elements for a sweep to be
    /// spread across threads
    pub parallel_threshold: usize,
}

impl Default for Ncx2Config {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Ncx2Config {
    /// Configuration with a custom sweep cap
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }
}
