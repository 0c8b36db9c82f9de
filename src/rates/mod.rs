/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Rate estimation from samples
//!
//! Detection efficiencies and false-alarm rates are estimated as the fraction
//! of trials that cross a threshold, with an exact (Clopper-Pearson) binomial
//! confidence interval.

pub mod errors;

pub use errors::{RateError, Result};

use log::debug;
use serde::{Deserialize, Serialize};
use statrs::function::beta::beta_reg;

/// Bisection steps when inverting the regularized incomplete beta function
const MAX_BISECTION_STEPS: usize = 200;

/// A rate with its confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    /// Maximum-likelihood rate `successes / trials`
    pub rate: f64,
    pub lower: f64,
    pub upper: f64,
    pub successes: u64,
    pub trials: u64,
    pub confidence: f64,
}

/// Clopper-Pearson interval for a binomial proportion
///
/// # Arguments
///
/// * `successes` - Number of successful trials
/// * `trials` - Total number of trials, at least one
/// * `confidence` - Two-sided confidence level in `(0, 1)`
///
/// # Returns
///
/// `(lower, upper)` bounds on the underlying rate
pub fn binomial_interval(successes: u64, trials: u64, confidence: f64) -> Result<(f64, f64)> {
    check_counts(successes, trials)?;
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(RateError::InvalidConfidence(confidence));
    }

    let alpha = 1.0 - confidence;
    let k = successes as f64;
    let n = trials as f64;

    let lower = if successes == 0 {
        0.0
    } else {
        inverse_beta_reg(k, n - k + 1.0, 0.5 * alpha)
    };
    let upper = if successes == trials {
        1.0
    } else {
        inverse_beta_reg(k + 1.0, n - k, 1.0 - 0.5 * alpha)
    };

    Ok((lower, upper))
}

/// Rate and Clopper-Pearson interval from success counts
pub fn estimate_rate(successes: u64, trials: u64, confidence: f64) -> Result<RateEstimate> {
    let (lower, upper) = binomial_interval(successes, trials, confidence)?;
    Ok(RateEstimate {
        rate: successes as f64 / trials as f64,
        lower,
        upper,
        successes,
        trials,
        confidence,
    })
}

/// Rate of samples strictly above `threshold`
pub fn rate_from_samples(samples: &[f64], threshold: f64, confidence: f64) -> Result<RateEstimate> {
    if let Some(i) = samples.iter().position(|s| s.is_nan()) {
        return Err(RateError::NanSample(i));
    }

    let successes = samples.iter().filter(|&&s| s > threshold).count() as u64;
    let trials = samples.len() as u64;
    debug!(
        "{} of {} samples above threshold {}",
        successes, trials, threshold
    );

    estimate_rate(successes, trials, confidence)
}

fn check_counts(successes: u64, trials: u64) -> Result<()> {
    if trials == 0 || successes > trials {
        return Err(RateError::InvalidCounts { successes, trials });
    }
    Ok(())
}

/// `x` in `[0, 1]` with `I_x(a, b) = p`, by bisection
fn inverse_beta_reg(a: f64, b: f64, p: f64) -> f64 {
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..MAX_BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if beta_reg(a, b, mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= f64::EPSILON * hi {
            break;
        }
    }
    0.5 * (lo + hi)
}
