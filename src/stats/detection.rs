/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! False-alarm and false-dismissal inversion
//!
//! A detection statistic distributed as `ChiSquare(k)` in noise and as
//! `NoncentralChiSquare(k, λ)` with a signal present (e.g. 2F with `k = 4`)
//! is characterised by two inversions:
//!
//! * the threshold `x*` reached by noise with probability `fap`, and
//! * the non-centrality `λ` for which a signal stays below `x*` with
//!   probability `fdr`.

use super::central::{chi2_cdf, chi2_sf};
use super::errors::{Result, StatsError};
use super::ncx2::Ncx2Cdf;
use log::debug;
use statrs::function::erf::erfc_inv;
use std::f64::consts::SQRT_2;

/// Maximum number of interval doublings when bracketing a root
const MAX_BRACKET_STEPS: usize = 1100;

/// Maximum number of bisection steps
const MAX_BISECTION_STEPS: usize = 200;

/// Relative width at which bisection stops
const BISECTION_TOLERANCE: f64 = 1e-12;

/// Poisson mean below which the logarithmic estimate dominates the blend
const BLEND_SCALE: f64 = 2.0;

/// Central chi-square threshold exceeded by noise with probability `fap`
///
/// # Arguments
///
/// * `fap` - False-alarm probability in `(0, 1)`
/// * `k` - Degrees of freedom
///
/// # Returns
///
/// `x*` with `P(X > x*) = fap` for `X ~ ChiSquare(k)`
pub fn false_alarm_threshold(fap: f64, k: f64) -> Result<f64> {
    check_probability("false-alarm probability", fap)?;
    check_dof(k)?;

    let mut lo = 0.0;
    let mut hi = k.max(1.0);
    let mut steps = 0;
    while chi2_sf(hi, k) > fap {
        lo = hi;
        hi *= 2.0;
        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            return Err(StatsError::NumericalNonConvergence {
                indices: vec![0],
                iterations: steps,
            });
        }
    }

    for _ in 0..MAX_BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if chi2_sf(mid, k) > fap {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= BISECTION_TOLERANCE * hi {
            break;
        }
    }

    Ok(0.5 * (lo + hi))
}

/// Smooth blend of the two asymptotic non-centrality estimates
///
/// The weight `w = exp(-lambda_poly / scale)` favours `lambda_log` when the
/// Gaussian estimate says the non-centrality is small, and `lambda_poly`
/// once it is large compared to `scale`.
///
/// # Arguments
///
/// * `lambda_log` - Logarithmic estimate, accurate as `λ → 0`
/// * `lambda_poly` - Polynomial (Gaussian) estimate, accurate for large `λ`
/// * `scale` - Non-centrality at which the weight has dropped to `1/e`
pub fn lambda_blend(lambda_log: f64, lambda_poly: f64, scale: f64) -> f64 {
    let weight = (-lambda_poly.max(0.0) / scale).exp();
    weight * lambda_log + (1.0 - weight) * lambda_poly
}

/// Closed-form estimate of the non-centrality with false-dismissal `fdr` at `threshold`
///
/// Blends `2 ln(P_c(x*; k) / fdr)`, which keeps only the `j = 0` term of the
/// Poisson mixture, with the root of the Gaussian approximation
/// `x* = k + λ + z sqrt(2(k + 2λ))`, `z = Φ⁻¹(fdr)`.
///
/// Returns `0` when the central distribution alone already falls below
/// `threshold` with probability at most `fdr`.
pub fn asymptotic_noncentrality(threshold: f64, k: f64, fdr: f64) -> Result<f64> {
    check_threshold(threshold)?;
    check_dof(k)?;
    check_probability("false-dismissal probability", fdr)?;

    let central = chi2_cdf(threshold, k);
    if central <= fdr {
        return Ok(0.0);
    }

    let lambda_log = 2.0 * (central / fdr).ln();

    let z = -SQRT_2 * erfc_inv(2.0 * fdr);
    let discriminant = z * z + threshold - 0.5 * k;
    let lambda_poly = if discriminant < 0.0 {
        0.0
    } else {
        let s = 2.0 * (-z + discriminant.sqrt());
        (0.25 * s * s - 0.5 * k).max(0.0)
    };

    Ok(lambda_blend(lambda_log, lambda_poly, BLEND_SCALE))
}

/// Non-centrality with false-dismissal probability `fdr` at `threshold`
///
/// Starts from [`asymptotic_noncentrality`] and refines by bracketing and
/// bisection on the non-central CDF, which decreases monotonically in `λ`.
pub fn critical_noncentrality(threshold: f64, k: f64, fdr: f64) -> Result<f64> {
    let estimate = asymptotic_noncentrality(threshold, k, fdr)?;
    if chi2_cdf(threshold, k) <= fdr {
        return Ok(0.0);
    }

    let cdf = Ncx2Cdf::default();
    let too_small =
        |lambda: f64| -> Result<bool> { Ok(cdf.evaluate_scalar(threshold, k, lambda)? > fdr) };

    let mut lo = 0.0;
    let mut hi = estimate.max(1.0);
    let mut steps = 0;
    while too_small(hi)? {
        lo = hi;
        hi *= 2.0;
        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            return Err(StatsError::NumericalNonConvergence {
                indices: vec![0],
                iterations: steps,
            });
        }
    }

    let mut bisections = 0;
    while bisections < MAX_BISECTION_STEPS && hi - lo > BISECTION_TOLERANCE * hi {
        let mid = 0.5 * (lo + hi);
        if too_small(mid)? {
            lo = mid;
        } else {
            hi = mid;
        }
        bisections += 1;
    }

    let lambda = 0.5 * (lo + hi);
    debug!(
        "critical non-centrality {} (estimate {}) after {} bracket and {} bisection steps",
        lambda, estimate, steps, bisections
    );
    Ok(lambda)
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidArgument(format!(
            "{} must lie in (0, 1), got {}",
            name, p
        )))
    }
}

fn check_dof(k: f64) -> Result<()> {
    if k > 0.0 && k.is_finite() {
        Ok(())
    } else {
        Err(StatsError::InvalidArgument(format!(
            "degrees of freedom must be finite and positive, got k={}",
            k
        )))
    }
}

fn check_threshold(threshold: f64) -> Result<()> {
    if threshold > 0.0 && threshold.is_finite() {
        Ok(())
    } else {
        Err(StatsError::InvalidArgument(format!(
            "threshold must be finite and positive, got {}",
            threshold
        )))
    }
}
