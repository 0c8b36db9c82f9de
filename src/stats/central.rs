/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Central chi-square and Poisson building blocks
//!
//! The central chi-square CDF is the regularized lower incomplete gamma
//! function `P(k/2, x/2)`, evaluated with `statrs`' Cephes-derived
//! series/continued-fraction implementation. Its prefactor is formed in log
//! space through `ln_gamma`, which keeps it accurate for `k` in the thousands.
//! Far in the lower tail `P` drops below the smallest normal `f64`, so a log
//! form is provided for callers that multiply it by large weights.

use statrs::function::factorial::ln_factorial;
use statrs::function::gamma::{gamma_lr, gamma_ur, ln_gamma};

/// Term cap for the lower-tail series in [`ln_gamma_lr`]
const MAX_SERIES_TERMS: usize = 100_000;

/// Central chi-square CDF `P(X <= x)` for `X ~ ChiSquare(k)`
///
/// # Arguments
///
/// * `x` - Evaluation point
/// * `k` - Degrees of freedom, finite and strictly positive
///
/// # Returns
///
/// `P(k/2, x/2)`; `0` for `x <= 0` and `1` for `x = +inf`
pub fn chi2_cdf(x: f64, k: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    gamma_lr(0.5 * k, 0.5 * x)
}

/// Central chi-square survival function `P(X > x)`
///
/// Evaluated through the upper regularized gamma function so small tail
/// probabilities keep their relative precision.
pub fn chi2_sf(x: f64, k: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x == f64::INFINITY {
        return 0.0;
    }
    gamma_ur(0.5 * k, 0.5 * x)
}

/// Poisson probability mass `mean^j e^-mean / j!`
pub fn poisson_pmf(j: u64, mean: f64) -> f64 {
    if mean == 0.0 {
        return if j == 0 { 1.0 } else { 0.0 };
    }
    (j as f64 * mean.ln() - mean - ln_factorial(j)).exp()
}

/// Auxiliary term `y^a e^-y / Γ(a+1)`
///
/// This is the step between neighbouring incomplete gamma values,
/// `P(a, y) - P(a+1, y)`, and lets a chain of chi-square CDFs with degrees of
/// freedom `k, k+2, k+4, ...` be walked without re-evaluating `P`.
pub fn gamma_density_term(a: f64, y: f64) -> f64 {
    ln_gamma_density_term(a, y).exp()
}

/// Natural log of [`gamma_density_term`], finite for any `a > -1` and `y > 0`
pub fn ln_gamma_density_term(a: f64, y: f64) -> f64 {
    a * y.ln() - y - ln_gamma(a + 1.0)
}

/// Natural log of the regularized lower incomplete gamma function `P(a, y)`
///
/// Uses `statrs` while `P` is a normal float. Below that the series
///
/// ```text
/// P(a, y) = y^a e^-y / Γ(a+1) · Σ_n y^n / ((a+1)(a+2)...(a+n))
/// ```
///
/// is summed with its prefactor kept in log space. `P` only underflows for
/// `y < a`, where the series terms shrink geometrically.
pub fn ln_gamma_lr(a: f64, y: f64) -> f64 {
    if y <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let p = gamma_lr(a, y);
    if p >= f64::MIN_POSITIVE {
        return p.ln();
    }

    let mut term = 1.0;
    let mut sum = 1.0;
    for n in 1..=MAX_SERIES_TERMS {
        term *= y / (a + n as f64);
        sum += term;
        if term <= f64::EPSILON * sum {
            break;
        }
    }
    ln_gamma_density_term(a, y) + sum.ln()
}
