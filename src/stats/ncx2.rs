/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Non-central chi-square cumulative distribution function
//!
//! The CDF is the Poisson mixture
//!
//! ```text
//! P(x; k, λ) = Σ_j Poisson(j; λ/2) · P_central(x; k + 2j)
//! ```
//!
//! Elements with `λ = 0` reduce to the central chi-square CDF. For `λ > 0` the
//! sum starts at the Poisson mode `j0 = round(λ/2)` and walks outwards in both
//! directions, so large non-centralities converge in a few standard deviations
//! of the Poisson weight instead of `λ/2` terms. Neighbouring central CDFs are
//! linked through `P(a, y) - P(a+1, y) = y^a e^-y / Γ(a+1)`, so incomplete
//! gamma functions are only evaluated when an element is seeded.
//!
//! The downward walk is carried in log space. For small `x` and large `λ` the
//! central CDF at the mode underflows while the terms near `j = 0` hold
//! almost all of the mass, so those terms must be recoverable from a zero
//! starting point. The mixture terms are unimodal in `j`, and a downward
//! walk that is still climbing is only stopped once a bound on everything
//! below it is negligible.

use super::broadcast::{broadcast_flat, broadcast_shape};
use super::central::{
    chi2_cdf, gamma_density_term, ln_gamma_density_term, ln_gamma_lr, poisson_pmf,
};
use super::config::{Ncx2Config, SERIES_TOLERANCE};
use super::errors::{Result, StatsError};
use log::{debug, trace, warn};
use ndarray::{aview0, ArrayD, ArrayView, Dimension, IxDyn};
use rayon::prelude::*;

/// Per-element state of the bidirectional Poisson-mixture series
#[derive(Debug, Clone)]
struct SeriesState {
    /// Flat index into the broadcast output
    index: usize,
    /// Poisson mean λ/2
    mean: f64,
    /// k/2
    a: f64,
    /// x/2
    y: f64,

    j_up: f64,
    weight_up: f64,
    cdf_up: f64,
    step_up: f64,

    j_down: f64,
    ln_weight_down: f64,
    ln_cdf_down: f64,
    ln_step_down: f64,
    ln_term_down: f64,
    /// ln P(a, y), the largest central CDF in the mixture
    ln_cdf_floor: f64,

    sum: f64,
    converged: bool,
}

impl SeriesState {
    /// Seed the series at the Poisson mode. Requires `x > 0` finite, `k > 0`
    /// and `lambda > 0`.
    fn new(index: usize, x: f64, k: f64, lambda: f64) -> Self {
        let mean = 0.5 * lambda;
        let a = 0.5 * k;
        let y = 0.5 * x;

        let mode = mean.round_ties_even();
        let weight = poisson_pmf(mode as u64, mean);
        let ln_weight = weight.ln();
        let ln_cdf = ln_gamma_lr(a + mode, y);
        let ln_term = ln_weight + ln_cdf;

        Self {
            index,
            mean,
            a,
            y,
            j_up: mode,
            weight_up: weight,
            cdf_up: ln_cdf.exp(),
            step_up: gamma_density_term(a + mode, y),
            j_down: mode,
            ln_weight_down: ln_weight,
            ln_cdf_down: ln_cdf,
            // P(a+j-1, y) - P(a+j, y), only consumed while j_down > 0
            ln_step_down: ln_gamma_density_term(a + mode - 1.0, y),
            ln_term_down: ln_term,
            ln_cdf_floor: ln_gamma_lr(a, y),
            sum: ln_term.exp(),
            converged: false,
        }
    }

    /// Add the next upward term and, while `j_down > 0`, the next downward term
    fn advance(&mut self) {
        self.weight_up *= self.mean / (self.j_up + 1.0);
        self.cdf_up -= self.step_up;
        self.step_up *= self.y / (self.a + self.j_up + 1.0);
        self.j_up += 1.0;
        let mut increment = self.weight_up * self.cdf_up;

        let mut climbing = false;
        if self.j_down > 0.0 {
            self.ln_weight_down += (self.j_down / self.mean).ln();
            self.ln_cdf_down = ln_add_exp(self.ln_cdf_down, self.ln_step_down);
            self.ln_step_down += (self.a + self.j_down - 1.0).ln() - self.y.ln();
            self.j_down -= 1.0;

            let ln_term = self.ln_weight_down + self.ln_cdf_down;
            climbing = ln_term > self.ln_term_down;
            self.ln_term_down = ln_term;
            increment += ln_term.exp();
        }

        self.sum += increment;
        // NaN never satisfies this, so a poisoned element runs into the sweep cap
        self.converged = increment.abs() <= SERIES_TOLERANCE * self.sum.abs()
            && !(climbing && self.remaining_down_matters());
    }

    /// Whether the terms below `j_down` could still move the sum
    ///
    /// For `i < j_down <= λ/2` the weights rise with `i`, and every central
    /// CDF is at most `P(a, y)`, so the remaining mass is bounded by
    /// `j_down · w(j_down - 1) · P(a, y)`.
    fn remaining_down_matters(&self) -> bool {
        if self.j_down == 0.0 {
            return false;
        }
        let ln_bound = self.ln_cdf_floor
            + self.j_down.ln()
            + self.ln_weight_down
            + (self.j_down / self.mean).ln();
        let ln_threshold =
            (SERIES_TOLERANCE.ln() + self.sum.abs().ln()).max(f64::MIN_POSITIVE.ln());
        ln_bound > ln_threshold
    }
}

/// `ln(e^p + e^q)` without leaving log space
fn ln_add_exp(p: f64, q: f64) -> f64 {
    let (hi, lo) = if p >= q { (p, q) } else { (q, p) };
    if hi == f64::NEG_INFINITY {
        return hi;
    }
    hi + (lo - hi).exp().ln_1p()
}

/// Non-central chi-square CDF evaluator
#[derive(Debug, Clone, Default)]
pub struct Ncx2Cdf {
    config: Ncx2Config,
}

impl Ncx2Cdf {
    /// Create an evaluator with the given configuration
    pub fn new(config: Ncx2Config) -> Self {
        Self { config }
    }

    /// Evaluator configuration
    pub fn config(&self) -> &Ncx2Config {
        &self.config
    }

    /// Evaluate `P(X <= x)` for `X ~ NoncentralChiSquare(k, lambda)`, elementwise
    ///
    /// # Arguments
    ///
    /// * `x` - Evaluation points
    /// * `k` - Degrees of freedom, finite and strictly positive
    /// * `lambda` - Non-centrality, finite and non-negative
    ///
    /// The three views are broadcast to a common shape; zero-dimensional views
    /// act as scalars.
    ///
    /// # Returns
    ///
    /// Probabilities in the broadcast shape, or an error if the shapes are
    /// incompatible, an argument is out of its domain, or a series exceeds the
    /// sweep cap
    pub fn evaluate<D1, D2, D3>(
        &self,
        x: ArrayView<'_, f64, D1>,
        k: ArrayView<'_, f64, D2>,
        lambda: ArrayView<'_, f64, D3>,
    ) -> Result<ArrayD<f64>>
    where
        D1: Dimension,
        D2: Dimension,
        D3: Dimension,
    {
        let (x, k, lambda) = (x.into_dyn(), k.into_dyn(), lambda.into_dyn());
        let shape = broadcast_shape(&[x.shape(), k.shape(), lambda.shape()])?;

        let xs = broadcast_flat(&x, &shape)?;
        let ks = broadcast_flat(&k, &shape)?;
        let lambdas = broadcast_flat(&lambda, &shape)?;

        for (index, ((&x, &k), &lambda)) in xs.iter().zip(&ks).zip(&lambdas).enumerate() {
            validate_element(index, x, k, lambda)?;
        }

        let mut values = vec![0.0; xs.len()];
        let mut series = Vec::new();
        for (index, ((&x, &k), &lambda)) in xs.iter().zip(&ks).zip(&lambdas).enumerate() {
            if uses_central_path(x, lambda) {
                values[index] = chi2_cdf(x, k);
            } else {
                series.push(SeriesState::new(index, x, k, lambda));
            }
        }

        debug!(
            "ncx2 cdf over shape {:?}: {} closed-form, {} series element(s)",
            shape,
            values.len() - series.len(),
            series.len()
        );

        self.sum_series(series, &mut values)?;

        ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|e| StatsError::InvalidArgument(format!("output shape {:?}: {}", shape, e)))
    }

    /// Scalar form of [`evaluate`](Self::evaluate)
    pub fn evaluate_scalar(&self, x: f64, k: f64, lambda: f64) -> Result<f64> {
        validate_element(0, x, k, lambda)?;
        if uses_central_path(x, lambda) {
            return Ok(chi2_cdf(x, k));
        }

        let mut values = [0.0];
        self.sum_series(vec![SeriesState::new(0, x, k, lambda)], &mut values)?;
        Ok(values[0])
    }

    /// Sweep all active series until each has converged
    ///
    /// Converged elements are written to `values` and dropped from the active
    /// set, so later sweeps only touch elements that are still summing.
    fn sum_series(&self, mut active: Vec<SeriesState>, values: &mut [f64]) -> Result<()> {
        let mut iterations = 0;

        while !active.is_empty() {
            if iterations >= self.config.max_iterations {
                let indices: Vec<usize> = active.iter().map(|state| state.index).collect();
                warn!(
                    "ncx2 series did not converge within {} iterations for {} element(s)",
                    iterations,
                    indices.len()
                );
                return Err(StatsError::NumericalNonConvergence {
                    indices,
                    iterations,
                });
            }
            iterations += 1;

            if active.len() >= self.config.parallel_threshold {
                active.par_iter_mut().for_each(SeriesState::advance);
            } else {
                active.iter_mut().for_each(SeriesState::advance);
            }

            active.retain(|state| {
                if state.converged {
                    values[state.index] = state.sum;
                }
                !state.converged
            });
            trace!("ncx2 sweep {}: {} series active", iterations, active.len());
        }

        if iterations > 0 {
            debug!("ncx2 series converged after {} sweep(s)", iterations);
        }
        Ok(())
    }
}

/// Elements with zero non-centrality, or at the edges of the support, need no series
fn uses_central_path(x: f64, lambda: f64) -> bool {
    lambda == 0.0 || x <= 0.0 || x == f64::INFINITY
}

fn validate_element(index: usize, x: f64, k: f64, lambda: f64) -> Result<()> {
    if !(k > 0.0 && k.is_finite()) {
        return Err(StatsError::InvalidArgument(format!(
            "degrees of freedom must be finite and positive, got k={} at index {}",
            k, index
        )));
    }
    if !(lambda >= 0.0 && lambda.is_finite()) {
        return Err(StatsError::InvalidArgument(format!(
            "non-centrality must be finite and non-negative, got lambda={} at index {}",
            lambda, index
        )));
    }
    if x.is_nan() {
        return Err(StatsError::InvalidArgument(format!(
            "evaluation point is NaN at index {}",
            index
        )));
    }
    Ok(())
}

/// Non-central chi-square CDF with the default configuration
///
/// See [`Ncx2Cdf::evaluate`].
pub fn ncx2_cdf<D1, D2, D3>(
    x: ArrayView<'_, f64, D1>,
    k: ArrayView<'_, f64, D2>,
    lambda: ArrayView<'_, f64, D3>,
) -> Result<ArrayD<f64>>
where
    D1: Dimension,
    D2: Dimension,
    D3: Dimension,
{
    Ncx2Cdf::default().evaluate(x, k, lambda)
}

/// Central chi-square CDF over arrays, i.e. [`ncx2_cdf`] with `lambda = 0`
pub fn chi2_cdf_array<D1, D2>(
    x: ArrayView<'_, f64, D1>,
    k: ArrayView<'_, f64, D2>,
) -> Result<ArrayD<f64>>
where
    D1: Dimension,
    D2: Dimension,
{
    let zero = 0.0;
    ncx2_cdf(x, k, aview0(&zero))
}

/// Scalar non-central chi-square CDF with the default configuration
pub fn ncx2_cdf_scalar(x: f64, k: f64, lambda: f64) -> Result<f64> {
    Ncx2Cdf::default().evaluate_scalar(x, k, lambda)
}
