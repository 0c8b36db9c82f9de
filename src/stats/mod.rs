/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Statistical distribution functions
//!
//! This module provides the non-central chi-square CDF used to turn
//! detection statistics into false-dismissal probabilities, together with the
//! central chi-square and Poisson building blocks it is assembled from and
//! the false-alarm/false-dismissal inversions built on top of it.

pub mod broadcast;
pub mod central;
pub mod config;
pub mod detection;
pub mod errors;
pub mod ncx2;

pub use central::{chi2_cdf, chi2_sf, poisson_pmf};
pub use config::{Ncx2Config, SERIES_TOLERANCE};
pub use detection::{
    asymptotic_noncentrality, critical_noncentrality, false_alarm_threshold, lambda_blend,
};
pub use errors::{Result, StatsError};
pub use ncx2::{chi2_cdf_array, ncx2_cdf, ncx2_cdf_scalar, Ncx2Cdf};
