/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! # pulsar-utils
//!
//! Numerical utilities for continuous-wave gravitational-wave searches.
//!
//! The core of the crate is a vectorised non-central chi-square CDF,
//! evaluated as a Poisson-weighted mixture of central chi-square CDFs summed
//! outward from the dominant term. Around it sit the detection-statistic
//! helpers that use it (false-alarm thresholds and critical non-centralities)
//! and a few small descriptive utilities for histograms, segment lists,
//! amplitude parameters and rate estimates.

pub mod amplitude;
pub mod histogram;
pub mod rates;
pub mod segments;
pub mod stats;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
