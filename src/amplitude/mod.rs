/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Continuous-wave signal amplitude parameters
//!
//! A CW signal's amplitude is given either physically, by the strain
//! amplitude `h0` and the cosine of the inclination `cosi`, or by the two
//! polarisation amplitudes
//!
//! ```text
//! aPlus  = h0 (1 + cosi²) / 2
//! aCross = h0 cosi
//! ```
//!
//! Both forms also need the polarisation angle `psi` and the initial phase
//! `phi0`.

pub mod errors;

pub use errors::{AmplitudeError, Result};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The two amplitude parameterisations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amplitudes {
    Physical { h0: f64, cosi: f64 },
    PlusCross { a_plus: f64, a_cross: f64 },
}

/// A validated set of amplitude parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeParams {
    pub amplitudes: Amplitudes,
    /// Polarisation angle in radians
    pub psi: f64,
    /// Initial phase in radians
    pub phi0: f64,
}

impl AmplitudeParams {
    /// `(h0, cosi)`, converting from the plus/cross form if needed
    pub fn physical(&self) -> (f64, f64) {
        match self.amplitudes {
            Amplitudes::Physical { h0, cosi } => (h0, cosi),
            Amplitudes::PlusCross { a_plus, a_cross } => {
                let h0 = a_plus + (a_plus * a_plus - a_cross * a_cross).max(0.0).sqrt();
                let cosi = if h0 > 0.0 { a_cross / h0 } else { 0.0 };
                (h0, cosi)
            }
        }
    }

    /// `(aPlus, aCross)`, converting from the physical form if needed
    pub fn plus_cross(&self) -> (f64, f64) {
        match self.amplitudes {
            Amplitudes::Physical { h0, cosi } => (0.5 * h0 * (1.0 + cosi * cosi), h0 * cosi),
            Amplitudes::PlusCross { a_plus, a_cross } => (a_plus, a_cross),
        }
    }
}

/// Raw key/value form; every key optional so that completeness is checked here
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawAmplitudeParams {
    h0: Option<f64>,
    cosi: Option<f64>,
    psi: Option<f64>,
    phi0: Option<f64>,
    a_plus: Option<f64>,
    a_cross: Option<f64>,
}

/// Validate a key/value object of amplitude parameters
///
/// # Arguments
///
/// * `params` - A JSON object with keys among `h0`, `cosi`, `psi`, `phi0`,
///   `aPlus` and `aCross`
///
/// # Returns
///
/// The validated parameters, or the first problem found
pub fn validate_amplitude_params(params: &Value) -> Result<AmplitudeParams> {
    let raw: RawAmplitudeParams = RawAmplitudeParams::deserialize(params)
        .map_err(|e| AmplitudeError::Schema(e.to_string()))?;

    let physical = raw.h0.is_some() || raw.cosi.is_some();
    let plus_cross = raw.a_plus.is_some() || raw.a_cross.is_some();

    let amplitudes = match (physical, plus_cross) {
        (true, true) => return Err(AmplitudeError::MixedParameterisation),
        (false, false) => {
            return Err(AmplitudeError::Incomplete(
                "need either {h0, cosi} or {aPlus, aCross}".to_string(),
            ))
        }
        (true, false) => {
            let h0 = pair_member(raw.h0, "h0", "cosi")?;
            let cosi = pair_member(raw.cosi, "cosi", "h0")?;
            if h0 < 0.0 {
                return Err(out_of_range("h0", h0, "must be non-negative"));
            }
            if cosi.abs() > 1.0 {
                return Err(out_of_range("cosi", cosi, "must lie in [-1, 1]"));
            }
            Amplitudes::Physical { h0, cosi }
        }
        (false, true) => {
            let a_plus = pair_member(raw.a_plus, "aPlus", "aCross")?;
            let a_cross = pair_member(raw.a_cross, "aCross", "aPlus")?;
            if a_plus < a_cross.abs() {
                return Err(out_of_range("aPlus", a_plus, "must be at least |aCross|"));
            }
            Amplitudes::PlusCross { a_plus, a_cross }
        }
    };

    let psi = finite(raw.psi.ok_or(AmplitudeError::Missing("psi"))?, "psi")?;
    let phi0 = finite(raw.phi0.ok_or(AmplitudeError::Missing("phi0"))?, "phi0")?;

    Ok(AmplitudeParams {
        amplitudes,
        psi,
        phi0,
    })
}

fn pair_member(value: Option<f64>, name: &'static str, partner: &'static str) -> Result<f64> {
    let value = value.ok_or_else(|| {
        AmplitudeError::Incomplete(format!("{} given without {}", partner, name))
    })?;
    finite(value, name)
}

fn finite(value: f64, name: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(out_of_range(name, value, "must be finite"))
    }
}

fn out_of_range(name: &'static str, value: f64, reason: &'static str) -> AmplitudeError {
    AmplitudeError::OutOfRange {
        name,
        value,
        reason,
    }
}
