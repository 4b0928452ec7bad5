//! Degree-dependent Gaussian smoothing weights (Jekeli, 1981; Wahr et al., 1998).

use super::constants::{EARTH_RADIUS_KM, GAUSS_WEIGHT_FLOOR, PI2};
use crate::domain::{GravityError, GravityResult};

pub trait GaussianWeightsProvider {
    /// Weights `w[l]` for `l = 0..=lmax` at smoothing radius `radius` (km).
    fn weights(&self, radius: f64, lmax: usize) -> GravityResult<Vec<f64>>;
}

/// Recursive Gaussian averaging kernel on the sphere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JekeliGaussian;

impl GaussianWeightsProvider for JekeliGaussian {
    fn weights(&self, radius: f64, lmax: usize) -> GravityResult<Vec<f64>> {
        gauss_weights(radius, lmax)
    }
}

/// Jekeli's recursion, normalized so that `2*pi*w[0] == 1`.
///
/// The recursion loses stability once the weights become small: from the
/// first degree that drops below the floor or stops decreasing, the weight
/// and every higher degree are pinned to the floor.
pub fn gauss_weights(radius: f64, lmax: usize) -> GravityResult<Vec<f64>> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GravityError::invalid_argument(
            "radius",
            format!("gaussian radius must be finite and > 0 km, got {radius}"),
        ));
    }

    let b = std::f64::consts::LN_2 / (1.0 - (radius / EARTH_RADIUS_KM).cos());
    let mut weights = vec![0.0; lmax + 1];
    weights[0] = 1.0 / PI2;
    if lmax == 0 {
        return Ok(weights);
    }

    let decay = (-2.0 * b).exp();
    weights[1] = weights[0] * ((1.0 + decay) / (1.0 - decay) - 1.0 / b);
    for l in 2..=lmax {
        weights[l] = (1.0 - 2.0 * l as f64) / b * weights[l - 1] + weights[l - 2];
        if weights[l] < GAUSS_WEIGHT_FLOOR || weights[l] > weights[l - 1] {
            weights[l..].fill(GAUSS_WEIGHT_FLOOR);
            break;
        }
    }

    Ok(weights)
}
