//! Normal (Gaussian) density and distribution function.

use statrs::function::erf::erf;
use std::f64::consts::{PI, SQRT_2};
use tn_core::{ensure, Real, Result};

/// Mean and standard deviation of a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalParams {
    /// μ
    pub mean: Real,
    /// σ, positive.
    pub std_dev: Real,
}

impl NormalParams {
    /// N(μ, σ²); `std_dev` must be positive and finite.
    pub fn new(mean: Real, std_dev: Real) -> Result<Self> {
        ensure!(
            std_dev > 0.0 && std_dev.is_finite(),
            "standard deviation must be positive and finite, got {std_dev}"
        );
        Ok(Self { mean, std_dev })
    }

    /// N(0, 1).
    pub fn standard() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }
}

impl Default for NormalParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// `φ(x) = exp(−½((x−μ)/σ)²) / (σ√(2π))`
#[inline]
pub fn normal_pdf(x: Real, params: &NormalParams) -> Real {
    let z = (x - params.mean) / params.std_dev;
    (-0.5 * z * z).exp() / (params.std_dev * (2.0 * PI).sqrt())
}

/// `Φ(x) = ½(1 + erf((x−μ)/(σ√2)))`
pub fn normal_cdf(x: Real, params: &NormalParams) -> Real {
    0.5 * (1.0 + erf((x - params.mean) / (params.std_dev * SQRT_2)))
}
