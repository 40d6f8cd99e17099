//! Seeded Gaussian sampling.
//!
//! Entropy comes from an external generator behind the [`GaussianRng`]
//! trait.  Results are reproducible for a fixed seed and generator, and only
//! for those: two generators seeded alike produce different streams.

use rand::prelude::*;
use rand_distr::StandardNormal;
use rand_mt::Mt19937GenRand64;
use tn_core::{ensure, Real, Result};

use crate::buffer::Buffer;

/// A seedable source of N(0, σ²) deviates.
pub trait GaussianRng {
    /// Create a generator whose stream depends only on `seed`.
    fn with_seed(seed: u64) -> Self
    where
        Self: Sized;

    /// Next deviate with mean 0 and standard deviation `sigma`.
    fn next_gaussian(&mut self, sigma: Real) -> Real;
}

/// [`StdRng`] driven through `rand_distr`'s ziggurat standard normal.
#[derive(Debug, Clone)]
pub struct StdGaussianRng {
    rng: StdRng,
}

impl GaussianRng for StdGaussianRng {
    fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next_gaussian(&mut self, sigma: Real) -> Real {
        let z: Real = self.rng.sample(StandardNormal);
        sigma * z
    }
}

/// MT19937-64 driven through the same `rand_distr` standard normal.
pub struct MersenneTwisterGaussianRng {
    rng: Mt19937GenRand64,
}

impl GaussianRng for MersenneTwisterGaussianRng {
    fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    fn next_gaussian(&mut self, sigma: Real) -> Real {
        let z: Real = self.rng.sample(StandardNormal);
        sigma * z
    }
}

/// `n` independent N(0, σ²) samples from a [`StdGaussianRng`] seeded with
/// `seed`.
pub fn gaussian_samples(n: usize, sigma: Real, seed: u64) -> Result<Buffer> {
    gaussian_samples_with::<StdGaussianRng>(n, sigma, seed)
}

/// [`gaussian_samples`] with a chosen generator.
pub fn gaussian_samples_with<R: GaussianRng>(n: usize, sigma: Real, seed: u64) -> Result<Buffer> {
    ensure!(
        sigma >= 0.0 && sigma.is_finite(),
        "sigma must be non-negative and finite, got {sigma}"
    );
    let samples = Buffer::try_zeros(n)?;
    let mut rng = R::with_seed(seed);
    samples.with_slice_mut(|s| s.iter_mut().for_each(|x| *x = rng.next_gaussian(sigma)));
    Ok(samples)
}
