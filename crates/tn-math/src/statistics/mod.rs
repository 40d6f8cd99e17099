//! Sample statistics over a [`Buffer`].

use tn_core::Real;

use crate::buffer::Buffer;

/// Arithmetic mean.  Returns `None` for an empty buffer.
pub fn mean(samples: &Buffer) -> Option<Real> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.sum() / samples.len() as Real)
}

/// Unbiased (Bessel-corrected) sample variance, computed in two passes.
/// Returns `None` for fewer than 2 samples.
pub fn variance(samples: &Buffer) -> Option<Real> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let m = mean(samples)?;
    let squares: Real = samples.with_slice(|s| s.iter().map(|x| (x - m) * (x - m)).sum());
    Some(squares / (n as Real - 1.0))
}

/// Square root of [`variance`].
pub fn std_dev(samples: &Buffer) -> Option<Real> {
    variance(samples).map(Real::sqrt)
}
