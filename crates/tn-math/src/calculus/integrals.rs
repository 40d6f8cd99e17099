//! Fixed-step quadrature and a Fourier transform built on it.
//!
//! The interval `[a, b]` is split into `N = ⌈(b − a)/dx⌉` panels of equal
//! width `dx' = (b − a)/N ≤ dx`, so the last panel never overshoots `b`.

use num_complex::Complex64;
use tn_core::{ensure, Real, Result};

/// A numerical integrator over a finite interval.
pub trait Integrator {
    /// Integrate `f` on `[a, b]`.
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real>;
}

/// Composite left-sample rectangle rule with a maximum panel width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidpointIntegral {
    /// Maximum panel width.
    pub step: Real,
}

impl MidpointIntegral {
    /// Create a midpoint integrator with panels at most `step` wide.
    pub fn new(step: Real) -> Self {
        Self { step }
    }
}

impl Integrator for MidpointIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        quadrature_midpoint(f, a, b, self.step)
    }
}

/// Composite Simpson rule with a maximum panel width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpsonIntegral {
    /// Maximum panel width.
    pub step: Real,
}

impl SimpsonIntegral {
    /// Create a Simpson integrator with panels at most `step` wide.
    pub fn new(step: Real) -> Self {
        Self { step }
    }
}

impl Integrator for SimpsonIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        quadrature_simpson(f, a, b, self.step)
    }
}

// Panel count and width; `None` for an empty interval.
fn panels(a: Real, b: Real, dx: Real) -> Result<Option<(usize, Real)>> {
    ensure!(dx > 0.0, "step must be positive, got {dx}");
    ensure!(
        a.is_finite() && b.is_finite(),
        "bounds must be finite, got [{a}, {b}]"
    );
    if a == b {
        return Ok(None);
    }
    let n = ((b - a) / dx).ceil().max(1.0) as usize;
    Ok(Some((n, (b - a) / n as Real)))
}

/// ∫ₐᵇ f as a Riemann sum sampling each panel at its left edge,
/// `Σ f(a + k·dx')·dx'`.
///
/// First-order accurate.  `b < a` gives the negated integral over `[b, a]`.
pub fn quadrature_midpoint<F>(f: F, a: Real, b: Real, dx: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    if b < a {
        return quadrature_midpoint(f, b, a, dx).map(|v| -v);
    }
    let Some((n, h)) = panels(a, b, dx)? else {
        return Ok(0.0);
    };
    let sum: Real = (0..n).map(|k| f(a + k as Real * h)).sum();
    Ok(sum * h)
}

/// ∫ₐᵇ f by the composite Simpson rule, one parabola per panel.
///
/// Exact for polynomials up to degree three.  `b < a` gives the negated
/// integral over `[b, a]`.
pub fn quadrature_simpson<F>(f: F, a: Real, b: Real, dx: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    if b < a {
        return quadrature_simpson(f, b, a, dx).map(|v| -v);
    }
    let Some((n, h)) = panels(a, b, dx)? else {
        return Ok(0.0);
    };
    let mut sum = 0.0;
    let mut left = f(a);
    for k in 0..n {
        let x = a + k as Real * h;
        let right = f(x + h);
        sum += left + 4.0 * f(x + 0.5 * h) + right;
        left = right;
    }
    Ok(sum * h / 6.0)
}

/// Fourier transform `G(k) = ∫ g(t)·e^{−ikt} dt` over `[−m, m]`, by Simpson.
///
/// `g` may be complex valued; `m` must be positive.
pub fn fourier_transform<G>(g: G, m: Real, k: Real, dt: Real) -> Result<Complex64>
where
    G: Fn(Real) -> Complex64,
{
    ensure!(m > 0.0, "half-width must be positive, got {m}");
    let Some((n, h)) = panels(-m, m, dt)? else {
        return Ok(Complex64::new(0.0, 0.0));
    };
    let integrand = |t: Real| g(t) * Complex64::new(0.0, -k * t).exp();

    let mut sum = Complex64::new(0.0, 0.0);
    let mut left = integrand(-m);
    for j in 0..n {
        let t = -m + j as Real * h;
        let right = integrand(t + h);
        sum += left + integrand(t + 0.5 * h) * 4.0 + right;
        left = right;
    }
    Ok(sum * (h / 6.0))
}
