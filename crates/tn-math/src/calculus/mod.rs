//! Calculus kernels: finite differences, root finding, and quadrature.
//!
//! Every kernel is generic over the integrand/target function
//! `F: Fn(Real) -> Real`.  Functions that need auxiliary parameters either
//! capture them in a closure or are bound with [`with_params`], which turns
//! the classic "function plus parameter block" shape into such a closure.
//! The functions must be pure for the duration of a call.

pub mod integrals;
pub mod roots;

pub use integrals::{
    fourier_transform, quadrature_midpoint, quadrature_simpson, Integrator, MidpointIntegral,
    SimpsonIntegral,
};
pub use roots::{find_root, solve_quadratic_real, NewtonRaphson};

use tn_core::Real;

/// Bind `params` to a two-argument function, yielding a scalar function of
/// `x` alone.
///
/// ```
/// use tn_math::calculus::{derivative_first, with_params};
///
/// struct Poly { a: f64, b: f64 }
/// let f = with_params(|x, p: &Poly| p.a * x * x + p.b, Poly { a: 3.0, b: 1.0 });
/// assert!((derivative_first(&f, 2.0, 1e-4) - 12.0).abs() < 1e-6);
/// ```
pub fn with_params<P, F>(f: F, params: P) -> impl Fn(Real) -> Real
where
    F: Fn(Real, &P) -> Real,
{
    move |x| f(x, &params)
}

/// First derivative by the centred difference
/// `(f(x+dx) − f(x−dx)) / 2dx`; the local error is O(dx²).
pub fn derivative_first<F>(f: &F, x: Real, dx: Real) -> Real
where
    F: Fn(Real) -> Real + ?Sized,
{
    (f(x + dx) - f(x - dx)) / (2.0 * dx)
}

/// Second derivative by the centred second difference
/// `(f(x+dx) − 2f(x) + f(x−dx)) / dx²`.
pub fn derivative_second<F>(f: &F, x: Real, dx: Real) -> Real
where
    F: Fn(Real) -> Real + ?Sized,
{
    (f(x + dx) - 2.0 * f(x) + f(x - dx)) / (dx * dx)
}

/// `n!`, or `None` if `n` is negative or the result overflows `T`.
pub fn factorial<T>(n: T) -> Option<T>
where
    T: num_traits::PrimInt,
{
    if n < T::zero() {
        return None;
    }
    let mut acc = T::one();
    let mut i = T::one();
    while i <= n {
        acc = acc.checked_mul(&i)?;
        i = i + T::one();
    }
    Some(acc)
}
