//! # tn-math
//!
//! Reference-counted numeric containers and the kernels built on them:
//! dense linear algebra, a Gauss–Seidel solver, finite differences, root
//! finding and quadrature, fixed-step ODE integrators, and a few stochastic
//! helpers.  Matrices interoperate with `nalgebra` through strided views.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Shared, fixed-length storage of reals.
pub mod buffer;

/// Derivatives, root finding and quadrature.
pub mod calculus;

/// Binomial and normal distributions.
pub mod distributions;

/// Dense kernels and the Gauss–Seidel solver.
pub mod linalg;

/// Row-major matrices over a [`Buffer`].
pub mod matrix;

/// Fixed-step ODE steppers.
pub mod ode;

/// Seeded Gaussian samples.
pub mod random_numbers;

/// Sample statistics.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use buffer::{arange, linspace, logspace, Buffer};
pub use calculus::{
    derivative_first, derivative_second, factorial, find_root, fourier_transform,
    quadrature_midpoint, quadrature_simpson, solve_quadratic_real, with_params, NewtonRaphson,
};
pub use distributions::{binomial_coefficient, binomial_pmf, normal_cdf, normal_pdf, NormalParams};
pub use linalg::{
    dot, euclidean_distance, gauss_seidel, length, length_2d, length_3d, matrix_times_matrix,
    matrix_times_vector, normalize, normalize_to_sum_one, GaussSeidel, GaussSeidelReport,
};
pub use matrix::Matrix;
pub use ode::{
    euler_step, integrate_fixed, rk2_step, rk4_step, velocity_verlet_step, OdeMethod, OdeSystem,
};
pub use random_numbers::{gaussian_samples, GaussianRng};
