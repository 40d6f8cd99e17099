//! Discrete and continuous distributions used by the stochastic kernels.
//!
//! The normal distribution delegates `erf` to `statrs`; the binomial
//! coefficient is evaluated exactly by Pascal's rule.

pub mod binomial;
pub mod normal;

pub use binomial::{binomial_coefficient, binomial_pmf};
pub use normal::{normal_cdf, normal_pdf, NormalParams};
