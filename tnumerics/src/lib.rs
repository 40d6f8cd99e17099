//! # tnumerics
//!
//! Reference-counted numeric buffers and matrices with linear-algebra,
//! calculus, ODE and statistics kernels.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than on `tn-core` / `tn-math` directly.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! tnumerics = "0.1"
//! ```
//!
//! ```rust
//! use tnumerics::core::TracingDiagnostics;
//! use tnumerics::math::{gauss_seidel, Buffer, Matrix};
//!
//! let a = Matrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]).unwrap();
//! let b = Buffer::from_slice(&[1.0, 2.0]);
//! let x = Buffer::zeros(2);
//! let report = gauss_seidel(&a, &b, &x, 1e-12, 100, &TracingDiagnostics).unwrap();
//! assert!(report.converged);
//! assert!((x.get(0).unwrap() - 1.0 / 11.0).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core aliases, errors and diagnostics.
pub use tn_core as core;

/// Containers and numerical kernels.
pub use tn_math as math;

/// The most commonly used items.
pub mod prelude {
    pub use tn_core::{
        Diagnostics, Error, RecordingDiagnostics, ReportExt, Result, SilentDiagnostics,
        TracingDiagnostics, Warning,
    };
    pub use tn_math::{Buffer, Matrix};
}
