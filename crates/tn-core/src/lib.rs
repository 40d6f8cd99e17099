//! # tn-core
//!
//! Core types, error definitions, and diagnostics for tnumerics.
//!
//! This crate provides the foundational building blocks shared by the other
//! crates in the workspace – the scalar type aliases, the error hierarchy
//! with its `ensure!` / `ensure_len!` macros, and the injected diagnostics sink.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Diagnostics sink for advisory warnings and fatal reports.
pub mod diagnostics;

/// Error types and the `ensure!` / `ensure_len!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// A time coordinate of an ODE system.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use diagnostics::{
    Diagnostics, RecordingDiagnostics, ReportExt, SilentDiagnostics, TracingDiagnostics, Warning,
};
pub use errors::{Error, Result};
