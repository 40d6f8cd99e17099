//! Diagnostics sink for advisory conditions and fatal reports.
//!
//! Kernels that can finish with a best-effort result (a root-finder that ran
//! out of iterations, a binomial coefficient with `k > n`, ...) take a
//! `&dyn Diagnostics` and report a [`Warning`] through it before returning.
//! Contract violations travel as [`Error`] values instead; callers that want
//! them logged route them through [`ReportExt::report`].
//!
//! | Implementation          | Behaviour                                   |
//! |-------------------------|---------------------------------------------|
//! | [`TracingDiagnostics`]  | emits `tracing` events (the default)        |
//! | [`RecordingDiagnostics`]| keeps every report in memory                |
//! | [`SilentDiagnostics`]   | discards everything                         |

use std::cell::RefCell;

use thiserror::Error;

use crate::errors::{Error, Result};
use crate::Real;

/// An advisory condition: the computation continued and returned a
/// best-effort result which the caller should inspect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    /// `f(0) == 0`, so Newton–Raphson returned 0 without iterating.
    #[error("0 is a root; move the initial guess away from 0 to find a different root")]
    ZeroIsRoot,

    /// Newton–Raphson used every allowed iteration without meeting the
    /// relative-step tolerance.
    #[error("Newton-Raphson stopped after the maximum of {iterations} iterations at x = {last}")]
    RootIterationsExhausted {
        /// Iterations performed.
        iterations: u32,
        /// The last iterate, which is still returned.
        last: Real,
    },

    /// Newton–Raphson produced NaN.
    #[error("Newton-Raphson result is NaN; values computed from it may be meaningless")]
    RootIsNan,

    /// `|f(root)|` is larger than the requested closeness.
    #[error("|f(x)| = {residual} at the Newton-Raphson root exceeds the requested closeness {closeness}")]
    RootNotClose {
        /// `|f(x)|` at the returned root.
        residual: Real,
        /// The requested bound.
        closeness: Real,
    },

    /// `k > n` in a binomial coefficient; 0 was returned.
    #[error("binomial coefficient with k = {k} > n = {n}; returning 0")]
    BinomialKExceedsN {
        /// Upper argument.
        n: u64,
        /// Lower argument.
        k: u64,
    },

    /// A range constructor was asked for exactly one element.
    #[error("single element range created at {start}")]
    SingleElementRange {
        /// The only element of the range.
        start: Real,
    },

    /// Gauss–Seidel used every allowed sweep without meeting the tolerance.
    #[error(
        "Gauss-Seidel exhausted {sweeps} sweeps with a difference of {residual} between \
         consecutive iterates; following calculations might be faulty"
    )]
    GaussSeidelNotConverged {
        /// Sweeps performed.
        sweeps: usize,
        /// Distance between the last two iterates.
        residual: Real,
    },
}

impl Warning {
    /// Short machine-readable tag, used as the `kind` field of log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::ZeroIsRoot => "zero_is_root",
            Warning::RootIterationsExhausted { .. } => "root_iterations_exhausted",
            Warning::RootIsNan => "root_is_nan",
            Warning::RootNotClose { .. } => "root_not_close",
            Warning::BinomialKExceedsN { .. } => "binomial_k_exceeds_n",
            Warning::SingleElementRange { .. } => "single_element_range",
            Warning::GaussSeidelNotConverged { .. } => "gauss_seidel_not_converged",
        }
    }
}

/// Receiver of diagnostic reports.
///
/// Passed explicitly to every routine that can emit one; there is no
/// process-wide diagnostics state.
pub trait Diagnostics {
    /// Report an advisory condition.
    fn warn(&self, warning: &Warning);

    /// Report a contract violation that the caller considers fatal.
    fn fatal(&self, error: &Error);

    /// Informational message (e.g. the number of sweeps a solver needed).
    fn note(&self, _message: &str) {}
}

/// Forwards every report to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, warning: &Warning) {
        tracing::warn!(kind = warning.kind(), "{warning}");
    }

    fn fatal(&self, error: &Error) {
        tracing::error!(error = %error, "contract violation");
    }

    fn note(&self, message: &str) {
        tracing::debug!("{message}");
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn warn(&self, _warning: &Warning) {}

    fn fatal(&self, _error: &Error) {}
}

/// Keeps every report in memory so that callers (and tests) can inspect
/// exactly which advisories a computation raised.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: RefCell<Vec<Warning>>,
    errors: RefCell<Vec<Error>>,
    notes: RefCell<Vec<String>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings received so far.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.borrow().clone()
    }

    /// Snapshot of the fatal reports received so far.
    pub fn errors(&self) -> Vec<Error> {
        self.errors.borrow().clone()
    }

    /// Snapshot of the informational notes received so far.
    pub fn notes(&self) -> Vec<String> {
        self.notes.borrow().clone()
    }

    /// Drain the recorded warnings.
    pub fn take_warnings(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }

    /// `true` if no warning or fatal report has been received.
    pub fn is_clean(&self) -> bool {
        self.warnings.borrow().is_empty() && self.errors.borrow().is_empty()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, warning: &Warning) {
        self.warnings.borrow_mut().push(warning.clone());
    }

    fn fatal(&self, error: &Error) {
        self.errors.borrow_mut().push(error.clone());
    }

    fn note(&self, message: &str) {
        self.notes.borrow_mut().push(message.to_owned());
    }
}

/// Route the error of a `Result` through a [`Diagnostics`] sink.
pub trait ReportExt {
    /// Report `Err` values via [`Diagnostics::fatal`] and return `self`
    /// unchanged.
    fn report(self, diagnostics: &dyn Diagnostics) -> Self;
}

impl<T> ReportExt for Result<T> {
    fn report(self, diagnostics: &dyn Diagnostics) -> Self {
        if let Err(ref e) = self {
            diagnostics.fatal(e);
        }
        self
    }
}
