//! Error types for tnumerics.
//!
//! Every contract violation in the numeric kernels (bad index, mismatched
//! dimensions, zero pivot, ...) is reported as a variant of the single
//! `thiserror`-derived [`Error`] enum.  The kernels never terminate the
//! process themselves; the top-level caller decides what a violation means.
//! Precondition checks use the [`ensure!`] and [`ensure_len!`] macros defined here.

use thiserror::Error;

/// The top-level error type used throughout tnumerics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// Two operands whose sizes must agree do not.
    #[error("incompatible sizes in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The operation that detected the mismatch.
        context: &'static str,
        /// The size the operation required.
        expected: usize,
        /// The size it was handed.
        found: usize,
    },

    /// A square matrix was required.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// A diagonal element the algorithm divides by is zero.
    #[error("diagonal element at row {row} is zero")]
    ZeroPivot {
        /// Row of the offending diagonal element.
        row: usize,
    },

    /// A position/velocity state vector had an odd number of components.
    #[error("state dimension must be even, got {0}")]
    OddDimension(usize),

    /// An output operand shares storage with an input operand.
    #[error("operands must not share storage: {0}")]
    Aliasing(String),

    /// Heap storage could not be obtained.
    #[error("failed to allocate storage for {len} elements")]
    Allocation {
        /// Number of elements requested.
        len: usize,
    },
}

/// Shorthand `Result` type used throughout tnumerics.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tn_core::{ensure, errors::Error};
/// fn positive(x: f64) -> tn_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::DimensionMismatch { .. })` unless `$found == $expected`.
///
/// # Example
/// ```
/// use tn_core::{ensure_len, errors::Error};
/// fn same(a: &[f64], b: &[f64]) -> tn_core::errors::Result<()> {
///     ensure_len!("same", a.len(), b.len());
///     Ok(())
/// }
/// assert!(same(&[1.0], &[2.0]).is_ok());
/// assert!(matches!(
///     same(&[1.0], &[]),
///     Err(Error::DimensionMismatch { expected: 1, found: 0, .. })
/// ));
/// ```
#[macro_export]
macro_rules! ensure_len {
    ($context:expr, $expected:expr, $found:expr) => {{
        let expected: usize = $expected;
        let found: usize = $found;
        if expected != found {
            return Err($crate::errors::Error::DimensionMismatch {
                context: $context,
                expected,
                found,
            });
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_index(index: usize, size: usize) -> Result<usize> {
        if index >= size {
            return Err(Error::IndexOutOfRange { index, size });
        }
        Ok(index)
    }

    #[test]
    fn display_messages() {
        let e = checked_index(7, 3).unwrap_err();
        assert_eq!(e.to_string(), "index (7) out of range [0, 3)");

        let e = Error::DimensionMismatch {
            context: "dot",
            expected: 3,
            found: 4,
        };
        assert_eq!(
            e.to_string(),
            "incompatible sizes in dot: expected 3, found 4"
        );
        assert_eq!(
            Error::NotSquare { rows: 2, cols: 3 }.to_string(),
            "matrix must be square, got 2x3"
        );
        assert_eq!(
            Error::Allocation { len: 12 }.to_string(),
            "failed to allocate storage for 12 elements"
        );
    }

    #[test]
    fn ensure_len_passes_and_fails() {
        fn check(a: usize, b: usize) -> Result<()> {
            ensure_len!("check", a, b);
            Ok(())
        }
        assert!(check(4, 4).is_ok());
        assert_eq!(
            check(4, 5),
            Err(Error::DimensionMismatch {
                context: "check",
                expected: 4,
                found: 5
            })
        );
    }

    #[test]
    fn ensure_returns_precondition() {
        fn positive(x: f64) -> Result<f64> {
            ensure!(x > 0.0, "x must be positive, got {x}");
            Ok(x)
        }
        assert_eq!(
            positive(-2.0),
            Err(Error::Precondition("x must be positive, got -2".into()))
        );
    }
}
