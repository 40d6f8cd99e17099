//! Gauss–Seidel iteration for square linear systems `A·v = b`.
//!
//! Each sweep updates the components of `v` in index order and immediately
//! reuses the updated values for the rows that follow.  Convergence is judged
//! on the distance between consecutive iterates; the sweep budget is the
//! only bound on the work done.  Convergence is not guaranteed for arbitrary
//! matrices (diagonal dominance is sufficient).

use tn_core::{ensure, ensure_len, Diagnostics, Error, Real, Result, Warning};

use super::{distance_slices, dot_slices};
use crate::buffer::Buffer;
use crate::matrix::Matrix;

/// Configuration of a Gauss–Seidel solve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaussSeidel {
    /// Stop once consecutive iterates are at most this far apart.
    pub tolerance: Real,
    /// Maximum number of sweeps.
    pub max_sweeps: usize,
}

/// Outcome of [`GaussSeidel::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussSeidelReport {
    /// Sweeps performed.
    pub sweeps: usize,
    /// Euclidean distance between the last two iterates.
    pub residual: Real,
    /// `true` if `residual <= tolerance` was reached within the budget.
    pub converged: bool,
}

impl GaussSeidel {
    /// Create a solver configuration.
    pub fn new(tolerance: Real, max_sweeps: usize) -> Self {
        Self {
            tolerance,
            max_sweeps,
        }
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the sweep budget.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Refine `v` in place towards the solution of `a · v = b`.
    ///
    /// `v` holds the initial guess on entry.  Running out of sweeps is not an
    /// error: a [`Warning::GaussSeidelNotConverged`] is reported and the
    /// report carries the residual reached.
    pub fn solve(
        &self,
        a: &Matrix,
        b: &Buffer,
        v: &Buffer,
        diag: &dyn Diagnostics,
    ) -> Result<GaussSeidelReport> {
        ensure!(
            self.tolerance >= 0.0,
            "tolerance must be non-negative, got {}",
            self.tolerance
        );
        ensure!(self.max_sweeps > 0, "at least one sweep is required");
        check_operands(a, b, v)?;

        let n = a.rows();
        {
            let m = a.buffer().borrow();
            if let Some(row) = (0..n).find(|&i| m[i * n + i] == 0.0) {
                return Err(Error::ZeroPivot { row });
            }
        }

        let m = a.buffer().borrow();
        let b = b.borrow();
        let mut v = v.borrow_mut();
        let mut previous = vec![0.0; n];
        let mut residual = Real::INFINITY;

        for sweep in 1..=self.max_sweeps {
            previous.copy_from_slice(&v);
            sweep_slices(&m, &b, &mut v, n);
            residual = distance_slices(&v, &previous);
            if residual <= self.tolerance {
                diag.note(&format!(
                    "Gauss-Seidel converged after {sweep} sweeps (residual {residual:e})"
                ));
                return Ok(GaussSeidelReport {
                    sweeps: sweep,
                    residual,
                    converged: true,
                });
            }
        }

        diag.warn(&Warning::GaussSeidelNotConverged {
            sweeps: self.max_sweeps,
            residual,
        });
        Ok(GaussSeidelReport {
            sweeps: self.max_sweeps,
            residual,
            converged: false,
        })
    }
}

impl Default for GaussSeidel {
    fn default() -> Self {
        Self::new(1e-6, 1000)
    }
}

/// Solve `a · v = b` in place with the given tolerance and sweep budget.
pub fn gauss_seidel(
    a: &Matrix,
    b: &Buffer,
    v: &Buffer,
    tolerance: Real,
    max_sweeps: usize,
    diag: &dyn Diagnostics,
) -> Result<GaussSeidelReport> {
    GaussSeidel::new(tolerance, max_sweeps).solve(a, b, v, diag)
}

/// A single Gauss–Seidel sweep over all rows of `a`.
///
/// Does not check the diagonal: a zero pivot yields non-finite components.
pub fn gauss_seidel_sweep(a: &Matrix, b: &Buffer, v: &Buffer) -> Result<()> {
    check_operands(a, b, v)?;
    let n = a.rows();
    sweep_slices(&a.buffer().borrow(), &b.borrow(), &mut v.borrow_mut(), n);
    Ok(())
}

fn check_operands(a: &Matrix, b: &Buffer, v: &Buffer) -> Result<()> {
    if !a.is_square() {
        return Err(Error::NotSquare {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    ensure_len!("Gauss-Seidel (right-hand side)", a.rows(), b.len());
    ensure_len!("Gauss-Seidel (solution)", a.rows(), v.len());
    if v.ptr_eq(b) || v.ptr_eq(a.buffer()) {
        return Err(Error::Aliasing(
            "solution vector shares storage with the system".into(),
        ));
    }
    Ok(())
}

fn sweep_slices(m: &[Real], b: &[Real], v: &mut [Real], n: usize) {
    for i in 0..n {
        let row = &m[i * n..(i + 1) * n];
        v[i] += (b[i] - dot_slices(row, v)) / row[i];
    }
}
