//! Root finding.
//!
//! [`NewtonRaphson`] iterates `x ← x − f(x)/f'(x)` with the slope taken
//! from [`derivative_first`], so only `f` itself is needed.  Every stopping
//! condition short of convergence is advisory: the last iterate is returned
//! and a [`Warning`] describes what went wrong.

use tn_core::{ensure, Diagnostics, Real, Result, Warning};

use super::derivative_first;

/// Configuration of a Newton–Raphson search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonRaphson {
    /// Step of the centred difference used as the slope.
    pub dx: Real,
    /// Converged once `|Δx / x|` is at most this.
    pub tolerance: Real,
    /// Maximum number of Newton steps.
    pub max_iterations: u32,
    /// Warn if `|f(root)|` ends up larger than this.
    pub closeness: Real,
}

impl NewtonRaphson {
    /// Create a solver configuration.
    pub fn new(dx: Real, tolerance: Real, max_iterations: u32, closeness: Real) -> Self {
        Self {
            dx,
            tolerance,
            max_iterations,
            closeness,
        }
    }

    /// Set the finite-difference step.
    pub fn with_dx(mut self, dx: Real) -> Self {
        self.dx = dx;
        self
    }

    /// Set the relative-step tolerance.
    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the acceptable `|f(root)|`.
    pub fn with_closeness(mut self, closeness: Real) -> Self {
        self.closeness = closeness;
        self
    }

    /// Search for a root of `f` starting from `x0`.
    ///
    /// If `f(0) == 0` the search is skipped and 0 is returned with
    /// [`Warning::ZeroIsRoot`]: the relative-step test divides by `x` and is
    /// meaningless there, so start away from 0 to find another root.
    pub fn find_root<F>(&self, f: F, x0: Real, diag: &dyn Diagnostics) -> Result<Real>
    where
        F: Fn(Real) -> Real,
    {
        ensure!(self.dx > 0.0, "dx must be positive, got {}", self.dx);
        ensure!(
            self.tolerance >= 0.0,
            "tolerance must be non-negative, got {}",
            self.tolerance
        );

        if f(0.0) == 0.0 {
            diag.warn(&Warning::ZeroIsRoot);
            return Ok(0.0);
        }

        let mut x = x0;
        let mut converged = false;
        for iteration in 0..self.max_iterations {
            let previous = x;
            x -= f(x) / derivative_first(&f, x, self.dx);
            tracing::trace!(iteration, x, "Newton-Raphson step");
            if ((x - previous) / x).abs() <= self.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            diag.warn(&Warning::RootIterationsExhausted {
                iterations: self.max_iterations,
                last: x,
            });
        }
        if x.is_nan() {
            diag.warn(&Warning::RootIsNan);
        }
        let residual = f(x).abs();
        if residual > self.closeness {
            diag.warn(&Warning::RootNotClose {
                residual,
                closeness: self.closeness,
            });
        }
        Ok(x)
    }
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new(1e-6, 1e-10, 100, 1e-8)
    }
}

/// Newton–Raphson with explicit parameters; see [`NewtonRaphson::find_root`].
pub fn find_root<F>(
    f: F,
    x0: Real,
    dx: Real,
    tolerance: Real,
    max_iterations: u32,
    closeness: Real,
    diag: &dyn Diagnostics,
) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    NewtonRaphson::new(dx, tolerance, max_iterations, closeness).find_root(f, x0, diag)
}

/// Real roots of `a·x² + b·x + c = 0`, smaller first, or `None` when the
/// discriminant is negative.
///
/// Uses the cancellation-free form `q = −(b + sign(b)·√Δ)/2`,
/// `x₁ = q/a`, `x₂ = c/q`.
pub fn solve_quadratic_real(a: Real, b: Real, c: Real) -> Result<Option<(Real, Real)>> {
    ensure!(a != 0.0, "leading coefficient must be non-zero");
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Ok(None);
    }
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        return Ok(Some((0.0, 0.0)));
    }
    let (x1, x2) = (q / a, c / q);
    Ok(Some((x1.min(x2), x1.max(x2))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tn_core::RecordingDiagnostics;

    #[test]
    fn positive_root_of_parabola() {
        let diag = RecordingDiagnostics::new();
        let root = NewtonRaphson::default()
            .find_root(|x| x * x - 4.0, 3.0, &diag)
            .unwrap();
        assert_abs_diff_eq!(root, 2.0, epsilon = 1e-9);
        assert!(diag.is_clean(), "{:?}", diag.warnings());
    }

    #[test]
    fn negative_root_of_parabola() {
        let diag = RecordingDiagnostics::new();
        let root = find_root(|x| x * x - 4.0, -3.0, 1e-6, 1e-10, 100, 1e-8, &diag).unwrap();
        assert_abs_diff_eq!(root, -2.0, epsilon = 1e-9);
        assert!(diag.is_clean());
    }

    #[test]
    fn zero_root_short_circuits() {
        let diag = RecordingDiagnostics::new();
        let root = NewtonRaphson::default()
            .find_root(|x| x * (x - 5.0), 4.0, &diag)
            .unwrap();
        assert_eq!(root, 0.0);
        assert_eq!(diag.warnings(), vec![Warning::ZeroIsRoot]);
    }

    #[test]
    fn exhausted_iterations_warn_and_return_last_iterate() {
        let diag = RecordingDiagnostics::new();
        let root = NewtonRaphson::default()
            .with_max_iterations(2)
            .find_root(|x| x * x - 4.0, 100.0, &diag)
            .unwrap();
        assert!(root > 2.0);
        let warnings = diag.warnings();
        assert!(matches!(
            warnings[0],
            Warning::RootIterationsExhausted { iterations: 2, last } if last == root
        ));
        assert!(matches!(warnings[1], Warning::RootNotClose { .. }));
    }

    #[test]
    fn no_real_root_reports_problems() {
        // x² + 1 has no real root; Newton wanders or blows up.
        let diag = RecordingDiagnostics::new();
        let root = NewtonRaphson::default()
            .find_root(|x| x * x + 1.0, 0.5, &diag)
            .unwrap();
        let warnings = diag.warnings();
        assert!(!warnings.is_empty());
        if root.is_nan() {
            assert!(warnings.contains(&Warning::RootIsNan));
        } else {
            assert!(warnings
                .iter()
                .any(|w| matches!(w, Warning::RootNotClose { .. })));
        }
    }

    #[test]
    fn invalid_step_is_rejected() {
        let diag = RecordingDiagnostics::new();
        assert!(NewtonRaphson::default()
            .with_dx(0.0)
            .find_root(|x| x - 1.0, 0.5, &diag)
            .is_err());
    }

    #[test]
    fn quadratic_roots() {
        let (x1, x2) = solve_quadratic_real(1.0, -3.0, 2.0).unwrap().unwrap();
        assert_abs_diff_eq!(x1, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(x2, 2.0, epsilon = 1e-14);

        // Large b: the naive formula loses the small root to cancellation.
        let (small, big) = solve_quadratic_real(1.0, 1e8, 1.0).unwrap().unwrap();
        assert_abs_diff_eq!(small, -1e8, epsilon = 1e-6);
        assert_abs_diff_eq!(big, -1e-8, epsilon = 1e-20);

        assert_eq!(solve_quadratic_real(1.0, 0.0, 1.0).unwrap(), None);
        assert!(solve_quadratic_real(0.0, 1.0, 1.0).is_err());
    }
}
