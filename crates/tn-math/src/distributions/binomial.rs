//! Binomial coefficient and probability mass function.

use tn_core::{Diagnostics, Real, Warning};

/// `C(n, k)` by the recursive Pascal rule `C(n, k) = C(n−1, k−1) + C(n−1, k)`.
///
/// `k > n` is reported as [`Warning::BinomialKExceedsN`] and yields 0.  The
/// recursion is not memoized, so the cost grows exponentially with `n`; use
/// it for small arguments only.
pub fn binomial_coefficient(n: u64, k: u64, diag: &dyn Diagnostics) -> u64 {
    if k > n {
        diag.warn(&Warning::BinomialKExceedsN { n, k });
        return 0;
    }
    pascal(n, k)
}

fn pascal(n: u64, k: u64) -> u64 {
    if k == 0 || k == n {
        return 1;
    }
    if k == 1 || k == n - 1 {
        return n;
    }
    pascal(n - 1, k - 1) + pascal(n - 1, k)
}

/// P(X = k) for `X ~ Binomial(n, p)`: `C(n,k)·pᵏ·(1−p)^{n−k}`.
///
/// `k > n` warns through [`binomial_coefficient`] and gives 0.
pub fn binomial_pmf(k: u64, n: u64, p: Real, diag: &dyn Diagnostics) -> Real {
    let c = binomial_coefficient(n, k, diag);
    if c == 0 {
        return 0.0;
    }
    c as Real * p.powf(k as Real) * (1.0 - p).powf((n - k) as Real)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tn_core::{RecordingDiagnostics, SilentDiagnostics};

    #[test]
    fn pascal_triangle() {
        let diag = RecordingDiagnostics::new();
        assert_eq!(binomial_coefficient(5, 2, &diag), 10);
        assert_eq!(binomial_coefficient(5, 0, &diag), 1);
        assert_eq!(binomial_coefficient(5, 5, &diag), 1);
        assert_eq!(binomial_coefficient(0, 0, &diag), 1);
        assert_eq!(binomial_coefficient(10, 3, &diag), 120);
        assert_eq!(binomial_coefficient(20, 10, &diag), 184_756);
        assert!(diag.is_clean());
    }

    #[test]
    fn k_exceeding_n_warns_and_returns_zero() {
        let diag = RecordingDiagnostics::new();
        assert_eq!(binomial_coefficient(5, 6, &diag), 0);
        assert_eq!(diag.warnings(), vec![Warning::BinomialKExceedsN { n: 5, k: 6 }]);
    }

    #[test]
    fn symmetric_in_k() {
        let diag = SilentDiagnostics;
        for k in 0..=12 {
            assert_eq!(
                binomial_coefficient(12, k, &diag),
                binomial_coefficient(12, 12 - k, &diag)
            );
        }
    }

    #[test]
    fn pmf_sums_to_one() {
        let diag = RecordingDiagnostics::new();
        let total: Real = (0..=15).map(|k| binomial_pmf(k, 15, 0.3, &diag)).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert!(diag.is_clean());
    }

    #[test]
    fn pmf_fair_coin() {
        let diag = SilentDiagnostics;
        assert_relative_eq!(binomial_pmf(2, 4, 0.5, &diag), 6.0 / 16.0);
        assert_eq!(binomial_pmf(5, 4, 0.5, &diag), 0.0);
    }

    #[test]
    fn pmf_mean_is_np() {
        let diag = SilentDiagnostics;
        let mean: Real = (0..=10)
            .map(|k| k as Real * binomial_pmf(k, 10, 0.7, &diag))
            .sum();
        assert_relative_eq!(mean, 7.0, epsilon = 1e-12);
    }
}
