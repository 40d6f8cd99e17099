//! Dense linear-algebra kernels over [`Buffer`] and [`Matrix`].
//!
//! Output operands are written in place and must not share storage with the
//! inputs they are computed from; a shared buffer is reported as
//! [`Error::Aliasing`] instead of producing a half-overwritten result.

pub mod gauss_seidel;

pub use gauss_seidel::{gauss_seidel, gauss_seidel_sweep, GaussSeidel, GaussSeidelReport};

use tn_core::{ensure, ensure_len, Error, Real, Result};

use crate::buffer::Buffer;
use crate::matrix::Matrix;

pub(crate) fn dot_slices(x: &[Real], y: &[Real]) -> Real {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

pub(crate) fn distance_slices(a: &[Real], b: &[Real]) -> Real {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<Real>()
        .sqrt()
}

fn ensure_distinct(out: &Buffer, input: &Buffer, what: &str) -> Result<()> {
    if out.ptr_eq(input) {
        return Err(Error::Aliasing(format!("output buffer aliases {what}")));
    }
    Ok(())
}

/// Standard dot product Σ xᵢyᵢ.
pub fn dot(x: &Buffer, y: &Buffer) -> Result<Real> {
    ensure_len!("dot", x.len(), y.len());
    Ok(dot_slices(&x.borrow(), &y.borrow()))
}

/// `out = a · v`.
pub fn matrix_times_vector(a: &Matrix, v: &Buffer, out: &Buffer) -> Result<()> {
    ensure_len!("matrix_times_vector (vector)", a.cols(), v.len());
    ensure_len!("matrix_times_vector (output)", a.rows(), out.len());
    ensure_distinct(out, v, "the input vector")?;
    ensure_distinct(out, a.buffer(), "the matrix")?;

    let cols = a.cols();
    let m = a.buffer().borrow();
    let v = v.borrow();
    let mut out = out.borrow_mut();
    for (i, o) in out.iter_mut().enumerate() {
        *o = dot_slices(&m[i * cols..(i + 1) * cols], &v);
    }
    Ok(())
}

/// `c = a · b`.
pub fn matrix_times_matrix(a: &Matrix, b: &Matrix, c: &Matrix) -> Result<()> {
    ensure_len!("matrix_times_matrix (inner)", a.cols(), b.rows());
    ensure_len!("matrix_times_matrix (rows)", a.rows(), c.rows());
    ensure_len!("matrix_times_matrix (cols)", b.cols(), c.cols());
    ensure_distinct(c.buffer(), a.buffer(), "the left operand")?;
    ensure_distinct(c.buffer(), b.buffer(), "the right operand")?;

    let (n, inner, p) = (a.rows(), a.cols(), b.cols());
    let ad = a.buffer().borrow();
    let bd = b.buffer().borrow();
    let mut cd = c.buffer().borrow_mut();
    for i in 0..n {
        for j in 0..p {
            let mut sum = 0.0;
            for k in 0..inner {
                sum += ad[i * inner + k] * bd[k * p + j];
            }
            cd[i * p + j] = sum;
        }
    }
    Ok(())
}

// ── Norms ─────────────────────────────────────────────────────────────────────

/// Euclidean length, the norm induced by [`dot`].
pub fn length(v: &Buffer) -> Real {
    let v = v.borrow();
    dot_slices(&v, &v).sqrt()
}

/// Length of a 2-D vector (the first two components).
pub fn length_2d(v: &Buffer) -> Result<Real> {
    ensure!(v.len() >= 2, "length_2d needs 2 components, got {}", v.len());
    let v = v.borrow();
    Ok(v[0].hypot(v[1]))
}

/// Length of a 3-D vector (the first three components).
pub fn length_3d(v: &Buffer) -> Result<Real> {
    ensure!(v.len() >= 3, "length_3d needs 3 components, got {}", v.len());
    let v = v.borrow();
    Ok((v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt())
}

/// Scale `v` in place to unit length.
///
/// A zero vector has no direction and comes out as NaN.
pub fn normalize(v: &Buffer) {
    let len = length(v);
    v.borrow_mut().iter_mut().for_each(|x| *x /= len);
}

/// Scale `v` in place so that its components sum to one.
///
/// Meant for probability masses: the caller guarantees a non-zero sum and
/// non-negative entries.
pub fn normalize_to_sum_one(v: &Buffer) {
    let sum = v.sum();
    v.borrow_mut().iter_mut().for_each(|x| *x /= sum);
}

/// √Σ(aᵢ−bᵢ)².
pub fn euclidean_distance(a: &Buffer, b: &Buffer) -> Result<Real> {
    ensure_len!("euclidean_distance", a.len(), b.len());
    Ok(distance_slices(&a.borrow(), &b.borrow()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn dot_self_is_length_squared(values in prop::collection::vec(-1e3f64..1e3, 1..32)) {
            let x = Buffer::from_slice(&values);
            let d = dot(&x, &x).unwrap();
            let l = length(&x);
            prop_assert!((d - l * l).abs() <= 1e-9 * d.max(1.0));
        }

        #[test]
        fn identity_preserves_vector(values in prop::collection::vec(-1e3f64..1e3, 1..16)) {
            let n = values.len();
            let id = Matrix::identity(n).unwrap();
            let v = Buffer::from_slice(&values);
            let out = Buffer::zeros(n);
            matrix_times_vector(&id, &v, &out).unwrap();
            prop_assert_eq!(out.to_vec(), values);
        }

        #[test]
        fn normalize_is_idempotent(values in prop::collection::vec(0.1f64..1e3, 1..16)) {
            let v = Buffer::from_slice(&values);
            normalize(&v);
            let once = v.to_vec();
            normalize(&v);
            for (a, b) in once.iter().zip(v.to_vec()) {
                prop_assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn dot_product() {
        let a = Buffer::from_slice(&[1.0, 2.0, 3.0]);
        let b = Buffer::from_slice(&[4.0, 5.0, 6.0]);
        assert_relative_eq!(dot(&a, &b).unwrap(), 32.0);
        assert!(matches!(
            dot(&a, &Buffer::zeros(2)),
            Err(Error::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn matrix_vector() {
        let m = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let v = Buffer::from_slice(&[1.0, 1.0, 1.0]);
        let out = Buffer::zeros(2);
        matrix_times_vector(&m, &v, &out).unwrap();
        assert_eq!(out.to_vec(), vec![6.0, 15.0]);

        assert!(matrix_times_vector(&m, &Buffer::zeros(2), &out).is_err());
        assert!(matrix_times_vector(&m, &v, &Buffer::zeros(3)).is_err());
    }

    #[test]
    fn matrix_vector_rejects_aliasing() {
        let m = Matrix::identity(2).unwrap();
        let v = Buffer::from_slice(&[1.0, 2.0]);
        assert!(matches!(
            matrix_times_vector(&m, &v, &v.clone()),
            Err(Error::Aliasing(_))
        ));
    }

    #[test]
    fn matrix_matrix() {
        let a = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_row_slice(2, 2, &[5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = Matrix::zeros(2, 2).unwrap();
        matrix_times_matrix(&a, &b, &c).unwrap();
        assert_eq!(c.buffer().to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn matrix_matrix_rectangular_and_checks() {
        let a = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Matrix::from_row_slice(3, 1, &[1.0, 0.0, -1.0]).unwrap();
        let c = Matrix::zeros(2, 1).unwrap();
        matrix_times_matrix(&a, &b, &c).unwrap();
        assert_eq!(c.buffer().to_vec(), vec![-2.0, -2.0]);

        assert!(matrix_times_matrix(&b, &a, &c).is_err());
        assert!(matches!(
            matrix_times_matrix(&a, &b, &Matrix::zeros(2, 2).unwrap()),
            Err(Error::DimensionMismatch { .. })
        ));
        let sq = Matrix::identity(2).unwrap();
        assert!(matches!(
            matrix_times_matrix(&sq, &sq, &sq.clone()),
            Err(Error::Aliasing(_))
        ));
    }

    #[test]
    fn fast_path_lengths() {
        let v2 = Buffer::from_slice(&[3.0, 4.0]);
        assert_relative_eq!(length_2d(&v2).unwrap(), 5.0);
        let v3 = Buffer::from_slice(&[2.0, 3.0, 6.0]);
        assert_relative_eq!(length_3d(&v3).unwrap(), 7.0);
        assert_relative_eq!(length(&v3), 7.0);
        assert!(length_3d(&v2).is_err());
    }

    #[test]
    fn normalization() {
        let v = Buffer::from_slice(&[3.0, 4.0]);
        normalize(&v);
        assert_relative_eq!(v.get(0).unwrap(), 0.6);
        assert_relative_eq!(v.get(1).unwrap(), 0.8);

        let p = Buffer::from_slice(&[1.0, 3.0, 4.0]);
        normalize_to_sum_one(&p);
        assert_eq!(p.to_vec(), vec![0.125, 0.375, 0.5]);
    }

    #[test]
    fn distance() {
        let a = Buffer::from_slice(&[1.0, 1.0]);
        let b = Buffer::from_slice(&[4.0, 5.0]);
        assert_relative_eq!(euclidean_distance(&a, &b).unwrap(), 5.0);
        assert!(euclidean_distance(&a, &Buffer::zeros(3)).is_err());
    }
}
