//! A dense row-major matrix bound to one [`Buffer`].
//!
//! The matrix never owns storage directly: it holds one reference to a
//! `Buffer` of length `rows * cols`.  Several matrices may share a buffer,
//! and [`Matrix::attach_buffer`] swaps the bound buffer for another one of
//! the same length.
//!
//! For interoperability the matrix keeps a cached [`ViewLayout`] describing
//! its storage to `nalgebra` (shape, strides, storage identity).  The cache
//! is rebuilt before `attach_buffer` returns, so [`Matrix::with_view`] and
//! [`Matrix::with_view_mut`] always see the current storage.  Element access
//! (`get` / `set`) goes straight to the buffer at `i * cols + j` and never
//! consults the cache.

use std::fmt;

use nalgebra::{DMatrix, Dyn, MatrixView, MatrixViewMut};
use tn_core::{ensure, ensure_len, Error, Real, Result};

use crate::buffer::Buffer;

/// Read-only `nalgebra` view over row-major storage.
pub type RowMajorView<'a> = MatrixView<'a, Real, Dyn, Dyn, Dyn, Dyn>;

/// Mutable `nalgebra` view over row-major storage.
pub type RowMajorViewMut<'a> = MatrixViewMut<'a, Real, Dyn, Dyn, Dyn, Dyn>;

/// Cached description of a matrix's storage as seen by `nalgebra`.
///
/// Recording the layout is O(1): no element is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Distance between vertically adjacent elements.
    pub row_stride: usize,
    /// Distance between horizontally adjacent elements.
    pub col_stride: usize,
    storage_id: usize,
}

impl ViewLayout {
    fn row_major(rows: usize, cols: usize, data: &Buffer) -> Self {
        Self {
            rows,
            cols,
            row_stride: cols,
            col_stride: 1,
            storage_id: data.storage_id(),
        }
    }

    /// Return `true` if this layout was recorded for `buffer`'s storage.
    pub fn describes(&self, buffer: &Buffer) -> bool {
        self.storage_id == buffer.storage_id()
    }
}

/// A dense `rows × cols` matrix of `Real` values in row-major order.
///
/// `Clone` adds a holder of the same buffer; use [`Matrix::deep_clone`] for
/// independent storage.
#[derive(Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Buffer,
    layout: ViewLayout,
    cache_valid: bool,
}

impl Matrix {
    /// Create a zero-filled `rows × cols` matrix with fresh storage.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        ensure!(
            rows > 0 && cols > 0,
            "neither rows nor columns can be zero, got {rows}x{cols}"
        );
        let len = rows
            .checked_mul(cols)
            .ok_or(Error::Allocation { len: usize::MAX })?;
        let data = Buffer::try_zeros(len)?;
        let layout = ViewLayout::row_major(rows, cols, &data);
        Ok(Self {
            rows,
            cols,
            data,
            layout,
            cache_valid: true,
        })
    }

    /// Create an identity matrix of size `n × n`.
    pub fn identity(n: usize) -> Result<Self> {
        let m = Self::zeros(n, n)?;
        {
            let mut data = m.data.borrow_mut();
            for i in 0..n {
                data[i * n + i] = 1.0;
            }
        }
        Ok(m)
    }

    /// Create from a row-major data slice of length `rows * cols`.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[Real]) -> Result<Self> {
        let m = Self::zeros(rows, cols)?;
        m.copy_from_slice(data)?;
        Ok(m)
    }

    /// Deep copy of an `nalgebra` matrix.
    pub fn from_dmatrix(src: &DMatrix<Real>) -> Result<Self> {
        let m = Self::zeros(src.nrows(), src.ncols())?;
        m.copy_from_dmatrix(src)?;
        Ok(m)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return `true` if the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// The buffer currently bound to this matrix.
    pub fn buffer(&self) -> &Buffer {
        &self.data
    }

    /// Bind `buffer` in place of the current storage.
    ///
    /// The old buffer loses a holder, `buffer` gains one, and the cached view
    /// layout is invalidated and rebuilt before returning.
    pub fn attach_buffer(&mut self, buffer: &Buffer) -> Result<()> {
        ensure_len!("Matrix::attach_buffer", self.rows * self.cols, buffer.len());
        Buffer::assign(&mut self.data, buffer);
        self.cache_valid = false;
        self.build_cache();
        Ok(())
    }

    fn build_cache(&mut self) {
        if self.cache_valid {
            return;
        }
        self.layout = ViewLayout::row_major(self.rows, self.cols, &self.data);
        self.cache_valid = true;
    }

    /// The cached view layout.
    pub fn view_layout(&self) -> ViewLayout {
        self.layout
    }

    /// Return `true` if the cached layout describes the bound buffer.
    pub fn is_cache_valid(&self) -> bool {
        self.cache_valid && self.layout.describes(&self.data)
    }

    fn offset(&self, i: usize, j: usize) -> Result<usize> {
        if i >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: i,
                size: self.rows,
            });
        }
        if j >= self.cols {
            return Err(Error::IndexOutOfRange {
                index: j,
                size: self.cols,
            });
        }
        Ok(i * self.cols + j)
    }

    /// Read element `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<Real> {
        self.data.get(self.offset(i, j)?)
    }

    /// Write `value` into element `(i, j)`.
    pub fn set(&self, i: usize, j: usize, value: Real) -> Result<()> {
        self.data.set(self.offset(i, j)?, value)
    }

    /// Element-wise copy of `src` into `self`; shapes must match.
    pub fn copy_from(&self, src: &Matrix) -> Result<()> {
        ensure!(
            self.rows == src.rows && self.cols == src.cols,
            "incompatible matrix sizes: {}x{} vs {}x{}",
            self.rows,
            self.cols,
            src.rows,
            src.cols
        );
        self.data.copy_contents_from(&src.data)
    }

    /// Overwrite the elements from row-major `data` of length `rows * cols`.
    pub fn copy_from_slice(&self, data: &[Real]) -> Result<()> {
        ensure_len!("Matrix::copy_from_slice", self.rows * self.cols, data.len());
        self.data.copy_from_slice(data)
    }

    /// Overwrite the elements from a buffer of length `rows * cols`.
    ///
    /// Unlike [`attach_buffer`](Self::attach_buffer) this copies the values
    /// and leaves `buffer` unshared.
    pub fn copy_from_buffer(&self, buffer: &Buffer) -> Result<()> {
        self.data.copy_contents_from(buffer)
    }

    /// Overwrite the elements from an `nalgebra` matrix of the same shape.
    pub fn copy_from_dmatrix(&self, src: &DMatrix<Real>) -> Result<()> {
        ensure!(
            self.rows == src.nrows() && self.cols == src.ncols(),
            "incompatible matrix sizes: {}x{} vs {}x{}",
            self.rows,
            self.cols,
            src.nrows(),
            src.ncols()
        );
        let mut data = self.data.borrow_mut();
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[i * self.cols + j] = src[(i, j)];
            }
        }
        Ok(())
    }

    /// Copy into an owned `nalgebra` matrix.
    pub fn to_dmatrix(&self) -> DMatrix<Real> {
        self.with_view(|v| v.clone_owned())
    }

    /// Copy into a matrix with its own storage.
    pub fn deep_clone(&self) -> Self {
        let data = self.data.deep_clone();
        let layout = ViewLayout::row_major(self.rows, self.cols, &data);
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
            layout,
            cache_valid: true,
        }
    }

    /// Run `f` with an `nalgebra` view over the current storage.
    ///
    /// The buffer is borrowed while `f` runs: `f` may read through any holder
    /// of the same storage but must not write to it.
    pub fn with_view<R>(&self, f: impl FnOnce(RowMajorView<'_>) -> R) -> R {
        debug_assert!(self.is_cache_valid(), "stale matrix view cache");
        let l = self.layout;
        let data = self.data.borrow();
        let view = RowMajorView::from_slice_with_strides_generic(
            &*data,
            Dyn(l.rows),
            Dyn(l.cols),
            Dyn(l.row_stride),
            Dyn(l.col_stride),
        );
        f(view)
    }

    /// Run `f` with a mutable `nalgebra` view over the current storage.
    ///
    /// Writes through the view land directly in the bound buffer.  The buffer
    /// is exclusively borrowed while `f` runs: `f` must not touch any other
    /// holder of the same storage, this matrix's `get`/`set` included.
    pub fn with_view_mut<R>(&self, f: impl FnOnce(RowMajorViewMut<'_>) -> R) -> R {
        debug_assert!(self.is_cache_valid(), "stale matrix view cache");
        let l = self.layout;
        let mut data = self.data.borrow_mut();
        let view = RowMajorViewMut::from_slice_with_strides_generic(
            &mut *data,
            Dyn(l.rows),
            Dyn(l.cols),
            Dyn(l.row_stride),
            Dyn(l.col_stride),
        );
        f(view)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("data", &self.data)
            .field("cache_valid", &self.cache_valid)
            .finish()
    }
}

/// Gaussian-bracket layout:
///
/// ```text
///   ⌈ 4  5  2 ⌉
///   | 7  1  9 |
///   ⌊ 3  8  6 ⌋
/// ```
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        for i in 0..self.rows {
            let (open, close) = if i == 0 {
                ('⌈', '⌉')
            } else if i == self.rows - 1 {
                ('⌊', '⌋')
            } else {
                ('|', '|')
            };
            write!(f, "  {open}")?;
            for v in &data[i * self.cols..(i + 1) * self.cols] {
                write!(f, " {v}")?;
            }
            writeln!(f, " {close}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_and_shape() {
        let m = Matrix::zeros(2, 3).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.buffer().len(), 6);
        assert!(m.buffer().to_vec().iter().all(|&x| x == 0.0));
        assert!(m.is_cache_valid());
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(Matrix::zeros(0, 3), Err(Error::Precondition(_))));
        assert!(matches!(Matrix::zeros(3, 0), Err(Error::Precondition(_))));
    }

    #[test]
    fn overflowing_shape_is_an_allocation_error() {
        assert_eq!(
            Matrix::zeros(usize::MAX, 2).err(),
            Some(Error::Allocation { len: usize::MAX })
        );
        assert!(Matrix::zeros(2, usize::MAX / 2 + 1).is_err());
    }

    #[test]
    fn element_reads_inside_shared_view() {
        let m = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let sum = m.with_view(|v| v[(1, 0)] + m.get(1, 1).unwrap());
        assert_eq!(sum, 7.0);
    }

    #[test]
    #[should_panic]
    fn element_access_inside_mutable_view_panics() {
        let m = Matrix::zeros(2, 2).unwrap();
        m.with_view_mut(|mut v| {
            v[(0, 0)] = 1.0;
            let _ = m.get(0, 0);
        });
    }

    #[test]
    fn row_major_addressing() {
        let m = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.get(0, 2).unwrap(), 3.0);
        assert_eq!(m.get(1, 0).unwrap(), 4.0);
        m.set(1, 2, 60.0).unwrap();
        assert_eq!(m.buffer().get(5).unwrap(), 60.0);
    }

    #[test]
    fn out_of_bounds() {
        let m = Matrix::zeros(2, 2).unwrap();
        assert_eq!(m.get(2, 0), Err(Error::IndexOutOfRange { index: 2, size: 2 }));
        assert_eq!(
            m.set(0, 5, 1.0),
            Err(Error::IndexOutOfRange { index: 5, size: 2 })
        );
    }

    #[test]
    fn attach_buffer_swaps_and_rebuilds_cache() {
        let mut m = Matrix::zeros(3, 3).unwrap();
        let old = m.buffer().clone();
        assert_eq!(old.ref_count(), 2);
        let old_layout = m.view_layout();

        let data = Buffer::from_slice(&[5.0, 2.0, 1.0, 1.0, 4.0, 1.0, 2.0, 1.0, 6.0]);
        m.attach_buffer(&data).unwrap();

        assert_eq!(old.ref_count(), 1);
        assert_eq!(data.ref_count(), 2);
        assert!(m.buffer().ptr_eq(&data));
        assert!(m.is_cache_valid());
        assert!(m.view_layout().describes(&data));
        assert_ne!(m.view_layout(), old_layout);
        assert_eq!(m.get(1, 1).unwrap(), 4.0);
        assert_eq!(m.with_view(|v| v[(2, 2)]), 6.0);
    }

    #[test]
    fn attach_buffer_length_mismatch() {
        let mut m = Matrix::zeros(2, 2).unwrap();
        let keep = m.buffer().clone();
        let bad = Buffer::zeros(5);
        assert!(matches!(
            m.attach_buffer(&bad),
            Err(Error::DimensionMismatch { expected: 4, found: 5, .. })
        ));
        assert!(m.buffer().ptr_eq(&keep));
        assert_eq!(bad.ref_count(), 1);
    }

    #[test]
    fn shared_buffer_between_matrices() {
        let a = Matrix::zeros(2, 3).unwrap();
        let mut b = Matrix::zeros(3, 2).unwrap();
        b.attach_buffer(a.buffer()).unwrap();
        a.set(0, 1, 9.0).unwrap();
        // Same storage, different shape: flat index 1 is (0, 1) in both.
        assert_eq!(b.get(0, 1).unwrap(), 9.0);
        a.set(1, 0, 7.0).unwrap();
        // Flat index 3 is (1, 0) in a 2x3 and (1, 1) in a 3x2.
        assert_eq!(b.get(1, 1).unwrap(), 7.0);
    }

    #[test]
    fn view_mutation_visible_through_get() {
        let m = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        m.with_view_mut(|mut v| v.transpose_mut());
        assert_eq!(m.get(0, 1).unwrap(), 3.0);
        assert_eq!(m.get(1, 0).unwrap(), 2.0);
    }

    #[test]
    fn dmatrix_round_trip_is_row_major() {
        let src = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let m = Matrix::from_dmatrix(&src).unwrap();
        assert_eq!(m.buffer().to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.to_dmatrix(), src);

        let wrong = DMatrix::<Real>::zeros(3, 2);
        assert!(m.copy_from_dmatrix(&wrong).is_err());
    }

    #[test]
    fn deep_copy_requires_equal_shape() {
        let a = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::zeros(2, 2).unwrap();
        b.copy_from(&a).unwrap();
        assert_eq!(a, b);
        assert!(!a.buffer().ptr_eq(b.buffer()));
        assert!(b.copy_from(&Matrix::zeros(1, 4).unwrap()).is_err());

        let c = a.deep_clone();
        c.set(0, 0, -1.0).unwrap();
        assert_eq!(a.get(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn copy_from_slice_and_buffer() {
        let m = Matrix::zeros(2, 2).unwrap();
        assert!(m.copy_from_slice(&[1.0, 2.0, 3.0]).is_err());
        let b = Buffer::from_slice(&[4.0, 3.0, 2.0, 1.0]);
        m.copy_from_buffer(&b).unwrap();
        assert_eq!(m.get(1, 1).unwrap(), 1.0);
        assert_eq!(b.ref_count(), 1);
    }

    #[test]
    fn identity_diagonal() {
        let m = Matrix::identity(3).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let want = if i == j { 1.0 } else { 0.0 };
                assert_eq!(m.get(i, j).unwrap(), want);
            }
        }
    }

    #[test]
    fn display_brackets() {
        let m = Matrix::from_row_slice(3, 2, &[4.0, 5.0, 7.0, 1.0, 3.0, 8.0]).unwrap();
        assert_eq!(m.to_string(), "  ⌈ 4 5 ⌉\n  | 7 1 |\n  ⌊ 3 8 ⌋\n");
    }
}
