//! A shared, fixed-length store of reals.
//!
//! A `Buffer` is the only owner of heap numeric storage in the library.
//! Cloning a `Buffer` does **not** copy the data: it adds another holder of
//! the same storage (the reference count goes up), and dropping a holder
//! releases it.  The storage is freed exactly once, when the last holder is
//! dropped.  Deep copies are explicit ([`Buffer::copy_contents_from`],
//! [`Buffer::deep_clone`]).
//!
//! | Operation            | Rust                                  |
//! |----------------------|---------------------------------------|
//! | allocate             | [`Buffer::zeros`] / [`Buffer::try_zeros`] |
//! | retain / release     | `Clone` / `Drop`                      |
//! | assign to a slot     | [`Buffer::assign`]                    |
//! | duplicate contents   | [`Buffer::copy_contents_from`]        |
//!
//! Buffers are single-threaded (`!Send`, `!Sync`); concurrent use has to be
//! serialized by the caller.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use tn_core::{ensure, ensure_len, Diagnostics, Error, Real, Result, Warning};

/// A reference-counted, fixed-length, mutable sequence of `Real` values.
#[derive(Clone)]
pub struct Buffer {
    data: Rc<RefCell<Box<[Real]>>>,
}

impl Buffer {
    /// Create a zero-filled buffer of length `len`.
    ///
    /// Aborts like any other Rust allocation if memory is exhausted; use
    /// [`Buffer::try_zeros`] to observe the failure instead.
    pub fn zeros(len: usize) -> Self {
        Self::from_boxed(vec![0.0; len].into_boxed_slice())
    }

    /// Create a zero-filled buffer, reporting [`Error::Allocation`] when the
    /// storage cannot be reserved.
    pub fn try_zeros(len: usize) -> Result<Self> {
        let mut v: Vec<Real> = Vec::new();
        v.try_reserve_exact(len)
            .map_err(|_| Error::Allocation { len })?;
        v.resize(len, 0.0);
        Ok(Self::from_boxed(v.into_boxed_slice()))
    }

    /// Create a buffer holding a copy of `data`.
    pub fn from_slice(data: &[Real]) -> Self {
        Self::from_boxed(data.into())
    }

    /// Create a buffer taking ownership of `data`.
    pub fn from_vec(data: Vec<Real>) -> Self {
        Self::from_boxed(data.into_boxed_slice())
    }

    fn from_boxed(data: Box<[Real]>) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Number of elements. Fixed for the lifetime of the storage.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Return `true` if the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live holders of the underlying storage.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.data)
    }

    /// Return `true` if `self` and `other` hold the same storage.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Address of the storage, used to tag cached views.
    pub(crate) fn storage_id(&self) -> usize {
        Rc::as_ptr(&self.data) as *const () as usize
    }

    /// Read element `index`.
    pub fn get(&self, index: usize) -> Result<Real> {
        let data = self.data.borrow();
        data.get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                size: data.len(),
            })
    }

    /// Write `value` into element `index`.
    pub fn set(&self, index: usize, value: Real) -> Result<()> {
        let mut data = self.data.borrow_mut();
        let size = data.len();
        match data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange { index, size }),
        }
    }

    /// Overwrite the first `source.len()` elements with `source`.
    ///
    /// `source` may be shorter than the buffer, never longer.
    pub fn copy_from_slice(&self, source: &[Real]) -> Result<()> {
        let mut data = self.data.borrow_mut();
        ensure!(
            source.len() <= data.len(),
            "cannot copy {} values into a buffer of length {}",
            source.len(),
            data.len()
        );
        data[..source.len()].copy_from_slice(source);
        Ok(())
    }

    /// Rebind `slot` to `buffer`: the previous holder in `slot` is released
    /// and `buffer` gains a holder.
    pub fn assign(slot: &mut Buffer, buffer: &Buffer) {
        *slot = buffer.clone();
    }

    /// Element-wise (deep) copy of `source` into `self`.  Ownership of either
    /// storage is left unchanged.
    pub fn copy_contents_from(&self, source: &Buffer) -> Result<()> {
        ensure_len!("Buffer::copy_contents_from", self.len(), source.len());
        if self.ptr_eq(source) {
            return Ok(());
        }
        self.data.borrow_mut().copy_from_slice(&source.data.borrow());
        Ok(())
    }

    /// Deep copy into freshly allocated storage.
    pub fn deep_clone(&self) -> Self {
        Self::from_slice(&self.data.borrow())
    }

    /// Copy the contents out into a `Vec`.
    pub fn to_vec(&self) -> Vec<Real> {
        self.data.borrow().to_vec()
    }

    /// Set every element to `value`.
    pub fn fill(&self, value: Real) {
        self.data.borrow_mut().fill(value);
    }

    /// Run `f` with a shared view of the elements.
    pub fn with_slice<R>(&self, f: impl FnOnce(&[Real]) -> R) -> R {
        f(&self.data.borrow())
    }

    /// Run `f` with a mutable view of the elements.
    ///
    /// The buffer is exclusively borrowed while `f` runs: `f` must not touch
    /// any other holder of the same storage.
    pub fn with_slice_mut<R>(&self, f: impl FnOnce(&mut [Real]) -> R) -> R {
        f(&mut self.data.borrow_mut())
    }

    pub(crate) fn borrow(&self) -> Ref<'_, [Real]> {
        Ref::map(self.data.borrow(), |b| &**b)
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, [Real]> {
        RefMut::map(self.data.borrow_mut(), |b| &mut **b)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Real {
        self.data.borrow().iter().sum()
    }

    /// One `name[i]: value` line per element.
    pub fn labelled(&self, name: &str) -> String {
        self.data
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| format!("  {name}[{i}]: {v}\n"))
            .collect()
    }
}

// ── Range constructors ────────────────────────────────────────────────────────

/// `n` equidistant values from `start` to `stop` inclusive.
///
/// `n == 1` yields `[start]` and reports [`Warning::SingleElementRange`].
pub fn linspace(start: Real, stop: Real, n: usize, diag: &dyn Diagnostics) -> Result<Buffer> {
    if let Some(single) = single_element(start, n, diag)? {
        return Ok(single);
    }
    let step = (stop - start) / (n - 1) as Real;
    Ok(Buffer::from_vec(
        (0..n).map(|i| start + i as Real * step).collect(),
    ))
}

/// `n` values `start, start + step, start + 2·step, ...`.
pub fn arange(start: Real, step: Real, n: usize, diag: &dyn Diagnostics) -> Result<Buffer> {
    if let Some(single) = single_element(start, n, diag)? {
        return Ok(single);
    }
    Ok(Buffer::from_vec(
        (0..n).map(|i| start + i as Real * step).collect(),
    ))
}

/// `n` values from `start` to `stop` inclusive, equidistant on a log10
/// scale.  Both ends must be positive.
pub fn logspace(start: Real, stop: Real, n: usize, diag: &dyn Diagnostics) -> Result<Buffer> {
    ensure!(
        start > 0.0 && stop > 0.0,
        "logspace bounds must be positive, got [{start}, {stop}]"
    );
    if let Some(single) = single_element(start, n, diag)? {
        return Ok(single);
    }
    let (lo, hi) = (start.log10(), stop.log10());
    let step = (hi - lo) / (n - 1) as Real;
    Ok(Buffer::from_vec(
        (0..n)
            .map(|i| 10.0_f64.powf(lo + i as Real * step))
            .collect(),
    ))
}

fn single_element(start: Real, n: usize, diag: &dyn Diagnostics) -> Result<Option<Buffer>> {
    ensure!(n > 0, "a range needs at least one element");
    if n == 1 {
        diag.warn(&Warning::SingleElementRange { start });
        return Ok(Some(Buffer::from_slice(&[start])));
    }
    Ok(None)
}

// ── From / Into conversions ───────────────────────────────────────────────────

impl From<Vec<Real>> for Buffer {
    fn from(v: Vec<Real>) -> Self {
        Self::from_vec(v)
    }
}

impl From<&[Real]> for Buffer {
    fn from(s: &[Real]) -> Self {
        Self::from_slice(s)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.data.borrow() == *other.data.borrow()
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("data", &&**self.data.borrow())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.data.borrow().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}
