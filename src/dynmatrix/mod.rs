mod complex;
mod features;
mod norm;
mod ops;
mod slice;
mod util;

pub use slice::RegionIter;

use std::ops::{Index, IndexMut};

use thiserror::Error;

use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Dimension mismatch between a matrix and the shape an operation expects.
///
/// ```
/// use numeris_linalg::DynMatrix;
/// use numeris_linalg::dynmatrix::DimensionMismatch;
///
/// let a = DynMatrix::zeros(2, 3, 0.0_f64);
/// let err = a.check_shape("demo", 3, 2).unwrap_err();
/// assert_eq!(err, DimensionMismatch { op: "demo", expected: (3, 2), got: (2, 3) });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{op}: dimension mismatch, expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
pub struct DimensionMismatch {
    /// Operation that rejected the shape.
    pub op: &'static str,
    /// Expected `(rows, cols)`.
    pub expected: (usize, usize),
    /// Got `(rows, cols)`.
    pub got: (usize, usize),
}

/// Dynamically-sized heap-allocated matrix.
///
/// Row-major `Vec<T>` storage. The backing buffer may be longer than
/// `nrows * ncols`: [`reshape`](Self::reshape) keeps the allocation when a
/// matrix shrinks so decomposition workspaces can be reused across calls.
/// Only the leading `nrows * ncols` elements are meaningful.
///
/// For `Complex<f32>` / `Complex<f64>` elements the buffer is the usual
/// interleaved real/imaginary layout; see [`interleaved`](Self::interleaved).
///
/// # Examples
///
/// ```
/// use numeris_linalg::DynMatrix;
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b = DynMatrix::eye(3, 0.0_f64);
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct DynMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Create an `nrows x ncols` matrix of zeros.
    ///
    /// The `_zero` parameter is only used for type inference.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::zeros(2, 3, 0.0_f64);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m.ncols(), 3);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize, _zero: T) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create a matrix filled with a given value.
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create an `n x n` identity matrix.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let id = DynMatrix::eye(3, 0.0_f64);
    /// assert_eq!(id[(0, 0)], 1.0);
    /// assert_eq!(id[(0, 1)], 0.0);
    /// assert_eq!(id[(2, 2)], 1.0);
    /// ```
    pub fn eye(n: usize, _zero: T) -> Self {
        Self::eye_rect(n, n)
    }

    /// Rectangular identity: ones on the main diagonal, zeros elsewhere.
    pub fn eye_rect(nrows: usize, ncols: usize) -> Self {
        let mut m = Self::zeros(nrows, ncols, T::zero());
        for i in 0..nrows.min(ncols) {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self {
            data: row_major.to_vec(),
            nrows,
            ncols,
        }
    }

    /// Create a matrix from a flat slice in column-major order.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// // Column-major: col0=[1,3], col1=[2,4]
    /// let m = DynMatrix::from_cols(2, 2, &[1.0, 3.0, 2.0, 4.0]);
    /// assert_eq!(m[(0, 1)], 2.0);
    /// assert_eq!(m[(1, 0)], 3.0);
    /// ```
    pub fn from_cols(nrows: usize, ncols: usize, col_major: &[T]) -> Self {
        let mut m = Self::zeros(0, 0, T::zero());
        m.set_from(nrows, ncols, false, col_major);
        m
    }

    /// Create a matrix from nested rows.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_nested(&[[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    /// assert_eq!(m.nrows(), 3);
    /// assert_eq!(m[(2, 1)], 6.0);
    /// ```
    pub fn from_nested<const N: usize>(rows: &[[T; N]]) -> Self {
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self {
            data,
            nrows: rows.len(),
            ncols: N,
        }
    }

    /// Reshape to `nrows x ncols` and copy `data` in, read either as
    /// row-major or column-major.
    ///
    /// Panics if `data.len() < nrows * ncols`.
    pub fn set_from(&mut self, nrows: usize, ncols: usize, row_major: bool, data: &[T]) {
        assert!(
            data.len() >= nrows * ncols,
            "slice length {} too short for {}x{} matrix",
            data.len(),
            nrows,
            ncols,
        );
        self.reshape(nrows, ncols);
        if row_major {
            self.data[..nrows * ncols].copy_from_slice(&data[..nrows * ncols]);
        } else {
            for i in 0..nrows {
                for j in 0..ncols {
                    self.data[i * ncols + j] = data[j * nrows + i];
                }
            }
        }
    }

    /// Create a matrix from an owned `Vec<T>` in row-major order.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "vec length {} does not match {}x{} matrix",
            data.len(),
            nrows,
            ncols,
        );
        Self { data, nrows, ncols }
    }

    /// Change the shape.
    ///
    /// The backing buffer is kept when the new size fits in it and grown
    /// otherwise. Element values after a reshape are unspecified; newly
    /// allocated elements are zero.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let mut m = DynMatrix::zeros(5, 7, 0.0_f64);
    /// m.reshape(3, 2);
    /// assert_eq!((m.nrows(), m.ncols()), (3, 2));
    /// assert_eq!(m.data_len(), 35);
    /// m.reshape(10, 6);
    /// assert_eq!(m.data_len(), 60);
    /// ```
    pub fn reshape(&mut self, nrows: usize, ncols: usize) {
        let len = nrows * ncols;
        if len > self.data.len() {
            log::trace!(
                "growing dense buffer from {} to {} elements",
                self.data.len(),
                len
            );
            self.data.resize(len, T::zero());
        }
        self.nrows = nrows;
        self.ncols = ncols;
    }

    /// Reshape and fill the active region with zeros.
    pub fn reshape_zeroed(&mut self, nrows: usize, ncols: usize) {
        self.reshape(nrows, ncols);
        self.as_mut_slice().fill(T::zero());
    }

    /// Overwrite with the identity, reshaping to `nrows x ncols`.
    pub fn set_identity(&mut self, nrows: usize, ncols: usize) {
        self.reshape_zeroed(nrows, ncols);
        for i in 0..nrows.min(ncols) {
            self.data[i * ncols + i] = T::one();
        }
    }
}

impl<T> DynMatrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of logical elements, `nrows * ncols`.
    #[inline]
    pub fn len(&self) -> usize {
        self.nrows * self.ncols
    }

    /// Whether the matrix has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the backing buffer, which can exceed [`len`](Self::len).
    #[inline]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Offset of `(row, col)` in the row-major buffer.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.ncols + col
    }

    /// Distance between the starts of consecutive rows.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.ncols
    }

    /// Fail with [`DimensionMismatch`] unless the shape is `nrows x ncols`.
    pub fn check_shape(
        &self,
        op: &'static str,
        nrows: usize,
        ncols: usize,
    ) -> Result<(), DimensionMismatch> {
        if self.nrows != nrows || self.ncols != ncols {
            return Err(DimensionMismatch {
                op,
                expected: (nrows, ncols),
                got: (self.nrows, self.ncols),
            });
        }
        Ok(())
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_fn(3, 3, |i, j| if i == j { 1.0_f64 } else { 0.0 });
    /// assert_eq!(m[(0, 0)], 1.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }
}

impl<T: PartialEq> PartialEq for DynMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self.data[..self.len()] == other.data[..other.len()]
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for DynMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.ncols + col]
    }
}

impl<T> MatrixMut<T> for DynMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for DynMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.nrows && col < self.ncols);
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for DynMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.nrows && col < self.ncols);
        &mut self.data[row * self.ncols + col]
    }
}
