//! Compressed sparse column (CSC) matrices.
//!
//! Column `j` owns the entries `col_idx[j]..col_idx[j + 1]` of `nz_rows`
//! (row indices) and `nz_values`. The value arrays may be longer than the
//! number of stored entries so that results can be written into an existing
//! matrix without reallocating.
//!
//! The algorithms live in [`ops`]; they take their scratch memory from a
//! caller-owned [`SparseWork`].

pub mod ops;

pub use ops::{
    add, divide, element_max, element_max_abs, element_min, element_min_abs, identity,
    identity_rect, mult, scale, transpose,
};

use crate::dynmatrix::DynMatrix;
use crate::traits::{LinalgScalar, Scalar};

/// Sparse matrix in compressed column format.
///
/// ```
/// use numeris_linalg::CscMatrix;
///
/// let a = CscMatrix::from_triplets(3, 3, &[(0, 0, 1.0_f64), (2, 0, 4.0), (1, 2, -2.0)]);
/// assert_eq!(a.nnz(), 3);
/// assert_eq!(a.col_idx(), &[0, 2, 2, 3]);
/// assert_eq!(a.nz_rows(), &[0, 2, 1]);
/// assert_eq!(a.get(2, 0), 4.0);
/// assert_eq!(a.get(1, 1), 0.0);
/// assert!(a.is_row_order_valid());
/// ```
#[derive(Debug, Clone)]
pub struct CscMatrix<T> {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) nz_length: usize,
    pub(crate) col_idx: Vec<usize>,
    pub(crate) nz_rows: Vec<usize>,
    pub(crate) nz_values: Vec<T>,
}

impl<T: Scalar> CscMatrix<T> {
    /// Empty `nrows x ncols` matrix with room for `nz_capacity` entries.
    pub fn new(nrows: usize, ncols: usize, nz_capacity: usize) -> Self {
        Self {
            nrows,
            ncols,
            nz_length: 0,
            col_idx: vec![0; ncols + 1],
            nz_rows: vec![0; nz_capacity],
            nz_values: vec![T::zero(); nz_capacity],
        }
    }

    /// Build from `(row, col, value)` triplets in any order.
    ///
    /// Duplicate positions are summed. Panics if an index is out of range.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, T)]) -> Self {
        let mut sorted = triplets.to_vec();
        for &(row, col, _) in &sorted {
            assert!(
                row < nrows && col < ncols,
                "triplet ({row}, {col}) outside {nrows}x{ncols} matrix"
            );
        }
        sorted.sort_by_key(|&(row, col, _)| (col, row));

        let mut m = Self::new(nrows, ncols, sorted.len());
        let mut last: Option<(usize, usize)> = None;
        for &(row, col, value) in &sorted {
            if last == Some((row, col)) {
                let p = m.nz_length - 1;
                m.nz_values[p] = m.nz_values[p] + value;
                continue;
            }
            m.nz_rows[m.nz_length] = row;
            m.nz_values[m.nz_length] = value;
            m.nz_length += 1;
            m.col_idx[col + 1] = m.nz_length;
            last = Some((row, col));
        }
        // Columns without entries inherit the end of the previous column.
        for j in 1..=ncols {
            if m.col_idx[j] < m.col_idx[j - 1] {
                m.col_idx[j] = m.col_idx[j - 1];
            }
        }
        m
    }

    /// Dense copy.
    pub fn to_dense(&self) -> DynMatrix<T> {
        let mut d = DynMatrix::zeros(self.nrows, self.ncols, T::zero());
        for j in 0..self.ncols {
            for p in self.col_idx[j]..self.col_idx[j + 1] {
                d[(self.nz_rows[p], j)] = self.nz_values[p];
            }
        }
        d
    }

    /// Change the shape and drop every entry, keeping room for at least
    /// `nz_capacity` of them.
    pub fn reshape(&mut self, nrows: usize, ncols: usize, nz_capacity: usize) {
        self.nrows = nrows;
        self.ncols = ncols;
        self.nz_length = 0;
        self.col_idx.clear();
        self.col_idx.resize(ncols + 1, 0);
        self.grow_max_length(nz_capacity, false);
    }

    /// Make room for `len` entries. Existing entries survive only with
    /// `preserve`; without it, the stored values are unspecified afterwards.
    pub fn grow_max_length(&mut self, len: usize, preserve: bool) {
        if len <= self.nz_values.len() {
            return;
        }
        log::trace!(
            "growing sparse storage from {} to {} entries",
            self.nz_values.len(),
            len
        );
        if preserve {
            self.nz_rows.resize(len, 0);
            self.nz_values.resize(len, T::zero());
        } else {
            self.nz_rows = vec![0; len];
            self.nz_values = vec![T::zero(); len];
        }
    }

    /// Grow ahead of demand so repeated single-entry growth stays amortized.
    pub(crate) fn reserve_entries(&mut self, len: usize) {
        if len > self.nz_values.len() {
            let target = len.max(2 * self.nz_values.len()).max(4);
            self.grow_max_length(target, true);
        }
    }

    /// Take the shape and sparsity pattern of `other`. Values are left as
    /// they were in the overlapping storage.
    pub fn copy_structure(&mut self, other: &CscMatrix<T>) {
        self.nrows = other.nrows;
        self.ncols = other.ncols;
        self.grow_max_length(other.nz_length, false);
        self.nz_length = other.nz_length;
        self.col_idx.clear();
        self.col_idx.extend_from_slice(&other.col_idx);
        self.nz_rows[..other.nz_length].copy_from_slice(&other.nz_rows[..other.nz_length]);
    }

    /// Value at `(row, col)`, zero when no entry is stored.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.find(row, col)
            .map(|p| self.nz_values[p])
            .unwrap_or_else(T::zero)
    }

    /// Store `value` at `(row, col)`, inserting a new entry in row order
    /// when needed.
    ///
    /// ```
    /// use numeris_linalg::CscMatrix;
    ///
    /// let mut a = CscMatrix::new(3, 2, 0);
    /// a.set(2, 1, 5.0_f64);
    /// a.set(0, 1, 1.0);
    /// a.set(1, 0, 3.0);
    /// assert_eq!(a.col_idx(), &[0, 1, 3]);
    /// assert_eq!(a.nz_rows(), &[1, 0, 2]);
    /// assert!(a.is_row_order_valid());
    /// ```
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.nrows && col < self.ncols,
            "({row}, {col}) outside {}x{} matrix",
            self.nrows,
            self.ncols
        );
        if let Some(p) = self.find(row, col) {
            self.nz_values[p] = value;
            return;
        }
        let start = self.col_idx[col];
        let end = self.col_idx[col + 1];
        let at = start + self.nz_rows[start..end].partition_point(|&r| r < row);

        self.reserve_entries(self.nz_length + 1);
        self.nz_rows.copy_within(at..self.nz_length, at + 1);
        self.nz_values.copy_within(at..self.nz_length, at + 1);
        self.nz_rows[at] = row;
        self.nz_values[at] = value;
        self.nz_length += 1;
        for c in &mut self.col_idx[col + 1..] {
            *c += 1;
        }
    }
}

impl<T: LinalgScalar> CscMatrix<T> {
    /// Sparse copy of `d`, keeping entries with modulus above `tol`.
    pub fn from_dense(d: &DynMatrix<T>, tol: T::Real) -> Self {
        let nnz = d.iter().filter(|v| v.modulus() > tol).count();
        let mut m = Self::new(d.nrows(), d.ncols(), nnz);
        for j in 0..d.ncols() {
            for i in 0..d.nrows() {
                let v = d[(i, j)];
                if v.modulus() > tol {
                    m.nz_rows[m.nz_length] = i;
                    m.nz_values[m.nz_length] = v;
                    m.nz_length += 1;
                }
            }
            m.col_idx[j + 1] = m.nz_length;
        }
        m
    }
}

impl<T> CscMatrix<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.nz_length
    }

    /// Number of entries the value arrays can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nz_values.len()
    }

    /// Column pointers, length `ncols + 1`.
    #[inline]
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Row index of each stored entry.
    #[inline]
    pub fn nz_rows(&self) -> &[usize] {
        &self.nz_rows[..self.nz_length]
    }

    /// Stored values.
    #[inline]
    pub fn nz_values(&self) -> &[T] {
        &self.nz_values[..self.nz_length]
    }

    /// Stored values, mutable. The pattern cannot be changed through this.
    #[inline]
    pub fn nz_values_mut(&mut self) -> &mut [T] {
        &mut self.nz_values[..self.nz_length]
    }

    /// Every position holds a stored entry.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.nz_length == self.nrows * self.ncols
    }

    /// Row indices are in range and strictly increasing inside every
    /// column.
    pub fn is_row_order_valid(&self) -> bool {
        if self.col_idx.len() != self.ncols + 1
            || self.col_idx[0] != 0
            || self.col_idx[self.ncols] != self.nz_length
        {
            return false;
        }
        for j in 0..self.ncols {
            let (start, end) = (self.col_idx[j], self.col_idx[j + 1]);
            if start > end || end > self.nz_length {
                return false;
            }
            let rows = &self.nz_rows[start..end];
            if rows.iter().any(|&r| r >= self.nrows) {
                return false;
            }
            if rows.windows(2).any(|w| w[0] >= w[1]) {
                return false;
            }
        }
        true
    }

    /// Entries of column `j` as `(row, value)` pairs.
    pub fn column(&self, j: usize) -> impl Iterator<Item = (usize, &T)> + '_ {
        let range = self.col_idx[j]..self.col_idx[j + 1];
        self.nz_rows[range.clone()]
            .iter()
            .copied()
            .zip(&self.nz_values[range])
    }

    fn find(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.col_idx[col];
        let end = self.col_idx[col + 1];
        self.nz_rows[start..end]
            .iter()
            .position(|&r| r == row)
            .map(|p| start + p)
    }
}

impl<T: Scalar> PartialEq for CscMatrix<T> {
    /// Same shape, same pattern and same stored values.
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self.col_idx == other.col_idx
            && self.nz_rows() == other.nz_rows()
            && self.nz_values() == other.nz_values()
    }
}

/// Scratch memory for the sparse operations.
///
/// Holds a marker per row, used to detect whether a row already appears in
/// the column being built, and a dense accumulator for that column. Both
/// grow on demand and are reset at the start of every operation, so one
/// context can be reused for any sequence of calls.
#[derive(Debug, Clone, Default)]
pub struct SparseWork<T> {
    pub(crate) marks: Vec<usize>,
    pub(crate) values: Vec<T>,
}

impl<T: Scalar> SparseWork<T> {
    pub fn new() -> Self {
        Self {
            marks: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Clear the markers and size both arrays for `nrows` rows.
    pub(crate) fn reset(&mut self, nrows: usize) {
        self.marks.clear();
        self.marks.resize(nrows, 0);
        if self.values.len() < nrows {
            self.values.resize(nrows, T::zero());
        }
    }
}

impl<T: Scalar> Default for CscMatrix<T> {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CscMatrix<f64> {
        CscMatrix::from_triplets(
            3,
            4,
            &[(0, 0, 1.0), (2, 0, 2.0), (1, 1, 3.0), (0, 3, 4.0), (2, 3, 5.0)],
        )
    }

    #[test]
    fn triplets_sorted_and_summed() {
        let a = CscMatrix::from_triplets(2, 2, &[(1, 1, 1.0), (0, 1, 2.0), (1, 1, 3.0)]);
        assert_eq!(a.col_idx(), &[0, 0, 2]);
        assert_eq!(a.nz_rows(), &[0, 1]);
        assert_eq!(a.nz_values(), &[2.0, 4.0]);
    }

    #[test]
    fn empty_columns() {
        let a = sample();
        assert_eq!(a.col_idx(), &[0, 2, 3, 3, 5]);
        assert!(a.is_row_order_valid());
        assert_eq!(a.column(2).count(), 0);
        let col3: Vec<(usize, f64)> = a.column(3).map(|(r, &v)| (r, v)).collect();
        assert_eq!(col3, vec![(0, 4.0), (2, 5.0)]);
    }

    #[test]
    fn dense_round_trip() {
        let a = sample();
        let d = a.to_dense();
        assert_eq!(d[(2, 3)], 5.0);
        assert_eq!(d[(1, 0)], 0.0);
        assert_eq!(CscMatrix::from_dense(&d, 0.0), a);
    }

    #[test]
    fn row_order_violations() {
        let mut a = sample();
        a.nz_rows.swap(0, 1);
        assert!(!a.is_row_order_valid());

        let mut a = sample();
        a.nz_rows[2] = 7;
        assert!(!a.is_row_order_valid());

        let mut a = sample();
        a.nz_rows[4] = 0;
        assert!(!a.is_row_order_valid(), "duplicate row in a column");
    }

    #[test]
    fn column_pointers_past_stored_entries() {
        let mut a = sample();
        a.col_idx[1] = 10;
        assert!(!a.is_row_order_valid());

        let mut a = sample();
        a.col_idx[2] = 1;
        assert!(!a.is_row_order_valid(), "decreasing column pointers");
    }

    #[test]
    fn set_overwrites_and_inserts() {
        let mut a = sample();
        a.set(2, 0, 9.0);
        assert_eq!(a.nnz(), 5);
        assert_eq!(a.get(2, 0), 9.0);

        a.set(1, 3, 7.0);
        assert_eq!(a.nnz(), 6);
        assert_eq!(a.col_idx(), &[0, 2, 3, 3, 6]);
        assert_eq!(&a.nz_rows()[3..], &[0, 1, 2]);
        assert!(a.is_row_order_valid());
    }

    #[test]
    fn grow_preserves_when_asked() {
        let mut a = sample();
        a.grow_max_length(20, true);
        assert_eq!(a.capacity(), 20);
        assert_eq!(a.nz_values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);

        a.grow_max_length(3, false);
        assert_eq!(a.capacity(), 20, "never shrinks");
    }

    #[test]
    fn copy_structure_takes_pattern() {
        let a = sample();
        let mut b = CscMatrix::new(1, 1, 0);
        b.copy_structure(&a);
        assert_eq!((b.nrows(), b.ncols()), (3, 4));
        assert_eq!(b.col_idx(), a.col_idx());
        assert_eq!(b.nz_rows(), a.nz_rows());
        assert!(b.is_row_order_valid());
    }

    #[test]
    fn reshape_drops_entries() {
        let mut a = sample();
        a.reshape(5, 2, 3);
        assert_eq!(a.nnz(), 0);
        assert_eq!(a.col_idx(), &[0, 0, 0]);
        assert!(a.capacity() >= 5);
        assert!(a.is_row_order_valid());
    }

    #[test]
    fn full_predicate() {
        let a = CscMatrix::from_dense(&DynMatrix::fill(2, 2, 1.0_f64), 0.0);
        assert!(a.is_full());
        assert!(!sample().is_full());
    }
}
