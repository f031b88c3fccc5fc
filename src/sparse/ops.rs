//! Operations on [`CscMatrix`].
//!
//! Every operation checks all shapes before touching its output and reports
//! a mismatch as [`LinalgError::DimensionMismatch`]. Outputs are resized to
//! fit, and the row indices inside each output column are sorted, so the
//! results always pass [`CscMatrix::is_row_order_valid`].

use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, Scalar};

use super::{CscMatrix, SparseWork};

fn check<T>(
    op: &'static str,
    m: &CscMatrix<T>,
    nrows: usize,
    ncols: usize,
) -> Result<(), LinalgError> {
    if m.nrows != nrows || m.ncols != ncols {
        return Err(LinalgError::DimensionMismatch {
            op,
            expected: (nrows, ncols),
            got: (m.nrows, m.ncols),
        });
    }
    Ok(())
}

/// `a_t = a^T`. `a_t` must be `a.ncols() x a.nrows()`.
///
/// A counting sort over the rows of `a`; columns of `a` are visited in
/// order, which leaves each column of `a_t` sorted.
pub fn transpose<T: Scalar>(
    a: &CscMatrix<T>,
    a_t: &mut CscMatrix<T>,
    work: &mut SparseWork<T>,
) -> Result<(), LinalgError> {
    check("transpose", a_t, a.ncols, a.nrows)?;

    a_t.grow_max_length(a.nz_length, false);
    a_t.nz_length = a.nz_length;

    // Entries per row of `a`, then the running start of each `a_t` column.
    work.reset(a.nrows);
    let next = &mut work.marks;
    for &r in a.nz_rows() {
        next[r] += 1;
    }
    a_t.col_idx[0] = 0;
    for r in 0..a.nrows {
        a_t.col_idx[r + 1] = a_t.col_idx[r] + next[r];
        next[r] = a_t.col_idx[r];
    }

    for j in 0..a.ncols {
        for p in a.col_idx[j]..a.col_idx[j + 1] {
            let r = a.nz_rows[p];
            let q = next[r];
            a_t.nz_rows[q] = j;
            a_t.nz_values[q] = a.nz_values[p];
            next[r] += 1;
        }
    }
    Ok(())
}

/// Append `row` to the column under construction in `c` unless the marker
/// says it is already there. Returns whether it was new.
#[inline]
fn mark_row<T: Scalar>(c: &mut CscMatrix<T>, marks: &mut [usize], mark: usize, row: usize) -> bool {
    if marks[row] == mark {
        return false;
    }
    marks[row] = mark;
    c.reserve_entries(c.nz_length + 1);
    c.nz_rows[c.nz_length] = row;
    c.nz_length += 1;
    true
}

/// Sort the rows of the column that started at `start` and copy its values
/// out of the dense accumulator.
#[inline]
fn finish_column<T: Scalar>(c: &mut CscMatrix<T>, values: &[T], start: usize, col: usize) {
    let end = c.nz_length;
    c.nz_rows[start..end].sort_unstable();
    for p in start..end {
        c.nz_values[p] = values[c.nz_rows[p]];
    }
    c.col_idx[col + 1] = end;
}

/// `c = a * b`.
///
/// `c` must be `a.nrows() x b.ncols()` and `a.ncols()` must equal
/// `b.nrows()`. Column `j` of `c` is built by scattering the columns of
/// `a` selected by column `j` of `b` into a dense accumulator.
///
/// ```
/// use numeris_linalg::{CscMatrix, SparseWork};
/// use numeris_linalg::sparse::mult;
///
/// let a = CscMatrix::from_triplets(2, 2, &[(0, 0, 1.0_f64), (1, 0, 2.0), (1, 1, 3.0)]);
/// let b = CscMatrix::from_triplets(2, 1, &[(0, 0, 1.0_f64), (1, 0, 1.0)]);
/// let mut c = CscMatrix::new(2, 1, 0);
/// mult(&a, &b, &mut c, &mut SparseWork::new()).unwrap();
/// assert_eq!(c.get(0, 0), 1.0);
/// assert_eq!(c.get(1, 0), 5.0);
/// ```
pub fn mult<T: Scalar>(
    a: &CscMatrix<T>,
    b: &CscMatrix<T>,
    c: &mut CscMatrix<T>,
    work: &mut SparseWork<T>,
) -> Result<(), LinalgError> {
    check("mult", b, a.ncols, b.ncols)?;
    check("mult", c, a.nrows, b.ncols)?;

    work.reset(a.nrows);
    let SparseWork { marks, values } = work;

    c.nz_length = 0;
    c.col_idx[0] = 0;
    for j in 0..b.ncols {
        let mark = j + 1;
        let start = c.nz_length;
        for pb in b.col_idx[j]..b.col_idx[j + 1] {
            let k = b.nz_rows[pb];
            let b_kj = b.nz_values[pb];
            for pa in a.col_idx[k]..a.col_idx[k + 1] {
                let i = a.nz_rows[pa];
                let prod = a.nz_values[pa] * b_kj;
                if mark_row(c, marks, mark, i) {
                    values[i] = prod;
                } else {
                    values[i] = values[i] + prod;
                }
            }
        }
        finish_column(c, values, start, j);
    }
    Ok(())
}

/// `c = alpha * a + beta * b`. All three must have the same shape.
///
/// The pattern of `c` is the union of the patterns of `a` and `b`.
pub fn add<T: Scalar>(
    alpha: T,
    a: &CscMatrix<T>,
    beta: T,
    b: &CscMatrix<T>,
    c: &mut CscMatrix<T>,
    work: &mut SparseWork<T>,
) -> Result<(), LinalgError> {
    check("add", b, a.nrows, a.ncols)?;
    check("add", c, a.nrows, a.ncols)?;

    work.reset(a.nrows);
    let SparseWork { marks, values } = work;

    c.nz_length = 0;
    c.col_idx[0] = 0;
    for j in 0..a.ncols {
        let mark = j + 1;
        let start = c.nz_length;
        for p in a.col_idx[j]..a.col_idx[j + 1] {
            let i = a.nz_rows[p];
            mark_row(c, marks, mark, i);
            values[i] = alpha * a.nz_values[p];
        }
        for p in b.col_idx[j]..b.col_idx[j + 1] {
            let i = b.nz_rows[p];
            let v = beta * b.nz_values[p];
            if mark_row(c, marks, mark, i) {
                values[i] = v;
            } else {
                values[i] = values[i] + v;
            }
        }
        finish_column(c, values, start, j);
    }
    Ok(())
}

/// `n x n` identity.
pub fn identity<T: Scalar>(n: usize) -> CscMatrix<T> {
    identity_rect(n, n)
}

/// `nrows x ncols` matrix with ones on the main diagonal.
///
/// ```
/// use numeris_linalg::sparse::identity_rect;
///
/// let a = identity_rect::<f64>(2, 4);
/// assert_eq!(a.col_idx(), &[0, 1, 2, 2, 2]);
/// assert_eq!(a.nz_rows(), &[0, 1]);
/// ```
pub fn identity_rect<T: Scalar>(nrows: usize, ncols: usize) -> CscMatrix<T> {
    let n = nrows.min(ncols);
    let mut m = CscMatrix::new(nrows, ncols, n);
    for i in 0..n {
        m.col_idx[i + 1] = i + 1;
        m.nz_rows[i] = i;
        m.nz_values[i] = T::one();
    }
    for j in n..ncols {
        m.col_idx[j + 1] = n;
    }
    m.nz_length = n;
    m
}

/// `b = alpha * a`. `b` must have the shape of `a` and takes its pattern.
pub fn scale<T: Scalar>(alpha: T, a: &CscMatrix<T>, b: &mut CscMatrix<T>) -> Result<(), LinalgError> {
    check("scale", b, a.nrows, a.ncols)?;
    b.copy_structure(a);
    for (out, &v) in b.nz_values.iter_mut().zip(a.nz_values()) {
        *out = alpha * v;
    }
    Ok(())
}

/// `b = a / alpha`. `b` must have the shape of `a` and takes its pattern.
pub fn divide<T: Scalar>(a: &CscMatrix<T>, alpha: T, b: &mut CscMatrix<T>) -> Result<(), LinalgError> {
    check("divide", b, a.nrows, a.ncols)?;
    b.copy_structure(a);
    for (out, &v) in b.nz_values.iter_mut().zip(a.nz_values()) {
        *out = v / alpha;
    }
    Ok(())
}

// ── Element reductions ──────────────────────────────────────────────
//
// A matrix that is not full has implicit zeros, so zero is a candidate and
// the search starts from it. A full matrix starts from its first value.
// An empty matrix reduces to zero.

fn reduce<T: FloatScalar>(a: &CscMatrix<T>, map: impl Fn(T) -> T, better: impl Fn(T, T) -> bool) -> T {
    let values = a.nz_values();
    let Some(&first) = values.first() else {
        return T::zero();
    };
    let mut best = if a.is_full() { map(first) } else { T::zero() };
    for &v in values {
        let v = map(v);
        if better(v, best) {
            best = v;
        }
    }
    best
}

/// Smallest element, counting implicit zeros.
pub fn element_min<T: FloatScalar>(a: &CscMatrix<T>) -> T {
    reduce(a, |v| v, |v, best| v < best)
}

/// Largest element, counting implicit zeros.
pub fn element_max<T: FloatScalar>(a: &CscMatrix<T>) -> T {
    reduce(a, |v| v, |v, best| v > best)
}

/// Smallest absolute value, counting implicit zeros.
pub fn element_min_abs<T: FloatScalar>(a: &CscMatrix<T>) -> T {
    reduce(a, |v| v.abs(), |v, best| v < best)
}

/// Largest absolute value, counting implicit zeros.
pub fn element_max_abs<T: FloatScalar>(a: &CscMatrix<T>) -> T {
    reduce(a, |v| v.abs(), |v, best| v > best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CscMatrix<f64> {
        CscMatrix::from_triplets(
            3,
            4,
            &[(0, 0, 1.0), (2, 0, -2.0), (1, 1, 3.0), (0, 3, 4.0), (2, 3, 5.0)],
        )
    }

    #[test]
    fn transpose_matches_dense() {
        let a = sample();
        let mut at = CscMatrix::new(4, 3, 0);
        let mut work = SparseWork::new();
        transpose(&a, &mut at, &mut work).unwrap();
        assert!(at.is_row_order_valid());
        assert_eq!(at.to_dense(), a.to_dense().transpose());
    }

    #[test]
    fn transpose_rejects_wrong_shape() {
        let a = sample();
        let mut at = CscMatrix::new(3, 4, 0);
        let err = transpose(&a, &mut at, &mut SparseWork::new()).unwrap_err();
        assert_eq!(
            err,
            LinalgError::DimensionMismatch {
                op: "transpose",
                expected: (4, 3),
                got: (3, 4),
            }
        );
    }

    #[test]
    fn mult_matches_dense() {
        let a = sample();
        let b = CscMatrix::from_triplets(4, 2, &[(0, 0, 2.0), (3, 0, 1.0), (1, 1, -1.0), (3, 1, 1.0)]);
        let mut c = CscMatrix::new(3, 2, 0);
        let mut work = SparseWork::new();
        mult(&a, &b, &mut c, &mut work).unwrap();
        assert!(c.is_row_order_valid());
        assert_eq!(c.to_dense(), &a.to_dense() * &b.to_dense());
    }

    #[test]
    fn mult_checks_shapes_before_writing() {
        let a = sample();
        let b = CscMatrix::<f64>::new(3, 2, 0);
        let mut c = identity(3);
        let before = c.clone();
        assert!(mult(&a, &b, &mut c, &mut SparseWork::new()).is_err());
        assert_eq!(c, before);

        let b = CscMatrix::<f64>::new(4, 2, 0);
        let mut c = CscMatrix::new(2, 2, 0);
        assert!(mult(&a, &b, &mut c, &mut SparseWork::new()).is_err());
    }

    #[test]
    fn add_unions_patterns() {
        let a = sample();
        let b = CscMatrix::from_triplets(3, 4, &[(1, 0, 1.0), (2, 0, 2.0), (2, 2, 7.0)]);
        let mut c = CscMatrix::new(3, 4, 0);
        let mut work = SparseWork::new();
        add(2.0, &a, 1.0, &b, &mut c, &mut work).unwrap();

        assert!(c.is_row_order_valid());
        assert_eq!(c.nnz(), 7);
        let expected = &(&a.to_dense() * 2.0) + &b.to_dense();
        assert_eq!(c.to_dense(), expected);
        assert_eq!(c.get(2, 0), -2.0);
    }

    #[test]
    fn work_is_reusable() {
        let a = sample();
        let mut work = SparseWork::new();
        let mut c1 = CscMatrix::new(3, 4, 0);
        let mut c2 = CscMatrix::new(3, 4, 0);
        add(1.0, &a, 1.0, &a, &mut c1, &mut work).unwrap();
        add(1.0, &a, 1.0, &a, &mut c2, &mut work).unwrap();
        assert_eq!(c1, c2);
        assert_eq!(c1.nnz(), a.nnz());
    }

    #[test]
    fn identity_entries() {
        let a = identity::<f64>(4);
        assert_eq!(a.nnz(), 4);
        for i in 0..4 {
            assert_eq!(a.get(i, i), 1.0);
        }
        assert!(a.is_row_order_valid());

        let tall = identity_rect::<f64>(4, 2);
        assert_eq!(tall.col_idx(), &[0, 1, 2]);
        assert!(tall.is_row_order_valid());
    }

    #[test]
    fn scale_and_divide() {
        let a = sample();
        let mut b = CscMatrix::new(3, 4, 0);
        scale(2.0, &a, &mut b).unwrap();
        assert_eq!(b.nz_values(), &[2.0, -4.0, 6.0, 8.0, 10.0]);
        assert_eq!(b.nz_rows(), a.nz_rows());

        divide(&a, 2.0, &mut b).unwrap();
        assert_eq!(b.nz_values(), &[0.5, -1.0, 1.5, 2.0, 2.5]);

        let mut wrong = CscMatrix::new(4, 3, 0);
        assert!(scale(2.0, &a, &mut wrong).is_err());
        assert_eq!(wrong.nnz(), 0);
    }

    #[test]
    fn reductions_count_implicit_zeros() {
        let a = sample();
        assert_eq!(element_min(&a), -2.0);
        assert_eq!(element_max(&a), 5.0);
        assert_eq!(element_min_abs(&a), 0.0);
        assert_eq!(element_max_abs(&a), 5.0);

        let positive = CscMatrix::from_triplets(2, 2, &[(0, 0, 3.0), (1, 1, 4.0)]);
        assert_eq!(element_min(&positive), 0.0);

        let negative = CscMatrix::from_triplets(2, 2, &[(0, 0, -3.0), (1, 1, -4.0)]);
        assert_eq!(element_max(&negative), 0.0);
    }

    #[test]
    fn reductions_on_full_matrix() {
        let full = CscMatrix::from_triplets(
            2,
            2,
            &[(0, 0, 3.0), (1, 0, 4.0), (0, 1, -6.0), (1, 1, 2.0)],
        );
        assert!(full.is_full());
        assert_eq!(element_min(&full), -6.0);
        assert_eq!(element_max(&full), 4.0);
        assert_eq!(element_min_abs(&full), 2.0);
        assert_eq!(element_max_abs(&full), 6.0);
    }

    #[test]
    fn reductions_on_empty_matrix() {
        let empty = CscMatrix::<f64>::new(3, 3, 4);
        assert_eq!(element_min(&empty), 0.0);
        assert_eq!(element_max_abs(&empty), 0.0);
    }
}
