use std::fmt::{self, Write as _};

use crate::traits::{LinalgScalar, Scalar};

use super::DynMatrix;

// ── Map ─────────────────────────────────────────────────────────────

impl<T> DynMatrix<T> {
    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 4.0, 9.0, 16.0]);
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r[(0, 0)], 1.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DynMatrix<U>
    where
        T: Copy,
    {
        let data: Vec<U> = self.as_slice().iter().map(|&x| f(x)).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Transpose / extraction ──────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Transpose, allocating a new matrix.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1, 2, 3, 4, 5, 6]);
    /// let t = m.transpose();
    /// assert_eq!((t.nrows(), t.ncols()), (3, 2));
    /// assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }

    /// Transpose into `out`, reshaping it to `ncols x nrows`.
    pub fn transpose_into(&self, out: &mut Self) {
        out.reshape(self.ncols, self.nrows);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                out.data[j * self.nrows + i] = self.data[i * self.ncols + j];
            }
        }
    }

    /// Copy of the block `[r0, r1) x [c0, c1)`.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// let b = m.extract(1, 3, 0, 2);
    /// assert_eq!(b.as_slice(), &[4, 5, 7, 8]);
    /// ```
    pub fn extract(&self, r0: usize, r1: usize, c0: usize, c1: usize) -> Self {
        assert!(
            r0 <= r1 && r1 <= self.nrows && c0 <= c1 && c1 <= self.ncols,
            "block [{r0}, {r1}) x [{c0}, {c1}) outside {}x{} matrix",
            self.nrows,
            self.ncols,
        );
        Self::from_fn(r1 - r0, c1 - c0, |i, j| self[(r0 + i, c0 + j)])
    }
}

impl<T: LinalgScalar> DynMatrix<T> {
    /// Conjugate transpose `A^H` (plain transpose for reals).
    ///
    /// ```
    /// use numeris_linalg::{Complex, DynMatrix};
    /// let m = DynMatrix::from_rows(1, 2, &[Complex::new(1.0, 2.0), Complex::new(3.0, -4.0)]);
    /// let h = m.conj_transpose();
    /// assert_eq!(h[(0, 0)], Complex::new(1.0, -2.0));
    /// assert_eq!(h[(1, 0)], Complex::new(3.0, 4.0));
    /// ```
    pub fn conj_transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)].conj())
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for DynMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.nrows;
        let n = self.ncols;

        // Measure column widths
        let mut widths: Vec<usize> = vec![0; n];
        for j in 0..n {
            for i in 0..m {
                let w = WriteCounting::count(|wc| write!(wc, "{}", self[(i, j)]));
                if w > widths[j] {
                    widths[j] = w;
                }
            }
        }

        for i in 0..m {
            write!(f, "│")?;
            for j in 0..n {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", self[(i, j)], width = widths[j])?;
            }
            write!(f, "│")?;
            if i + 1 < m {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.len();
        Ok(())
    }
}
