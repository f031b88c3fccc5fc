use std::ops::{Add, Div, Mul, MulAssign, Neg, Sub};

use crate::traits::Scalar;

use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    fn zip_with(&self, rhs: &Self, op: &str, f: impl Fn(T, T) -> T) -> Self {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} {} {}x{}",
            self.nrows,
            self.ncols,
            op,
            rhs.nrows,
            rhs.ncols,
        );
        let data = self
            .as_slice()
            .iter()
            .zip(rhs.as_slice())
            .map(|(&a, &b)| f(a, b))
            .collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// `out = self * rhs`, reshaping `out` and reusing its buffer.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let b = DynMatrix::from_rows(2, 1, &[1.0, 1.0]);
    /// let mut c = DynMatrix::zeros(0, 0, 0.0);
    /// a.mul_into(&b, &mut c);
    /// assert_eq!(c.as_slice(), &[3.0, 7.0]);
    /// ```
    pub fn mul_into(&self, rhs: &Self, out: &mut Self) {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        out.reshape_zeroed(m, p);
        for i in 0..m {
            for k in 0..n {
                let a_ik = self.data[i * n + k];
                let b_row = &rhs.data[k * p..(k + 1) * p];
                let c_row = &mut out.data[i * p..(i + 1) * p];
                for (c, &b) in c_row.iter_mut().zip(b_row) {
                    *c = *c + a_ik * b;
                }
            }
        }
    }
}

// ── Element-wise addition / subtraction ─────────────────────────────

impl<T: Scalar> Add<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn add(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        self.zip_with(rhs, "+", |a, b| a + b)
    }
}

impl<T: Scalar> Add for DynMatrix<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl<T: Scalar> Sub<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn sub(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        self.zip_with(rhs, "-", |a, b| a - b)
    }
}

impl<T: Scalar> Sub for DynMatrix<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn neg(self) -> DynMatrix<T> {
        self.map(|x| T::zero() - x)
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        let mut out = DynMatrix::zeros(0, 0, T::zero());
        self.mul_into(rhs, &mut out);
        out
    }
}

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

// ── Scalar multiplication / division ────────────────────────────────

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: T) -> DynMatrix<T> {
        self.map(|x| x * rhs)
    }
}

impl<T: Scalar> MulAssign<T> for DynMatrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.iter_mut() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar> Div<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn div(self, rhs: T) -> DynMatrix<T> {
        self.map(|x| x / rhs)
    }
}
