//! Structural and numerical predicates used to check decomposition output.

use num_traits::Float;

use crate::traits::LinalgScalar;

use super::DynMatrix;

impl<T: LinalgScalar> DynMatrix<T> {
    /// Same shape and every element within `tol` of `other`.
    ///
    /// Real and imaginary parts are compared separately.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let a = DynMatrix::from_rows(1, 2, &[1.0_f64, 2.0]);
    /// let b = DynMatrix::from_rows(1, 2, &[1.0_f64, 2.0 + 1e-12]);
    /// assert!(a.is_equal(&b, 1e-10));
    /// assert!(!a.is_equal(&b, 1e-14));
    /// ```
    pub fn is_equal(&self, other: &Self, tol: T::Real) -> bool {
        if self.nrows != other.nrows || self.ncols != other.ncols {
            return false;
        }
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(&a, &b)| {
                let d = a - b;
                Float::abs(d.re()) <= tol && Float::abs(d.im()) <= tol
            })
    }

    /// Like [`is_equal`](Self::is_equal), but NaN matches NaN and
    /// infinities of the same sign match each other.
    pub fn is_identical(&self, other: &Self, tol: T::Real) -> bool {
        if self.nrows != other.nrows || self.ncols != other.ncols {
            return false;
        }
        fn same<R: num_traits::Float>(a: R, b: R, tol: R) -> bool {
            if a.is_nan() || b.is_nan() {
                return a.is_nan() && b.is_nan();
            }
            if a.is_infinite() || b.is_infinite() {
                return a == b;
            }
            (a - b).abs() <= tol
        }
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(&a, &b)| same(a.re(), b.re(), tol) && same(a.im(), b.im(), tol))
    }

    /// Every entry strictly below the main diagonal has modulus `<= tol`.
    pub fn is_upper_triangular(&self, tol: T::Real) -> bool {
        self.zero_below(0, tol)
    }

    /// Every entry strictly below the first sub-diagonal has modulus `<= tol`.
    pub fn is_hessenberg(&self, tol: T::Real) -> bool {
        self.zero_below(1, tol)
    }

    fn zero_below(&self, band: usize, tol: T::Real) -> bool {
        for i in (band + 1)..self.nrows {
            for j in 0..(i - band).min(self.ncols) {
                if self[(i, j)].modulus() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// `A == A^H` within `tol`.
    pub fn is_hermitian(&self, tol: T::Real) -> bool {
        self.is_square() && self.is_equal(&self.conj_transpose(), tol)
    }

    /// Columns are orthonormal: `A^H A == I` within `tol`.
    ///
    /// Works for tall matrices too (thin / economy factors).
    pub fn is_unitary(&self, tol: T::Real) -> bool {
        if self.nrows < self.ncols {
            return false;
        }
        for a in 0..self.ncols {
            for b in a..self.ncols {
                let mut dot = T::zero();
                for i in 0..self.nrows {
                    dot = dot + self[(i, a)].conj() * self[(i, b)];
                }
                let expected = if a == b { T::one() } else { T::zero() };
                let d = dot - expected;
                if Float::abs(d.re()) > tol || Float::abs(d.im()) > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Identity within `tol`.
    pub fn is_identity(&self, tol: T::Real) -> bool {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                let expected = if i == j { T::one() } else { T::zero() };
                if (self[(i, j)] - expected).modulus() > tol {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn equal_requires_same_shape() {
        let a = DynMatrix::zeros(2, 3, 0.0_f64);
        let b = DynMatrix::zeros(3, 2, 0.0_f64);
        assert!(!a.is_equal(&b, 1.0));
    }

    #[test]
    fn identical_handles_nan() {
        let a = DynMatrix::from_rows(1, 2, &[f64::NAN, f64::INFINITY]);
        let b = DynMatrix::from_rows(1, 2, &[f64::NAN, f64::INFINITY]);
        assert!(a.is_identical(&b, 1e-12));
        assert!(!a.is_equal(&b, 1e-12));
    }

    #[test]
    fn triangular_and_hessenberg() {
        let h = DynMatrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0]);
        assert!(h.is_hessenberg(0.0));
        assert!(!h.is_upper_triangular(0.0));

        let r = DynMatrix::from_rows(3, 2, &[1.0, 2.0, 0.0, 3.0, 0.0, 0.0]);
        assert!(r.is_upper_triangular(0.0));
    }

    #[test]
    fn unitary_complex() {
        let s = 0.5_f64.sqrt();
        let q = DynMatrix::from_rows(
            2,
            2,
            &[
                Complex::new(s, 0.0),
                Complex::new(0.0, s),
                Complex::new(0.0, s),
                Complex::new(s, 0.0),
            ],
        );
        assert!(q.is_unitary(1e-12));
        assert!(!q.is_hermitian(1e-12));
    }

    #[test]
    fn tolerances_in_single_precision() {
        let a = DynMatrix::from_rows(1, 2, &[1.0_f32, -2.0]);
        let b = DynMatrix::from_rows(1, 2, &[1.0_f32, -2.0 + 1e-3]);
        assert!(a.is_equal(&b, 1e-2));
        assert!(!a.is_equal(&b, 1e-4));

        let s = 0.5_f32.sqrt();
        let q = DynMatrix::from_rows(
            2,
            2,
            &[
                Complex::new(s, 0.0_f32),
                Complex::new(0.0, -s),
                Complex::new(0.0, -s),
                Complex::new(s, 0.0),
            ],
        );
        assert!(q.is_unitary(1e-6));
        let skewed = q.map(|z| z * Complex::new(1.01, 0.0));
        assert!(!skewed.is_unitary(1e-3));
    }
}
