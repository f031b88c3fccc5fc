use num_traits::Zero;

use crate::traits::LinalgScalar;

use super::DynMatrix;

impl<T: LinalgScalar> DynMatrix<T> {
    /// Frobenius norm (square root of sum of squared moduli).
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T::Real {
        let mut sum = <T::Real as Zero>::zero();
        for &x in self.as_slice() {
            sum = sum + x.norm_sqr();
        }
        sum.lsqrt()
    }
}
