use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

use num_complex::Complex;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, complex numbers and all integer types. `Send + Sync`
/// lets the threaded engines share matrices across a rayon pool.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num + Send + Sync {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num + Send + Sync> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by operations that need ordering or `abs` on the element itself
/// (sparse element reductions, random generation).
/// Implies `LinalgScalar<Real = Self>` since real floats are their own real type.
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Trait for matrix elements that support the decompositions.
///
/// Covers both real floats (`f32`, `f64`) and complex numbers (`Complex<f32>`,
/// `Complex<f64>`). Every Householder routine in [`crate::linalg`] is written
/// once against this trait.
pub trait LinalgScalar: Scalar {
    /// The real component type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// Squared magnitude `|z|^2`, without the square root.
    fn norm_sqr(self) -> Self::Real;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Imaginary part (zero for reals).
    fn im(self) -> Self::Real;

    /// Square root.
    fn lsqrt(self) -> Self;

    /// Machine epsilon of the underlying real type.
    fn lepsilon() -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;

    /// Multiply by a real factor.
    #[inline]
    fn scale_real(self, r: Self::Real) -> Self {
        self * Self::from_real(r)
    }
}

/// Concrete impls for real floats, plain delegation.
macro_rules! impl_linalg_scalar_real {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn norm_sqr(self) -> $t { self * self }
                #[inline] fn conj(self) -> $t { self }
                #[inline] fn re(self) -> $t { self }
                #[inline] fn im(self) -> $t { 0.0 }
                #[inline] fn lsqrt(self) -> $t { Float::sqrt(self) }
                #[inline] fn lepsilon() -> $t { <$t as Float>::epsilon() }
                #[inline] fn from_real(r: $t) -> $t { r }
                #[inline] fn scale_real(self, r: $t) -> $t { self * r }
            }
        )*
    };
}

impl_linalg_scalar_real!(f32, f64);

impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;

    #[inline]
    fn modulus(self) -> T {
        self.norm()
    }

    #[inline]
    fn norm_sqr(self) -> T {
        Complex::norm_sqr(&self)
    }

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn re(self) -> T {
        self.re
    }

    #[inline]
    fn im(self) -> T {
        self.im
    }

    #[inline]
    fn lsqrt(self) -> Self {
        self.sqrt()
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }

    #[inline]
    fn scale_real(self, r: T) -> Self {
        Complex::new(self.re * r, self.im * r)
    }
}

/// Read-only access to a matrix-like type.
///
/// Lets the in-place free functions in [`crate::linalg`] run on any storage.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_helpers() {
        assert_eq!((-3.0_f64).modulus(), 3.0);
        assert_eq!((-3.0_f64).norm_sqr(), 9.0);
        assert_eq!(2.5_f32.conj(), 2.5);
        assert_eq!(2.5_f64.im(), 0.0);
        assert_eq!(2.0_f64.scale_real(4.0), 8.0);
    }

    #[test]
    fn complex_helpers() {
        let z = Complex::new(3.0_f64, -4.0);
        assert_eq!(z.modulus(), 5.0);
        assert_eq!(LinalgScalar::norm_sqr(z), 25.0);
        assert_eq!(LinalgScalar::conj(z), Complex::new(3.0, 4.0));
        assert_eq!(z.re(), 3.0);
        assert_eq!(z.im(), -4.0);
        assert_eq!(z.scale_real(2.0), Complex::new(6.0, -8.0));
        assert_eq!(Complex::<f64>::from_real(1.5), Complex::new(1.5, 0.0));
    }
}
