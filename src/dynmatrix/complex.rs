//! Real/imaginary views of complex matrices.
//!
//! `Complex<R>` is `#[repr(C)]`, so a `DynMatrix<Complex<R>>` buffer is the
//! interleaved `[re, im, re, im, ...]` layout: the real part of `(row, col)`
//! sits at scalar offset `2 * (row * ncols + col)` and the imaginary part
//! right after it.

use bytemuck::Pod;
use num_complex::Complex;

use crate::traits::FloatScalar;

use super::DynMatrix;

impl<R: FloatScalar + Pod> DynMatrix<Complex<R>> {
    /// Build a complex matrix from interleaved row-major `[re, im, ...]` data.
    ///
    /// ```
    /// use numeris_linalg::{Complex, DynMatrix};
    /// let m = DynMatrix::<Complex<f64>>::from_interleaved(1, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m[(0, 1)], Complex::new(3.0, 4.0));
    /// ```
    pub fn from_interleaved(nrows: usize, ncols: usize, data: &[R]) -> Self {
        assert_eq!(
            data.len(),
            2 * nrows * ncols,
            "interleaved length {} does not match {}x{} complex matrix",
            data.len(),
            nrows,
            ncols,
        );
        let values: &[Complex<R>] = bytemuck::cast_slice(data);
        Self::from_rows(nrows, ncols, values)
    }

    /// Interleaved scalar view of the logical matrix.
    pub fn interleaved(&self) -> &[R] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Mutable interleaved scalar view of the logical matrix.
    pub fn interleaved_mut(&mut self) -> &mut [R] {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }

    /// Scalar offset of the real part of `(row, col)` in [`interleaved`](Self::interleaved).
    #[inline]
    pub fn interleaved_index(&self, row: usize, col: usize) -> usize {
        2 * self.index_of(row, col)
    }

    /// Real part of `(row, col)`.
    #[inline]
    pub fn real(&self, row: usize, col: usize) -> R {
        self[(row, col)].re
    }

    /// Imaginary part of `(row, col)`.
    #[inline]
    pub fn imag(&self, row: usize, col: usize) -> R {
        self[(row, col)].im
    }

    /// Overwrite the real part of `(row, col)`.
    #[inline]
    pub fn set_real(&mut self, row: usize, col: usize, value: R) {
        self[(row, col)].re = value;
    }

    /// Overwrite the imaginary part of `(row, col)`.
    #[inline]
    pub fn set_imag(&mut self, row: usize, col: usize, value: R) {
        self[(row, col)].im = value;
    }
}
