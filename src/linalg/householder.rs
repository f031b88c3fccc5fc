//! Householder reflector kernel.
//!
//! A reflector is `H = I - gamma * u * u^H` with `gamma` real and `u[0] = 1`.
//! For a vector `x`, [`make_reflector`] picks `u` and `gamma` such that
//! `H * x = -tau * e0`, where `tau` has the magnitude of `x` and the phase of
//! `x[0]`. Since `gamma` is real, `H` is Hermitian and unitary, so the same
//! reflector serves as `H`, `H^H` and `H^-1`.
//!
//! Every routine here reads the reflector vector `u` from a slice whose
//! first entry is ignored and taken to be one. That lets callers pass the
//! packed storage of a decomposition directly, where `u[0]` is overwritten
//! by `-tau`.
//!
//! The row-level primitives ([`accumulate_coefficients`], [`update_row`],
//! [`reflect_row_right`]) are what the dense engines are built from. The
//! threaded Hessenberg engine calls the exact same functions on chunks of
//! rows and columns, which keeps its floating point results equal to the
//! single-threaded ones.

use num_traits::{One, Zero};

use crate::dynmatrix::DynMatrix;
use crate::traits::LinalgScalar;

/// Scalars describing one Householder reflector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflector<T: LinalgScalar> {
    /// Real scale in `H = I - gamma * u * u^H`. Zero for the identity.
    pub gamma: T::Real,
    /// `H * x = -tau * e0`.
    pub tau: T,
}

impl<T: LinalgScalar> Reflector<T> {
    /// Whether the reflector is the identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.gamma == <T::Real as Zero>::zero()
    }
}

/// Compute the reflector that maps `x` onto a multiple of `e0`.
///
/// On return `x[0] = -tau` and `x[1..]` holds `u[1..]`.
///
/// The norm is computed on a max-scaled copy of `x` so squares of large
/// entries cannot overflow. Inputs of length one or less and all-zero
/// vectors yield the identity (`gamma = 0`, `tau = -x[0]`) and leave `x`
/// untouched.
///
/// ```
/// use numeris_linalg::linalg::householder::make_reflector;
///
/// let mut x = [3.0_f64, 4.0];
/// let r = make_reflector(&mut x);
/// assert!((r.tau - 5.0).abs() < 1e-12);
/// assert!((r.gamma - 1.6).abs() < 1e-12);
/// assert!((x[0] + 5.0).abs() < 1e-12);
/// assert!((x[1] - 0.5).abs() < 1e-12);
/// ```
pub fn make_reflector<T: LinalgScalar>(x: &mut [T]) -> Reflector<T> {
    let zero_r = <T::Real as Zero>::zero();
    let Some(&x0) = x.first() else {
        return Reflector {
            gamma: zero_r,
            tau: T::zero(),
        };
    };

    let mut max = zero_r;
    for &v in x.iter() {
        let m = v.modulus();
        if m > max {
            max = m;
        }
    }
    if x.len() <= 1 || max == zero_r {
        return Reflector {
            gamma: zero_r,
            tau: T::zero() - x0,
        };
    }

    let inv_max = <T::Real as One>::one() / max;
    let mut norm_sq = zero_r;
    for v in x.iter_mut() {
        *v = v.scale_real(inv_max);
        norm_sq = norm_sq + v.norm_sqr();
    }
    let norm = norm_sq.lsqrt();

    let head = x[0];
    let alpha = head.modulus();
    let tau = if alpha == zero_r {
        T::from_real(norm)
    } else {
        head.scale_real(norm / alpha)
    };

    // u0 = head + tau shares the phase of tau, so u0 / tau is real.
    let u0 = head + tau;
    let gamma = (u0 / tau).re();

    for v in x[1..].iter_mut() {
        *v = *v / u0;
    }
    let tau = tau.scale_real(max);
    x[0] = T::zero() - tau;

    Reflector { gamma, tau }
}

/// `u[k]` with the implicit leading one.
#[inline]
pub(crate) fn u_at<T: LinalgScalar>(u: &[T], k: usize) -> T {
    if k == 0 {
        T::one()
    } else {
        u[k]
    }
}

/// Coefficients of a left application, `out[j] = gamma * (u^H A)[j]`.
///
/// Rows `row0 .. row0 + u.len()` of `a` are read, over the columns
/// `col0 .. col0 + out.len()`. Each entry accumulates in row order, so the
/// result does not depend on how the columns are split between callers.
pub(crate) fn accumulate_coefficients<T: LinalgScalar>(
    a: &DynMatrix<T>,
    u: &[T],
    gamma: T::Real,
    row0: usize,
    col0: usize,
    out: &mut [T],
) {
    let col1 = col0 + out.len();
    out.copy_from_slice(&a.row_slice(row0)[col0..col1]);
    for (k, &uk) in u.iter().enumerate().skip(1) {
        let c = uk.conj();
        let row = &a.row_slice(row0 + k)[col0..col1];
        for (o, &x) in out.iter_mut().zip(row) {
            *o = *o + c * x;
        }
    }
    for o in out.iter_mut() {
        *o = o.scale_real(gamma);
    }
}

/// `row -= uk * coeffs`, the second half of a left application.
#[inline]
pub(crate) fn update_row<T: LinalgScalar>(row: &mut [T], coeffs: &[T], uk: T) {
    for (x, &c) in row.iter_mut().zip(coeffs) {
        *x = *x - uk * c;
    }
}

/// `row = row * (I - gamma u u^H)` for a single row.
#[inline]
pub(crate) fn reflect_row_right<T: LinalgScalar>(row: &mut [T], u: &[T], gamma: T::Real) {
    let mut c = row[0];
    for (k, &x) in row.iter().enumerate().skip(1) {
        c = c + x * u[k];
    }
    let c = c.scale_real(gamma);
    row[0] = row[0] - c;
    for (k, x) in row.iter_mut().enumerate().skip(1) {
        *x = *x - c * u[k].conj();
    }
}

/// `row = (I - gamma u u^H) row` with the row read as a column vector.
///
/// Used where the matrix being reflected is stored transposed.
#[inline]
pub(crate) fn reflect_row_left<T: LinalgScalar>(row: &mut [T], u: &[T], gamma: T::Real) {
    let mut c = row[0];
    for (k, &x) in row.iter().enumerate().skip(1) {
        c = c + u[k].conj() * x;
    }
    let c = c.scale_real(gamma);
    row[0] = row[0] - c;
    for (k, x) in row.iter_mut().enumerate().skip(1) {
        *x = *x - u[k] * c;
    }
}

/// `A[row0.., col0..] = (I - gamma u u^H) A[row0.., col0..]`.
///
/// `u.len()` rows starting at `row0` are touched. `work` is scratch space,
/// resized as needed.
pub fn apply_left<T: LinalgScalar>(
    a: &mut DynMatrix<T>,
    u: &[T],
    gamma: T::Real,
    row0: usize,
    col0: usize,
    work: &mut Vec<T>,
) {
    let ncols = a.ncols();
    if u.is_empty() || col0 >= ncols || gamma == <T::Real as Zero>::zero() {
        return;
    }
    debug_assert!(row0 + u.len() <= a.nrows());

    work.clear();
    work.resize(ncols - col0, T::zero());
    accumulate_coefficients(a, u, gamma, row0, col0, work);
    for k in 0..u.len() {
        update_row(&mut a.row_slice_mut(row0 + k)[col0..], work, u_at(u, k));
    }
}

/// `A[row0..row1, col0..] = A[row0..row1, col0..] (I - gamma u u^H)`.
///
/// Columns `col0 .. col0 + u.len()` are touched.
pub fn apply_right<T: LinalgScalar>(
    a: &mut DynMatrix<T>,
    u: &[T],
    gamma: T::Real,
    row0: usize,
    row1: usize,
    col0: usize,
) {
    if u.is_empty() || gamma == <T::Real as Zero>::zero() {
        return;
    }
    debug_assert!(col0 + u.len() <= a.ncols());

    let col1 = col0 + u.len();
    for i in row0..row1 {
        reflect_row_right(&mut a.row_slice_mut(i)[col0..col1], u, gamma);
    }
}

/// Explicit `I - gamma u u^H` (with `u[0]` taken as one).
///
/// Mostly useful for checking the in-place routines.
pub fn reflector_matrix<T: LinalgScalar>(u: &[T], gamma: T::Real) -> DynMatrix<T> {
    let n = u.len();
    DynMatrix::from_fn(n, n, |i, j| {
        let id = if i == j { T::one() } else { T::zero() };
        id - (u_at(u, i) * u_at(u, j).conj()).scale_real(gamma)
    })
}
