//! Multi-threaded Hessenberg reduction.
//!
//! Each reduction step is a fork-join: the left update is split into
//! column chunks (coefficients) followed by row chunks (rank-one update),
//! and the right update into row chunks. A step only starts once every
//! chunk of the previous one has finished, when the parallel iterator
//! returns.
//!
//! Chunks call the same row-level kernels as [`HessenbergSimilar`], and
//! every output element is computed by exactly one chunk with the same
//! sequence of operations, so the result is identical to the
//! single-threaded one.
//!
//! [`HessenbergSimilar`]: crate::linalg::HessenbergSimilar

use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::dynmatrix::DynMatrix;
use crate::linalg::hessenberg::{HessenbergDecomposition, HessenbergState};
use crate::linalg::householder::{accumulate_coefficients, reflect_row_right, u_at, update_row};
use crate::linalg::LinalgError;
use crate::traits::LinalgScalar;

/// Default number of rows / columns handed to one task.
const DEFAULT_MIN_CHUNK: usize = 16;

/// Multi-threaded Hessenberg similarity reduction on a rayon pool.
///
/// Runs on the global rayon pool unless one is supplied with
/// [`with_pool`](Self::with_pool).
///
/// # Example
///
/// ```
/// use numeris_linalg::DynMatrix;
/// use numeris_linalg::linalg::{HessenbergDecomposition, HessenbergSimilar, HessenbergSimilarMt};
///
/// let a = DynMatrix::from_fn(40, 40, |i, j| ((i * 31 + j * 17) % 13) as f64 - 6.0);
///
/// let mut single = HessenbergSimilar::new(40);
/// let mut threaded = HessenbergSimilarMt::new(40).with_min_chunk(4);
/// let (mut a1, mut a2) = (a.clone(), a.clone());
/// assert!(single.decompose(&mut a1));
/// assert!(threaded.decompose(&mut a2));
/// assert_eq!(a1, a2);
/// ```
#[derive(Debug, Clone)]
pub struct HessenbergSimilarMt<T: LinalgScalar> {
    state: HessenbergState<T>,
    pool: Option<Arc<ThreadPool>>,
    min_chunk: usize,
}

impl<T: LinalgScalar> Default for HessenbergSimilarMt<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: LinalgScalar> HessenbergSimilarMt<T> {
    /// Engine with workspace reserved for `n x n` inputs.
    pub fn new(n: usize) -> Self {
        Self {
            state: HessenbergState::with_capacity(n),
            pool: None,
            min_chunk: DEFAULT_MIN_CHUNK,
        }
    }

    /// Run on `pool` instead of the global rayon pool.
    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Smallest number of rows or columns given to one task. Values below
    /// one are treated as one.
    pub fn with_min_chunk(mut self, min_chunk: usize) -> Self {
        self.min_chunk = min_chunk.max(1);
        self
    }

    /// Packed result: `H` on and above the first sub-diagonal, reflectors
    /// below it.
    pub fn qh(&self) -> &DynMatrix<T> {
        &self.state.qh
    }

    pub fn taus(&self) -> &[T] {
        &self.state.taus
    }

    fn reduce(state: &mut HessenbergState<T>, a: &mut DynMatrix<T>, chunk: usize) {
        let n = a.nrows();
        for k in 0..n.saturating_sub(2) {
            let gamma = state.reflect_column(a, k);
            if gamma == <T::Real as num_traits::Zero>::zero() {
                continue;
            }
            par_apply_left(a, &state.u, gamma, k + 1, k + 1, &mut state.work, chunk);
            par_apply_right(a, &state.u, gamma, k + 1, chunk);
        }
        state.finish(a);
    }
}

/// Parallel version of [`apply_left`](crate::linalg::householder::apply_left).
fn par_apply_left<T: LinalgScalar>(
    a: &mut DynMatrix<T>,
    u: &[T],
    gamma: T::Real,
    row0: usize,
    col0: usize,
    work: &mut Vec<T>,
    chunk: usize,
) {
    let ncols = a.ncols();
    if u.is_empty() || col0 >= ncols {
        return;
    }
    work.clear();
    work.resize(ncols - col0, T::zero());

    {
        let a: &DynMatrix<T> = a;
        work.par_chunks_mut(chunk)
            .enumerate()
            .for_each(|(c, out)| accumulate_coefficients(a, u, gamma, row0, col0 + c * chunk, out));
    }

    let coeffs: &[T] = work;
    let rows = &mut a.as_mut_slice()[row0 * ncols..(row0 + u.len()) * ncols];
    rows.par_chunks_mut(ncols)
        .with_min_len(chunk)
        .enumerate()
        .for_each(|(k, row)| update_row(&mut row[col0..], coeffs, u_at(u, k)));
}

/// Parallel version of [`apply_right`](crate::linalg::householder::apply_right)
/// over every row.
fn par_apply_right<T: LinalgScalar>(
    a: &mut DynMatrix<T>,
    u: &[T],
    gamma: T::Real,
    col0: usize,
    chunk: usize,
) {
    let ncols = a.ncols();
    let col1 = col0 + u.len();
    a.as_mut_slice()
        .par_chunks_mut(ncols)
        .with_min_len(chunk)
        .for_each(|row| reflect_row_right(&mut row[col0..col1], u, gamma));
}

impl<T: LinalgScalar> HessenbergDecomposition<T> for HessenbergSimilarMt<T> {
    fn decompose(&mut self, a: &mut DynMatrix<T>) -> bool {
        self.state.decomposed = false;
        if !a.is_square() {
            return false;
        }
        let n = a.nrows();
        if n < 2 * self.min_chunk {
            log::warn!(
                target: "numeris_perf",
                "threaded Hessenberg on a {}x{} matrix is below two chunks of {}; the single-threaded engine is likely faster",
                n,
                n,
                self.min_chunk
            );
        }
        self.state.begin(n);

        let chunk = self.min_chunk;
        let state = &mut self.state;
        match &self.pool {
            Some(pool) => pool.install(|| Self::reduce(state, a, chunk)),
            None => Self::reduce(state, a, chunk),
        }
        true
    }

    fn input_modified(&self) -> bool {
        true
    }

    fn get_h(&self, output: Option<DynMatrix<T>>) -> Result<DynMatrix<T>, LinalgError> {
        self.state.get_h(output)
    }

    fn get_q(&self, output: Option<DynMatrix<T>>) -> Result<DynMatrix<T>, LinalgError> {
        self.state.get_q(output)
    }

    fn gammas(&self) -> &[T::Real] {
        &self.state.gammas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::linalg::HessenbergSimilar;
    use crate::random;

    #[test]
    fn matches_single_threaded_exactly() {
        let mut rng = StdRng::seed_from_u64(0xbeef);
        let a = random::rectangle(37, 37, -1.0, 1.0, &mut rng);

        let (mut a1, mut a2) = (a.clone(), a.clone());
        let mut single = HessenbergSimilar::new(37);
        let mut threaded = HessenbergSimilarMt::new(37).with_min_chunk(3);
        assert!(single.decompose(&mut a1));
        assert!(threaded.decompose(&mut a2));

        assert_eq!(a1, a2);
        assert_eq!(single.gammas(), threaded.gammas());
        assert_eq!(single.get_q(None).unwrap(), threaded.get_q(None).unwrap());
    }

    #[test]
    fn custom_pool() {
        let pool = Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(3)
                .build()
                .unwrap(),
        );
        let mut rng = StdRng::seed_from_u64(3);
        let a = random::rectangle_complex(20, 20, -1.0_f64, 1.0, &mut rng);

        let mut work = a.clone();
        let mut alg = HessenbergSimilarMt::<Complex<f64>>::new(20)
            .with_pool(pool)
            .with_min_chunk(2);
        assert!(alg.decompose(&mut work));

        let h = alg.get_h(None).unwrap();
        let q = alg.get_q(None).unwrap();
        assert!(h.is_hessenberg(0.0));
        assert!(q.is_unitary(1e-10));
        assert!((&(&q * &h) * &q.conj_transpose()).is_equal(&a, 1e-10));
    }

    #[test]
    fn small_and_non_square_inputs() {
        let mut alg = HessenbergSimilarMt::new(4);
        let mut a = DynMatrix::fill(2, 3, 1.0_f64);
        assert!(!alg.decompose(&mut a));

        let mut a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert!(alg.decompose(&mut a));
        assert!(alg.get_q(None).unwrap().is_identity(0.0));
        assert!(alg.gammas().is_empty());

        let mut a = DynMatrix::fill(4, 2, 1.0_f64);
        assert!(!alg.decompose(&mut a));
        assert_eq!(alg.get_q(None).unwrap_err(), LinalgError::NotDecomposed);
    }
}
