//! Random matrices for tests and benchmarks.
//!
//! All generators take the RNG explicitly so results are reproducible with
//! a seeded [`rand::rngs::StdRng`].

use num_complex::Complex;
use rand::distributions::uniform::SampleUniform;
use rand::seq::index;
use rand::Rng;

use crate::dynmatrix::DynMatrix;
use crate::sparse::CscMatrix;
use crate::traits::FloatScalar;

/// Dense `nrows x ncols` matrix with entries uniform in `[min, max]`.
///
/// ```
/// use numeris_linalg::random;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let a = random::rectangle(3, 4, -1.0_f64, 1.0, &mut rng);
/// assert!(a.iter().all(|v| (-1.0..=1.0).contains(v)));
/// ```
pub fn rectangle<T, R>(nrows: usize, ncols: usize, min: T, max: T, rng: &mut R) -> DynMatrix<T>
where
    T: FloatScalar + SampleUniform,
    R: Rng,
{
    let data = (0..nrows * ncols)
        .map(|_| rng.gen_range(min..=max))
        .collect();
    DynMatrix::from_vec(nrows, ncols, data)
}

/// Dense complex matrix, real and imaginary parts uniform in `[min, max]`.
pub fn rectangle_complex<T, R>(
    nrows: usize,
    ncols: usize,
    min: T,
    max: T,
    rng: &mut R,
) -> DynMatrix<Complex<T>>
where
    T: FloatScalar + SampleUniform,
    R: Rng,
{
    let data = (0..nrows * ncols)
        .map(|_| Complex::new(rng.gen_range(min..=max), rng.gen_range(min..=max)))
        .collect();
    DynMatrix::from_vec(nrows, ncols, data)
}

/// Sparse matrix with `min(nz_total, nrows * ncols)` entries at distinct
/// uniformly chosen positions, values uniform in `[min, max]` and never
/// zero.
///
/// `min` and `max` must not both be zero.
pub fn sparse_uniform<T, R>(
    nrows: usize,
    ncols: usize,
    nz_total: usize,
    min: T,
    max: T,
    rng: &mut R,
) -> CscMatrix<T>
where
    T: FloatScalar + SampleUniform,
    R: Rng,
{
    assert!(
        min != T::zero() || max != T::zero(),
        "value range [0, 0] cannot produce non-zero entries"
    );
    let total = nrows * ncols;
    let nz = nz_total.min(total);

    // Column-major linear positions, so sorting them gives CSC order.
    let mut positions = index::sample(rng, total, nz).into_vec();
    positions.sort_unstable();

    let mut m = CscMatrix::new(nrows, ncols, nz);
    for &pos in &positions {
        let (row, col) = (pos % nrows, pos / nrows);
        let value = loop {
            let v = rng.gen_range(min..=max);
            if v != T::zero() {
                break v;
            }
        };
        m.nz_rows[m.nz_length] = row;
        m.nz_values[m.nz_length] = value;
        m.nz_length += 1;
        m.col_idx[col + 1] = m.nz_length;
    }
    for j in 1..=ncols {
        if m.col_idx[j] < m.col_idx[j - 1] {
            m.col_idx[j] = m.col_idx[j - 1];
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rectangle_shape_and_range() {
        let mut rng = StdRng::seed_from_u64(324);
        let a = random_f32(&mut rng);
        assert_eq!((a.nrows(), a.ncols()), (5, 3));
        assert!(a.iter().all(|&v| (2.0..=3.0).contains(&v)));
    }

    fn random_f32(rng: &mut StdRng) -> DynMatrix<f32> {
        rectangle(5, 3, 2.0_f32, 3.0, rng)
    }

    #[test]
    fn same_seed_same_matrix() {
        let a = rectangle_complex(4, 4, -1.0_f64, 1.0, &mut StdRng::seed_from_u64(7));
        let b = rectangle_complex(4, 4, -1.0_f64, 1.0, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn sparse_uniform_counts() {
        let mut rng = StdRng::seed_from_u64(324);
        let (rows, cols) = (6, 7);
        let a = sparse_uniform(rows, cols, 10, -1.0_f64, 1.0, &mut rng);

        assert_eq!((a.nrows(), a.ncols()), (rows, cols));
        assert_eq!(a.nnz(), 10);

        let mut count = 0;
        for row in 0..rows {
            for col in 0..cols {
                let v = a.get(row, col);
                if v == 0.0 {
                    continue;
                }
                assert!((-1.0..=1.0).contains(&v), "out of range: {v}");
                count += 1;
            }
        }
        assert_eq!(count, 10);
        assert!(a.is_row_order_valid());
    }

    #[test]
    fn sparse_uniform_caps_at_full() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = sparse_uniform(3, 2, 50, 1.0_f64, 2.0, &mut rng);
        assert!(a.is_full());
        assert!(a.is_row_order_valid());
    }
}
