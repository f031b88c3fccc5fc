//! # numeris-linalg
//!
//! Dense and sparse linear algebra kernels over real and complex scalars:
//! Householder QR, Hessenberg similarity reduction (single and
//! multi-threaded) and compressed-column sparse arithmetic. Engines own
//! their workspace and can be reused across decompositions without
//! reallocating.
//!
//! ## Quick start
//!
//! ```
//! use numeris_linalg::DynMatrix;
//! use numeris_linalg::linalg::{HouseholderQr, QrDecomposition};
//!
//! let a = DynMatrix::from_rows(3, 3, &[12.0_f64, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0]);
//!
//! let mut qr = HouseholderQr::new();
//! assert!(qr.decompose(&a));
//! let q = qr.get_q(None, false).unwrap();
//! let r = qr.get_r(None, false).unwrap();
//! assert!(q.is_unitary(1e-12));
//! assert!(r.is_upper_triangular(0.0));
//! assert!((&q * &r).is_equal(&a, 1e-10));
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: Heap-allocated row-major `DynMatrix<T>` with runtime
//!   dimensions. Implements [`MatrixRef`] / [`MatrixMut`], arithmetic
//!   operators, the Frobenius norm, structural predicates (`is_unitary`,
//!   `is_hessenberg`, ...) and in-place reshaping that keeps the allocation.
//!
//! - [`linalg`]: Householder reflector kernels ([`linalg::householder`]),
//!   QR decomposition in two storage layouts ([`linalg::HouseholderQr`],
//!   [`linalg::HouseholderTranQr`]) and Hessenberg similarity reduction
//!   ([`linalg::HessenbergSimilar`], [`linalg::HessenbergSimilarMt`]).
//!
//! - [`sparse`]: Compressed sparse column [`CscMatrix`]: transpose,
//!   multiply, add, scale, identity and element reductions. Scratch memory
//!   comes from a caller-owned [`SparseWork`].
//!
//! - [`random`]: Seedable random dense and sparse matrices for tests and
//!   benchmarks.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num + Send + Sync`)
//!   - [`FloatScalar`]: real floats (`Scalar + Float`)
//!   - [`LinalgScalar`]: real floats and complex numbers, used by decompositions and norms
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Complex matrices
//!
//! Every decomposition works with `Complex<f32>` / `Complex<f64>`.
//! Reflectors use the conjugate transpose, `gamma` stays real and norms
//! return real values. Complex matrices can be viewed as interleaved
//! `[re, im, re, im, ...]` storage through
//! [`DynMatrix::interleaved`](dynmatrix::DynMatrix::interleaved).
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade:
//! workspace growth at `debug`, buffer growth at `trace`, and a `warn` on
//! target `numeris_perf` when the threaded engine is handed a matrix too
//! small to split.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `rayon` | yes     | Multi-threaded Hessenberg reduction ([`linalg::HessenbergSimilarMt`]) |

pub mod dynmatrix;
pub mod linalg;
pub mod random;
pub mod sparse;
pub mod traits;

pub use dynmatrix::DynMatrix;
pub use linalg::LinalgError;
pub use sparse::{CscMatrix, SparseWork};
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

pub use num_complex::Complex;
