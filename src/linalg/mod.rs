pub mod householder;
pub(crate) mod hessenberg;
#[cfg(feature = "rayon")]
pub(crate) mod hessenberg_mt;
pub(crate) mod qr;

pub use hessenberg::{hessenberg, HessenbergDecomposition, HessenbergSimilar};
#[cfg(feature = "rayon")]
pub use hessenberg_mt::HessenbergSimilarMt;
pub use householder::Reflector;
pub use qr::{HouseholderQr, HouseholderTranQr, QrDecomposition};

use thiserror::Error;

use crate::dynmatrix::DimensionMismatch;

/// Errors from linear algebra operations.
///
/// Returned by decomposition getters, `apply_q` style operations and the
/// sparse engine. Every check happens before any output is written.
///
/// ```
/// use numeris_linalg::DynMatrix;
/// use numeris_linalg::linalg::{HouseholderQr, LinalgError, QrDecomposition};
///
/// let qr = HouseholderQr::<f64>::new();
/// assert_eq!(qr.get_r(None, false).unwrap_err(), LinalgError::NotDecomposed);
///
/// let mut qr = HouseholderQr::new();
/// assert!(qr.decompose(&DynMatrix::eye(3, 0.0_f64)));
/// let mut b = DynMatrix::zeros(2, 2, 0.0);
/// assert!(matches!(
///     qr.apply_q(&mut b),
///     Err(LinalgError::DimensionMismatch { .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinalgError {
    /// An operand or output does not have the shape the operation needs.
    #[error("{op}: dimension mismatch, expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
    DimensionMismatch {
        op: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// The operation needs a square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    /// A getter was called before a successful `decompose`.
    #[error("decomposition has not been computed")]
    NotDecomposed,
}

impl From<DimensionMismatch> for LinalgError {
    fn from(e: DimensionMismatch) -> Self {
        LinalgError::DimensionMismatch {
            op: e.op,
            expected: e.expected,
            got: e.got,
        }
    }
}
