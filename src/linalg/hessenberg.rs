use num_traits::Zero;

use crate::dynmatrix::DynMatrix;
use crate::linalg::householder::{apply_left, apply_right, make_reflector};
use crate::linalg::LinalgError;
use crate::traits::{LinalgScalar, MatrixMut};

/// Reduce a square matrix to upper Hessenberg form via Householder similarity
/// transforms: `Q^H A Q = H`.
///
/// On return:
/// - `a` is overwritten with the upper Hessenberg matrix H
/// - `q` holds the orthogonal/unitary transform Q
///
/// The result satisfies `A = Q H Q^H`. Fails with
/// [`LinalgError::NotSquare`] or [`LinalgError::DimensionMismatch`] before
/// touching either matrix. Works on any [`MatrixMut`] storage;
/// for repeated reductions of [`DynMatrix`] inputs use
/// [`HessenbergSimilar`], which keeps its workspace.
///
/// ```
/// use numeris_linalg::DynMatrix;
/// use numeris_linalg::linalg::hessenberg;
///
/// let orig = DynMatrix::from_rows(3, 3, &[4.0_f64, 1.0, -2.0, 1.0, 2.0, 0.0, -2.0, 0.0, 3.0]);
/// let mut h = orig.clone();
/// let mut q = DynMatrix::zeros(3, 3, 0.0);
/// hessenberg(&mut h, &mut q).unwrap();
/// assert!(h.is_hessenberg(1e-12));
/// assert!((&(&q * &h) * &q.transpose()).is_equal(&orig, 1e-10));
/// ```
pub fn hessenberg<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    q: &mut impl MatrixMut<T>,
) -> Result<(), LinalgError> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(LinalgError::NotSquare { rows: n, cols: a.ncols() });
    }
    if q.nrows() != n || q.ncols() != n {
        return Err(LinalgError::DimensionMismatch {
            op: "hessenberg",
            expected: (n, n),
            got: (q.nrows(), q.ncols()),
        });
    }

    for i in 0..n {
        for j in 0..n {
            *q.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
    }

    let mut u = Vec::with_capacity(n);
    for k in 0..n.saturating_sub(2) {
        u.clear();
        u.extend(((k + 1)..n).map(|i| *a.get(i, k)));
        let r = make_reflector(&mut u);

        *a.get_mut(k + 1, k) = u[0];
        for i in (k + 2)..n {
            *a.get_mut(i, k) = T::zero();
        }
        if r.is_identity() {
            continue;
        }
        let gamma = r.gamma;
        let v = |idx: usize| if idx == 0 { T::one() } else { u[idx] };

        // Left: A[k+1.., k+1..] -= gamma u (u^H A)
        for j in (k + 1)..n {
            let mut dot = T::zero();
            for (idx, i) in ((k + 1)..n).enumerate() {
                dot = dot + v(idx).conj() * *a.get(i, j);
            }
            let dot = dot.scale_real(gamma);
            for (idx, i) in ((k + 1)..n).enumerate() {
                *a.get_mut(i, j) = *a.get(i, j) - v(idx) * dot;
            }
        }

        // Right, on A and on the accumulated Q: X[.., k+1..] -= gamma (X u) u^H
        for i in 0..n {
            let mut dot_a = T::zero();
            let mut dot_q = T::zero();
            for (idx, j) in ((k + 1)..n).enumerate() {
                dot_a = dot_a + *a.get(i, j) * v(idx);
                dot_q = dot_q + *q.get(i, j) * v(idx);
            }
            let dot_a = dot_a.scale_real(gamma);
            let dot_q = dot_q.scale_real(gamma);
            for (idx, j) in ((k + 1)..n).enumerate() {
                let vj = v(idx).conj();
                *a.get_mut(i, j) = *a.get(i, j) - dot_a * vj;
                *q.get_mut(i, j) = *q.get(i, j) - dot_q * vj;
            }
        }
    }
    Ok(())
}

/// Hessenberg similarity decomposition `A = Q H Q^H` of a square matrix.
///
/// `H` is upper Hessenberg (zero below the first sub-diagonal) and `Q` is
/// unitary.
pub trait HessenbergDecomposition<T: LinalgScalar> {
    /// Reduce `a` in place. The reflectors end up below the first
    /// sub-diagonal of `a`. Returns `false`, leaving `a` untouched, when
    /// `a` is not square.
    fn decompose(&mut self, a: &mut DynMatrix<T>) -> bool;

    /// Always `true`: `decompose` overwrites its input.
    fn input_modified(&self) -> bool;

    /// The Hessenberg matrix. `output` is reused when given and must be
    /// `n x n`.
    fn get_h(&self, output: Option<DynMatrix<T>>) -> Result<DynMatrix<T>, LinalgError>;

    /// The unitary factor. `output` is reused when given and must be
    /// `n x n`.
    fn get_q(&self, output: Option<DynMatrix<T>>) -> Result<DynMatrix<T>, LinalgError>;

    /// Per-step reflector `gamma`, `n - 2` of them.
    fn gammas(&self) -> &[T::Real];
}

/// Packed result and reflector scalars shared by the single- and
/// multi-threaded engines.
#[derive(Debug, Clone)]
pub(crate) struct HessenbergState<T: LinalgScalar> {
    pub(crate) qh: DynMatrix<T>,
    pub(crate) gammas: Vec<T::Real>,
    pub(crate) taus: Vec<T>,
    pub(crate) u: Vec<T>,
    pub(crate) work: Vec<T>,
    pub(crate) decomposed: bool,
}

impl<T: LinalgScalar> HessenbergState<T> {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            qh: DynMatrix::zeros(n, n, T::zero()),
            gammas: Vec::with_capacity(n),
            taus: Vec::with_capacity(n),
            u: Vec::with_capacity(n),
            work: Vec::with_capacity(n),
            decomposed: false,
        }
    }

    pub(crate) fn n(&self) -> usize {
        self.qh.nrows()
    }

    pub(crate) fn begin(&mut self, n: usize) {
        if n * n > self.qh.data_len() {
            log::debug!("hessenberg: growing workspace to {}x{}", n, n);
        }
        let steps = n.saturating_sub(2);
        self.gammas.clear();
        self.gammas.resize(steps, <T::Real as Zero>::zero());
        self.taus.clear();
        self.taus.resize(steps, T::zero());
        self.decomposed = false;
    }

    /// Reflector for step `k`, from `A[k+1.., k]`, left in `self.u`.
    /// Also writes the packed column back into `a`.
    pub(crate) fn reflect_column(&mut self, a: &mut DynMatrix<T>, k: usize) -> T::Real {
        let n = a.nrows();
        self.u.clear();
        self.u.extend(((k + 1)..n).map(|i| a[(i, k)]));
        let r = make_reflector(&mut self.u);
        for (idx, &v) in self.u.iter().enumerate() {
            a[(k + 1 + idx, k)] = v;
        }
        self.gammas[k] = r.gamma;
        self.taus[k] = r.tau;
        r.gamma
    }

    pub(crate) fn finish(&mut self, a: &DynMatrix<T>) {
        let n = a.nrows();
        self.qh.set_from(n, n, true, a.as_slice());
        self.decomposed = true;
    }

    pub(crate) fn get_h(&self, output: Option<DynMatrix<T>>) -> Result<DynMatrix<T>, LinalgError> {
        if !self.decomposed {
            return Err(LinalgError::NotDecomposed);
        }
        let n = self.n();
        let mut h = match output {
            Some(m) => {
                m.check_shape("get_h", n, n)?;
                m
            }
            None => DynMatrix::zeros(n, n, T::zero()),
        };
        for i in 0..n {
            for j in 0..n {
                h[(i, j)] = if i > j + 1 { T::zero() } else { self.qh[(i, j)] };
            }
        }
        Ok(h)
    }

    pub(crate) fn get_q(&self, output: Option<DynMatrix<T>>) -> Result<DynMatrix<T>, LinalgError> {
        if !self.decomposed {
            return Err(LinalgError::NotDecomposed);
        }
        let n = self.n();
        let mut q = match output {
            Some(m) => {
                m.check_shape("get_q", n, n)?;
                m
            }
            None => DynMatrix::zeros(n, n, T::zero()),
        };
        q.set_identity(n, n);

        let mut u = Vec::with_capacity(n);
        let mut work = Vec::with_capacity(n);
        for k in (0..n.saturating_sub(2)).rev() {
            u.clear();
            u.push(T::one());
            u.extend(((k + 2)..n).map(|i| self.qh[(i, k)]));
            apply_left(&mut q, &u, self.gammas[k], k + 1, k + 1, &mut work);
        }
        Ok(q)
    }
}

/// Single-threaded Hessenberg similarity reduction.
///
/// For each `k`, the reflector built from `A[k+1.., k]` is applied from the
/// left to `A[k+1.., k+1..]` and from the right to `A[.., k+1..]`.
///
/// # Example
///
/// ```
/// use numeris_linalg::DynMatrix;
/// use numeris_linalg::linalg::{HessenbergDecomposition, HessenbergSimilar};
///
/// let a = DynMatrix::from_fn(5, 5, |i, j| ((i * 7 + j * 3) % 5) as f64 - 2.0);
/// let mut work = a.clone();
/// let mut alg = HessenbergSimilar::new(5);
/// assert!(alg.decompose(&mut work));
///
/// let h = alg.get_h(None).unwrap();
/// let q = alg.get_q(None).unwrap();
/// assert!(h.is_hessenberg(0.0));
/// assert!(q.is_unitary(1e-12));
/// assert!((&(&q * &h) * &q.transpose()).is_equal(&a, 1e-10));
/// ```
#[derive(Debug, Clone)]
pub struct HessenbergSimilar<T: LinalgScalar> {
    state: HessenbergState<T>,
}

impl<T: LinalgScalar> Default for HessenbergSimilar<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: LinalgScalar> HessenbergSimilar<T> {
    /// Engine with workspace reserved for `n x n` inputs.
    pub fn new(n: usize) -> Self {
        Self {
            state: HessenbergState::with_capacity(n),
        }
    }

    /// Packed result: `H` on and above the first sub-diagonal, reflectors
    /// below it.
    pub fn qh(&self) -> &DynMatrix<T> {
        &self.state.qh
    }

    /// Per-step `tau`; `-tau[k]` is the sub-diagonal entry `H[k+1, k]`.
    pub fn taus(&self) -> &[T] {
        &self.state.taus
    }
}

impl<T: LinalgScalar> HessenbergDecomposition<T> for HessenbergSimilar<T> {
    fn decompose(&mut self, a: &mut DynMatrix<T>) -> bool {
        self.state.decomposed = false;
        if !a.is_square() {
            return false;
        }
        let n = a.nrows();
        let st = &mut self.state;
        st.begin(n);

        for k in 0..n.saturating_sub(2) {
            let gamma = st.reflect_column(a, k);
            apply_left(a, &st.u, gamma, k + 1, k + 1, &mut st.work);
            apply_right(a, &st.u, gamma, 0, n, k + 1);
        }
        st.finish(a);
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
