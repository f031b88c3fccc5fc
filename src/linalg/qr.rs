use num_traits::Zero;

use crate::dynmatrix::DynMatrix;
use crate::linalg::householder::{apply_left, make_reflector, reflect_row_left};
use crate::linalg::LinalgError;
use crate::traits::LinalgScalar;

/// Householder QR decomposition `A = Q R` of an `m x n` matrix.
///
/// `Q` is `m x m` unitary and `R` is `m x n` upper triangular. With
/// `compact`, the getters return the economy factors instead: `Q` as
/// `m x k` and `R` as `k x n`, where `k = min(m, n)`.
///
/// `Q` is the product `H_0 H_1 ... H_{k-1}` of the reflectors built while
/// decomposing; [`apply_q`](Self::apply_q) and
/// [`apply_tran_q`](Self::apply_tran_q) use them directly without forming
/// `Q`.
///
/// Engines are reusable: each `decompose` overwrites the previous result
/// and keeps the internal buffers.
pub trait QrDecomposition<T: LinalgScalar> {
    /// Decompose `a`. Any shape is accepted; returns `false` only if the
    /// decomposition cannot be computed.
    fn decompose(&mut self, a: &DynMatrix<T>) -> bool;

    /// Whether `decompose` writes into its input. The engines here work on
    /// an internal copy.
    fn input_modified(&self) -> bool;

    /// The `Q` factor. `output` is reused when given and must already have
    /// the right shape.
    fn get_q(&self, output: Option<DynMatrix<T>>, compact: bool)
        -> Result<DynMatrix<T>, LinalgError>;

    /// The upper triangular `R` factor. `output` is reused when given and
    /// must already have the right shape; it is fully overwritten.
    fn get_r(&self, output: Option<DynMatrix<T>>, compact: bool)
        -> Result<DynMatrix<T>, LinalgError>;

    /// `b = Q b`. `b` needs `m` rows.
    fn apply_q(&mut self, b: &mut DynMatrix<T>) -> Result<(), LinalgError>;

    /// `b = Q^H b`. `b` needs `m` rows.
    fn apply_tran_q(&mut self, b: &mut DynMatrix<T>) -> Result<(), LinalgError>;

    /// Per-reflector `gamma`.
    fn gammas(&self) -> &[T::Real];

    /// Per-reflector `tau`. `-tau[i]` is the diagonal entry `R[i, i]`.
    fn taus(&self) -> &[T];
}

/// Output matrix for a getter: the caller's buffer if its shape is right,
/// else a new one.
fn take_output<T: LinalgScalar>(
    output: Option<DynMatrix<T>>,
    op: &'static str,
    nrows: usize,
    ncols: usize,
) -> Result<DynMatrix<T>, LinalgError> {
    match output {
        Some(m) => {
            m.check_shape(op, nrows, ncols)?;
            Ok(m)
        }
        None => Ok(DynMatrix::zeros(nrows, ncols, T::zero())),
    }
}

/// Shared reflector bookkeeping of both QR variants.
#[derive(Debug, Clone)]
struct QrState<T: LinalgScalar> {
    nrows: usize,
    ncols: usize,
    gammas: Vec<T::Real>,
    taus: Vec<T>,
    u: Vec<T>,
    work: Vec<T>,
    decomposed: bool,
}

impl<T: LinalgScalar> QrState<T> {
    fn new() -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            gammas: Vec::new(),
            taus: Vec::new(),
            u: Vec::new(),
            work: Vec::new(),
            decomposed: false,
        }
    }

    fn reserve(&mut self, nrows: usize, ncols: usize) {
        let k = nrows.min(ncols);
        self.gammas.reserve(k.saturating_sub(self.gammas.len()));
        self.taus.reserve(k.saturating_sub(self.taus.len()));
        self.u.reserve(nrows.saturating_sub(self.u.len()));
        self.work.reserve(nrows.max(ncols).saturating_sub(self.work.len()));
    }

    fn begin(&mut self, nrows: usize, ncols: usize) {
        let k = nrows.min(ncols);
        if k > self.gammas.capacity() {
            log::debug!("qr: growing workspace to {}x{}", nrows, ncols);
        }
        self.nrows = nrows;
        self.ncols = ncols;
        self.gammas.clear();
        self.gammas.resize(k, <T::Real as Zero>::zero());
        self.taus.clear();
        self.taus.resize(k, T::zero());
        self.decomposed = false;
    }

    fn k(&self) -> usize {
        self.nrows.min(self.ncols)
    }

    fn ensure_decomposed(&self) -> Result<(), LinalgError> {
        if self.decomposed {
            Ok(())
        } else {
            Err(LinalgError::NotDecomposed)
        }
    }

    fn check_b(&self, op: &'static str, b: &DynMatrix<T>) -> Result<(), LinalgError> {
        self.ensure_decomposed()?;
        b.check_shape(op, self.nrows, b.ncols())?;
        Ok(())
    }

    /// `Q` from reflectors, built by replaying them in reverse onto the
    /// identity. `reflector(w, u)` fills `u` with reflector `w`.
    fn build_q(
        &self,
        output: Option<DynMatrix<T>>,
        compact: bool,
        mut reflector: impl FnMut(usize, &mut Vec<T>),
    ) -> Result<DynMatrix<T>, LinalgError> {
        self.ensure_decomposed()?;
        let m = self.nrows;
        let cols = if compact { self.k() } else { m };
        let mut q = take_output(output, "get_q", m, cols)?;
        q.set_identity(m, cols);

        let mut u = Vec::with_capacity(m);
        let mut work = Vec::with_capacity(cols);
        for w in (0..self.k()).rev() {
            reflector(w, &mut u);
            apply_left(&mut q, &u, self.gammas[w], w, w, &mut work);
        }
        Ok(q)
    }
}

// ── Basic variant ───────────────────────────────────────────────────

/// Householder QR on a row-major copy of the input.
///
/// Each step gathers the strided sub-column into a contiguous vector,
/// computes the reflector, writes it back below the diagonal and applies
/// it to the trailing columns.
///
/// # Example
///
/// ```
/// use numeris_linalg::DynMatrix;
/// use numeris_linalg::linalg::{HouseholderQr, QrDecomposition};
///
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let mut qr = HouseholderQr::new();
/// assert!(qr.decompose(&a));
///
/// let q = qr.get_q(None, true).unwrap();
/// let r = qr.get_r(None, true).unwrap();
/// assert!((&q * &r).is_equal(&a, 1e-12));
/// assert!(r.is_upper_triangular(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct HouseholderQr<T: LinalgScalar> {
    qr: DynMatrix<T>,
    state: QrState<T>,
}

impl<T: LinalgScalar> Default for HouseholderQr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LinalgScalar> HouseholderQr<T> {
    pub fn new() -> Self {
        Self {
            qr: DynMatrix::zeros(0, 0, T::zero()),
            state: QrState::new(),
        }
    }

    /// Reserve buffers for matrices up to `nrows x ncols`.
    pub fn set_expected_max_size(&mut self, nrows: usize, ncols: usize) {
        let (r, c) = (self.qr.nrows(), self.qr.ncols());
        self.qr.reshape(nrows, ncols);
        self.qr.reshape(r, c);
        self.state.reserve(nrows, ncols);
    }

    /// Packed factorization: `R` on and above the diagonal, reflector
    /// vectors below it.
    pub fn qr(&self) -> &DynMatrix<T> {
        &self.qr
    }

    /// Reflector `w` as a contiguous vector, `u[0]` set to one.
    fn gather(&self, w: usize, u: &mut Vec<T>) {
        u.clear();
        u.push(T::one());
        for i in (w + 1)..self.qr.nrows() {
            u.push(self.qr[(i, w)]);
        }
    }
}

impl<T: LinalgScalar> QrDecomposition<T> for HouseholderQr<T> {
    fn decompose(&mut self, a: &DynMatrix<T>) -> bool {
        let m = a.nrows();
        let n = a.ncols();
        self.state.begin(m, n);
        self.qr.set_from(m, n, true, a.as_slice());

        let st = &mut self.state;
        for w in 0..m.min(n) {
            st.u.clear();
            st.u.extend((w..m).map(|i| self.qr[(i, w)]));
            let r = make_reflector(&mut st.u);
            for (i, &v) in st.u.iter().enumerate() {
                self.qr[(w + i, w)] = v;
            }
            apply_left(&mut self.qr, &st.u, r.gamma, w, w + 1, &mut st.work);
            st.gammas[w] = r.gamma;
            st.taus[w] = r.tau;
        }
        st.decomposed = true;
        true
    }

    fn input_modified(&self) -> bool {
        false
    }

    fn get_q(
        &self,
        output: Option<DynMatrix<T>>,
        compact: bool,
    ) -> Result<DynMatrix<T>, LinalgError> {
        self.state
            .build_q(output, compact, |w, u| self.gather(w, u))
    }

    fn get_r(
        &self,
        output: Option<DynMatrix<T>>,
        compact: bool,
    ) -> Result<DynMatrix<T>, LinalgError> {
        self.state.ensure_decomposed()?;
        let (m, n) = (self.state.nrows, self.state.ncols);
        let rows = if compact { self.state.k() } else { m };
        let mut r = take_output(output, "get_r", rows, n)?;
        r.reshape_zeroed(rows, n);
        for i in 0..rows.min(n) {
            for j in i..n {
                r[(i, j)] = self.qr[(i, j)];
            }
        }
        Ok(r)
    }

    fn apply_q(&mut self, b: &mut DynMatrix<T>) -> Result<(), LinalgError> {
        self.state.check_b("apply_q", b)?;
        let mut u = std::mem::take(&mut self.state.u);
        for w in (0..self.state.k()).rev() {
            self.gather(w, &mut u);
            apply_left(b, &u, self.state.gammas[w], w, 0, &mut self.state.work);
        }
        self.state.u = u;
        Ok(())
    }

    fn apply_tran_q(&mut self, b: &mut DynMatrix<T>) -> Result<(), LinalgError> {
        self.state.check_b("apply_tran_q", b)?;
        let mut u = std::mem::take(&mut self.state.u);
        for w in 0..self.state.k() {
            self.gather(w, &mut u);
            apply_left(b, &u, self.state.gammas[w], w, 0, &mut self.state.work);
        }
        self.state.u = u;
        Ok(())
    }

    fn gammas(&self) -> &[T::Real] {
        &self.state.gammas
    }

    fn taus(&self) -> &[T] {
        &self.state.taus
    }
}

// ── Transposed variant ──────────────────────────────────────────────

/// Householder QR on the transpose of the input.
///
/// Row `j` of the internal `n x m` buffer is column `j` of `A`, so every
/// reflector and every trailing column it is applied to is a contiguous
/// slice. Faster than [`HouseholderQr`] for larger matrices.
///
/// # Example
///
/// ```
/// use numeris_linalg::{Complex, DynMatrix};
/// use numeris_linalg::linalg::{HouseholderTranQr, QrDecomposition};
///
/// let a = DynMatrix::from_fn(4, 3, |i, j| Complex::new((i + j) as f64, (i * j) as f64 - 1.0));
/// let mut qr = HouseholderTranQr::new();
/// assert!(qr.decompose(&a));
///
/// let q = qr.get_q(None, false).unwrap();
/// let r = qr.get_r(None, false).unwrap();
/// assert!(q.is_unitary(1e-12));
/// assert!((&q * &r).is_equal(&a, 1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct HouseholderTranQr<T: LinalgScalar> {
    qr_t: DynMatrix<T>,
    state: QrState<T>,
}

impl<T: LinalgScalar> Default for HouseholderTranQr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LinalgScalar> HouseholderTranQr<T> {
    pub fn new() -> Self {
        Self {
            qr_t: DynMatrix::zeros(0, 0, T::zero()),
            state: QrState::new(),
        }
    }

    /// Reserve buffers for matrices up to `nrows x ncols`.
    pub fn set_expected_max_size(&mut self, nrows: usize, ncols: usize) {
        let (r, c) = (self.qr_t.nrows(), self.qr_t.ncols());
        self.qr_t.reshape(ncols, nrows);
        self.qr_t.reshape(r, c);
        self.state.reserve(nrows, ncols);
    }

    /// Packed factorization stored transposed: row `j` holds column `j`
    /// of `R` above the diagonal and reflector `j` past it.
    pub fn qr_transposed(&self) -> &DynMatrix<T> {
        &self.qr_t
    }

    /// Reflector `w`, leading entry ignored by the kernel.
    fn reflector(&self, w: usize) -> &[T] {
        &self.qr_t.row_slice(w)[w..]
    }

    /// Apply reflector `w` to the columns `w+1..n` of `A`.
    fn update_trailing(&mut self, w: usize, gamma: T::Real) {
        for j in (w + 1)..self.qr_t.nrows() {
            let (u_row, row) = self.qr_t.two_rows_mut(w, j);
            reflect_row_left(&mut row[w..], &u_row[w..], gamma);
        }
    }
}

impl<T: LinalgScalar> QrDecomposition<T> for HouseholderTranQr<T> {
    fn decompose(&mut self, a: &DynMatrix<T>) -> bool {
        let m = a.nrows();
        let n = a.ncols();
        self.state.begin(m, n);
        a.transpose_into(&mut self.qr_t);

        for w in 0..m.min(n) {
            let r = make_reflector(&mut self.qr_t.row_slice_mut(w)[w..]);
            if !r.is_identity() {
                self.update_trailing(w, r.gamma);
            }
            self.state.gammas[w] = r.gamma;
            self.state.taus[w] = r.tau;
        }
        self.state.decomposed = true;
        true
    }

    fn input_modified(&self) -> bool {
        false
    }

    fn get_q(
        &self,
        output: Option<DynMatrix<T>>,
        compact: bool,
    ) -> Result<DynMatrix<T>, LinalgError> {
        self.state.build_q(output, compact, |w, u| {
            u.clear();
            u.extend_from_slice(self.reflector(w));
        })
    }

    fn get_r(
        &self,
        output: Option<DynMatrix<T>>,
        compact: bool,
    ) -> Result<DynMatrix<T>, LinalgError> {
        self.state.ensure_decomposed()?;
        let (m, n) = (self.state.nrows, self.state.ncols);
        let rows = if compact { self.state.k() } else { m };
        let mut r = take_output(output, "get_r", rows, n)?;
        r.reshape_zeroed(rows, n);
        for i in 0..rows.min(n) {
            for j in i..n {
                r[(i, j)] = self.qr_t[(j, i)];
            }
        }
        Ok(r)
    }

    fn apply_q(&mut self, b: &mut DynMatrix<T>) -> Result<(), LinalgError> {
        self.state.check_b("apply_q", b)?;
        for w in (0..self.state.k()).rev() {
            let u = &self.qr_t.row_slice(w)[w..];
            apply_left(b, u, self.state.gammas[w], w, 0, &mut self.state.work);
        }
        Ok(())
    }

    fn apply_tran_q(&mut self, b: &mut DynMatrix<T>) -> Result<(), LinalgError> {
        self.state.check_b("apply_tran_q", b)?;
        for w in 0..self.state.k() {
            let u = &self.qr_t.row_slice(w)[w..];
            apply_left(b, u, self.state.gammas[w], w, 0, &mut self.state.work);
        }
        Ok(())
    }

    fn gammas(&self) -> &[T::Real] {
        &self.state.gammas
    }

    fn taus(&self) -> &[T] {
        &self.state.taus
    }
}
