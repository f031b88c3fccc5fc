use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use numeris_linalg::linalg::{
    HessenbergDecomposition, HessenbergSimilar, HouseholderQr, HouseholderTranQr, QrDecomposition,
};
use numeris_linalg::sparse::mult;
use numeris_linalg::{random, CscMatrix, DynMatrix, SparseWork};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dense(n: usize, seed: u64) -> DynMatrix<f64> {
    random::rectangle(n, n, -1.0, 1.0, &mut StdRng::seed_from_u64(seed))
}

fn to_nalgebra(a: &DynMatrix<f64>) -> nalgebra::DMatrix<f64> {
    nalgebra::DMatrix::from_row_slice(a.nrows(), a.ncols(), a.as_slice())
}

// ---------------------------------------------------------------------------
// QR
// ---------------------------------------------------------------------------

fn qr(c: &mut Criterion) {
    let mut g = c.benchmark_group("qr");

    for n in [20, 100, 300] {
        let a = dense(n, 1);

        g.bench_with_input(BenchmarkId::new("basic", n), &a, |b, a| {
            let mut alg = HouseholderQr::new();
            alg.set_expected_max_size(n, n);
            b.iter(|| alg.decompose(std::hint::black_box(a)))
        });

        g.bench_with_input(BenchmarkId::new("tran", n), &a, |b, a| {
            let mut alg = HouseholderTranQr::new();
            alg.set_expected_max_size(n, n);
            b.iter(|| alg.decompose(std::hint::black_box(a)))
        });

        let na = to_nalgebra(&a);
        g.bench_with_input(BenchmarkId::new("nalgebra", n), &na, |b, a| {
            b.iter(|| std::hint::black_box(a).clone().qr())
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Hessenberg
// ---------------------------------------------------------------------------

fn hessenberg(c: &mut Criterion) {
    let mut g = c.benchmark_group("hessenberg");

    for n in [20, 100, 300] {
        let a = dense(n, 2);

        g.bench_with_input(BenchmarkId::new("single", n), &a, |b, a| {
            let mut alg = HessenbergSimilar::new(n);
            let mut work = a.clone();
            b.iter(|| {
                work.clone_from(a);
                alg.decompose(std::hint::black_box(&mut work))
            })
        });

        #[cfg(feature = "rayon")]
        g.bench_with_input(BenchmarkId::new("threaded", n), &a, |b, a| {
            let mut alg = numeris_linalg::linalg::HessenbergSimilarMt::new(n);
            let mut work = a.clone();
            b.iter(|| {
                work.clone_from(a);
                alg.decompose(std::hint::black_box(&mut work))
            })
        });

        let na = to_nalgebra(&a);
        g.bench_with_input(BenchmarkId::new("nalgebra", n), &na, |b, a| {
            b.iter(|| std::hint::black_box(a).clone().hessenberg())
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Sparse multiply
// ---------------------------------------------------------------------------

fn sparse_mult(c: &mut Criterion) {
    let mut g = c.benchmark_group("sparse_mult");

    for (n, nz) in [(100, 500), (1000, 5000)] {
        let mut rng = StdRng::seed_from_u64(3);
        let a = random::sparse_uniform(n, n, nz, -1.0_f64, 1.0, &mut rng);
        let m = random::sparse_uniform(n, n, nz, -1.0_f64, 1.0, &mut rng);

        g.bench_with_input(BenchmarkId::new("csc", n), &(a, m), |b, (a, m)| {
            let mut out = CscMatrix::new(n, n, 0);
            let mut work = SparseWork::new();
            b.iter(|| mult(std::hint::black_box(a), std::hint::black_box(m), &mut out, &mut work))
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------

criterion_group!(benches, qr, hessenberg, sparse_mult);
criterion_main!(benches);
