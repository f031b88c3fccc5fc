use numeris_linalg::sparse::{
    add, divide, element_max, element_max_abs, element_min, element_min_abs, identity,
    identity_rect, mult, scale, transpose,
};
use numeris_linalg::{random, CscMatrix, DynMatrix, LinalgError, SparseWork};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TOL: f64 = 1e-12;

fn random_sparse(rows: usize, cols: usize, nz: usize, seed: u64) -> CscMatrix<f64> {
    random::sparse_uniform(rows, cols, nz, -1.0, 1.0, &mut StdRng::seed_from_u64(seed))
}

fn assert_dense_near(a: &DynMatrix<f64>, b: &DynMatrix<f64>) {
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()));
    assert!(a.is_equal(b, TOL), "\n{}\nvs\n{}", a, b);
}

#[test]
fn transpose_twice_is_identity() {
    let a = random_sparse(6, 7, 10, 324);
    let mut work = SparseWork::new();

    let mut at = CscMatrix::new(7, 6, 0);
    transpose(&a, &mut at, &mut work).unwrap();
    assert!(at.is_row_order_valid());
    assert_dense_near(&at.to_dense(), &a.to_dense().transpose());

    let mut att = CscMatrix::new(6, 7, 0);
    transpose(&at, &mut att, &mut work).unwrap();
    assert_eq!(att, a);
}

#[test]
fn mult_matches_dense() {
    let a = random_sparse(6, 7, 10, 324);
    let b = random_sparse(7, 5, 12, 77);
    let mut c = CscMatrix::new(6, 5, 0);
    mult(&a, &b, &mut c, &mut SparseWork::new()).unwrap();

    assert!(c.is_row_order_valid());
    assert_dense_near(&c.to_dense(), &(&a.to_dense() * &b.to_dense()));
}

#[test]
fn mult_reuses_work_and_output() {
    let mut work = SparseWork::new();
    let mut c = CscMatrix::new(20, 20, 0);
    for seed in 0..5 {
        let a = random_sparse(20, 15, 40, seed);
        let b = random_sparse(15, 20, 40, seed + 100);
        mult(&a, &b, &mut c, &mut work).unwrap();
        assert!(c.is_row_order_valid());
        assert_dense_near(&c.to_dense(), &(&a.to_dense() * &b.to_dense()));
    }
}

#[test]
fn mult_by_identity() {
    let a = random_sparse(5, 4, 9, 5);
    let mut work = SparseWork::new();

    let mut left = CscMatrix::new(5, 4, 0);
    mult(&identity(5), &a, &mut left, &mut work).unwrap();
    assert_eq!(left, a);

    let mut right = CscMatrix::new(5, 4, 0);
    mult(&a, &identity(4), &mut right, &mut work).unwrap();
    assert_eq!(right, a);
}

#[test]
fn add_matches_dense() {
    let a = random_sparse(6, 7, 10, 1);
    let b = random_sparse(6, 7, 15, 2);
    let mut c = CscMatrix::new(6, 7, 0);
    add(2.0, &a, -0.5, &b, &mut c, &mut SparseWork::new()).unwrap();

    assert!(c.is_row_order_valid());
    let expected = &(&a.to_dense() * 2.0) + &(&b.to_dense() * -0.5);
    assert_dense_near(&c.to_dense(), &expected);
}

#[test]
fn scale_and_divide() {
    let a = random_sparse(4, 6, 11, 8);
    let mut b = CscMatrix::new(4, 6, 0);

    scale(3.0, &a, &mut b).unwrap();
    assert_eq!(b.col_idx(), a.col_idx());
    assert_dense_near(&b.to_dense(), &(&a.to_dense() * 3.0));

    divide(&a, 4.0, &mut b).unwrap();
    assert_dense_near(&b.to_dense(), &(&a.to_dense() / 4.0));
}

#[test]
fn identity_shapes() {
    let i = identity_rect::<f64>(4, 2);
    assert_eq!(i.nnz(), 2);
    assert!(i.is_row_order_valid());
    assert_dense_near(&i.to_dense(), &DynMatrix::eye_rect(4, 2));
    assert!(identity::<f64>(3).to_dense().is_identity(0.0));
}

#[test]
fn reductions_count_implicit_zeros() {
    let a = CscMatrix::from_triplets(2, 2, &[(0, 0, 2.0_f64), (1, 1, 5.0)]);
    assert_eq!(element_min(&a), 0.0);
    assert_eq!(element_max(&a), 5.0);
    assert_eq!(element_min_abs(&a), 0.0);
    assert_eq!(element_max_abs(&a), 5.0);

    let neg = CscMatrix::from_triplets(2, 2, &[(0, 0, -2.0_f64), (1, 0, -7.0)]);
    assert_eq!(element_min(&neg), -7.0);
    assert_eq!(element_max(&neg), 0.0);
    assert_eq!(element_max_abs(&neg), 7.0);
}

#[test]
fn reductions_on_full_matrix() {
    let a = CscMatrix::from_triplets(
        2,
        2,
        &[(0, 0, 2.0_f64), (1, 0, 3.0), (0, 1, -4.0), (1, 1, 6.0)],
    );
    assert!(a.is_full());
    assert_eq!(element_min(&a), -4.0);
    assert_eq!(element_max(&a), 6.0);
    assert_eq!(element_min_abs(&a), 2.0);
    assert_eq!(element_max_abs(&a), 6.0);

    let positive = CscMatrix::from_triplets(1, 2, &[(0, 0, 2.0_f64), (0, 1, 3.0)]);
    assert_eq!(element_min(&positive), 2.0);
}

#[test]
fn reductions_on_empty_matrix() {
    let a = CscMatrix::<f64>::new(3, 3, 4);
    assert_eq!(element_min(&a), 0.0);
    assert_eq!(element_max_abs(&a), 0.0);
}

#[test]
fn shape_errors_leave_output_untouched() {
    let a = random_sparse(3, 4, 5, 3);
    let b = random_sparse(3, 4, 5, 4);
    let mut work = SparseWork::new();

    let mut c = random_sparse(3, 3, 4, 5);
    let before = c.clone();
    let err = mult(&a, &b, &mut c, &mut work).unwrap_err();
    assert!(matches!(err, LinalgError::DimensionMismatch { op: "mult", .. }));
    assert_eq!(c, before);

    let err = add(1.0, &a, 1.0, &b, &mut c, &mut work).unwrap_err();
    assert_eq!(
        err,
        LinalgError::DimensionMismatch { op: "add", expected: (3, 4), got: (3, 3) }
    );
    assert_eq!(c, before);

    let mut t = CscMatrix::new(3, 4, 0);
    assert!(transpose(&a, &mut t, &mut work).is_err());
    assert!(scale(2.0, &a, &mut c).is_err());
    assert_eq!(c, before);
}

#[test]
fn grow_and_copy_structure() {
    let a = random_sparse(5, 5, 12, 12);

    let mut b = CscMatrix::<f64>::new(1, 1, 0);
    b.grow_max_length(3, false);
    assert!(b.capacity() >= 3);
    b.copy_structure(&a);
    assert_eq!((b.nrows(), b.ncols()), (5, 5));
    assert_eq!(b.col_idx(), a.col_idx());
    assert_eq!(b.nz_rows(), a.nz_rows());
    assert!(b.is_row_order_valid());

    let mut c = a.clone();
    c.grow_max_length(100, true);
    assert_eq!(c.capacity(), 100);
    assert_eq!(c, a);
}

#[test]
fn random_matrices_are_row_ordered() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let a = random::sparse_uniform(9, 4, 17, -5.0_f64, 5.0, &mut rng);
        assert!(a.is_row_order_valid());
        assert_eq!(a.nnz(), 17);
    }
}

#[test]
fn dense_round_trip_drops_small_entries() {
    let d = DynMatrix::from_rows(2, 3, &[1.0_f64, 1e-14, 0.0, 0.0, -2.0, 3.0]);
    let s = CscMatrix::from_dense(&d, 1e-12);
    assert_eq!(s.nnz(), 3);
    assert!(s.is_row_order_valid());
    assert_eq!(s.get(0, 1), 0.0);
    assert_eq!(s.get(1, 2), 3.0);
}
