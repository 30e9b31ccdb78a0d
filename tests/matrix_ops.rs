use rand::rngs::StdRng;
use rand::SeedableRng;

use lamina::{MathError, Matrix, Vector};

fn assert_close(actual: &Matrix, expected: &Matrix, tol: f32) {
    assert_eq!(actual.shape(), expected.shape());
    for i in 0..actual.rows() {
        for j in 0..actual.cols() {
            let a = actual[(i, j)];
            let e = expected[(i, j)];
            assert!(
                (a - e).abs() <= tol,
                "element ({}, {}): {} vs {}",
                i,
                j,
                a,
                e
            );
        }
    }
}

#[test]
fn constructors_and_accessors() {
    let z = Matrix::zeros(2, 3);
    assert_eq!(z.shape(), (2, 3));
    assert!(z.eq_scalar(0.0));

    let f = Matrix::filled(3, 3, 3.3);
    assert!(f.eq_scalar(3.3));

    let i = Matrix::identity(3);
    assert_eq!(i[(0, 0)], 1.0);
    assert_eq!(i[(1, 1)], 1.0);
    assert_eq!(i[(0, 1)], 0.0);

    assert!(Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
    assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
}

#[test]
fn checked_get_and_set() {
    let mut m = Matrix::zeros(2, 2);
    m.set(0, 0, 2.2).expect("in range");
    m.set(1, 1, 3.4).expect("in range");
    assert_eq!(m.get(0, 0), Ok(2.2));
    assert_eq!(m.get(1, 1), Ok(3.4));
    assert_eq!(m.get(2, 0), Err(MathError::OutOfBounds { index: 2, len: 2 }));
    assert_eq!(
        m.set(0, 9, 0.0),
        Err(MathError::OutOfBounds { index: 9, len: 2 })
    );
}

#[test]
fn row_and_col_extraction() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("consistent rows");
    assert_eq!(m.row(1).expect("in range").to_vec(), vec![4.0, 5.0, 6.0]);
    assert_eq!(m.col(2).expect("in range").to_vec(), vec![3.0, 6.0]);
    assert!(m.row(2).is_err());
    assert!(m.col(3).is_err());
}

#[test]
fn push_rows_into_empty_matrix() {
    let mut m = Matrix::new();
    m.push_row(&Vector::from_slice(&[1.0, 2.0, 3.0]))
        .expect("empty matrix adopts the length");
    m.push_row(&Vector::from_slice(&[4.0, 5.0, 6.0]))
        .expect("length matches");

    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.row(1).expect("in range").to_vec(), vec![4.0, 5.0, 6.0]);
    assert_eq!(m.col(2).expect("in range").to_vec(), vec![3.0, 6.0]);

    assert_eq!(
        m.push_row(&Vector::zeros(2)),
        Err(MathError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn push_row_grows_row_capacity_by_doubling() {
    let mut m = Matrix::new();
    assert_eq!(m.rows_capacity(), 0);
    m.push_row(&Vector::from_slice(&[1.0, 2.0])).expect("adopts");
    assert_eq!(m.rows_capacity(), 2);
    m.push_row(&Vector::from_slice(&[3.0, 4.0])).expect("fits");
    m.push_row(&Vector::from_slice(&[5.0, 6.0])).expect("grows");
    assert_eq!(m.rows_capacity(), 4);
    assert_eq!(m.shape(), (3, 2));
}

#[test]
fn push_and_pop_col_restride() {
    let mut m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");
    m.push_col(&Vector::from_slice(&[9.0, 10.0]))
        .expect("length matches rows");

    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.row(0).expect("in range").to_vec(), vec![1.0, 2.0, 9.0]);
    assert_eq!(m.row(1).expect("in range").to_vec(), vec![3.0, 4.0, 10.0]);

    let popped = m.pop_col().expect("non-empty");
    assert_eq!(popped.to_vec(), vec![9.0, 10.0]);
    assert_eq!(m.shape(), (2, 2));
    assert_eq!(m.row(1).expect("in range").to_vec(), vec![3.0, 4.0]);

    assert_eq!(
        m.push_col(&Vector::zeros(5)),
        Err(MathError::DimensionMismatch {
            expected: 2,
            found: 5
        })
    );
}

#[test]
fn push_col_into_empty_matrix() {
    let mut m = Matrix::new();
    m.push_col(&Vector::from_slice(&[1.0, 2.0, 3.0]))
        .expect("empty matrix adopts the length");
    assert_eq!(m.shape(), (3, 1));
    assert_eq!(m.col(0).expect("in range").to_vec(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn pop_row_returns_last_row() {
    let mut m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
        .expect("consistent rows");
    let popped = m.pop_row().expect("non-empty");
    assert_eq!(popped.to_vec(), vec![5.0, 6.0]);
    assert_eq!(m.shape(), (2, 2));

    let mut empty = Matrix::new();
    assert_eq!(empty.pop_row(), Err(MathError::EmptyCollection));
    assert_eq!(empty.pop_col(), Err(MathError::EmptyCollection));
}

#[test]
fn elementwise_arithmetic() {
    let base = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");

    let sum = base.add(&base).expect("same shape");
    assert!(sum
        .eq(&Matrix::from_rows(&[vec![2.0, 4.0], vec![6.0, 8.0]]).expect("consistent rows"))
        .expect("same element count"));

    let diff = base.sub(&base).expect("same shape");
    assert!(diff.eq_scalar(0.0));

    let quot = base.div(&base).expect("same shape");
    assert!(quot.eq_scalar(1.0));

    assert_eq!(
        base.add(&Matrix::zeros(3, 2)),
        Err(MathError::ShapeMismatch {
            expected: (2, 2),
            found: (3, 2)
        })
    );
}

#[test]
fn scalar_arithmetic_including_reversed_forms() {
    let base = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");

    assert_eq!(base.add_scalar(2.0).as_slice(), &[3.0, 4.0, 5.0, 6.0]);
    assert_eq!(base.sub_scalar(5.0).as_slice(), &[-4.0, -3.0, -2.0, -1.0]);
    assert_eq!(base.mul_scalar(3.0).as_slice(), &[3.0, 6.0, 9.0, 12.0]);
    assert_eq!(base.div_scalar(2.0).as_slice(), &[0.5, 1.0, 1.5, 2.0]);
    assert_eq!(base.scalar_sub(5.0).as_slice(), &[4.0, 3.0, 2.0, 1.0]);
    assert_eq!(base.scalar_div(6.0).as_slice(), &[6.0, 3.0, 2.0, 1.5]);
}

#[test]
fn matrix_product() {
    let base = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");
    let squared = base.mul(&base).expect("compatible dimensions");
    assert_eq!(squared.as_slice(), &[7.0, 10.0, 15.0, 22.0]);

    let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("consistent rows");
    let b = Matrix::from_rows(&[vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]])
        .expect("consistent rows");
    let product = a.mul(&b).expect("compatible dimensions");
    assert_eq!(product.shape(), (2, 2));
    assert_eq!(product.as_slice(), &[58.0, 64.0, 139.0, 154.0]);

    assert_eq!(
        a.mul(&a),
        Err(MathError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn identity_is_neutral_for_multiplication() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("consistent rows");
    let left = Matrix::identity(2).mul(&m).expect("compatible dimensions");
    assert!(left.eq(&m).expect("same element count"));
    let right = m.mul(&Matrix::identity(3)).expect("compatible dimensions");
    assert!(right.eq(&m).expect("same element count"));
}

#[test]
fn matrix_times_vector() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("consistent rows");
    let v = Vector::filled(3, 1.0);
    let product = m.mul_vector(&v).expect("compatible dimensions");
    assert_eq!(product.to_vec(), vec![6.0, 15.0]);

    assert_eq!(
        m.mul_vector(&Vector::zeros(2)),
        Err(MathError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn transpose_is_an_involution() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("consistent rows");
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert!(t.transpose().eq(&m).expect("same element count"));
}

#[test]
fn reshape_is_logical_only() {
    let mut m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("consistent rows");
    m.reshape(3, 2).expect("element count preserved");
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.row(0).expect("in range").to_vec(), vec![1.0, 2.0]);
    assert_eq!(m.row(2).expect("in range").to_vec(), vec![5.0, 6.0]);
    assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    assert_eq!(
        m.reshape(2, 4),
        Err(MathError::DimensionMismatch {
            expected: 6,
            found: 8
        })
    );
}

#[test]
fn inverse_round_trips() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");
    let inv = m.inverse().expect("invertible");

    let product = m.mul(&inv).expect("compatible dimensions");
    assert_close(&product, &Matrix::identity(2), 1e-5);

    let back = inv.inverse().expect("invertible");
    assert_close(&back, &m, 1e-4);
}

#[test]
fn inverse_uses_partial_pivoting() {
    // Zero pivot at (0, 0) forces a row swap.
    let m = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).expect("consistent rows");
    let inv = m.inverse().expect("invertible after row swap");
    assert_close(&inv, &m, 1e-6);
}

#[test]
fn singular_matrix_is_detected() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).expect("consistent rows");
    assert_eq!(m.inverse(), Err(MathError::Singular));
    assert_eq!(m.pow(-1), Err(MathError::Singular));
}

#[test]
fn inverse_requires_square() {
    let m = Matrix::zeros(2, 3);
    assert_eq!(
        m.inverse(),
        Err(MathError::ShapeMismatch {
            expected: (2, 2),
            found: (2, 3)
        })
    );
    assert!(m.pow(2).is_err());
}

#[test]
fn pow_zero_is_identity() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");
    let p = m.pow(0).expect("square");
    assert!(p.eq(&Matrix::identity(2)).expect("same element count"));
}

#[test]
fn pow_matches_repeated_multiplication() {
    // Fibonacci matrix: [[1,1],[1,0]]^5 = [[8,5],[5,3]].
    let fibo = Matrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 0.0]]).expect("consistent rows");
    let p5 = fibo.pow(5).expect("square");
    assert_eq!(p5.as_slice(), &[8.0, 5.0, 5.0, 3.0]);

    let p2 = fibo.pow(2).expect("square");
    let p3 = fibo.pow(3).expect("square");
    let composed = p2.mul(&p3).expect("compatible dimensions");
    assert!(composed.eq(&p5).expect("same element count"));
}

#[test]
fn negative_pow_inverts_first() {
    let m = Matrix::from_rows(&[vec![2.0, 0.0], vec![0.0, 4.0]]).expect("consistent rows");
    let p = m.pow(-1).expect("invertible");
    assert_close(
        &p,
        &Matrix::from_rows(&[vec![0.5, 0.0], vec![0.0, 0.25]]).expect("consistent rows"),
        1e-6,
    );

    let p2 = m.pow(-2).expect("invertible");
    assert_close(
        &p2,
        &Matrix::from_rows(&[vec![0.25, 0.0], vec![0.0, 0.0625]]).expect("consistent rows"),
        1e-6,
    );
}

#[test]
fn comparisons_over_flattened_elements() {
    let base = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");
    let same = base.clone();
    assert!(base.eq(&same).expect("same element count"));
    assert!(!base.ne(&same).expect("same element count"));

    let bigger = base.add_scalar(1.0);
    assert!(bigger.gt(&base).expect("same element count"));
    assert!(base.lt(&bigger).expect("same element count"));
    assert!(base.le(&same).expect("same element count"));
    assert!(base.ge(&same).expect("same element count"));

    // Comparisons run over the flat element stream, so a reshaped operand
    // with the same element count is accepted.
    let mut reshaped = same.clone();
    reshaped.reshape(4, 1).expect("element count preserved");
    assert!(base.eq(&reshaped).expect("same element count"));

    assert_eq!(
        base.eq(&Matrix::zeros(3, 3)),
        Err(MathError::DimensionMismatch {
            expected: 4,
            found: 9
        })
    );
}

#[test]
fn scalar_comparisons() {
    let m = Matrix::filled(3, 3, 2.0);
    assert!(m.eq_scalar(2.0));
    assert!(m.gt_scalar(1.0));
    assert!(m.lt_scalar(3.0));
    assert!(!m.ne_scalar(2.0));
    assert!(m.ge_scalar(2.0));
    assert!(m.le_scalar(2.0));
}

#[test]
fn randinit_is_seeded_and_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let m1 = Matrix::randinit(8, 8, &mut rng);
    assert!(m1.as_slice().iter().all(|&x| (0.0..1.0).contains(&x)));

    let mut rng = StdRng::seed_from_u64(7);
    let m2 = Matrix::randinit(8, 8, &mut rng);
    assert!(m1.eq(&m2).expect("same element count"));
}

#[test]
fn display_uses_bracketed_rows() {
    let m = Matrix::from_rows(&[vec![0.0, 1.0], vec![2.0, 3.5]]).expect("consistent rows");
    assert_eq!(format!("{}", m), "[\n  [0.00, 1.00],\n  [2.00, 3.50]\n]");
    assert_eq!(format!("{}", Matrix::new()), "[]");
}

#[test]
fn serde_round_trip() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("consistent rows");
    let json = serde_json::to_string(&m).expect("serializes");
    let back: Matrix = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(m, back);
}
