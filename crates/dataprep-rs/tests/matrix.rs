use dataprep_rs::tensor::{Buffer, DType, Matrix, Scalar, TensorError};

#[test]
fn build_fill_and_reduce_a_float_matrix() {
    let mut m = Matrix::zeros(DType::F64, 3, 4).expect("small allocation");
    for r in 0..3 {
        let row: Vec<f64> = (0..4).map(|c| (r * 4 + c) as f64).collect();
        m.set_row(r, &Buffer::from(row)).expect("row fits");
    }
    assert_eq!(m.item(2, 3).expect("in range"), Scalar::F64(11.0));

    // One total per column.
    let sums = m.row_sum();
    assert_eq!(sums.to_f64_vec(), vec![12.0, 15.0, 18.0, 21.0]);
    let means = m.row_mean();
    assert_eq!(means.to_f64_vec(), vec![4.0, 5.0, 6.0, 7.0]);

    // One total per row.
    let sums = m.col_sum();
    assert_eq!(sums.to_f64_vec(), vec![6.0, 22.0, 38.0]);
    let means = m.col_mean();
    assert_eq!(means.to_f64_vec(), vec![1.5, 5.5, 9.5]);
}

#[test]
fn integer_means_divide_by_the_true_count() {
    // 256 rows exceeds the u8 range; the divisor must stay 256, not wrap.
    let m = Matrix::from_buffer(Buffer::from(vec![1u8; 512]), 256, 2).expect("shape fits");
    // 256 ones wrap to zero under the documented accumulation policy.
    assert_eq!(m.row_sum().to_f64_vec(), vec![0.0, 0.0]);
    assert_eq!(m.row_mean().to_f64_vec(), vec![0.0, 0.0]);

    // 300 columns: the per-row total stays in range, the divisor does not.
    let mut data = vec![0u8; 300];
    for v in data.iter_mut().take(255) {
        *v = 1;
    }
    let wide = Matrix::from_buffer(Buffer::from(data), 1, 300).expect("shape fits");
    assert_eq!(wide.col_sum().to_f64_vec(), vec![255.0]);
    assert_eq!(wide.col_mean().to_f64_vec(), vec![0.0]);
}

#[test]
fn integer_means_truncate_toward_zero() {
    let m = Matrix::from_buffer(Buffer::from(vec![-7i32, 7, -7, 0]), 2, 2).expect("shape fits");
    assert_eq!(m.row_sum().to_f64_vec(), vec![-14.0, 7.0]);
    assert_eq!(m.row_mean().to_f64_vec(), vec![-7.0, 3.0]);
    assert_eq!(m.col_sum().to_f64_vec(), vec![0.0, -7.0]);
    assert_eq!(m.col_mean().to_f64_vec(), vec![0.0, -3.0]);
}

#[test]
fn transpose_swaps_rows_and_columns() {
    let m = Matrix::from_buffer(Buffer::from(vec![1u32, 2, 3, 4]), 2, 2).expect("shape fits");
    let t = m.transpose();
    assert_eq!(t.row(0).expect("in range"), Buffer::from(vec![1u32, 3]));
    assert_eq!(t.row(1).expect("in range"), Buffer::from(vec![2u32, 4]));
    // Transposing back recovers the original.
    assert_eq!(t.transpose(), m);
}

#[test]
fn transpose_of_a_rectangle_swaps_the_shape() {
    let m = Matrix::from_buffer(Buffer::from(vec![1i16, 2, 3, 4, 5, 6]), 2, 3).expect("shape fits");
    let t = m.transpose();
    assert_eq!(t.shape(), [3, 2]);
    assert_eq!(t.item(0, 1).expect("in range"), Scalar::I16(4));
    assert_eq!(t.item(2, 0).expect("in range"), Scalar::I16(3));
}

#[test]
fn dot_of_a_matrix_with_itself() {
    let m = Matrix::from_buffer(Buffer::from(vec![1u32, 2, 3, 4]), 2, 2).expect("shape fits");
    assert_eq!(m.dot(&m).expect("same shape"), Scalar::U64(30));
}

#[test]
fn dot_refuses_mismatched_shapes_and_kinds() {
    let a = Matrix::zeros(DType::U32, 2, 2).expect("alloc");
    let b = Matrix::zeros(DType::U32, 2, 3).expect("alloc");
    assert!(matches!(
        a.dot(&b).expect_err("shape mismatch"),
        TensorError::ShapeMismatch { .. }
    ));
    let c = Matrix::zeros(DType::F64, 2, 2).expect("alloc");
    assert!(matches!(
        a.dot(&c).expect_err("domain mismatch"),
        TensorError::DomainMismatch { .. }
    ));
}

#[test]
fn derived_matrices_are_independent_copies() {
    let m = Matrix::from_buffer(Buffer::from(vec![1u8, 2, 3, 4]), 2, 2).expect("shape fits");
    let mut t = m.transpose();
    t.set_cell(0, 0, Scalar::U8(99)).expect("in range");
    assert_eq!(m.item(0, 0).expect("in range"), Scalar::U8(1));

    let mut sliced = m.slice_rows(0, Some(1)).expect("valid range");
    sliced.set_cell(0, 1, Scalar::U8(77)).expect("in range");
    assert_eq!(m.item(0, 1).expect("in range"), Scalar::U8(2));
}

#[test]
fn slice_rows_covers_prefix_suffix_and_open_end() {
    let data: Vec<i64> = (0..10).collect();
    let m = Matrix::from_buffer(Buffer::from(data), 5, 2).expect("shape fits");
    let mid = m.slice_rows(1, Some(3)).expect("valid range");
    assert_eq!(mid.shape(), [2, 2]);
    assert_eq!(mid.item(0, 0).expect("in range"), Scalar::I64(2));
    let tail = m.slice_rows(3, None).expect("valid range");
    assert_eq!(tail.shape(), [2, 2]);
    assert_eq!(tail.item(1, 1).expect("in range"), Scalar::I64(9));
    assert!(m.slice_rows(4, Some(2)).is_err());
    assert!(m.slice_rows(0, Some(6)).is_err());
}

#[test]
fn filter_preserves_order_and_handles_both_extremes() {
    let data: Vec<u32> = (0..8).collect();
    let m = Matrix::from_buffer(Buffer::from(data), 4, 2).expect("shape fits");
    let odd_rows = m.filter(|_, i| i % 2 == 1).expect("predicate ran");
    assert_eq!(odd_rows.n_rows(), 2);
    assert_eq!(odd_rows.item(0, 0).expect("in range"), Scalar::U32(2));
    assert_eq!(odd_rows.item(1, 0).expect("in range"), Scalar::U32(6));

    let none = m.filter(|_, _| false).expect("predicate ran");
    assert_eq!(none.shape(), [0, 2]);
    let all = m.filter(|_, _| true).expect("predicate ran");
    assert_eq!(all, m);
}

#[test]
fn filter_can_inspect_row_contents() {
    let m = Matrix::from_buffer(Buffer::from(vec![1.0f64, 9.0, 2.0, 1.0]), 2, 2)
        .expect("shape fits");
    let big = m
        .filter(|row, _| row.to_f64_vec().iter().any(|&v| v > 5.0))
        .expect("predicate ran");
    assert_eq!(big.n_rows(), 1);
    assert_eq!(big.item(0, 1).expect("in range"), Scalar::F64(9.0));
}

#[test]
fn set_add_accumulates_in_place_and_checks_overflow() {
    let mut m = Matrix::zeros(DType::U8, 1, 1).expect("alloc");
    m.set_add(0, 0, Scalar::U8(200)).expect("fits");
    let err = m.set_add(0, 0, Scalar::U8(100)).expect_err("overflows u8");
    assert!(matches!(err, TensorError::DomainMismatch { .. }));
    // The failed add left the cell untouched.
    assert_eq!(m.item(0, 0).expect("in range"), Scalar::U8(200));
}

#[test]
fn cross_domain_writes_are_refused_not_coerced() {
    let mut m = Matrix::zeros(DType::I32, 2, 2).expect("alloc");
    assert!(m.set_cell(0, 0, Scalar::F32(1.5)).is_err());
    assert!(m.set_row(0, &Buffer::from(vec![1.0f64, 2.0])).is_err());
    assert_eq!(m.item(0, 0).expect("in range"), Scalar::I32(0));
}

#[test]
fn set_col_writes_a_strided_column() {
    let mut m = Matrix::zeros(DType::U16, 3, 2).expect("alloc");
    m.set_col(1, &Buffer::from(vec![7u16, 8, 9])).expect("fits");
    assert_eq!(m.col(1).expect("in range"), Buffer::from(vec![7u16, 8, 9]));
    assert_eq!(m.item(1, 0).expect("in range"), Scalar::U16(0));
    // Wrong length and wrong domain are both refused.
    assert!(m.set_col(0, &Buffer::from(vec![1u16])).is_err());
    assert!(m.set_col(0, &Buffer::from(vec![1.0f32, 2.0, 3.0])).is_err());
}

#[test]
fn from_buffer_rows_infers_the_row_count() {
    let m = Matrix::from_buffer_rows(Buffer::from(vec![1u16, 2, 3, 4, 5, 6]), 3)
        .expect("divisible length");
    assert_eq!(m.shape(), [2, 3]);
    assert!(Matrix::from_buffer_rows(Buffer::from(vec![1u16, 2, 3]), 2).is_err());
    assert!(Matrix::from_buffer_rows(Buffer::from(vec![1u16]), 0).is_err());
}

#[test]
fn row_and_col_iterators_are_restartable() {
    let m = Matrix::from_buffer(Buffer::from(vec![1u8, 2, 3, 4]), 2, 2).expect("shape fits");
    assert_eq!(m.rows().count(), 2);
    assert_eq!(m.rows().count(), 2);
    let cols: Vec<Buffer> = m.cols().collect();
    assert_eq!(cols[0], Buffer::from(vec![1u8, 3]));
    assert_eq!(cols[1], Buffer::from(vec![2u8, 4]));
}

#[test]
fn empty_matrix_reductions_are_well_defined() {
    let empty = Matrix::zeros(DType::F32, 0, 3).expect("alloc");
    assert_eq!(empty.row_sum().to_f64_vec(), vec![0.0, 0.0, 0.0]);
    assert_eq!(empty.row_mean().to_f64_vec(), vec![0.0, 0.0, 0.0]);
    assert_eq!(empty.col_sum().len(), 0);
}

#[test]
fn matrix_survives_a_serde_round_trip() {
    let m = Matrix::from_buffer(Buffer::from(vec![1u32, 2, 3, 4, 5, 6]), 2, 3)
        .expect("shape fits");
    let json = serde_json::to_string(&m).expect("serializable");
    let back: Matrix = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, m);
    assert_eq!(back.dtype(), DType::U32);
}
