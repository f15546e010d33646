//! Row-wise train/test splitting.

use std::collections::HashSet;

use anyhow::{ensure, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::tensor::Matrix;

/// Splits a matrix's rows into a train set and a test set.
///
/// `ratio` is the `(train, test)` proportion; the train set receives
/// `floor(n_rows * train / (train + test))` rows. Without shuffling the train
/// set is a prefix slice; with shuffling, membership is drawn from a shuffled
/// index permutation but each half keeps its rows in original order, so the
/// split is random while row order stays deterministic given the assignment.
pub fn train_test_split<R: Rng>(
    matrix: &Matrix,
    ratio: (u32, u32),
    shuffle: bool,
    rng: &mut R,
) -> Result<(Matrix, Matrix)> {
    let (train, test) = ratio;
    ensure!(
        train > 0 && test > 0,
        "both ratio parts must be nonzero, got {train}:{test}"
    );
    let n_rows = matrix.n_rows();
    let pivot = (n_rows as u64 * train as u64 / (train as u64 + test as u64)) as usize;
    if !shuffle {
        let head = matrix.slice_rows(0, Some(pivot))?;
        let tail = matrix.slice_rows(pivot, None)?;
        return Ok((head, tail));
    }
    let mut order: Vec<usize> = (0..n_rows).collect();
    order.shuffle(rng);
    let train_rows: HashSet<usize> = order[..pivot].iter().copied().collect();
    let head = matrix.filter(|_, i| train_rows.contains(&i))?;
    let tail = matrix.filter(|_, i| !train_rows.contains(&i))?;
    Ok((head, tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{Buffer, Scalar};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sequential(n_rows: usize) -> Matrix {
        let data: Vec<u32> = (0..n_rows as u32 * 2).collect();
        Matrix::from_buffer(Buffer::from(data), n_rows, 2).unwrap()
    }

    #[test]
    fn unshuffled_split_takes_a_prefix() {
        let matrix = sequential(5);
        let mut rng = StdRng::seed_from_u64(0);
        let (train, test) = train_test_split(&matrix, (4, 1), false, &mut rng).unwrap();
        assert_eq!(train.n_rows(), 4);
        assert_eq!(test.n_rows(), 1);
        assert_eq!(train.item(0, 0).unwrap(), Scalar::U32(0));
        assert_eq!(test.item(0, 0).unwrap(), Scalar::U32(8));
    }

    #[test]
    fn shuffled_split_partitions_every_row_exactly_once() {
        let matrix = sequential(10);
        let mut rng = StdRng::seed_from_u64(42);
        let (train, test) = train_test_split(&matrix, (7, 3), true, &mut rng).unwrap();
        assert_eq!(train.n_rows(), 7);
        assert_eq!(test.n_rows(), 3);
        let mut firsts: Vec<f64> = train
            .rows()
            .chain(test.rows())
            .map(|row| row.to_f64_vec()[0])
            .collect();
        firsts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (0..10).map(|i| (i * 2) as f64).collect();
        assert_eq!(firsts, expected);
    }

    #[test]
    fn shuffled_halves_keep_original_row_order() {
        let matrix = sequential(8);
        let mut rng = StdRng::seed_from_u64(7);
        let (train, _) = train_test_split(&matrix, (1, 1), true, &mut rng).unwrap();
        let firsts: Vec<f64> = train.rows().map(|row| row.to_f64_vec()[0]).collect();
        let mut sorted = firsts.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(firsts, sorted);
    }

    #[test]
    fn zero_ratio_part_is_refused() {
        let matrix = sequential(4);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(train_test_split(&matrix, (1, 0), false, &mut rng).is_err());
    }
}
