//! One-hot encoding for categorical targets.

use std::collections::HashMap;
use std::hash::Hash;

use anyhow::{ensure, Result};

use crate::tensor::{DType, Matrix, Scalar};

/// Maps arbitrary hashable categories onto one-hot rows.
///
/// `fit` assigns each unseen category the next dense column index; `transform`
/// emits a `u8` matrix with a single 1 per row. Categories never seen during
/// fit produce an all-zero row rather than an error, so a transform over held
/// out data cannot fail halfway through.
#[derive(Debug, Clone)]
pub struct CategoricalEncoder<T> {
    vocabulary: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> CategoricalEncoder<T> {
    pub fn new() -> Self {
        CategoricalEncoder {
            vocabulary: HashMap::new(),
        }
    }

    /// Learns (or extends) the category set from `targets`.
    pub fn fit(&mut self, targets: &[T]) -> &mut Self {
        for target in targets {
            if !self.vocabulary.contains_key(target) {
                self.vocabulary.insert(target.clone(), self.vocabulary.len());
            }
        }
        self
    }

    /// Number of learned categories.
    pub fn n_categories(&self) -> usize {
        self.vocabulary.len()
    }

    /// Returns the column index assigned to a category, if seen during fit.
    pub fn index_of(&self, target: &T) -> Option<usize> {
        self.vocabulary.get(target).copied()
    }

    /// Produces a `[targets.len(), n_categories]` one-hot `u8` matrix.
    pub fn transform(&self, targets: &[T]) -> Result<Matrix> {
        ensure!(
            !self.vocabulary.is_empty(),
            "transform called before fit learned any categories"
        );
        let mut out = Matrix::zeros(DType::U8, targets.len(), self.vocabulary.len())?;
        for (row, target) in targets.iter().enumerate() {
            // The first-seen category lives in column 0; only genuinely
            // unseen targets are left as zero rows.
            if let Some(col) = self.index_of(target) {
                out.set_cell(row, col, Scalar::U8(1))?;
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, targets: &[T]) -> Result<Matrix> {
        self.fit(targets).transform(targets)
    }
}

impl<T: Eq + Hash + Clone> Default for CategoricalEncoder<T> {
    fn default() -> Self {
        CategoricalEncoder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_rows_carry_a_single_one() {
        let mut encoder = CategoricalEncoder::new();
        let out = encoder.fit_transform(&["cat", "dog", "cat"]).unwrap();
        assert_eq!(out.shape(), [3, 2]);
        assert_eq!(out.row(0).unwrap().to_f64_vec(), vec![1.0, 0.0]);
        assert_eq!(out.row(1).unwrap().to_f64_vec(), vec![0.0, 1.0]);
        assert_eq!(out.row(2).unwrap().to_f64_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn first_seen_category_is_encoded_not_dropped() {
        let mut encoder = CategoricalEncoder::new();
        encoder.fit(&[0u32, 1, 2]);
        let out = encoder.transform(&[0u32]).unwrap();
        assert_eq!(out.item(0, 0).unwrap(), Scalar::U8(1));
    }

    #[test]
    fn unseen_category_becomes_a_zero_row() {
        let mut encoder = CategoricalEncoder::new();
        encoder.fit(&["red", "green"]);
        let out = encoder.transform(&["blue"]).unwrap();
        assert_eq!(out.row(0).unwrap().to_f64_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn transform_before_fit_is_refused() {
        let encoder: CategoricalEncoder<&str> = CategoricalEncoder::new();
        assert!(encoder.transform(&["x"]).is_err());
    }
}
