//! Classification quality metrics.
//!
//! [`ConfusionMatrix`] covers the binary case with the usual derived scores;
//! [`ClassificationReport`] runs one-vs-rest confusion matrices for any number
//! of classes. Score definitions are the standard ones: precision is
//! `tp / (tp + fp)`, recall (sensitivity) is `tp / (tp + fn)`, specificity is
//! `tn / (tn + fp)`, and F1 is their harmonic mean.

use std::fmt;

use anyhow::{ensure, Result};

use crate::tensor::{Buffer, Matrix};

/// Binary confusion matrix with derived scores.
///
/// The first distinct label encountered in the ground truth is treated as the
/// positive class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    positive: String,
    negative: String,
    true_positive: u64,
    false_negative: u64,
    false_positive: u64,
    true_negative: u64,
}

impl ConfusionMatrix {
    /// Builds the matrix from raw counts `[tp, fn, fp, tn]`.
    pub fn from_counts(positive: &str, negative: &str, counts: [u64; 4]) -> Self {
        let [true_positive, false_negative, false_positive, true_negative] = counts;
        ConfusionMatrix {
            positive: positive.to_string(),
            negative: negative.to_string(),
            true_positive,
            false_negative,
            false_positive,
            true_negative,
        }
    }

    /// Tallies predictions against ground truth.
    ///
    /// The ground truth must contain exactly two distinct labels and both
    /// slices must have the same length.
    pub fn from_labels<T: PartialEq + fmt::Display>(y_true: &[T], y_pred: &[T]) -> Result<Self> {
        ensure!(
            y_true.len() == y_pred.len(),
            "got {} ground-truth labels but {} predictions",
            y_true.len(),
            y_pred.len()
        );
        let classes = distinct(y_true);
        ensure!(
            classes.len() == 2,
            "binary confusion matrix needs exactly 2 classes, found {}",
            classes.len()
        );
        let positive = classes[0];
        let mut counts = [0u64; 4];
        for (actual, predicted) in y_true.iter().zip(y_pred) {
            let slot = match (actual == positive, predicted == positive) {
                (true, true) => 0,
                (true, false) => 1,
                (false, true) => 2,
                (false, false) => 3,
            };
            counts[slot] += 1;
        }
        Ok(ConfusionMatrix::from_counts(
            &positive.to_string(),
            &classes[1].to_string(),
            counts,
        ))
    }

    pub fn positive_label(&self) -> &str {
        &self.positive
    }

    pub fn negative_label(&self) -> &str {
        &self.negative
    }

    /// Total number of scored samples.
    pub fn size(&self) -> u64 {
        self.true_positive + self.false_negative + self.false_positive + self.true_negative
    }

    pub fn correct(&self) -> u64 {
        self.true_positive + self.true_negative
    }

    pub fn incorrect(&self) -> u64 {
        self.false_positive + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.size())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Recall over the positive class; also known as sensitivity.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Renders the counts as a 2x2 `u64` matrix: rows are actual classes
    /// (positive first), columns are predicted classes.
    pub fn as_matrix(&self) -> Result<Matrix> {
        let buffer = Buffer::from(vec![
            self.true_positive,
            self.false_negative,
            self.false_positive,
            self.true_negative,
        ]);
        Ok(Matrix::from_buffer(buffer, 2, 2)?)
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn distinct<T: PartialEq>(labels: &[T]) -> Vec<&T> {
    let mut seen: Vec<&T> = Vec::new();
    for label in labels {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "positive class: {}", self.positive)?;
        writeln!(
            f,
            "tp={} fn={} fp={} tn={}",
            self.true_positive, self.false_negative, self.false_positive, self.true_negative
        )?;
        writeln!(
            f,
            "accuracy={:.4} precision={:.4} recall={:.4} specificity={:.4} f1={:.4}",
            self.accuracy(),
            self.precision(),
            self.recall(),
            self.specificity(),
            self.f1()
        )
    }
}

/// One-vs-rest confusion matrices for multi-class problems.
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    entries: Vec<ConfusionMatrix>,
    size: u64,
    correct: u64,
}

impl ClassificationReport {
    /// Scores predictions against ground truth with at least two classes.
    pub fn from_labels<T: PartialEq + fmt::Display>(y_true: &[T], y_pred: &[T]) -> Result<Self> {
        ensure!(
            y_true.len() == y_pred.len(),
            "got {} ground-truth labels but {} predictions",
            y_true.len(),
            y_pred.len()
        );
        ensure!(!y_true.is_empty(), "cannot score an empty label set");
        let classes = distinct(y_true);
        ensure!(
            classes.len() >= 2,
            "classification report needs at least 2 classes, found {}",
            classes.len()
        );
        let mut entries = Vec::with_capacity(classes.len());
        for class in &classes {
            let mut counts = [0u64; 4];
            for (actual, predicted) in y_true.iter().zip(y_pred) {
                let slot = match (actual == *class, predicted == *class) {
                    (true, true) => 0,
                    (true, false) => 1,
                    (false, true) => 2,
                    (false, false) => 3,
                };
                counts[slot] += 1;
            }
            entries.push(ConfusionMatrix::from_counts(
                &class.to_string(),
                "rest",
                counts,
            ));
        }
        let correct = y_true
            .iter()
            .zip(y_pred)
            .filter(|(actual, predicted)| actual == predicted)
            .count() as u64;
        Ok(ClassificationReport {
            entries,
            size: y_true.len() as u64,
            correct,
        })
    }

    /// Per-class one-vs-rest matrices, in first-seen class order.
    pub fn per_class(&self) -> &[ConfusionMatrix] {
        &self.entries
    }

    /// Fraction of exactly-matching predictions.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.size)
    }

    /// Unweighted mean of the per-class F1 scores.
    pub fn macro_f1(&self) -> f64 {
        let total: f64 = self.entries.iter().map(ConfusionMatrix::f1).sum();
        total / self.entries.len() as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "samples={} accuracy={:.4} macro_f1={:.4}",
            self.size,
            self.accuracy(),
            self.macro_f1()
        )?;
        for entry in &self.entries {
            writeln!(
                f,
                "  {}: precision={:.4} recall={:.4} f1={:.4}",
                entry.positive_label(),
                entry.precision(),
                entry.recall(),
                entry.f1()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Scalar;

    #[test]
    fn binary_counts_and_scores() {
        let y_true = ["spam", "spam", "ham", "ham", "spam"];
        let y_pred = ["spam", "ham", "ham", "spam", "spam"];
        let cm = ConfusionMatrix::from_labels(&y_true, &y_pred).unwrap();
        assert_eq!(cm.positive_label(), "spam");
        assert_eq!(cm.correct(), 3);
        assert_eq!(cm.incorrect(), 2);
        assert_eq!(cm.accuracy(), 0.6);
        assert_eq!(cm.precision(), 2.0 / 3.0);
        assert_eq!(cm.recall(), 2.0 / 3.0);
        assert_eq!(cm.specificity(), 0.5);
    }

    #[test]
    fn more_than_two_classes_is_refused_for_binary() {
        let y = ["a", "b", "c"];
        assert!(ConfusionMatrix::from_labels(&y, &y).is_err());
    }

    #[test]
    fn as_matrix_lays_counts_out_row_major() {
        let cm = ConfusionMatrix::from_counts("p", "n", [5, 1, 2, 7]);
        let m = cm.as_matrix().unwrap();
        assert_eq!(m.item(0, 0).unwrap(), Scalar::U64(5));
        assert_eq!(m.item(0, 1).unwrap(), Scalar::U64(1));
        assert_eq!(m.item(1, 0).unwrap(), Scalar::U64(2));
        assert_eq!(m.item(1, 1).unwrap(), Scalar::U64(7));
    }

    #[test]
    fn zero_denominators_score_zero_not_nan() {
        let cm = ConfusionMatrix::from_counts("p", "n", [0, 0, 0, 4]);
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.recall(), 0.0);
        assert_eq!(cm.f1(), 0.0);
    }

    #[test]
    fn report_scores_each_class_against_the_rest() {
        let y_true = [0u8, 1, 2, 0, 1, 2];
        let y_pred = [0u8, 1, 1, 0, 1, 2];
        let report = ClassificationReport::from_labels(&y_true, &y_pred).unwrap();
        assert_eq!(report.per_class().len(), 3);
        assert!((report.accuracy() - 5.0 / 6.0).abs() < 1e-12);
        let class_two = &report.per_class()[2];
        assert_eq!(class_two.positive_label(), "2");
        assert_eq!(class_two.recall(), 0.5);
        assert_eq!(class_two.precision(), 1.0);
    }

    #[test]
    fn report_refuses_a_single_class() {
        let y = ["only", "only"];
        assert!(ClassificationReport::from_labels(&y, &y).is_err());
    }
}
