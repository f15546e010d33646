//! TF-IDF weighting over a count matrix.

use anyhow::{ensure, Result};

use crate::tensor::{DType, Matrix, Scalar};

/// Rescales term counts by inverse document frequency.
///
/// `fit` learns one weight per vocabulary column from a count matrix (rows are
/// documents); `transform` multiplies counts by those weights. The weight for
/// a column with total count `df` over `n` documents is `ln(n / df) + 1`, so a
/// term appearing in every document keeps weight 1 rather than vanishing.
#[derive(Debug, Clone, Default)]
pub struct TfIdfTransformer {
    idf: Option<Vec<f64>>,
}

impl TfIdfTransformer {
    pub fn new() -> Self {
        TfIdfTransformer::default()
    }

    /// Learns per-column weights from a fitted count matrix.
    pub fn fit(&mut self, counts: &Matrix) -> Result<&mut Self> {
        ensure!(
            counts.n_rows() > 0,
            "cannot fit inverse document frequencies on zero documents"
        );
        let n_samples = counts.n_rows() as f64;
        let totals = counts.row_sum().to_f64_vec();
        self.idf = Some(
            totals
                .iter()
                .map(|&df| (n_samples / df).ln() + 1.0)
                .collect(),
        );
        Ok(self)
    }

    /// Borrows the learned weights, if fitted.
    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    /// Rescales `counts` into a `F64` matrix of the same shape.
    pub fn transform(&self, counts: &Matrix) -> Result<Matrix> {
        let idf = self
            .idf
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("transform called before fit"))?;
        ensure!(
            idf.len() == counts.n_cols(),
            "count matrix has {} columns but {} weights were fitted",
            counts.n_cols(),
            idf.len()
        );
        let [n_rows, n_cols] = counts.shape();
        let mut out = Matrix::zeros(DType::F64, n_rows, n_cols)?;
        for row in 0..n_rows {
            for col in 0..n_cols {
                let weighted = counts.item(row, col)?.to_f64() * idf[col];
                out.set_cell(row, col, Scalar::F64(weighted))?;
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, counts: &Matrix) -> Result<Matrix> {
        self.fit(counts)?.transform(counts)
    }
}
