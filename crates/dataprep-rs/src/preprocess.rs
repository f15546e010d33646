//! Feature standardization (z-scoring) over possibly-incomplete columns.

use anyhow::{ensure, Result};

/// Centers and scales one feature column to zero mean and unit deviation.
///
/// Missing observations (`None`) are skipped while fitting; at transform time
/// they map to `0.0`, the standardized mean. The deviation is the population
/// standard deviation over the observed values.
#[derive(Debug, Clone, Default)]
pub struct Standardizer {
    stats: Option<(f64, f64)>,
}

impl Standardizer {
    pub fn new() -> Self {
        Standardizer::default()
    }

    /// Learns the mean and deviation from the observed values.
    pub fn fit(&mut self, data: &[Option<f64>]) -> Result<&mut Self> {
        let observed: Vec<f64> = data.iter().flatten().copied().collect();
        ensure!(
            !observed.is_empty(),
            "cannot standardize a column with no observed values"
        );
        let count = observed.len() as f64;
        let mean = observed.iter().sum::<f64>() / count;
        let variance = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        self.stats = Some((mean, variance.sqrt()));
        Ok(self)
    }

    pub fn mean(&self) -> Option<f64> {
        self.stats.map(|(mean, _)| mean)
    }

    pub fn stddev(&self) -> Option<f64> {
        self.stats.map(|(_, stddev)| stddev)
    }

    /// Maps each value to its z-score under the fitted statistics.
    pub fn transform(&self, data: &[Option<f64>]) -> Result<Vec<f64>> {
        let (mean, stddev) = self
            .stats
            .ok_or_else(|| anyhow::anyhow!("transform called before fit"))?;
        ensure!(
            stddev > 0.0,
            "fitted column has zero variance, z-scores are undefined"
        );
        Ok(data
            .iter()
            .map(|value| match value {
                Some(v) => (v - mean) / stddev,
                None => 0.0,
            })
            .collect())
    }

    pub fn fit_transform(&mut self, data: &[Option<f64>]) -> Result<Vec<f64>> {
        self.fit(data)?.transform(data)
    }
}
