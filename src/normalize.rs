//! Per-column z-score normalisation of feature and response matrices.
//!
//! `zscore_columns_inplace` — for each column j of a `[T, N]` matrix:
//!   μ_j = mean(data[:, j]),  σ_j = std(data[:, j]) (ddof=0)
//!   data[:, j] = (data[:, j] - μ_j) / σ_j
//!
//! Statistics are estimated on the training split and then re-applied to
//! held-out data with [`ColumnStats::apply_inplace`], so no test-set
//! information leaks into the fit.
use ndarray::{Array1, Array2, Axis};

use crate::error::{check_dim, Result};
use crate::evaluate::is_flat;

/// Column means and standard deviations (ddof = 0) of a training matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl ColumnStats {
    /// Estimate per-column statistics of `data` (`[T, N]`).
    pub fn fit(data: &Array2<f64>) -> Self {
        let n_cols = data.ncols();
        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_cols));
        let n = data.nrows();
        let mut std = if n == 0 {
            Array1::zeros(n_cols)
        } else {
            data.std_axis(Axis(0), 0.0)
        };
        for (s, col) in std.iter_mut().zip(data.columns()) {
            if is_flat(col, *s * *s * n as f64) {
                *s = 0.0;
            }
        }
        Self { mean, std }
    }

    /// Normalise `data` in place with these statistics.
    ///
    /// Columns whose training σ is zero are centred only.
    pub fn apply_inplace(&self, data: &mut Array2<f64>) -> Result<()> {
        check_dim("columns to normalise", self.mean.len(), data.ncols())?;
        self.scale_columns(data);
        Ok(())
    }

    /// Map z-scored values back to the original units in place.
    pub fn invert_inplace(&self, data: &mut Array2<f64>) -> Result<()> {
        check_dim("columns to denormalise", self.mean.len(), data.ncols())?;
        for (j, mut col) in data.columns_mut().into_iter().enumerate() {
            let (m, s) = (self.mean[j], self.std[j]);
            if s > 0.0 {
                col.mapv_inplace(|v| v * s + m);
            } else {
                col.mapv_inplace(|v| v + m);
            }
        }
        Ok(())
    }

    fn scale_columns(&self, data: &mut Array2<f64>) {
        for (j, mut col) in data.columns_mut().into_iter().enumerate() {
            let (m, s) = (self.mean[j], self.std[j]);
            if s > 0.0 {
                col.mapv_inplace(|v| (v - m) / s);
            } else {
                col.mapv_inplace(|v| v - m);
            }
        }
    }
}

/// Per-column z-score of `data` in place.
/// Returns the statistics used, for re-use on held-out data.
pub fn zscore_columns_inplace(data: &mut Array2<f64>) -> ColumnStats {
    let stats = ColumnStats::fit(data);
    stats.scale_columns(data);
    stats
}
