//! Contiguous train / test split along time.
//!
//! Rows are never shuffled: neighbouring samples of a time series are
//! correlated, so a random split would leak test information into training.
//! The first `floor(T · train_fraction)` rows train, the remainder test.
use ndarray::{s, Array2};

use crate::error::{check_dim, EncodingError, Result};

/// Training and held-out blocks of a stimulus / response pair.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array2<f64>,
}

/// Row index at which the test block starts: `floor(T · train_fraction)`.
///
/// A product within a few ulps of an integer counts as that integer, so
/// `100 × 0.29` (`28.999999999999996` in f64) gives 29 rows, not 28.
pub fn split_index(n_times: usize, train_fraction: f64) -> usize {
    let k = n_times as f64 * train_fraction;
    let r = k.round();
    if (k - r).abs() <= 16.0 * f64::EPSILON * r.abs().max(1.0) {
        r as usize
    } else {
        k.floor() as usize
    }
}

/// Split `x` (`[T, F]`) and `y` (`[T, V]`) at `floor(T · train_fraction)`.
///
/// # Errors
///
/// * `ShapeMismatch` if row counts differ.
/// * `InvalidConfig` if `train_fraction` is outside `(0, 1)`.
/// * `Empty` if either side of the split would have no rows.
pub fn train_test_split(x: &Array2<f64>, y: &Array2<f64>, train_fraction: f64) -> Result<Split> {
    check_dim("rows of Y vs rows of X", x.nrows(), y.nrows())?;
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(EncodingError::InvalidConfig(format!(
            "train_fraction must lie in (0, 1), got {train_fraction}"
        )));
    }
    let n_t = x.nrows();
    let k = split_index(n_t, train_fraction);
    if k == 0 {
        return Err(EncodingError::Empty("training split"));
    }
    if k == n_t {
        return Err(EncodingError::Empty("test split"));
    }

    Ok(Split {
        x_train: x.slice(s![..k, ..]).to_owned(),
        y_train: y.slice(s![..k, ..]).to_owned(),
        x_test: x.slice(s![k.., ..]).to_owned(),
        y_test: y.slice(s![k.., ..]).to_owned(),
    })
}
