//! Prediction and per-channel evaluation.
//!
//! `predict`              — `Ŷ = X_delayed · β`
//! `column_correlations`  — Pearson r between each predicted and measured column
//!
//! Zero-variance policy: the Pearson correlation is undefined when either
//! sequence is constant (or shorter than 2 samples).  Such channels are reported
//! as `f64::NAN`, never as `0.0` and never as an error, so callers can tell
//! "no linear relationship" apart from "nothing to correlate".  Use
//! `f64::is_nan` to filter them before averaging.
use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{check_dim, Result};

/// `Ŷ = x · beta`.  `x` is `[T, P]`, `beta` is `[P, V]`, the result is `[T, V]`.
pub fn predict(x: &Array2<f64>, beta: &Array2<f64>) -> Result<Array2<f64>> {
    check_dim("columns of X vs rows of beta", beta.nrows(), x.ncols())?;
    Ok(x.dot(beta))
}

/// Whether `x` is constant, given its sum of squared deviations from the mean.
///
/// All-equal values are constant even when `sum / n` does not round back to
/// the fill (e.g. `0.1`), which leaves deviations around `1e-17`.  Otherwise a
/// spread at or below `(n · ε · max|x|)²` is treated as rounding noise.
pub(crate) fn is_flat(x: ArrayView1<f64>, sum_sq_dev: f64) -> bool {
    let Some(&first) = x.iter().next() else {
        return true;
    };
    if x.iter().all(|&v| v == first) {
        return true;
    }
    let max_abs = x.iter().fold(0.0_f64, |m, &v| m.max(v.abs()));
    let tol = x.len() as f64 * f64::EPSILON * max_abs;
    sum_sq_dev <= tol * tol
}

/// Pearson correlation of two equal-length sequences.
///
/// Returns `NaN` when either sequence is constant (see [`is_flat`]).
pub fn pearson(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
    check_dim("length of correlated sequences", a.len(), b.len())?;
    let n = a.len();
    if n < 2 {
        return Ok(f64::NAN);
    }
    let nf = n as f64;
    let ma = a.sum() / nf;
    let mb = b.sum() / nf;

    let (mut sab, mut saa, mut sbb) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b.iter()) {
        let da = x - ma;
        let db = y - mb;
        sab += da * db;
        saa += da * da;
        sbb += db * db;
    }
    if is_flat(a, saa) || is_flat(b, sbb) {
        return Ok(f64::NAN);
    }
    // Rounding can push |r| a hair above 1.
    Ok((sab / (saa.sqrt() * sbb.sqrt())).clamp(-1.0, 1.0))
}

/// Per-column Pearson correlation between `pred` and `actual` (both `[T, V]`).
///
/// Returns a length-`V` vector; constant columns give `NaN`.
pub fn column_correlations(pred: &Array2<f64>, actual: &Array2<f64>) -> Result<Array1<f64>> {
    check_dim("rows of prediction vs rows of response", actual.nrows(), pred.nrows())?;
    check_dim("columns of prediction vs columns of response", actual.ncols(), pred.ncols())?;

    let r: Array1<f64> = pred
        .columns()
        .into_iter()
        .zip(actual.columns())
        .map(|(p, a)| pearson(p, a))
        .collect::<Result<_>>()?;

    let n_undefined = r.iter().filter(|v| v.is_nan()).count();
    if n_undefined > 0 {
        tracing::warn!(n_undefined, n_channels = r.len(), "correlation undefined for zero-variance channels");
    }
    Ok(r)
}

/// Mean of the defined (non-NaN) entries of `r`, or `NaN` if none are defined.
pub fn nanmean(r: &Array1<f64>) -> f64 {
    let (sum, n) = r
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0_f64, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}
