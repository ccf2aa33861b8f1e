//! Small descriptive / inferential helpers used next to the encoding model.
//!
//! `t_value`   — one-sample t statistic  (x̄ − μ₀) / (s / √n),  s with ddof=1
//! `cohens_d`  — standardised effect size (x̄ − μ₀) / s
//! `mean_sem`  — per-time-point mean ± standard error across trials
//!
//! A zero sample standard deviation makes the t statistic and effect size
//! undefined; both return `NaN`, following the same sentinel policy as
//! [`crate::evaluate::pearson`].
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{EncodingError, Result};
use crate::evaluate::is_flat;

fn mean_and_sd(sample: ArrayView1<f64>) -> Result<(f64, f64, usize)> {
    let n = sample.len();
    if n < 2 {
        return Err(EncodingError::Empty("sample needs at least 2 observations"));
    }
    let mean = sample.sum() / n as f64;
    let sd = sample.std(1.0);
    if is_flat(sample, sd * sd * (n - 1) as f64) {
        return Ok((mean, 0.0, n));
    }
    Ok((mean, sd, n))
}

/// One-sample t statistic of `sample` against the null mean `mu0`.
pub fn t_value(sample: ArrayView1<f64>, mu0: f64) -> Result<f64> {
    let (mean, sd, n) = mean_and_sd(sample)?;
    if sd == 0.0 {
        return Ok(f64::NAN);
    }
    Ok((mean - mu0) / (sd / (n as f64).sqrt()))
}

/// Cohen's d of `sample` against `mu0`.
pub fn cohens_d(sample: ArrayView1<f64>, mu0: f64) -> Result<f64> {
    let (mean, sd, _) = mean_and_sd(sample)?;
    if sd == 0.0 {
        return Ok(f64::NAN);
    }
    Ok((mean - mu0) / sd)
}

/// Mean and standard error of the mean over trials.
///
/// `trials` is `[n_trials, T]`; both returned vectors have length `T`.
pub fn mean_sem(trials: &Array2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
    let n = trials.nrows();
    if n < 2 {
        return Err(EncodingError::Empty("mean ± SEM needs at least 2 trials"));
    }
    let mean = trials
        .mean_axis(Axis(0))
        .ok_or(EncodingError::Empty("trials"))?;
    let sem = trials.std_axis(Axis(0), 1.0) / (n as f64).sqrt();
    Ok((mean, sem))
}
