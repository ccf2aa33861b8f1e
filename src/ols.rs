//! Ordinary least squares over a delayed design matrix.
//!
//! Solves `min_β ‖Y − X·β‖²` for all response columns at once:
//!
//! ```text
//! X   [T, P]    delayed design matrix
//! Y   [T, V]    responses (channels / voxels)
//! β   [P, V]
//! ```
//!
//! Algorithm: thin SVD `X = U Σ Vᵀ` followed by `β = V Σ⁺ Uᵀ Y`, where singular
//! values `σ_i <= rcond · σ_max` are treated as zero.  This never forms `XᵀX`,
//! so conditioning is that of `X` rather than its square, and a rank-deficient
//! `X` yields the minimum-norm solution instead of an error.
//!
//! The SVD costs `O(T·P·min(T, P))`; for designs with many thousands of columns
//! a regularised or streaming solver is needed instead.
use nalgebra::{DMatrix, SVD};
use ndarray::{Array1, Array2};

use crate::error::{check_dim, EncodingError, Result};

/// Result of a least-squares solve with solver diagnostics.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// `[P, V]` weight matrix.
    pub beta: Array2<f64>,
    /// Number of singular values above the cutoff.
    pub rank: usize,
    /// Singular values of the design matrix, descending.
    pub singular_values: Array1<f64>,
    /// Absolute cutoff `rcond · σ_max` that was applied.
    pub cutoff: f64,
}

/// Conventional lstsq cutoff: `ε · max(T, P)`.
pub fn default_rcond(n_rows: usize, n_cols: usize) -> f64 {
    f64::EPSILON * n_rows.max(n_cols) as f64
}

/// Fit `β` with the default relative cutoff (see [`default_rcond`]).
pub fn fit_ols(x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
    let rcond = default_rcond(x.nrows(), x.ncols());
    Ok(solve_lstsq(x, y, rcond)?.beta)
}

/// Fit `β` with an explicit relative singular-value cutoff.
pub fn fit_ols_with(x: &Array2<f64>, y: &Array2<f64>, rcond: f64) -> Result<Array2<f64>> {
    Ok(solve_lstsq(x, y, rcond)?.beta)
}

/// Batched SVD least-squares solve returning `β` plus rank diagnostics.
///
/// # Errors
///
/// * [`EncodingError::ShapeMismatch`] if `x` and `y` have different row counts.
/// * [`EncodingError::Empty`] if either matrix has a zero dimension.
/// * [`EncodingError::NonFinite`] on NaN / ±inf input.
/// * [`EncodingError::InvalidConfig`] if `rcond` is negative or non-finite.
pub fn solve_lstsq(x: &Array2<f64>, y: &Array2<f64>, rcond: f64) -> Result<OlsFit> {
    let (n_t, n_p) = x.dim();
    check_dim("rows of Y vs rows of X", n_t, y.nrows())?;
    if n_t == 0 || n_p == 0 {
        return Err(EncodingError::Empty("design matrix"));
    }
    if y.ncols() == 0 {
        return Err(EncodingError::Empty("response matrix"));
    }
    if !x.iter().all(|v| v.is_finite()) {
        return Err(EncodingError::NonFinite("design matrix"));
    }
    if !y.iter().all(|v| v.is_finite()) {
        return Err(EncodingError::NonFinite("response matrix"));
    }
    if !(rcond.is_finite() && rcond >= 0.0) {
        return Err(EncodingError::InvalidConfig(format!(
            "rcond must be finite and >= 0, got {rcond}"
        )));
    }

    let svd = SVD::try_new(to_dmatrix(x), true, true, f64::EPSILON, 0)
        .ok_or_else(|| EncodingError::Solver("SVD did not converge".into()))?;

    let sigma_max = svd.singular_values.iter().fold(0.0_f64, |a, &b| a.max(b));
    let cutoff = rcond * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();
    let singular_values = Array1::from_iter(svd.singular_values.iter().copied());

    let beta = svd
        .solve(&to_dmatrix(y), cutoff)
        .map_err(|e| EncodingError::Solver(e.to_string()))?;

    if rank < n_p.min(n_t) {
        tracing::warn!(rank, n_cols = n_p, "design matrix is rank deficient, returning minimum-norm solution");
    }
    tracing::debug!(n_rows = n_t, n_cols = n_p, n_out = y.ncols(), rank, cutoff, "solved least squares");

    Ok(OlsFit {
        beta: from_dmatrix(&beta),
        rank,
        singular_values,
        cutoff,
    })
}

/// Copy an `ndarray` matrix into a column-major `nalgebra::DMatrix`.
fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}
