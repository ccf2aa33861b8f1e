//! Delay embedding (FIR expansion).
//!
//! Replicates a `[T, F]` stimulus-feature matrix at several time lags and
//! concatenates the copies horizontally:
//!
//! ```text
//! X          [T, F]
//! delays     [d_0, d_1, …, d_{k-1}]
//! X_delayed  [T, F·k]     block i = X shifted down by d_i rows, top d_i rows = 0
//! ```
//!
//! A linear model on `X_delayed` is a finite impulse response filter from each
//! feature to each response channel, which absorbs the lag between stimulus and
//! measured (neural or hemodynamic) response.
//!
//! The block order is the delay-list order, so the same list must be used for
//! training and test matrices: the learned weights only mean something under
//! that exact column layout.
use ndarray::{s, Array2};

use crate::error::{EncodingError, Result};

/// Number of columns produced by [`make_delayed`] for `n_features` inputs.
pub fn delayed_width(n_features: usize, delays: &[usize]) -> usize {
    n_features * delays.len()
}

/// Build the delay-embedded design matrix `[T, F·k]` from `x` (`[T, F]`).
///
/// For every block `i` and row `t`:
/// * `t >= delays[i]`  →  `out[t, i·F + f] = x[t − delays[i], f]`
/// * `t <  delays[i]`  →  `out[t, i·F + f] = 0`
///
/// Delays may be unordered, repeated or non-contiguous.  A delay of `0`
/// copies `x` unchanged.  A delay `>= T` produces an all-zero block; the other
/// blocks are unaffected, so alignment is never disturbed.
///
/// Memory grows as `O(T·F·k)`.
///
/// # Errors
///
/// [`EncodingError::EmptyDelays`] if `delays` is empty.
pub fn make_delayed(x: &Array2<f64>, delays: &[usize]) -> Result<Array2<f64>> {
    if delays.is_empty() {
        return Err(EncodingError::EmptyDelays);
    }
    let (n_t, n_f) = x.dim();
    let mut out = Array2::<f64>::zeros((n_t, delayed_width(n_f, delays)));

    for (i, &d) in delays.iter().enumerate() {
        if d >= n_t {
            tracing::warn!(delay = d, n_times = n_t, "delay >= number of samples, block is all zero");
            continue;
        }
        let c0 = i * n_f;
        out.slice_mut(s![d.., c0..c0 + n_f])
            .assign(&x.slice(s![..n_t - d, ..]));
    }

    tracing::debug!(
        n_times = n_t,
        n_features = n_f,
        n_delays = delays.len(),
        "built delayed design matrix"
    );
    Ok(out)
}
