//! Encoding-model configuration.
//!
//! [`EncodingConfig`] holds every tunable parameter of the fit / evaluate
//! pipeline.  The defaults match the workshop setting: four one-sample delays,
//! an 80 / 20 contiguous split and z-scored features and responses.
use crate::error::{EncodingError, Result};

/// Configuration for [`crate::fit_encoding_model`] and [`crate::fit_and_evaluate`].
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use firenc::EncodingConfig;
///
/// let cfg = EncodingConfig {
///     delays: vec![0, 1, 2, 3, 4, 5],
///     zscore: false,
///     ..EncodingConfig::default()
/// };
/// assert_eq!(cfg.n_delays(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingConfig {
    /// Delays (in samples) applied to the feature matrix, in column-block order.
    ///
    /// The same list must be used for training and test data; a model stores
    /// the list it was fit with.
    ///
    /// Default: `[1, 2, 3, 4]`.
    pub delays: Vec<usize>,

    /// Relative singular-value cutoff for the least-squares solve.
    ///
    /// `None` uses [`crate::ols::default_rcond`] (`ε · max(T, P)`).
    ///
    /// Default: `None`.
    pub rcond: Option<f64>,

    /// Fraction of rows (from the start) used for training in
    /// [`crate::fit_and_evaluate`].  Must lie in `(0, 1)`.
    ///
    /// Default: `0.8`.
    pub train_fraction: f64,

    /// Z-score features and responses per column with training statistics
    /// before delaying / fitting.
    ///
    /// Default: `true`.
    pub zscore: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            delays: vec![1, 2, 3, 4],
            rcond: None,
            train_fraction: 0.8,
            zscore: true,
        }
    }
}

impl EncodingConfig {
    pub fn n_delays(&self) -> usize {
        self.delays.len()
    }

    /// Check the configuration before any data is touched.
    pub fn validate(&self) -> Result<()> {
        if self.delays.is_empty() {
            return Err(EncodingError::EmptyDelays);
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(EncodingError::InvalidConfig(format!(
                "train_fraction must lie in (0, 1), got {}",
                self.train_fraction
            )));
        }
        if let Some(r) = self.rcond {
            if !(r.is_finite() && r >= 0.0) {
                return Err(EncodingError::InvalidConfig(format!(
                    "rcond must be finite and >= 0, got {r}"
                )));
            }
        }
        Ok(())
    }
}
