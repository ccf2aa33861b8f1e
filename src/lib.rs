//! # firenc — FIR-delay linear encoding models in Rust
//!
//! `firenc` predicts measured brain responses (EEG / ECoG channels, voxels)
//! from stimulus features with a linear model over time-delayed copies of the
//! features, the classic "encoding model" of the auditory / language
//! neuroscience literature.
//!
//! ## Pipeline overview
//!
//! ```text
//! X [T, F] stimulus features          Y [T, V] responses
//!   │                                   │
//!   ├─ split::train_test_split()  contiguous, no shuffling
//!   ├─ normalize (z-score)        per column, training statistics
//!   ├─ delay::make_delayed()      [T, F] → [T, F·D]  (zero-padded lags)
//!   ├─ ols::fit_ols()             SVD least squares → β [F·D, V]
//!   ├─ evaluate::predict()        Ŷ = X_test_delayed · β
//!   └─ evaluate::column_correlations()
//!        │
//!        └─→ r [V]   Pearson r per channel (NaN for constant channels)
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use firenc::{fit_and_evaluate, EncodingConfig};
//! use ndarray::Array2;
//!
//! let x: Array2<f64> = Array2::zeros((1000, 5));   // [T, F]
//! let y: Array2<f64> = Array2::zeros((1000, 64));  // [T, V]
//!
//! let cfg  = EncodingConfig::default();             // delays 1..=4, 80/20 split
//! let eval = fit_and_evaluate(&x, &y, &cfg).unwrap();
//!
//! println!("β shape {:?}", eval.model.beta.dim());  // (20, 64)
//! println!("mean r  {:.3}", firenc::evaluate::nanmean(&eval.correlations));
//! ```
//!
//! ## Running individual steps
//!
//! ```no_run
//! use firenc::delay::make_delayed;
//! use firenc::ols::fit_ols;
//! use firenc::evaluate::{predict, column_correlations};
//! use ndarray::Array2;
//!
//! let (x_train, y_train) = (Array2::<f64>::zeros((800, 5)), Array2::<f64>::zeros((800, 64)));
//! let (x_test,  y_test)  = (Array2::<f64>::zeros((200, 5)), Array2::<f64>::zeros((200, 64)));
//! let delays = [1, 2, 3, 4];
//!
//! let beta  = fit_ols(&make_delayed(&x_train, &delays).unwrap(), &y_train).unwrap();
//! let y_hat = predict(&make_delayed(&x_test, &delays).unwrap(), &beta).unwrap();
//! let r     = column_correlations(&y_hat, &y_test).unwrap();
//! ```

pub mod config;
pub mod delay;
pub mod error;
pub mod evaluate;
pub mod io;
pub mod normalize;
pub mod ols;
pub mod split;
pub mod stats;

use ndarray::{Array1, Array2};

// ── Crate-root re-exports ─────────────────────────────────────────────────

pub use config::EncodingConfig;
pub use delay::{delayed_width, make_delayed};
pub use error::{EncodingError, Result};
pub use evaluate::{column_correlations, nanmean, pearson, predict};
pub use io::{load_matrices, StWriter};
pub use normalize::{zscore_columns_inplace, ColumnStats};
pub use ols::{default_rcond, fit_ols, fit_ols_with, solve_lstsq, OlsFit};
pub use split::{train_test_split, Split};
pub use stats::{cohens_d, mean_sem, t_value};

/// A fitted encoding model: weights plus everything needed to reproduce the
/// training column layout on new data.
#[derive(Debug, Clone)]
pub struct EncodingModel {
    /// `[F·D, V]` weights, block `i` of rows belongs to `delays[i]`.
    pub beta: Array2<f64>,
    /// Delay list the model was fit with, in column-block order.
    pub delays: Vec<usize>,
    /// Training feature statistics (`None` when z-scoring is disabled).
    pub x_stats: Option<ColumnStats>,
    /// Training response statistics (`None` when z-scoring is disabled).
    pub y_stats: Option<ColumnStats>,
    /// Numerical rank of the training design matrix.
    pub rank: usize,
}

impl EncodingModel {
    /// Number of input features; `0` for a model without delays.
    pub fn n_features(&self) -> usize {
        self.beta.nrows().checked_div(self.delays.len()).unwrap_or(0)
    }

    pub fn n_outputs(&self) -> usize {
        self.beta.ncols()
    }

    /// Delay-embed `x` exactly as during training.
    fn design(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        error::check_dim("columns of X vs training features", self.n_features(), x.ncols())?;
        match &self.x_stats {
            Some(stats) => {
                let mut x = x.clone();
                stats.apply_inplace(&mut x)?;
                make_delayed(&x, &self.delays)
            }
            None => make_delayed(x, &self.delays),
        }
    }

    /// Predict responses for held-out features `x` (`[T, F]`).
    ///
    /// Predictions are in the response units seen during fitting, i.e.
    /// z-scored units when the model was fit with `zscore = true`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        predict(&self.design(x)?, &self.beta)
    }

    /// Predict responses for `x` in the units of the training responses.
    ///
    /// Undoes the response z-score (`ŷ · σ + μ`, or `ŷ + μ` for constant
    /// training channels).  Identical to [`EncodingModel::predict`] when the
    /// model was fit without z-scoring.
    pub fn predict_original_units(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mut y_hat = self.predict(x)?;
        if let Some(stats) = &self.y_stats {
            stats.invert_inplace(&mut y_hat)?;
        }
        Ok(y_hat)
    }

    /// Per-channel correlation between predictions for `x` and measured `y`.
    pub fn score(&self, x: &Array2<f64>, y: &Array2<f64>) -> Result<Array1<f64>> {
        error::check_dim("rows of Y vs rows of X", x.nrows(), y.nrows())?;
        let y_hat = self.predict(x)?;
        column_correlations(&y_hat, y)
    }
}

/// Fit an encoding model on training data.
///
/// Steps: optional per-column z-score of `x_train` and `y_train`, delay
/// embedding with `cfg.delays`, SVD least squares.
///
/// # Errors
///
/// * Invalid configuration (see [`EncodingConfig::validate`]).
/// * Row-count mismatch between `x_train` and `y_train`.
/// * Empty or non-finite inputs.
pub fn fit_encoding_model(
    x_train: &Array2<f64>,
    y_train: &Array2<f64>,
    cfg: &EncodingConfig,
) -> Result<EncodingModel> {
    cfg.validate()?;
    error::check_dim("rows of Y vs rows of X", x_train.nrows(), y_train.nrows())?;

    let mut x = x_train.clone();
    let mut y = y_train.clone();
    let (x_stats, y_stats) = if cfg.zscore {
        (Some(zscore_columns_inplace(&mut x)), Some(zscore_columns_inplace(&mut y)))
    } else {
        (None, None)
    };

    let xd = make_delayed(&x, &cfg.delays)?;
    let rcond = cfg.rcond.unwrap_or_else(|| default_rcond(xd.nrows(), xd.ncols()));
    let fit = solve_lstsq(&xd, &y, rcond)?;

    Ok(EncodingModel {
        beta: fit.beta,
        delays: cfg.delays.clone(),
        x_stats,
        y_stats,
        rank: fit.rank,
    })
}

/// Outcome of [`fit_and_evaluate`].
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub model: EncodingModel,
    /// `[T_test, V]` predictions on the held-out block.
    pub predictions: Array2<f64>,
    /// Length-`V` Pearson r per channel; `NaN` where undefined.
    pub correlations: Array1<f64>,
}

/// Split, fit, predict and score in one call.
///
/// The first `floor(T · cfg.train_fraction)` rows train the model; the
/// remaining rows are held out.  Delay embedding is applied to each block
/// separately, so the first test rows are zero-padded rather than borrowing
/// training samples.
pub fn fit_and_evaluate(x: &Array2<f64>, y: &Array2<f64>, cfg: &EncodingConfig) -> Result<Evaluation> {
    cfg.validate()?;
    let sp = train_test_split(x, y, cfg.train_fraction)?;
    let model = fit_encoding_model(&sp.x_train, &sp.y_train, cfg)?;
    let predictions = model.predict(&sp.x_test)?;
    let correlations = column_correlations(&predictions, &sp.y_test)?;

    tracing::debug!(
        n_train = sp.x_train.nrows(),
        n_test = sp.x_test.nrows(),
        rank = model.rank,
        mean_r = nanmean(&correlations),
        "evaluated encoding model"
    );
    Ok(Evaluation { model, predictions, correlations })
}
