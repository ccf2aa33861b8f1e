mod common;
use common::{gaussian, linear_response};
use firenc::delay::make_delayed;
use firenc::{fit_and_evaluate, fit_encoding_model, EncodingConfig, EncodingError};

#[test]
fn noiseless_model_predicts_heldout_perfectly() {
    let x = gaussian(500, 5, 21);
    let cfg = EncodingConfig { zscore: false, ..EncodingConfig::default() };
    let xd = make_delayed(&x, &cfg.delays).unwrap();
    let beta_true = gaussian(20, 8, 22);
    let y = linear_response(&xd, &beta_true, 0.0, 0);

    // Delays are re-applied per split, so the first test rows differ from the
    // full-series embedding: compare on correlations instead.
    let eval = fit_and_evaluate(&x, &y, &cfg).unwrap();
    assert_eq!(eval.model.beta.dim(), (20, 8));
    assert_eq!(eval.predictions.dim(), (100, 8));
    for &r in eval.correlations.iter() {
        assert!(r > 0.9, "r = {r}");
    }
}

#[test]
fn zscored_fit_keeps_layout_and_predicts() {
    let x = gaussian(400, 3, 31).mapv(|v| 10.0 * v + 5.0);
    let xd = make_delayed(&x, &[1, 2]).unwrap();
    let beta_true = gaussian(6, 4, 32);
    let y = linear_response(&xd, &beta_true, 0.1, 33);

    let cfg = EncodingConfig { delays: vec![1, 2], ..EncodingConfig::default() };
    let eval = fit_and_evaluate(&x, &y, &cfg).unwrap();
    assert_eq!(eval.model.delays, vec![1, 2]);
    assert_eq!(eval.model.n_features(), 3);
    assert!(eval.model.x_stats.is_some());
    assert!(firenc::nanmean(&eval.correlations) > 0.9);
}

#[test]
fn model_rejects_test_features_of_wrong_width() {
    let x = gaussian(100, 4, 41);
    let y = gaussian(100, 2, 42);
    let model = fit_encoding_model(&x, &y, &EncodingConfig::default()).unwrap();
    let wrong = gaussian(20, 3, 43);
    assert!(matches!(
        model.predict(&wrong),
        Err(EncodingError::ShapeMismatch { expected: 4, got: 3, .. })
    ));
}

#[test]
fn constant_response_channel_is_reported_not_raised() {
    let x = gaussian(200, 3, 51);
    let mut y = gaussian(200, 3, 52);
    y.column_mut(2).fill(1.0);
    let eval = fit_and_evaluate(&x, &y, &EncodingConfig::default()).unwrap();
    assert!(eval.correlations[2].is_nan());
    assert!(!eval.correlations[0].is_nan());
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let x = gaussian(150, 2, 61);
    let y = gaussian(150, 2, 62);
    let cfg = EncodingConfig::default();
    let a = fit_and_evaluate(&x, &y, &cfg).unwrap();
    let b = fit_and_evaluate(&x, &y, &cfg).unwrap();
    assert_eq!(a.model.beta, b.model.beta);
    assert_eq!(a.predictions, b.predictions);
}

#[test]
fn row_mismatch_fails_before_fitting() {
    let x = gaussian(100, 2, 71);
    let y = gaussian(90, 2, 72);
    assert!(matches!(
        fit_and_evaluate(&x, &y, &EncodingConfig::default()),
        Err(EncodingError::ShapeMismatch { .. })
    ));
}

#[test]
fn score_matches_fit_and_evaluate() {
    let x = gaussian(300, 3, 81);
    let xd = make_delayed(&x, &[1, 2, 3, 4]).unwrap();
    let y = linear_response(&xd, &gaussian(12, 2, 82), 0.5, 83);
    let cfg = EncodingConfig::default();

    let eval = fit_and_evaluate(&x, &y, &cfg).unwrap();
    let sp = firenc::train_test_split(&x, &y, cfg.train_fraction).unwrap();
    let r = eval.model.score(&sp.x_test, &sp.y_test).unwrap();
    assert_eq!(r, eval.correlations);
}

#[test]
fn inexact_constant_response_channel_is_nan() {
    let x = gaussian(200, 3, 91);
    for zscore in [true, false] {
        for &fill in &[0.1, 0.3, 1e-3] {
            let mut y = gaussian(200, 2, 92);
            y.column_mut(1).fill(fill);
            let cfg = EncodingConfig { zscore, ..EncodingConfig::default() };
            let eval = fit_and_evaluate(&x, &y, &cfg).unwrap();
            assert!(!eval.correlations[0].is_nan());
            assert!(
                eval.correlations[1].is_nan(),
                "zscore={zscore} fill={fill}: r={:e}",
                eval.correlations[1]
            );
        }
    }
}

#[test]
fn original_units_prediction_matches_unscaled_fit() {
    // Delay 0 means no zero-padded rows, so the z-scored fit is exact and
    // mapping back must reproduce the noiseless responses, offset included.
    let x = gaussian(300, 2, 101).mapv(|v| 3.0 * v + 1.0);
    let xd = make_delayed(&x, &[0]).unwrap();
    let y = linear_response(&xd, &gaussian(2, 3, 102), 0.0, 0).mapv(|v| v + 50.0);
    let x_test = gaussian(40, 2, 103).mapv(|v| 3.0 * v + 1.0);

    let cfg = EncodingConfig { delays: vec![0], ..EncodingConfig::default() };
    let model = fit_encoding_model(&x, &y, &cfg).unwrap();
    let y_hat = model.predict_original_units(&x_test).unwrap();

    let x_test_d = make_delayed(&x_test, &[0]).unwrap();
    let y_true = linear_response(&x_test_d, &gaussian(2, 3, 102), 0.0, 0).mapv(|v| v + 50.0);
    let err = common::max_abs_diff(&y_hat, &y_true);
    assert!(err < 1e-8, "max error {err:.2e}");

    // Z-unit predictions differ from original units.
    let z = model.predict(&x_test).unwrap();
    assert!(common::max_abs_diff(&z, &y_hat) > 1.0);
}

#[test]
fn model_without_delays_errors_instead_of_panicking() {
    let model = firenc::EncodingModel {
        beta: ndarray::Array2::zeros((4, 1)),
        delays: vec![],
        x_stats: None,
        y_stats: None,
        rank: 0,
    };
    assert_eq!(model.n_features(), 0);
    assert!(model.predict(&gaussian(10, 2, 111)).is_err());
    assert!(model.predict(&ndarray::Array2::zeros((10, 0))).is_err());
}
