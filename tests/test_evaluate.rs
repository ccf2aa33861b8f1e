mod common;
use common::{gaussian, max_abs_diff};
use firenc::evaluate::{column_correlations, predict};
use firenc::EncodingError;
use ndarray::{Array2, Axis};

#[test]
fn self_correlation_is_one_and_negation_minus_one() {
    let a = gaussian(50, 4, 1);
    let r = column_correlations(&a, &a).unwrap();
    let r_neg = column_correlations(&a, &a.mapv(|v| -v)).unwrap();
    assert_eq!(r.len(), 4);
    for (&p, &n) in r.iter().zip(r_neg.iter()) {
        approx::assert_abs_diff_eq!(p, 1.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(n, -1.0, epsilon = 1e-12);
    }
}

#[test]
fn constant_heldout_column_is_nan_sentinel() {
    let pred = gaussian(40, 3, 2);
    let mut actual = gaussian(40, 3, 3);
    actual.column_mut(1).fill(2.5);

    let r = column_correlations(&pred, &actual).unwrap();
    assert!(!r[0].is_nan());
    assert!(r[1].is_nan(), "zero-variance channel should be NaN, got {}", r[1]);
    assert!(!r[2].is_nan());
}

#[test]
fn correlation_is_scale_and_offset_invariant() {
    let a = gaussian(30, 2, 4);
    let b = a.mapv(|v| 3.0 * v + 7.0);
    let r = column_correlations(&a, &b).unwrap();
    for &v in r.iter() {
        approx::assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn predict_matches_manual_product() {
    let x = gaussian(12, 6, 5);
    let beta = gaussian(6, 2, 6);
    let y_hat = predict(&x, &beta).unwrap();
    let manual = Array2::from_shape_fn((12, 2), |(t, v)| {
        x.index_axis(Axis(0), t).dot(&beta.column(v))
    });
    assert!(max_abs_diff(&y_hat, &manual) < 1e-12);
}

#[test]
fn mismatched_shapes_rejected() {
    let pred = gaussian(10, 3, 1);
    let actual = gaussian(10, 2, 2);
    assert!(matches!(
        column_correlations(&pred, &actual),
        Err(EncodingError::ShapeMismatch { expected: 2, got: 3, .. })
    ));
}
