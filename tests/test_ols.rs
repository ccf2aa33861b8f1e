mod common;
use common::{gaussian, linear_response, max_abs_diff};
use firenc::delay::make_delayed;
use firenc::ols::{fit_ols, solve_lstsq};
use firenc::EncodingError;
use ndarray::{concatenate, Array2, Axis};

#[test]
fn zero_noise_exact_recovery_t100_f5_four_delays() {
    let x = gaussian(100, 5, 42);
    let xd = make_delayed(&x, &[1, 2, 3, 4]).unwrap();
    let beta_true = gaussian(20, 3, 43);
    let y = linear_response(&xd, &beta_true, 0.0, 0);

    let beta = fit_ols(&xd, &y).unwrap();
    assert_eq!(beta.dim(), (20, 3));
    let err = max_abs_diff(&beta, &beta_true);
    assert!(err < 1e-10, "max |β − β_true| = {err:.2e}");
}

#[test]
fn normal_equations_hold() {
    let x = gaussian(200, 6, 3);
    let xd = make_delayed(&x, &[0, 1, 2]).unwrap();
    let y = gaussian(200, 4, 4);
    let beta = fit_ols(&xd, &y).unwrap();

    let lhs = xd.t().dot(&xd).dot(&beta);
    let rhs = xd.t().dot(&y);
    let scale = rhs.iter().fold(1.0_f64, |a, &b| a.max(b.abs()));
    let err = max_abs_diff(&lhs, &rhs) / scale;
    assert!(err < 1e-9, "relative normal-equation residual {err:.2e}");
}

#[test]
fn recovery_error_shrinks_with_noise() {
    let x = gaussian(300, 4, 5);
    let xd = make_delayed(&x, &[1, 2]).unwrap();
    let beta_true = gaussian(8, 2, 6);

    let errs: Vec<f64> = [1.0, 1e-2, 1e-4, 0.0]
        .iter()
        .map(|&noise| {
            let y = linear_response(&xd, &beta_true, noise, 99);
            max_abs_diff(&fit_ols(&xd, &y).unwrap(), &beta_true)
        })
        .collect();

    for w in errs.windows(2) {
        assert!(w[1] < w[0], "errors not decreasing: {errs:?}");
    }
    assert!(errs[3] < 1e-10);
}

#[test]
fn rank_deficient_returns_minimum_norm() {
    // Duplicate the whole design: β_true spread evenly over the copies is the
    // minimum-norm solution among all exact fits.
    let x = gaussian(60, 3, 8);
    let x2 = concatenate(Axis(1), &[x.view(), x.view()]).unwrap();
    let beta_half = gaussian(3, 2, 9);
    let y = x.dot(&(&beta_half * 2.0));

    let fit = solve_lstsq(&x2, &y, 1e-10).unwrap();
    assert_eq!(fit.rank, 3);

    let expected: Array2<f64> = concatenate(Axis(0), &[beta_half.view(), beta_half.view()]).unwrap();
    let err = max_abs_diff(&fit.beta, &expected);
    assert!(err < 1e-9, "min-norm error {err:.2e}");
}

#[test]
fn underdetermined_system_is_fit_exactly() {
    // More columns than rows: infinitely many exact fits, the solver picks one.
    let x = gaussian(10, 25, 12);
    let y = gaussian(10, 2, 13);
    let beta = fit_ols(&x, &y).unwrap();
    let err = max_abs_diff(&x.dot(&beta), &y);
    assert!(err < 1e-9, "residual {err:.2e}");
}

#[test]
fn shape_mismatch_fails_fast() {
    let x = gaussian(10, 2, 1);
    let y = gaussian(9, 1, 2);
    assert!(matches!(fit_ols(&x, &y), Err(EncodingError::ShapeMismatch { .. })));
}
