/// Shared helpers for synthetic encoding-model data.
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

#[allow(unused)]
/// `[rows, cols]` matrix of i.i.d. standard normal samples.
pub fn gaussian(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_simple_fn((rows, cols), || rng.sample::<f64, _>(StandardNormal))
}

#[allow(unused)]
/// `y = x · beta + noise_scale · N(0, 1)`.
pub fn linear_response(x: &Array2<f64>, beta: &Array2<f64>, noise_scale: f64, seed: u64) -> Array2<f64> {
    let clean = x.dot(beta);
    if noise_scale == 0.0 {
        return clean;
    }
    let noise = gaussian(clean.nrows(), clean.ncols(), seed);
    clean + noise * noise_scale
}

#[allow(unused)]
/// Maximum absolute difference between two arrays.
pub fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    assert_eq!(a.dim(), b.dim());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0_f64, f64::max)
}
