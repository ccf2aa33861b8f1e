/// encode: fit a FIR-delay encoding model on a safetensors file holding a
/// stimulus-feature matrix and a response matrix, evaluate it on the held-out
/// tail, and write the results.
///
/// Input keys:
///   X             [T, F]        f32/f64  stimulus features
///   Y             [T, V]        f32/f64  responses
///
/// Output keys:
///   beta          [F·D, V]      f64
///   predictions   [T_test, V]   f64
///   correlations  [V]           f64  (NaN = zero-variance channel)
///   delays        [D]           i32
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use firenc::{
    evaluate::nanmean,
    fit_and_evaluate,
    io::{load_matrices, take_matrix, StWriter},
    EncodingConfig,
};

#[derive(Parser, Debug)]
#[command(name = "encode", about = "FIR-delay OLS encoding model")]
struct Args {
    /// Input safetensors file with `X` and `Y` tensors.
    #[arg(long)]
    input: PathBuf,

    /// Output safetensors path.
    #[arg(long)]
    output: PathBuf,

    /// Delays in samples, comma-separated, in column-block order.
    #[arg(long, value_delimiter = ',', default_value = "1,2,3,4")]
    delays: Vec<usize>,

    /// Fraction of samples (from the start) used for training.
    #[arg(long, default_value_t = 0.8)]
    train_fraction: f64,

    /// Skip per-column z-scoring of features and responses.
    #[arg(long)]
    no_zscore: bool,

    /// Relative singular-value cutoff (default: ε · max(T, P)).
    #[arg(long)]
    rcond: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = EncodingConfig {
        delays: args.delays.clone(),
        rcond: args.rcond,
        train_fraction: args.train_fraction,
        zscore: !args.no_zscore,
    };

    // ── 1. Load ────────────────────────────────────────────────────────────
    let t_load = Instant::now();
    let mut tensors = load_matrices(&args.input)?;
    let x = take_matrix(&mut tensors, "X")?;
    let y = take_matrix(&mut tensors, "Y")?;
    tracing::info!(
        n_times = x.nrows(),
        n_features = x.ncols(),
        n_outputs = y.ncols(),
        ms = t_load.elapsed().as_secs_f64() * 1000.0,
        "loaded {}",
        args.input.display()
    );

    // ── 2. Fit + evaluate ──────────────────────────────────────────────────
    let t_fit = Instant::now();
    let eval = fit_and_evaluate(&x, &y, &cfg).context("fitting encoding model")?;
    let r = &eval.correlations;
    let n_undefined = r.iter().filter(|v| v.is_nan()).count();
    let max_r = r.iter().filter(|v| !v.is_nan()).fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    tracing::info!(
        delays = ?cfg.delays,
        rank = eval.model.rank,
        ms = t_fit.elapsed().as_secs_f64() * 1000.0,
        "fit complete"
    );
    println!(
        "{} channels  mean r = {:.4}  max r = {:.4}  undefined = {n_undefined}",
        r.len(),
        nanmean(r),
        max_r
    );

    // ── 3. Write ───────────────────────────────────────────────────────────
    let delays_i32: Vec<i32> = cfg
        .delays
        .iter()
        .map(|&d| i32::try_from(d).context("delay does not fit in i32"))
        .collect::<Result<_>>()?;

    let mut w = StWriter::new();
    w.add_f64_arr2("beta", &eval.model.beta);
    w.add_f64_arr2("predictions", &eval.predictions);
    w.add_f64_arr1("correlations", r);
    w.add_i32("delays", &delays_i32);
    w.write(&args.output)?;
    tracing::info!("written → {}", args.output.display());

    Ok(())
}
