//! Run fuzzy c-means on a matrix stored in a .npy file
//!
//! Reads an `f64` matrix of shape (n_points, n_features), clusters it and
//! writes the (n_points, k) membership matrix to another .npy file.
//!
//! Usage: `fcm-npy <input.npy> <output.npy> <k> <fuzziness> <seed> <max_iters> <threshold> [metric]`
//!
//! Set `RUST_LOG=debug` to trace every iteration.

use fuzzycmeans_rs::{FcmConfig, FeatureMatrix, FuzzyCMeans, Metric};
use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 8 && args.len() != 9 {
        eprintln!(
            "Usage: {} <input.npy> <output.npy> <k> <fuzziness> <seed> <max_iters> <threshold> [metric]",
            args[0]
        );
        eprintln!(
            "Metrics: {}",
            Metric::ALL.map(|m| m.name()).join(", ")
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let k: usize = args[3].parse()?;
    let fuzziness: f64 = args[4].parse()?;
    let seed: u64 = args[5].parse()?;
    let max_iters: usize = args[6].parse()?;
    let threshold: f64 = args[7].parse()?;
    let metric: Metric = match args.get(8) {
        Some(name) => name.parse()?,
        None => Metric::Euclidean,
    };

    // Read input data
    let reader = BufReader::new(File::open(input_path)?);
    let values: Array2<f64> = Array2::read_npy(reader)?;

    eprintln!(
        "Loaded data: {} points x {} features",
        values.nrows(),
        values.ncols()
    );
    eprintln!(
        "Running fuzzy c-means with k={}, m={}, seed={}, max_iters={}, threshold={}, metric={}",
        k, fuzziness, seed, max_iters, threshold, metric
    );

    let data = FeatureMatrix::new(values)?;
    let config = FcmConfig::new(k)
        .with_fuzziness(fuzziness)
        .with_seed(seed)
        .with_max_iters(max_iters)
        .with_threshold(threshold)
        .with_metric(metric);

    let fcm = FuzzyCMeans::with_config(config);
    let result = fcm.run(&data, &mut |fraction: f64| {
        tracing::trace!(fraction, "progress");
    })?;

    eprintln!(
        "Finished after {} iterations (converged: {}, objective: {:.6})",
        result.n_iterations, result.converged, result.objective
    );

    let writer = BufWriter::new(File::create(output_path)?);
    result.memberships.write_npy(writer)?;

    eprintln!("Saved memberships to {}", output_path);

    Ok(())
}
