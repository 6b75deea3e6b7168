//! # fuzzycmeans-rs
//!
//! Fuzzy c-means clustering in Rust, compatible with ndarray.
//!
//! Every data point receives a graded membership in each of `k` clusters.
//! The engine alternates between re-estimating memberships from centroids and
//! centroids from memberships until no membership changes by more than a
//! threshold.
//!
//! ## Features
//!
//! - **Pluggable distance metrics**: Euclidean, Manhattan, Chebyshev, Pearson
//!   and uncentered correlation out of the box, or any closure
//! - **Weighted features**: per-feature weights flow into every metric
//! - **Parallel passes**: per-point and per-cluster work runs on rayon,
//!   optionally in a dedicated pool
//! - **Reproducible**: a single seeded generator per run
//! - **Cooperative cancellation** and per-iteration progress reporting
//!
//! ## Example
//!
//! ```rust
//! use fuzzycmeans_rs::{FcmConfig, FeatureMatrix, FuzzyCMeans, NoProgress};
//! use ndarray::array;
//!
//! let data = FeatureMatrix::new(array![[0.0], [1.0], [10.0], [11.0]]).unwrap();
//!
//! let config = FcmConfig::new(2)
//!     .with_fuzziness(2.0)
//!     .with_max_iters(50)
//!     .with_threshold(1e-6)
//!     .with_seed(42);
//!
//! let fcm = FuzzyCMeans::with_config(config);
//! let result = fcm.run(&data, &mut NoProgress).unwrap();
//!
//! // Every cluster sees every point with its full membership vector
//! let cluster = &result.clusters[0];
//! assert_eq!(cluster.members().len(), 4);
//! let memberships = cluster.membership_vector(&0).unwrap();
//! assert!((memberships.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Custom metrics and identifiers
//!
//! ```rust
//! use fuzzycmeans_rs::{FcmConfig, FeatureMatrix, FuzzyCMeans};
//! use ndarray::{array, ArrayView1};
//!
//! let data = FeatureMatrix::with_ids(
//!     array![[0.0, 0.0], [0.1, 0.2], [5.0, 5.0], [5.2, 4.9]],
//!     vec!["n1", "n2", "n3", "n4"],
//! )
//! .unwrap();
//!
//! fn squared(x: ArrayView1<f64>, c: ArrayView1<f64>, w: ArrayView1<f64>) -> f64 {
//!     x.iter().zip(c).zip(w).map(|((a, b), w)| w * (a - b) * (a - b)).sum()
//! }
//!
//! let mut seen = Vec::new();
//! let fcm = FuzzyCMeans::with_config(FcmConfig::new(2).with_seed(1));
//! let result = fcm
//!     .run_with_metric(&data, &squared, &mut |f: f64| seen.push(f))
//!     .unwrap();
//!
//! assert!(result.clusters[0].membership(&"n3").is_some());
//! assert!(!seen.is_empty());
//! ```
//!
//! ## BLAS Acceleration
//!
//! Centroid estimation is a weighted matrix product. Enable a BLAS backend for
//! large inputs:
//!
//! ```toml
//! # macOS (uses Apple Accelerate)
//! fuzzycmeans-rs = { version = "0.1", features = ["accelerate"] }
//!
//! # Linux/Windows (requires OpenBLAS installed)
//! fuzzycmeans-rs = { version = "0.1", features = ["openblas"] }
//! ```

// Link BLAS libraries when features are enabled
#[cfg(any(feature = "accelerate", feature = "openblas"))]
extern crate blas_src;

mod algorithm;
mod centroid;
mod cluster;
mod config;
mod convergence;
mod distance;
mod error;
mod fcm;
mod matrix;
mod membership;
mod progress;

pub use centroid::estimate_centroids;
pub use cluster::{FcmResult, FuzzyCluster};
pub use config::FcmConfig;
pub use convergence::{has_converged, max_membership_delta};
pub use distance::{DistanceMetric, Metric};
pub use error::FcmError;
pub use fcm::FuzzyCMeans;
pub use matrix::FeatureMatrix;
pub use membership::estimate_memberships;
pub use progress::{CancelToken, NoProgress, ProgressSink};
