use crate::distance::Metric;
use crate::error::FcmError;

/// Configuration for the fuzzy c-means algorithm
#[derive(Debug, Clone)]
pub struct FcmConfig {
    /// Number of clusters
    pub k: usize,

    /// Fuzziness exponent `m`. Values close to 1 approach hard clustering,
    /// larger values spread memberships more evenly. Must be greater than 1.
    pub fuzziness: f64,

    /// Maximum number of iterations. Zero skips initialization entirely and
    /// yields all-zero memberships.
    pub max_iters: usize,

    /// Convergence threshold. The run stops once no membership value changes
    /// by `threshold` or more between two iterations. Zero disables early stopping.
    pub threshold: f64,

    /// Random seed for membership initialization
    pub seed: u64,

    /// Distance metric used by [`FuzzyCMeans::run`](crate::FuzzyCMeans::run)
    pub metric: Metric,

    /// Number of worker threads. `None` uses the global rayon pool.
    pub n_threads: Option<usize>,
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            k: 2,
            fuzziness: 2.0,
            max_iters: 50,
            threshold: 1e-6,
            seed: 0,
            metric: Metric::Euclidean,
            n_threads: None,
        }
    }
}

impl FcmConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the fuzziness exponent
    pub fn with_fuzziness(mut self, fuzziness: f64) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the distance metric
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the number of worker threads
    pub fn with_n_threads(mut self, n_threads: Option<usize>) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Check the parameters that do not depend on the data.
    pub fn validate(&self) -> Result<(), FcmError> {
        if self.k == 0 {
            return Err(FcmError::InvalidK("k must be greater than 0".to_string()));
        }
        if !self.fuzziness.is_finite() || self.fuzziness <= 1.0 {
            return Err(FcmError::InvalidFuzziness(self.fuzziness));
        }
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(FcmError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}
