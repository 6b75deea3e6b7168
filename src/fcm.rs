use crate::algorithm::{check_inputs, fuzzy_cmeans};
use crate::cluster::FcmResult;
use crate::config::FcmConfig;
use crate::distance::DistanceMetric;
use crate::error::FcmError;
use crate::matrix::FeatureMatrix;
use crate::progress::{CancelToken, ProgressSink};
use rayon::ThreadPoolBuilder;
use std::hash::Hash;

/// Fuzzy c-means clustering engine.
///
/// The engine holds a configuration and a cancellation token. Each call to
/// [`run`](Self::run) is independent: scratch matrices live only for the
/// duration of the call and the caller owns the returned [`FcmResult`].
///
/// # Example
///
/// ```
/// use fuzzycmeans_rs::{FcmConfig, FeatureMatrix, FuzzyCMeans, NoProgress};
/// use ndarray::array;
///
/// let data = FeatureMatrix::new(array![[0.0], [1.0], [10.0], [11.0]]).unwrap();
/// let fcm = FuzzyCMeans::with_config(FcmConfig::new(2).with_seed(42));
///
/// let result = fcm.run(&data, &mut NoProgress).unwrap();
/// let labels = result.hard_assignments();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct FuzzyCMeans {
    /// Model configuration
    config: FcmConfig,

    /// Shared cancellation flag
    cancel: CancelToken,
}

impl FuzzyCMeans {
    /// Create an engine for `k` clusters with default parameters.
    pub fn new(k: usize) -> Self {
        Self::with_config(FcmConfig::new(k))
    }

    /// Create an engine with a custom configuration.
    ///
    /// The configuration is validated when [`run`](Self::run) is called.
    pub fn with_config(config: FcmConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Cluster `data` with the metric named in the configuration.
    ///
    /// `progress` receives the fraction of the iteration budget consumed after
    /// every iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `k` is 0 or larger than the number of points
    /// - the fuzziness exponent is not greater than 1
    /// - the threshold is negative
    /// - a dedicated thread pool was requested and could not be built
    pub fn run<Id, P>(
        &self,
        data: &FeatureMatrix<Id>,
        progress: &mut P,
    ) -> Result<FcmResult<Id>, FcmError>
    where
        Id: Clone + Eq + Hash,
        P: ProgressSink + ?Sized,
    {
        let metric = self.config.metric;
        self.run_with_metric(data, &metric, progress)
    }

    /// Cluster `data` with a caller-supplied distance metric.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), plus an error if the metric returns a
    /// negative or non-finite distance.
    pub fn run_with_metric<Id, M, P>(
        &self,
        data: &FeatureMatrix<Id>,
        metric: &M,
        progress: &mut P,
    ) -> Result<FcmResult<Id>, FcmError>
    where
        Id: Clone + Eq + Hash,
        M: DistanceMetric + ?Sized,
        P: ProgressSink + ?Sized,
    {
        check_inputs(data, &self.config)?;

        match self.config.n_threads {
            Some(n_threads) => {
                let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;
                fuzzy_cmeans(data, &self.config, metric, progress, &self.cancel, Some(&pool))
            }
            None => fuzzy_cmeans(data, &self.config, metric, progress, &self.cancel, None),
        }
    }

    /// Ask a running job to stop after the iteration in flight.
    ///
    /// The flag stays raised until [`reset_cancel`](Self::reset_cancel), so a
    /// later run returns right after initialization.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Same as [`cancel`](Self::cancel).
    pub fn halt(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn reset_cancel(&self) {
        self.cancel.reset();
    }

    /// Token sharing this engine's cancellation flag, for use from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &FcmConfig {
        &self.config
    }
}
