use crate::centroid::estimate_centroids;
use crate::cluster::FcmResult;
use crate::config::FcmConfig;
use crate::convergence::max_membership_delta;
use crate::distance::DistanceMetric;
use crate::error::FcmError;
use crate::matrix::FeatureMatrix;
use crate::membership::{distance_matrix, estimate_memberships, objective, random_memberships};
use crate::progress::{CancelToken, ProgressSink};
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::ThreadPool;
use std::hash::Hash;
use std::time::Instant;
use tracing::{debug, info};

/// Reject a configuration or data set the engine cannot run on.
pub(crate) fn check_inputs<Id>(data: &FeatureMatrix<Id>, config: &FcmConfig) -> Result<(), FcmError> {
    config.validate()?;
    if data.n_points() < config.k {
        return Err(FcmError::InsufficientData(format!(
            "Number of points ({}) is less than k ({})",
            data.n_points(),
            config.k
        )));
    }
    Ok(())
}

/// Run fuzzy c-means on `data`.
///
/// The loop alternates membership estimation and centroid estimation until
/// no membership changes by `config.threshold` or more, the iteration budget
/// is spent, or `cancel` is raised. The cancellation flag is polled between
/// iterations only. Each pass runs inside `pool` when one is given.
pub(crate) fn fuzzy_cmeans<Id, M, P>(
    data: &FeatureMatrix<Id>,
    config: &FcmConfig,
    metric: &M,
    progress: &mut P,
    cancel: &CancelToken,
    pool: Option<&ThreadPool>,
) -> Result<FcmResult<Id>, FcmError>
where
    Id: Clone + Eq + Hash,
    M: DistanceMetric + ?Sized,
    P: ProgressSink + ?Sized,
{
    let n_points = data.n_points();
    let n_features = data.n_features();
    let k = config.k;
    let m = config.fuzziness;

    check_inputs(data, config)?;

    info!(
        n_points,
        n_features,
        k,
        fuzziness = m,
        max_iters = config.max_iters,
        threshold = config.threshold,
        "Starting fuzzy c-means"
    );

    let points = data.view();
    let weights = data.weights();

    let mut memberships = Array2::zeros((n_points, k));
    let mut centroids = Array2::zeros((k, n_features));

    let mut n_iterations = 0;
    let mut converged = false;
    let mut cancelled = false;

    if config.max_iters == 0 {
        // Nothing to iterate: all-zero memberships leave every centroid at the origin
        estimate_centroids(&points, &memberships.view(), m, &mut centroids)?;
    } else {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        memberships = random_memberships(n_points, k, &mut rng);
        in_pool(pool, || {
            estimate_centroids(&points, &memberships.view(), m, &mut centroids)
        })?;

        for iteration in 0..config.max_iters {
            if cancel.is_cancelled() {
                cancelled = true;
                info!(completed = n_iterations, "Fuzzy c-means cancelled");
                break;
            }

            let iter_start = Instant::now();

            let updated = in_pool(pool, || {
                estimate_memberships(&points, &centroids.view(), &weights, metric, m)
            })?;
            in_pool(pool, || {
                estimate_centroids(&points, &updated.view(), m, &mut centroids)
            })?;

            let delta = max_membership_delta(&updated.view(), &memberships.view())?;
            memberships = updated;
            n_iterations = iteration + 1;

            debug!(
                iteration = n_iterations,
                max_delta = delta,
                elapsed_s = iter_start.elapsed().as_secs_f64(),
                "Fuzzy c-means iteration"
            );
            progress.report(n_iterations as f64 / config.max_iters as f64);

            if delta < config.threshold {
                converged = true;
                info!(
                    iterations = n_iterations,
                    max_delta = delta,
                    threshold = config.threshold,
                    "Fuzzy c-means converged"
                );
                break;
            }
        }
    }

    let distances = in_pool(pool, || {
        distance_matrix(&points, &centroids.view(), &weights, metric)
    })?;
    let final_objective = objective(&distances.view(), &memberships.view(), m);

    let mut result = FcmResult::build(data.ids(), memberships, centroids, m);
    result.n_iterations = n_iterations;
    result.converged = converged;
    result.cancelled = cancelled;
    result.objective = final_objective;

    Ok(result)
}

fn in_pool<R, F>(pool: Option<&ThreadPool>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}
