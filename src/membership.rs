use crate::distance::DistanceMetric;
use crate::error::FcmError;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Zip};
use rand::Rng;
use tracing::debug;

/// Initial membership scores are drawn as integers in `0..INIT_SCORE_RANGE`.
const INIT_SCORE_RANGE: u32 = 100;

/// Draw a random membership matrix of shape (n_points, k).
///
/// Each point gets an independent random score per cluster and the row is
/// normalized to sum to 1. A row whose scores are all zero is spread
/// uniformly over the clusters.
pub(crate) fn random_memberships<R: Rng>(
    n_points: usize,
    k: usize,
    rng: &mut R,
) -> Array2<f64> {
    let mut membership = Array2::zeros((n_points, k));

    for (i, mut row) in membership.rows_mut().into_iter().enumerate() {
        row.mapv_inplace(|_| f64::from(rng.gen_range(0..INIT_SCORE_RANGE)));

        let sum = row.sum();
        if sum > 0.0 {
            row /= sum;
        } else {
            debug!(point = i, "all initial scores were zero, using uniform memberships");
            row.fill(1.0 / k as f64);
        }
    }

    membership
}

/// Compute the (n_points, k) matrix of distances between every point and
/// every centroid.
///
/// Points are processed in parallel; each worker owns one output row.
pub(crate) fn distance_matrix<M: DistanceMetric + ?Sized>(
    data: &ArrayView2<f64>,
    centroids: &ArrayView2<f64>,
    weights: &ArrayView1<f64>,
    metric: &M,
) -> Result<Array2<f64>, FcmError> {
    let n_features = data.ncols();
    if centroids.ncols() != n_features {
        return Err(FcmError::InvalidDimensions(format!(
            "Centroids have {} features, data has {}",
            centroids.ncols(),
            n_features
        )));
    }
    if weights.len() != n_features {
        return Err(FcmError::InvalidDimensions(format!(
            "Expected {} weights, got {}",
            n_features,
            weights.len()
        )));
    }

    let mut distances = Array2::zeros((data.nrows(), centroids.nrows()));
    Zip::from(distances.rows_mut())
        .and(data.rows())
        .par_for_each(|mut out, point| {
            for (d, centroid) in out.iter_mut().zip(centroids.rows()) {
                *d = metric.distance(point, centroid, *weights);
            }
        });

    if let Some(((point, cluster), &value)) = distances
        .indexed_iter()
        .find(|(_, d)| !(d.is_finite() && **d >= 0.0))
    {
        return Err(FcmError::InvalidDistance {
            point,
            cluster,
            value,
        });
    }

    Ok(distances)
}

/// Re-estimate memberships from the current centroids.
///
/// Uses the closed-form update
///
/// ```text
/// u[i][c] = 1 / sum_k (d(i, c) / d(i, k)) ^ (2 / (m - 1))
/// ```
///
/// A point lying exactly on a centroid belongs to that cluster only.
///
/// # Errors
///
/// Returns an error if the centroid or weight dimensions do not match the
/// data, or if the metric returns a negative or non-finite distance.
pub fn estimate_memberships<M: DistanceMetric + ?Sized>(
    data: &ArrayView2<f64>,
    centroids: &ArrayView2<f64>,
    weights: &ArrayView1<f64>,
    metric: &M,
    fuzziness: f64,
) -> Result<Array2<f64>, FcmError> {
    let distances = distance_matrix(data, centroids, weights, metric)?;
    Ok(memberships_from_distances(&distances.view(), fuzziness))
}

pub(crate) fn memberships_from_distances(distances: &ArrayView2<f64>, fuzziness: f64) -> Array2<f64> {
    let exponent = 2.0 / (fuzziness - 1.0);
    let mut membership = Array2::zeros(distances.raw_dim());

    Zip::from(membership.rows_mut())
        .and(distances.rows())
        .par_for_each(|out, dist| membership_row(dist, exponent, out));

    membership
}

fn membership_row(distances: ArrayView1<f64>, exponent: f64, mut out: ArrayViewMut1<f64>) {
    if let Some(c) = distances.iter().position(|&d| d == 0.0) {
        out.fill(0.0);
        out[c] = 1.0;
        return;
    }

    for (u, &d_c) in out.iter_mut().zip(distances.iter()) {
        // The k == c term contributes exactly 1, so the sum never drops below 1
        let sum: f64 = distances
            .iter()
            .map(|&d_k| (d_c / d_k).powf(exponent))
            .sum();
        *u = 1.0 / sum;
    }
}

/// FCM objective: sum over points and clusters of u^m * d^2.
///
/// Distances are scaled by their maximum before squaring, so very large
/// distances saturate to infinity instead of producing NaN.
pub(crate) fn objective(distances: &ArrayView2<f64>, membership: &ArrayView2<f64>, fuzziness: f64) -> f64 {
    let scale = distances.fold(0.0_f64, |acc, &d| acc.max(d));
    if scale == 0.0 {
        return 0.0;
    }
    let sum = Zip::from(distances).and(membership).fold(0.0_f64, |acc, &d, &u| {
        let t = d / scale;
        acc + u.powf(fuzziness) * t * t
    });
    sum * scale * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Metric;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_rows_sum_to_one(membership: &Array2<f64>) {
        for row in membership.rows() {
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-9);
            assert!(row.iter().all(|&u| (0.0..=1.0).contains(&u)));
        }
    }

    #[test]
    fn test_random_memberships_are_normalized() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let membership = random_memberships(200, 4, &mut rng);

        assert_eq!(membership.dim(), (200, 4));
        assert_rows_sum_to_one(&membership);
    }

    #[test]
    fn test_random_memberships_are_reproducible() {
        let a = random_memberships(50, 3, &mut ChaCha8Rng::seed_from_u64(7));
        let b = random_memberships(50, 3, &mut ChaCha8Rng::seed_from_u64(7));
        let c = random_memberships(50, 3, &mut ChaCha8Rng::seed_from_u64(8));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_closed_form_update() {
        // Distances 1 and 3 with m = 2: u0 = 1 / (1 + 1/9) = 0.9
        let data = array![[1.0]];
        let centroids = array![[0.0], [4.0]];
        let weights = array![1.0];

        let membership = estimate_memberships(
            &data.view(),
            &centroids.view(),
            &weights.view(),
            &Metric::Euclidean,
            2.0,
        )
        .unwrap();

        assert_relative_eq!(membership[[0, 0]], 0.9, epsilon = 1e-12);
        assert_relative_eq!(membership[[0, 1]], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_point_on_centroid_gets_full_membership() {
        let data = array![[2.0, 2.0], [0.5, 0.5]];
        let centroids = array![[0.0, 0.0], [2.0, 2.0], [5.0, 5.0]];
        let weights = array![1.0, 1.0];

        let membership = estimate_memberships(
            &data.view(),
            &centroids.view(),
            &weights.view(),
            &Metric::Euclidean,
            2.0,
        )
        .unwrap();

        assert_eq!(membership.row(0), array![0.0, 1.0, 0.0].view());
        assert_rows_sum_to_one(&membership);
    }

    #[test]
    fn test_coinciding_centroids_favor_first() {
        let data = array![[2.0, 2.0]];
        let centroids = array![[5.0, 5.0], [2.0, 2.0], [2.0, 2.0], [-1.0, 0.0]];
        let weights = array![1.0, 1.0];

        let membership = estimate_memberships(
            &data.view(),
            &centroids.view(),
            &weights.view(),
            &Metric::Euclidean,
            2.0,
        )
        .unwrap();

        assert_eq!(membership, array![[0.0, 1.0, 0.0, 0.0]]);

        let distances = array![[0.0, 0.0, 3.0]];
        assert_eq!(
            memberships_from_distances(&distances.view(), 2.0),
            array![[1.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_equidistant_point_is_split_evenly() {
        let data = array![[0.0]];
        let centroids = array![[-1.0], [1.0]];
        let weights = array![1.0];

        let membership = estimate_memberships(
            &data.view(),
            &centroids.view(),
            &weights.view(),
            &Metric::Euclidean,
            1.5,
        )
        .unwrap();

        assert_relative_eq!(membership[[0, 0]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(membership[[0, 1]], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_extreme_distance_ratio_stays_finite() {
        let data = array![[1e-150], [1e150]];
        let centroids = array![[1e-160], [1e150 + 1e140]];
        let weights = array![1.0];

        let membership = estimate_memberships(
            &data.view(),
            &centroids.view(),
            &weights.view(),
            &Metric::Euclidean,
            1.1,
        )
        .unwrap();

        assert!(membership.iter().all(|u| u.is_finite()));
        assert_rows_sum_to_one(&membership);
    }

    #[test]
    fn test_dimension_mismatch() {
        let data = array![[1.0, 2.0]];
        let centroids = array![[1.0]];
        let weights = array![1.0, 1.0];

        let result = estimate_memberships(
            &data.view(),
            &centroids.view(),
            &weights.view(),
            &Metric::Euclidean,
            2.0,
        );
        assert!(matches!(result, Err(FcmError::InvalidDimensions(_))));
    }

    #[test]
    fn test_rejects_negative_distance() {
        fn broken(_: ArrayView1<f64>, _: ArrayView1<f64>, _: ArrayView1<f64>) -> f64 {
            -1.0
        }
        let data = array![[1.0]];
        let centroids = array![[0.0]];
        let weights = array![1.0];

        let result =
            estimate_memberships(&data.view(), &centroids.view(), &weights.view(), &broken, 2.0);
        assert!(matches!(
            result,
            Err(FcmError::InvalidDistance {
                point: 0,
                cluster: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_objective() {
        let distances = array![[1.0, 2.0], [3.0, 0.0]];
        let membership = array![[0.5, 0.5], [0.0, 1.0]];
        // 0.25 * 1 + 0.25 * 4 + 0 + 0
        assert_relative_eq!(
            objective(&distances.view(), &membership.view(), 2.0),
            1.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_objective_saturates_without_nan() {
        let distances = array![[1e200, 3e200], [0.0, 2e200]];
        let membership = array![[1.0, 0.0], [1.0, 0.0]];

        let value = objective(&distances.view(), &membership.view(), 2.0);
        assert_eq!(value, f64::INFINITY);
        assert_eq!(
            objective(&array![[0.0, 0.0]].view(), &array![[1.0, 0.0]].view(), 2.0),
            0.0
        );
    }
}
