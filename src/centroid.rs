use crate::error::FcmError;
use ndarray::{Array2, ArrayView2, Zip};

/// Re-estimate the centroids in place from the current memberships.
///
/// Each centroid becomes the mean of all points weighted by `u^m`:
///
/// ```text
/// centroid[c][d] = sum_i u[i][c]^m * x[i][d] / sum_i u[i][c]^m
/// ```
///
/// A cluster whose weighted membership total is zero keeps its previous
/// centroid. Clusters are processed in parallel.
///
/// # Errors
///
/// Returns an error if the membership matrix does not have one row per point
/// or the centroid matrix does not have one row per cluster and one column
/// per feature.
pub fn estimate_centroids(
    data: &ArrayView2<f64>,
    membership: &ArrayView2<f64>,
    fuzziness: f64,
    centroids: &mut Array2<f64>,
) -> Result<(), FcmError> {
    let (n_points, n_features) = data.dim();
    let k = membership.ncols();

    if membership.nrows() != n_points {
        return Err(FcmError::InvalidDimensions(format!(
            "Membership matrix has {} rows, data has {} points",
            membership.nrows(),
            n_points
        )));
    }
    if centroids.dim() != (k, n_features) {
        return Err(FcmError::InvalidDimensions(format!(
            "Expected centroid matrix of shape ({}, {}), got {:?}",
            k,
            n_features,
            centroids.dim()
        )));
    }

    Zip::from(centroids.rows_mut())
        .and(membership.columns())
        .par_for_each(|mut centroid, column| {
            let weights = column.mapv(|u| u.powf(fuzziness));
            let total = weights.sum();
            if total > 0.0 {
                let weighted_sum = weights.dot(data);
                centroid.assign(&(weighted_sum / total));
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_weighted_mean() {
        let data = array![[0.0, 0.0], [2.0, 4.0]];
        // Equal memberships give both clusters the plain mean
        let membership = array![[0.5, 0.5], [0.5, 0.5]];
        let mut centroids = Array2::zeros((2, 2));

        estimate_centroids(&data.view(), &membership.view(), 2.0, &mut centroids).unwrap();

        assert_relative_eq!(centroids[[0, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(centroids[[0, 1]], 2.0, epsilon = 1e-12);
        assert_relative_eq!(centroids[[1, 0]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fuzziness_sharpens_weights() {
        let data = array![[0.0], [10.0]];
        let membership = array![[0.8, 0.2], [0.2, 0.8]];
        let mut centroids = Array2::zeros((2, 1));

        estimate_centroids(&data.view(), &membership.view(), 2.0, &mut centroids).unwrap();

        // 0.04 * 10 / (0.64 + 0.04)
        assert_relative_eq!(centroids[[0, 0]], 0.4 / 0.68, epsilon = 1e-12);
        assert_relative_eq!(centroids[[1, 0]], 6.4 / 0.68, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_total_keeps_previous_centroid() {
        let data = array![[1.0, 1.0], [3.0, 3.0]];
        let membership = array![[1.0, 0.0], [1.0, 0.0]];
        let mut centroids = array![[0.0, 0.0], [7.0, -7.0]];

        estimate_centroids(&data.view(), &membership.view(), 2.0, &mut centroids).unwrap();

        assert_eq!(centroids.row(0), array![2.0, 2.0].view());
        assert_eq!(centroids.row(1), array![7.0, -7.0].view());
    }

    #[test]
    fn test_idempotent() {
        let data = array![[0.0, 1.0], [1.0, 3.0], [10.0, 2.0], [11.0, 0.5]];
        let membership = array![[0.9, 0.1], [0.7, 0.3], [0.2, 0.8], [0.05, 0.95]];

        let mut first = Array2::zeros((2, 2));
        let mut second = Array2::zeros((2, 2));
        estimate_centroids(&data.view(), &membership.view(), 1.7, &mut first).unwrap();
        estimate_centroids(&data.view(), &membership.view(), 1.7, &mut second).unwrap();
        assert_eq!(first, second);

        // Running again on already-estimated centroids changes nothing
        let snapshot = first.clone();
        estimate_centroids(&data.view(), &membership.view(), 1.7, &mut first).unwrap();
        assert_eq!(first, snapshot);
    }

    #[test]
    fn test_dimension_mismatch() {
        let data = array![[0.0], [1.0]];
        let membership = array![[1.0, 0.0]];
        let mut centroids = Array2::zeros((2, 1));
        assert!(matches!(
            estimate_centroids(&data.view(), &membership.view(), 2.0, &mut centroids),
            Err(FcmError::InvalidDimensions(_))
        ));

        let membership = array![[1.0, 0.0], [0.0, 1.0]];
        let mut centroids = Array2::zeros((3, 1));
        assert!(matches!(
            estimate_centroids(&data.view(), &membership.view(), 2.0, &mut centroids),
            Err(FcmError::InvalidDimensions(_))
        ));
    }
}
