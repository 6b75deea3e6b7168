use crate::distance::DistanceMetric;
use crate::error::FcmError;
use crate::membership::{distance_matrix, memberships_from_distances};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// One cluster of a fuzzy clustering.
///
/// Fuzzy clusters do not partition the data: every cluster holds every point,
/// together with the full identifier to membership-vector map. All clusters of
/// one run share the same list and map, so the caller can threshold or take
/// the arg-max however it likes.
#[derive(Debug, Clone)]
pub struct FuzzyCluster<Id> {
    index: usize,
    members: Arc<[Id]>,
    memberships: Arc<HashMap<Id, Vec<f64>>>,
}

impl<Id: Eq + Hash> FuzzyCluster<Id> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Every data point, in feature matrix order.
    pub fn members(&self) -> &[Id] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn membership_map(&self) -> &HashMap<Id, Vec<f64>> {
        &self.memberships
    }

    /// Membership of `id` in every cluster.
    pub fn membership_vector(&self, id: &Id) -> Option<&[f64]> {
        self.memberships.get(id).map(Vec::as_slice)
    }

    /// Membership of `id` in this cluster.
    pub fn membership(&self, id: &Id) -> Option<f64> {
        self.memberships.get(id).map(|v| v[self.index])
    }

    /// Points whose membership in this cluster is at least `threshold`.
    pub fn members_above(&self, threshold: f64) -> impl Iterator<Item = &Id> + '_ {
        self.members
            .iter()
            .filter(move |id| self.membership(id).is_some_and(|u| u >= threshold))
    }

    /// Points for which this cluster has the highest membership.
    pub fn dominant_members(&self) -> impl Iterator<Item = &Id> + '_ {
        self.members.iter().filter(move |id| {
            self.membership_vector(id)
                .is_some_and(|v| argmax(v.iter().copied()) == self.index)
        })
    }
}

/// Outcome of a fuzzy c-means run
#[derive(Debug, Clone)]
pub struct FcmResult<Id> {
    /// One entry per cluster, all sharing the same members and membership map
    pub clusters: Vec<FuzzyCluster<Id>>,
    /// Final membership matrix (n_points, k)
    pub memberships: Array2<f64>,
    /// Final centroids (k, n_features)
    pub centroids: Array2<f64>,
    /// Number of completed iterations
    pub n_iterations: usize,
    /// Whether the run stopped because memberships stabilized
    pub converged: bool,
    /// Whether the run was stopped through its cancellation token
    pub cancelled: bool,
    /// Objective value (sum of u^m * d^2) at the final state
    pub objective: f64,
    /// Fuzziness exponent the run used
    pub fuzziness: f64,
}

impl<Id: Clone + Eq + Hash> FcmResult<Id> {
    /// Package the final membership state into one cluster per column.
    pub(crate) fn build(
        ids: &[Id],
        memberships: Array2<f64>,
        centroids: Array2<f64>,
        fuzziness: f64,
    ) -> Self {
        let members: Arc<[Id]> = ids.into();
        let map: HashMap<Id, Vec<f64>> = ids
            .iter()
            .cloned()
            .zip(memberships.rows().into_iter().map(|row| row.to_vec()))
            .collect();
        let map = Arc::new(map);

        let clusters = (0..memberships.ncols())
            .map(|index| FuzzyCluster {
                index,
                members: Arc::clone(&members),
                memberships: Arc::clone(&map),
            })
            .collect();

        Self {
            clusters,
            memberships,
            centroids,
            n_iterations: 0,
            converged: false,
            cancelled: false,
            objective: 0.0,
            fuzziness,
        }
    }

    pub fn k(&self) -> usize {
        self.clusters.len()
    }

    /// Hard assignment of every point to its highest-membership cluster.
    /// Ties go to the lowest cluster index.
    pub fn hard_assignments(&self) -> Array1<usize> {
        self.memberships
            .rows()
            .into_iter()
            .map(|row| argmax(row.iter().copied()))
            .collect()
    }

    /// Fuzzy memberships of new points against the final centroids.
    ///
    /// # Errors
    ///
    /// Returns an error if the points or weights do not have one entry per
    /// centroid feature, or if the metric breaks its contract.
    pub fn predict_memberships<M: DistanceMetric + ?Sized>(
        &self,
        points: &ArrayView2<f64>,
        weights: &ArrayView1<f64>,
        metric: &M,
    ) -> Result<Array2<f64>, FcmError> {
        let distances = distance_matrix(points, &self.centroids.view(), weights, metric)?;
        Ok(memberships_from_distances(&distances.view(), self.fuzziness))
    }

    pub fn into_clusters(self) -> Vec<FuzzyCluster<Id>> {
        self.clusters
    }
}

fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}
