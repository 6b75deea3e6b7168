use crate::error::FcmError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::HashSet;
use std::hash::Hash;

/// Immutable view of N data points by D numeric features.
///
/// Every row carries an opaque identifier linking it back to its origin (a
/// node, a sample name, a database key). Features carry non-negative weights
/// consumed by the distance metric; they default to 1.
#[derive(Debug, Clone)]
pub struct FeatureMatrix<Id = usize> {
    values: Array2<f64>,
    ids: Vec<Id>,
    weights: Array1<f64>,
}

impl FeatureMatrix<usize> {
    /// Wrap a matrix, identifying each row by its index.
    pub fn new(values: Array2<f64>) -> Result<Self, FcmError> {
        let ids = (0..values.nrows()).collect();
        Self::with_ids(values, ids)
    }
}

impl<Id: Eq + Hash> FeatureMatrix<Id> {
    /// Wrap a matrix with one identifier per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is empty, holds a non-finite value, the
    /// number of identifiers differs from the number of rows, or an
    /// identifier appears twice.
    pub fn with_ids(values: Array2<f64>, ids: Vec<Id>) -> Result<Self, FcmError> {
        let (n_points, n_features) = values.dim();
        if n_points == 0 || n_features == 0 {
            return Err(FcmError::EmptyData);
        }
        if ids.len() != n_points {
            return Err(FcmError::InvalidDimensions(format!(
                "Expected {} identifiers, got {}",
                n_points,
                ids.len()
            )));
        }
        let mut seen = HashSet::with_capacity(n_points);
        if let Some(row) = ids.iter().position(|id| !seen.insert(id)) {
            return Err(FcmError::DuplicateId { row });
        }
        if let Some(((row, col), _)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(FcmError::NonFiniteValue { row, col });
        }

        Ok(Self {
            values,
            ids,
            weights: Array1::ones(n_features),
        })
    }
}

impl<Id> FeatureMatrix<Id> {
    /// Replace the per-feature weights.
    ///
    /// # Errors
    ///
    /// Returns an error if the length differs from the number of features or a
    /// weight is negative or not finite.
    pub fn with_weights(mut self, weights: Array1<f64>) -> Result<Self, FcmError> {
        if weights.len() != self.n_features() {
            return Err(FcmError::InvalidDimensions(format!(
                "Expected {} weights, got {}",
                self.n_features(),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(FcmError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {}",
                w
            )));
        }
        self.weights = weights;
        Ok(self)
    }

    /// Number of data points (rows).
    pub fn n_points(&self) -> usize {
        self.values.nrows()
    }

    /// Number of features (columns).
    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    /// Value of feature `col` for point `row`, or `None` when out of bounds.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Identifier of the point stored at `row`.
    pub fn id(&self, row: usize) -> Option<&Id> {
        self.ids.get(row)
    }

    pub fn ids(&self) -> &[Id] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_uses_row_indices() {
        let data = FeatureMatrix::new(array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]).unwrap();

        assert_eq!(data.n_points(), 3);
        assert_eq!(data.n_features(), 2);
        assert_eq!(data.ids(), &[0, 1, 2]);
        assert_eq!(data.value(1, 1), Some(3.0));
        assert_eq!(data.value(3, 0), None);
        assert_eq!(data.weights(), array![1.0, 1.0].view());
    }

    #[test]
    fn test_with_ids() {
        let data =
            FeatureMatrix::with_ids(array![[1.0], [2.0]], vec!["a".to_string(), "b".to_string()])
                .unwrap();

        assert_eq!(data.id(1).map(String::as_str), Some("b"));
        assert_eq!(data.id(2), None);
        assert_eq!(data.row(0), array![1.0].view());
    }

    #[test]
    fn test_rejects_empty() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(FeatureMatrix::new(empty), Err(FcmError::EmptyData)));

        let no_features = Array2::<f64>::zeros((3, 0));
        assert!(matches!(
            FeatureMatrix::new(no_features),
            Err(FcmError::EmptyData)
        ));
    }

    #[test]
    fn test_rejects_id_count_mismatch() {
        let result = FeatureMatrix::with_ids(array![[1.0], [2.0]], vec![10u32]);
        assert!(matches!(result, Err(FcmError::InvalidDimensions(_))));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = FeatureMatrix::with_ids(
            array![[0.0], [1.0], [10.0], [11.0]],
            vec!["a", "a", "b", "c"],
        );
        assert!(matches!(result, Err(FcmError::DuplicateId { row: 1 })));

        let result = FeatureMatrix::with_ids(array![[0.0], [1.0], [2.0]], vec![7, 8, 7]);
        assert!(matches!(result, Err(FcmError::DuplicateId { row: 2 })));
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = FeatureMatrix::new(array![[1.0, 2.0], [f64::NAN, 0.0]]);
        assert!(matches!(
            result,
            Err(FcmError::NonFiniteValue { row: 1, col: 0 })
        ));
    }

    #[test]
    fn test_weights_validation() {
        let data = FeatureMatrix::new(array![[1.0, 2.0]]).unwrap();

        let weighted = data.clone().with_weights(array![0.5, 2.0]).unwrap();
        assert_eq!(weighted.weights(), array![0.5, 2.0].view());

        assert!(matches!(
            data.clone().with_weights(array![1.0]),
            Err(FcmError::InvalidDimensions(_))
        ));
        assert!(matches!(
            data.with_weights(array![1.0, -1.0]),
            Err(FcmError::InvalidWeights(_))
        ));
    }
}
