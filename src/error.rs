use thiserror::Error;

/// Error types for the fuzzy c-means library
#[derive(Error, Debug)]
pub enum FcmError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The fuzziness exponent must be finite and strictly greater than 1
    #[error("Invalid fuzziness exponent {0}: must be finite and greater than 1")]
    InvalidFuzziness(f64),

    /// The termination threshold must be non-negative
    #[error("Invalid termination threshold {0}: must be non-negative")]
    InvalidThreshold(f64),

    /// The feature matrix has no rows or no columns
    #[error("Feature matrix must have at least one row and one column")]
    EmptyData,

    /// Dimension mismatch between collaborating matrices
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// Feature weights are negative or not finite
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// The feature matrix holds a NaN or infinite value
    #[error("Non-finite value at row {row}, column {col}")]
    NonFiniteValue { row: usize, col: usize },

    /// Two rows of the feature matrix share an identifier
    #[error("Duplicate identifier at row {row}")]
    DuplicateId { row: usize },

    /// A distance metric returned a negative or non-finite value
    #[error("Distance metric returned {value} for point {point} and cluster {cluster}")]
    InvalidDistance {
        point: usize,
        cluster: usize,
        value: f64,
    },

    /// The dedicated worker pool could not be created
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
