use crate::error::FcmError;
use ndarray::{ArrayView2, Zip};

/// Largest absolute per-cell difference between two membership matrices.
pub fn max_membership_delta(
    current: &ArrayView2<f64>,
    previous: &ArrayView2<f64>,
) -> Result<f64, FcmError> {
    if current.dim() != previous.dim() {
        return Err(FcmError::InvalidDimensions(format!(
            "Cannot compare membership matrices of shape {:?} and {:?}",
            current.dim(),
            previous.dim()
        )));
    }

    Ok(Zip::from(current)
        .and(previous)
        .fold(0.0_f64, |max, &a, &b| max.max((a - b).abs())))
}

/// True when no membership value moved by `threshold` or more.
pub fn has_converged(
    current: &ArrayView2<f64>,
    previous: &ArrayView2<f64>,
    threshold: f64,
) -> Result<bool, FcmError> {
    Ok(max_membership_delta(current, previous)? < threshold)
}
