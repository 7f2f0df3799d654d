//! Boundary trait for externally trained win-probability models.

use crate::error::Result;
use crate::models::FeatureRow;

/// A trained binary classifier over pre-race features.
///
/// Implementations own their artifacts (weights, runtime handles) and are
/// injected into the service at construction. This crate never trains,
/// loads or serializes a model itself; it only scores rows through this
/// trait and normalizes the results across the field.
pub trait WinProbabilityModel: Send + Sync {
    /// Scores one entrant. Returns `(p_other, p_win)`: the probability the
    /// row does not / does win the race. Scores need not be calibrated
    /// across entrants; the caller renormalizes the winning-class column.
    fn predict_proba(&self, row: &FeatureRow) -> Result<(f64, f64)>;
}
