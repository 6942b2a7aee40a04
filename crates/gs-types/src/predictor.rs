//! The trainable-predictor abstraction the search is generic over.

use crate::errors::PredictorError;
use crate::grid::Candidate;

/// Capability set every tunable model exposes to the search: configure with
/// a candidate's parameter assignment, fit on training rows, predict, and
/// score against held-out data.
///
/// Implementations must be deterministic given identical inputs and
/// parameters; the search's reproducibility guarantee rests on that.
pub trait Predictor: Send + Sync {
    /// Apply one candidate's full parameter assignment to this instance.
    ///
    /// Unknown parameter names fail with [`PredictorError::UnknownParameter`],
    /// out-of-domain values with [`PredictorError::InvalidValue`]. Both are
    /// caller errors, not fit failures.
    fn configure(&mut self, candidate: &Candidate) -> Result<(), PredictorError>;

    /// Fit on `data` (rows of feature values) against `labels`.
    fn fit(&mut self, data: &[Vec<f64>], labels: &[f64]) -> Result<(), PredictorError>;

    /// Predict one target value per input row. Fails with
    /// [`PredictorError::NotFitted`] before a successful `fit`.
    fn predict(&self, data: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError>;

    /// Evaluation score on held-out data; higher is better.
    fn score(&self, data: &[Vec<f64>], labels: &[f64]) -> Result<f64, PredictorError>;

    /// A fresh unfitted copy carrying this instance's current parameters.
    /// Each cross-validation evaluation owns its own copy.
    fn fresh(&self) -> Box<dyn Predictor>;

    /// Human-readable predictor name.
    fn name(&self) -> &str;
}

/// Shared input check for `fit`/`score` implementations.
pub fn check_dimensions(data: &[Vec<f64>], labels: &[f64]) -> Result<(), PredictorError> {
    if data.len() != labels.len() {
        return Err(PredictorError::DimensionMismatch {
            message: format!("{} samples but {} labels", data.len(), labels.len()),
        });
    }
    if data.is_empty() {
        return Err(PredictorError::DimensionMismatch {
            message: "no training samples".to_string(),
        });
    }
    let width = data[0].len();
    if width == 0 {
        return Err(PredictorError::DimensionMismatch {
            message: "samples have no features".to_string(),
        });
    }
    if let Some(row) = data.iter().find(|row| row.len() != width) {
        return Err(PredictorError::DimensionMismatch {
            message: format!("ragged feature rows: expected {width}, got {}", row.len()),
        });
    }
    Ok(())
}
