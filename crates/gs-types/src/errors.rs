use thiserror::Error;

/// Main error type for a grid-search run
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Fit failure for candidate {candidate_index} on fold {fold_index}: {source}")]
    FitFailure {
        candidate_index: usize,
        fold_index: usize,
        source: PredictorError,
    },

    #[error("Refit failure for winning candidate {candidate_index}: {source}")]
    RefitFailure {
        candidate_index: usize,
        source: PredictorError,
    },

    #[error("Predictor error: {0}")]
    Predictor(#[from] PredictorError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by a predictor implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictorError {
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Invalid value for parameter {name}: {message}")]
    InvalidValue { name: String, message: String },

    #[error("Predictor has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: {message}")]
    DimensionMismatch { message: String },

    #[error("Numeric error: {message}")]
    Numeric { message: String },
}

/// Result type alias for GridSweep operations
pub type SweepResult<T> = Result<T, SweepError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! invalid_config {
    ($($arg:tt)*) => {
        $crate::errors::SweepError::InvalidConfiguration(format!($($arg)*))
    };
}
