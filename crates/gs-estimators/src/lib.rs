//! # gs-estimators
//!
//! Concrete [`gs_types::Predictor`] implementations for GridSweep, plus
//! seeded synthetic datasets for examples and tests.

pub mod boosting;
pub mod datasets;
pub mod linear;

pub use boosting::GradientBoostingClassifier;
pub use linear::RidgeRegression;
