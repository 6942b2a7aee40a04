//! # gs-search
//!
//! Exhaustive hyperparameter grid search for GridSweep.
//!
//! Provides deterministic k-fold partitioning, a seeded train/test split
//! helper, and the [`GridSearch`] engine that evaluates every candidate in a
//! [`gs_types::ParameterGrid`] via cross-validation and refits the winner on
//! the full training set.

mod folds;
mod search;

pub use folds::{train_test_split, FoldSplit, KFold};
pub use search::{FittedGridSearch, GridSearch, DEFAULT_SEED};
