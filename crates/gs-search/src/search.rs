//! The exhaustive grid-search engine.

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info};
use uuid::Uuid;

use gs_types::{
    invalid_config, score_key, Candidate, ParameterGrid, Predictor, PredictorError, ScoreRecord,
    SearchResult, SweepError, SweepResult,
};

use crate::folds::{FoldSplit, KFold};

/// Seed used when the caller doesn't pick one.
pub const DEFAULT_SEED: u64 = 42;

/// Exhaustive search over a parameter grid, scored by k-fold cross-validation.
///
/// Every candidate in the grid's Cartesian product is evaluated on every
/// fold; the candidate with the best mean validation score (first wins on
/// ties) is refit on the entire training set. Candidate evaluations are
/// independent and run on the rayon pool by default; the result records are
/// always emitted in grid enumeration order regardless of completion order.
pub struct GridSearch {
    grid: ParameterGrid,
    fold_count: usize,
    seed: u64,
    parallel: bool,
}

impl GridSearch {
    pub fn new(grid: ParameterGrid, fold_count: usize) -> Self {
        Self {
            grid,
            fold_count,
            seed: DEFAULT_SEED,
            parallel: true,
        }
    }

    /// Seed for the fold assignment. The same seed, grid, and data reproduce
    /// the search exactly.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Evaluate candidates on the calling thread instead of the rayon pool.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Run the search: validate inputs, evaluate every candidate × fold, and
    /// refit the winner on the full training set.
    ///
    /// Any predictor failure during fitting or scoring aborts the whole run
    /// with [`SweepError::FitFailure`]; no partial result is returned.
    pub fn run(
        &self,
        template: &dyn Predictor,
        data: &[Vec<f64>],
        labels: &[f64],
    ) -> SweepResult<FittedGridSearch> {
        if data.len() != labels.len() {
            return Err(invalid_config!(
                "{} samples but {} labels",
                data.len(),
                labels.len()
            ));
        }
        self.grid.validate()?;
        let folds = KFold::new(self.fold_count)
            .with_seed(self.seed)
            .split(data.len())?;

        let candidates = self.grid.candidates();
        let started_at = Utc::now();
        info!(
            "Starting grid search: {} candidates x {} folds ({} fits)",
            candidates.len(),
            self.fold_count,
            candidates.len() * self.fold_count + 1
        );

        let evaluate = |candidate: &Candidate| -> SweepResult<ScoreRecord> {
            let mut fold_scores = Vec::with_capacity(folds.len());
            for fold in &folds {
                fold_scores.push(evaluate_fold(template, candidate, fold, data, labels)?);
            }
            let record = ScoreRecord::from_scores(candidate.clone(), fold_scores);
            debug!(
                "Candidate {} ({}) scored {:.4} +/- {:.4}",
                candidate.index, candidate, record.mean_score, record.std_score
            );
            Ok(record)
        };

        let records: Vec<ScoreRecord> = if self.parallel {
            candidates.par_iter().map(evaluate).collect::<SweepResult<_>>()?
        } else {
            candidates.iter().map(evaluate).collect::<SweepResult<_>>()?
        };

        // Strict > keeps the first-enumerated candidate on ties; score_key
        // maps NaN below every number so it can never win.
        let mut best_index = 0;
        for (i, record) in records.iter().enumerate().skip(1) {
            if score_key(record.mean_score) > score_key(records[best_index].mean_score) {
                best_index = i;
            }
        }

        let best = &records[best_index];
        let mut best_predictor = template.fresh();
        best_predictor
            .configure(&best.candidate)
            .map_err(configure_error)?;
        best_predictor
            .fit(data, labels)
            .map_err(|source| SweepError::RefitFailure {
                candidate_index: best_index,
                source,
            })?;

        info!(
            "Grid search complete: best candidate {} ({}) with mean score {:.4}",
            best.candidate.index, best.candidate, best.mean_score
        );

        Ok(FittedGridSearch {
            result: SearchResult {
                id: Uuid::new_v4(),
                seed: self.seed,
                fold_count: self.fold_count,
                records,
                best_index,
                started_at,
                finished_at: Utc::now(),
            },
            best_predictor,
        })
    }
}

/// Fit a fresh copy on the fold's training subset and score it on the
/// held-out validation subset.
fn evaluate_fold(
    template: &dyn Predictor,
    candidate: &Candidate,
    fold: &FoldSplit,
    data: &[Vec<f64>],
    labels: &[f64],
) -> SweepResult<f64> {
    let mut predictor = template.fresh();
    predictor.configure(candidate).map_err(configure_error)?;

    let (train_data, train_labels) = gather(data, labels, &fold.train_indices);
    predictor
        .fit(&train_data, &train_labels)
        .map_err(|source| SweepError::FitFailure {
            candidate_index: candidate.index,
            fold_index: fold.fold_index,
            source,
        })?;

    let (val_data, val_labels) = gather(data, labels, &fold.validation_indices);
    predictor
        .score(&val_data, &val_labels)
        .map_err(|source| SweepError::FitFailure {
            candidate_index: candidate.index,
            fold_index: fold.fold_index,
            source,
        })
}

/// Configure rejections are caller errors (bad grid), not fit failures.
fn configure_error(source: PredictorError) -> SweepError {
    SweepError::InvalidConfiguration(source.to_string())
}

fn gather(data: &[Vec<f64>], labels: &[f64], indices: &[usize]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let rows = indices.iter().map(|&i| data[i].clone()).collect();
    let targets = indices.iter().map(|&i| labels[i]).collect();
    (rows, targets)
}

/// A completed search: the full [`SearchResult`] plus the winning predictor
/// refit on the entire training set. Usable as a predictor itself.
pub struct FittedGridSearch {
    result: SearchResult,
    best_predictor: Box<dyn Predictor>,
}

impl std::fmt::Debug for FittedGridSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FittedGridSearch")
            .field("result", &self.result)
            .field("best_predictor", &self.best_predictor.name())
            .finish()
    }
}

impl FittedGridSearch {
    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn into_result(self) -> SearchResult {
        self.result
    }

    pub fn best_candidate(&self) -> &Candidate {
        self.result.best_candidate()
    }

    pub fn best_score(&self) -> f64 {
        self.result.best_record().mean_score
    }

    /// Predict with the refit winning predictor.
    pub fn predict(&self, data: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError> {
        self.best_predictor.predict(data)
    }

    /// Score the refit winning predictor on held-out data.
    pub fn score(&self, data: &[Vec<f64>], labels: &[f64]) -> Result<f64, PredictorError> {
        self.best_predictor.score(data, labels)
    }
}
