//! Per-candidate score records and the final search result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grid::Candidate;

/// Unique search run identifier.
pub type SearchId = Uuid;

/// Cross-validation scores for one candidate: the per-fold values plus their
/// mean and population standard deviation. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub candidate: Candidate,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
}

impl ScoreRecord {
    /// Aggregate a candidate's per-fold scores.
    pub fn from_scores(candidate: Candidate, fold_scores: Vec<f64>) -> Self {
        let n = fold_scores.len() as f64;
        let mean_score = fold_scores.iter().sum::<f64>() / n;
        let variance = fold_scores
            .iter()
            .map(|s| (s - mean_score) * (s - mean_score))
            .sum::<f64>()
            / n;
        Self {
            candidate,
            fold_scores,
            mean_score,
            std_score: variance.sqrt(),
        }
    }
}

/// The complete outcome of one grid-search run: every candidate's record in
/// enumeration order and the identity of the winner. Never mutated after the
/// search completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: SearchId,
    /// Seed that fixed the fold assignment.
    pub seed: u64,
    pub fold_count: usize,
    /// One record per candidate, in grid enumeration order.
    pub records: Vec<ScoreRecord>,
    /// Index into `records` of the best mean score (first wins on ties).
    pub best_index: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchResult {
    pub fn best_record(&self) -> &ScoreRecord {
        &self.records[self.best_index]
    }

    pub fn best_candidate(&self) -> &Candidate {
        &self.best_record().candidate
    }
}

/// Comparison key for mean scores: NaN maps below every number, so a NaN
/// mean can never win the search or outrank a finite one.
pub fn score_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ParameterGrid;

    fn candidate() -> Candidate {
        ParameterGrid::new()
            .add_floats("alpha", &[0.1])
            .candidates()
            .remove(0)
    }

    #[test]
    fn score_record_mean_and_std() {
        let record = ScoreRecord::from_scores(candidate(), vec![0.8, 0.9]);
        assert!((record.mean_score - 0.85).abs() < 1e-12);
        // Population std of [0.8, 0.9] is 0.05.
        assert!((record.std_score - 0.05).abs() < 1e-12);
    }

    #[test]
    fn score_record_constant_scores_have_zero_std() {
        let record = ScoreRecord::from_scores(candidate(), vec![0.7, 0.7, 0.7]);
        assert_eq!(record.mean_score, 0.7);
        assert_eq!(record.std_score, 0.0);
    }

    #[test]
    fn search_result_best_accessors() {
        let records = vec![
            ScoreRecord::from_scores(candidate(), vec![0.6, 0.6]),
            ScoreRecord::from_scores(candidate(), vec![0.9, 0.9]),
        ];
        let result = SearchResult {
            id: Uuid::new_v4(),
            seed: 42,
            fold_count: 2,
            records,
            best_index: 1,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        assert_eq!(result.best_record().mean_score, 0.9);
        assert_eq!(result.best_candidate().get("alpha").unwrap().as_f64(), Some(0.1));
    }

    #[test]
    fn score_key_orders_nan_below_every_number() {
        assert_eq!(score_key(0.5), 0.5);
        assert!(score_key(-1.0) > score_key(f64::NAN));
        assert_eq!(score_key(f64::NAN), f64::NEG_INFINITY);
    }

    #[test]
    fn search_result_serialization_round_trip() {
        let result = SearchResult {
            id: Uuid::new_v4(),
            seed: 7,
            fold_count: 2,
            records: vec![ScoreRecord::from_scores(candidate(), vec![0.5, 0.7])],
            best_index: 0,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
