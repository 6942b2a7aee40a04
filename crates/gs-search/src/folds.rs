//! Deterministic partitioning of the training set.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use gs_types::{invalid_config, SweepResult};

/// One fold: a held-out validation index set and its complementary training
/// indices. Indices point into the caller's sample order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldSplit {
    pub fold_index: usize,
    pub train_indices: Vec<usize>,
    pub validation_indices: Vec<usize>,
}

/// K-fold splitter: a seeded shuffle followed by a contiguous split, so the
/// assignment is fully determined by `(n_samples, n_splits, seed)`. The first
/// `n_samples mod n_splits` folds receive one extra sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
    seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits, seed: 0 }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Partition `0..n_samples` into `n_splits` disjoint validation sets.
    pub fn split(&self, n_samples: usize) -> SweepResult<Vec<FoldSplit>> {
        if self.n_splits < 2 {
            return Err(invalid_config!(
                "fold count must be at least 2, got {}",
                self.n_splits
            ));
        }
        if self.n_splits > n_samples {
            return Err(invalid_config!(
                "fold count {} exceeds the {} training samples",
                self.n_splits,
                n_samples
            ));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold_index in 0..self.n_splits {
            let size = base + usize::from(fold_index < extra);
            let validation_indices = indices[start..start + size].to_vec();
            let train_indices: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[start + size..].iter())
                .copied()
                .collect();
            folds.push(FoldSplit {
                fold_index,
                train_indices,
                validation_indices,
            });
            start += size;
        }

        Ok(folds)
    }
}

/// Seeded shuffled split into `(train_data, test_data, train_labels,
/// test_labels)`. `test_fraction` must leave both sides non-empty.
#[allow(clippy::type_complexity)]
pub fn train_test_split(
    data: &[Vec<f64>],
    labels: &[f64],
    test_fraction: f64,
    seed: u64,
) -> SweepResult<(Vec<Vec<f64>>, Vec<Vec<f64>>, Vec<f64>, Vec<f64>)> {
    if data.len() != labels.len() {
        return Err(invalid_config!(
            "{} samples but {} labels",
            data.len(),
            labels.len()
        ));
    }
    if data.len() < 2 {
        return Err(invalid_config!(
            "need at least 2 samples to split, got {}",
            data.len()
        ));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(invalid_config!(
            "test fraction must be in (0, 1), got {test_fraction}"
        ));
    }

    let n_samples = data.len();
    let n_test = ((n_samples as f64 * test_fraction).round() as usize).clamp(1, n_samples - 1);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let train_data = train_idx.iter().map(|&i| data[i].clone()).collect();
    let test_data = test_idx.iter().map(|&i| data[i].clone()).collect();
    let train_labels = train_idx.iter().map(|&i| labels[i]).collect();
    let test_labels = test_idx.iter().map(|&i| labels[i]).collect();

    Ok((train_data, test_data, train_labels, test_labels))
}
