//! Gradient-boosted regression trees for binary classification.
//!
//! Logistic boosting: the model keeps a raw additive score per sample,
//! initialized to the prior log-odds, and each round fits a small regression
//! tree to the residuals `y - sigmoid(score)`. Trees grow best-first, one
//! leaf at a time, capped by `max_leaf_nodes`.

use tracing::debug;

use gs_types::{check_dimensions, Candidate, Predictor, PredictorError};

const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A regression tree stored as a node arena.
#[derive(Debug, Clone)]
struct RegressionTree {
    nodes: Vec<Node>,
}

/// The best split found for one leaf's samples.
struct SplitChoice {
    gain: f64,
    feature: usize,
    threshold: f64,
    left_indices: Vec<usize>,
    right_indices: Vec<usize>,
}

/// A leaf eligible for expansion.
struct FrontierLeaf {
    node: usize,
    choice: SplitChoice,
}

impl RegressionTree {
    /// Fit to `targets` with best-first growth: repeatedly expand the leaf
    /// whose split reduces squared error the most, until `max_leaf_nodes`
    /// leaves exist or no split has positive gain.
    fn fit(data: &[Vec<f64>], targets: &[f64], max_leaf_nodes: usize) -> Self {
        let all: Vec<usize> = (0..data.len()).collect();
        let mut nodes = vec![Node::Leaf {
            value: mean(targets, &all),
        }];
        let mut frontier: Vec<FrontierLeaf> = Vec::new();
        if let Some(choice) = best_split(data, targets, &all) {
            frontier.push(FrontierLeaf { node: 0, choice });
        }

        let mut leaf_count = 1;
        while leaf_count < max_leaf_nodes && !frontier.is_empty() {
            // Strict > keeps the earliest-created leaf on equal gains.
            let mut best = 0;
            for (i, leaf) in frontier.iter().enumerate().skip(1) {
                if leaf.choice.gain > frontier[best].choice.gain {
                    best = i;
                }
            }
            let FrontierLeaf { node, choice } = frontier.swap_remove(best);

            let left = nodes.len();
            nodes.push(Node::Leaf {
                value: mean(targets, &choice.left_indices),
            });
            let right = nodes.len();
            nodes.push(Node::Leaf {
                value: mean(targets, &choice.right_indices),
            });
            nodes[node] = Node::Split {
                feature: choice.feature,
                threshold: choice.threshold,
                left,
                right,
            };
            leaf_count += 1;

            if let Some(next) = best_split(data, targets, &choice.left_indices) {
                frontier.push(FrontierLeaf { node: left, choice: next });
            }
            if let Some(next) = best_split(data, targets, &choice.right_indices) {
                frontier.push(FrontierLeaf { node: right, choice: next });
            }
        }

        Self { nodes }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut current = 0;
        loop {
            match &self.nodes[current] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    current = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

/// Best squared-error-reducing split over all features for one leaf's
/// samples, or `None` if no split separates the samples. Ties break toward
/// the lowest feature index and lowest threshold.
fn best_split(data: &[Vec<f64>], targets: &[f64], indices: &[usize]) -> Option<SplitChoice> {
    if indices.len() < 2 {
        return None;
    }
    let n_features = data[indices[0]].len();
    let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let parent_score = total_sum * total_sum / indices.len() as f64;

    let mut best: Option<SplitChoice> = None;
    for feature in 0..n_features {
        let mut ordered: Vec<usize> = indices.to_vec();
        ordered.sort_by(|&a, &b| {
            data[a][feature]
                .partial_cmp(&data[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_sum = 0.0;
        for cut in 1..ordered.len() {
            left_sum += targets[ordered[cut - 1]];
            let lo = data[ordered[cut - 1]][feature];
            let hi = data[ordered[cut]][feature];
            if lo == hi {
                continue; // identical feature values can't be separated
            }

            let left_n = cut as f64;
            let right_n = (ordered.len() - cut) as f64;
            let right_sum = total_sum - left_sum;
            let gain =
                left_sum * left_sum / left_n + right_sum * right_sum / right_n - parent_score;

            if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(SplitChoice {
                    gain,
                    feature,
                    threshold: (lo + hi) / 2.0,
                    left_indices: ordered[..cut].to_vec(),
                    right_indices: ordered[cut..].to_vec(),
                });
            }
        }
    }
    best
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Binary gradient-boosting classifier over best-first regression trees.
///
/// Labels must be 0 or 1. Tunable parameters: `learning_rate` (> 0),
/// `max_leaf_nodes` (>= 2), and `n_rounds` (>= 1).
#[derive(Debug, Clone)]
pub struct GradientBoostingClassifier {
    learning_rate: f64,
    max_leaf_nodes: usize,
    n_rounds: usize,
    base_score: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingClassifier {
    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            max_leaf_nodes: 31,
            n_rounds: 100,
            base_score: 0.0,
            trees: Vec::new(),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_leaf_nodes(mut self, max_leaf_nodes: usize) -> Self {
        self.max_leaf_nodes = max_leaf_nodes;
        self
    }

    pub fn with_rounds(mut self, n_rounds: usize) -> Self {
        self.n_rounds = n_rounds;
        self
    }

    /// Class-1 probability per row.
    pub fn predict_proba(&self, data: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError> {
        if self.trees.is_empty() {
            return Err(PredictorError::NotFitted);
        }
        Ok(data
            .iter()
            .map(|row| {
                let raw: f64 = self.base_score
                    + self.learning_rate
                        * self
                            .trees
                            .iter()
                            .map(|tree| tree.predict_row(row))
                            .sum::<f64>();
                sigmoid(raw)
            })
            .collect())
    }
}

impl Default for GradientBoostingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for GradientBoostingClassifier {
    fn configure(&mut self, candidate: &Candidate) -> Result<(), PredictorError> {
        for (name, value) in &candidate.values {
            match name.as_str() {
                "learning_rate" => {
                    let rate = value.as_f64().ok_or_else(|| PredictorError::InvalidValue {
                        name: name.clone(),
                        message: "expected a number".to_string(),
                    })?;
                    if !rate.is_finite() || rate <= 0.0 {
                        return Err(PredictorError::InvalidValue {
                            name: name.clone(),
                            message: format!("must be a finite positive number, got {rate}"),
                        });
                    }
                    self.learning_rate = rate;
                }
                "max_leaf_nodes" => {
                    let leaves = value.as_usize().ok_or_else(|| PredictorError::InvalidValue {
                        name: name.clone(),
                        message: "expected a non-negative integer".to_string(),
                    })?;
                    if leaves < 2 {
                        return Err(PredictorError::InvalidValue {
                            name: name.clone(),
                            message: format!("must be at least 2, got {leaves}"),
                        });
                    }
                    self.max_leaf_nodes = leaves;
                }
                "n_rounds" => {
                    let rounds = value.as_usize().ok_or_else(|| PredictorError::InvalidValue {
                        name: name.clone(),
                        message: "expected a non-negative integer".to_string(),
                    })?;
                    if rounds == 0 {
                        return Err(PredictorError::InvalidValue {
                            name: name.clone(),
                            message: "must be at least 1".to_string(),
                        });
                    }
                    self.n_rounds = rounds;
                }
                other => {
                    return Err(PredictorError::UnknownParameter {
                        name: other.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    fn fit(&mut self, data: &[Vec<f64>], labels: &[f64]) -> Result<(), PredictorError> {
        check_dimensions(data, labels)?;
        if let Some(bad) = labels.iter().find(|&&y| y != 0.0 && y != 1.0) {
            return Err(PredictorError::InvalidValue {
                name: "labels".to_string(),
                message: format!("binary classifier expects 0 or 1 labels, got {bad}"),
            });
        }

        let positive_rate = (labels.iter().sum::<f64>() / labels.len() as f64)
            .clamp(1e-6, 1.0 - 1e-6);
        self.base_score = (positive_rate / (1.0 - positive_rate)).ln();
        self.trees = Vec::with_capacity(self.n_rounds);

        let mut scores = vec![self.base_score; data.len()];
        let mut residuals = vec![0.0; data.len()];
        for _ in 0..self.n_rounds {
            for (r, (&y, &s)) in residuals.iter_mut().zip(labels.iter().zip(&scores)) {
                *r = y - sigmoid(s);
            }
            if residuals.iter().all(|r| r.abs() < 1e-9) {
                break; // already fit exactly
            }

            let tree = RegressionTree::fit(data, &residuals, self.max_leaf_nodes);
            for (s, row) in scores.iter_mut().zip(data) {
                *s += self.learning_rate * tree.predict_row(row);
            }
            self.trees.push(tree);
        }
        debug!(
            "Boosting fit on {} samples: {} trees, lr {}",
            data.len(),
            self.trees.len(),
            self.learning_rate
        );
        Ok(())
    }

    fn predict(&self, data: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError> {
        Ok(self
            .predict_proba(data)?
            .into_iter()
            .map(|p| if p >= 0.5 { 1.0 } else { 0.0 })
            .collect())
    }

    /// Classification accuracy.
    fn score(&self, data: &[Vec<f64>], labels: &[f64]) -> Result<f64, PredictorError> {
        check_dimensions(data, labels)?;
        let predictions = self.predict(data)?;
        let correct = predictions
            .iter()
            .zip(labels)
            .filter(|(p, y)| p == y)
            .count();
        Ok(correct as f64 / labels.len() as f64)
    }

    fn fresh(&self) -> Box<dyn Predictor> {
        Box::new(Self {
            learning_rate: self.learning_rate,
            max_leaf_nodes: self.max_leaf_nodes,
            n_rounds: self.n_rounds,
            base_score: 0.0,
            trees: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "gradient_boosting_classifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{make_classification, make_xor};
    use gs_types::ParameterGrid;

    #[test]
    fn tree_fits_a_step_function() {
        let data: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| if i < 5 { -1.0 } else { 1.0 }).collect();

        let tree = RegressionTree::fit(&data, &targets, 2);
        assert!((tree.predict_row(&[2.0]) + 1.0).abs() < 1e-12);
        assert!((tree.predict_row(&[7.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tree_respects_the_leaf_cap() {
        let data: Vec<Vec<f64>> = (0..32).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..32).map(|i| (i % 4) as f64).collect();

        let tree = RegressionTree::fit(&data, &targets, 3);
        let leaves = tree
            .nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count();
        assert_eq!(leaves, 3);
    }

    #[test]
    fn tree_with_constant_targets_stays_a_stump() {
        let data: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let tree = RegressionTree::fit(&data, &[0.5; 8], 10);
        assert_eq!(tree.nodes.len(), 1);
        assert!((tree.predict_row(&[3.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn classifier_separates_two_blobs() {
        let (data, labels) = make_classification(100, 0);
        let mut model = GradientBoostingClassifier::new().with_rounds(30);
        model.fit(&data, &labels).unwrap();

        let accuracy = model.score(&data, &labels).unwrap();
        assert!(accuracy > 0.9, "accuracy {accuracy} too low");
    }

    #[test]
    fn xor_needs_more_than_a_stump() {
        let (data, labels) = make_xor(200, 1);

        // Two leaves per tree: each tree is a single axis-aligned cut, which
        // cannot capture the interaction.
        let mut stumps = GradientBoostingClassifier::new()
            .with_rounds(40)
            .with_max_leaf_nodes(2);
        stumps.fit(&data, &labels).unwrap();
        let stump_accuracy = stumps.score(&data, &labels).unwrap();

        let mut deeper = GradientBoostingClassifier::new()
            .with_rounds(40)
            .with_max_leaf_nodes(4);
        deeper.fit(&data, &labels).unwrap();
        let deep_accuracy = deeper.score(&data, &labels).unwrap();

        assert!(deep_accuracy > 0.9, "deep accuracy {deep_accuracy}");
        assert!(deep_accuracy > stump_accuracy);
    }

    #[test]
    fn probabilities_are_probabilities() {
        let (data, labels) = make_classification(60, 2);
        let mut model = GradientBoostingClassifier::new().with_rounds(10);
        model.fit(&data, &labels).unwrap();

        for p in model.predict_proba(&data).unwrap() {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn rejects_non_binary_labels() {
        let data = vec![vec![0.0], vec![1.0]];
        let mut model = GradientBoostingClassifier::new();
        let err = model.fit(&data, &[0.0, 2.0]).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidValue { .. }));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = GradientBoostingClassifier::new();
        assert_eq!(
            model.predict(&[vec![1.0]]).unwrap_err(),
            PredictorError::NotFitted
        );
    }

    #[test]
    fn configure_applies_and_validates_grid_parameters() {
        let candidate = ParameterGrid::new()
            .add_floats("learning_rate", &[0.5])
            .add_ints("max_leaf_nodes", &[8])
            .add_ints("n_rounds", &[25])
            .candidates()
            .remove(0);

        let mut model = GradientBoostingClassifier::new();
        model.configure(&candidate).unwrap();
        assert_eq!(model.learning_rate, 0.5);
        assert_eq!(model.max_leaf_nodes, 8);
        assert_eq!(model.n_rounds, 25);

        let zero_rate = ParameterGrid::new()
            .add_floats("learning_rate", &[0.0])
            .candidates()
            .remove(0);
        assert!(matches!(
            model.configure(&zero_rate),
            Err(PredictorError::InvalidValue { .. })
        ));

        let one_leaf = ParameterGrid::new()
            .add_ints("max_leaf_nodes", &[1])
            .candidates()
            .remove(0);
        assert!(matches!(
            model.configure(&one_leaf),
            Err(PredictorError::InvalidValue { .. })
        ));
    }

    #[test]
    fn refitting_is_deterministic() {
        let (data, labels) = make_classification(80, 5);
        let mut a = GradientBoostingClassifier::new().with_rounds(15);
        a.fit(&data, &labels).unwrap();
        let mut b = GradientBoostingClassifier::new().with_rounds(15);
        b.fit(&data, &labels).unwrap();

        assert_eq!(
            a.predict_proba(&data).unwrap(),
            b.predict_proba(&data).unwrap()
        );
    }
}
