//! End-to-end: grid search over a boosting classifier, reported as a table.

use gs_estimators::datasets::make_classification;
use gs_estimators::GradientBoostingClassifier;
use gs_report::ResultsTable;
use gs_search::{train_test_split, GridSearch};
use gs_types::ParameterGrid;

fn tuning_grid() -> ParameterGrid {
    ParameterGrid::new()
        .add_floats("learning_rate", &[0.05, 0.1, 0.5, 1.0, 5.0])
        .add_ints("max_leaf_nodes", &[3, 10, 30, 100])
}

#[test]
fn two_fold_search_over_twenty_candidates() {
    let (data, labels) = make_classification(80, 3);
    let template = GradientBoostingClassifier::new().with_rounds(15);

    let fitted = GridSearch::new(tuning_grid(), 2)
        .with_seed(42)
        .run(&template, &data, &labels)
        .unwrap();
    let result = fitted.result();

    assert_eq!(result.records.len(), 20);
    for record in &result.records {
        assert_eq!(record.fold_scores.len(), 2);
        // Accuracy scores.
        for score in &record.fold_scores {
            assert!((0.0..=1.0).contains(score));
        }
    }

    let table = ResultsTable::from_result(result);
    let best = table.best_row().unwrap();
    assert_eq!(best.rank_test_score, 1);
    assert_eq!(best.candidate_index, result.best_index);

    let max_mean = table
        .rows
        .iter()
        .map(|row| row.mean_test_score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(best.mean_test_score, max_mean);
}

#[test]
fn search_repeats_exactly_and_reports_identically() {
    let (data, labels) = make_classification(60, 11);
    let template = GradientBoostingClassifier::new().with_rounds(10);
    let grid = ParameterGrid::new()
        .add_floats("learning_rate", &[0.1, 0.5])
        .add_ints("max_leaf_nodes", &[3, 10]);

    let first = GridSearch::new(grid.clone(), 3)
        .with_seed(7)
        .run(&template, &data, &labels)
        .unwrap()
        .into_result();
    let second = GridSearch::new(grid, 3)
        .with_seed(7)
        .run(&template, &data, &labels)
        .unwrap()
        .into_result();

    assert_eq!(first.records, second.records);
    assert_eq!(first.best_index, second.best_index);
    assert_eq!(
        ResultsTable::from_result(&first),
        ResultsTable::from_result(&second)
    );
}

#[test]
fn refit_winner_predicts_held_out_data() {
    let (data, labels) = make_classification(100, 5);
    let (train_x, test_x, train_y, test_y) = train_test_split(&data, &labels, 0.25, 42).unwrap();

    let template = GradientBoostingClassifier::new().with_rounds(15);
    let grid = ParameterGrid::new()
        .add_floats("learning_rate", &[0.1, 0.5])
        .add_ints("max_leaf_nodes", &[3, 10]);

    let fitted = GridSearch::new(grid, 2)
        .run(&template, &train_x, &train_y)
        .unwrap();

    let predictions = fitted.predict(&test_x).unwrap();
    assert_eq!(predictions.len(), test_x.len());
    assert!(predictions.iter().all(|p| *p == 0.0 || *p == 1.0));

    // Well-separated blobs: the tuned model should beat coin flipping.
    let accuracy = fitted.score(&test_x, &test_y).unwrap();
    assert!(accuracy > 0.7, "held-out accuracy {accuracy}");
}

#[test]
fn pivot_covers_the_full_grid() {
    let (data, labels) = make_classification(60, 1);
    let template = GradientBoostingClassifier::new().with_rounds(10);

    let fitted = GridSearch::new(tuning_grid(), 2)
        .run(&template, &data, &labels)
        .unwrap();
    let table = ResultsTable::from_result(fitted.result());

    let pivot = table
        .pivot_mean_scores("learning_rate", "max_leaf_nodes")
        .unwrap();
    assert_eq!(pivot.row_values.len(), 5);
    assert_eq!(pivot.col_values.len(), 4);
    for row in &pivot.cells {
        assert!(row.iter().all(|cell| cell.is_some()));
    }
}
