//! Tune a gradient boosting classifier over a learning-rate x leaf-count
//! grid, print the ranked results, and score the winner on held-out data.
//!
//! Run with `cargo run -p gs-report --example tune_boosting`.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gs_estimators::datasets::make_classification;
use gs_estimators::GradientBoostingClassifier;
use gs_report::ResultsTable;
use gs_search::{train_test_split, GridSearch};
use gs_types::ParameterGrid;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (data, labels) = make_classification(200, 42);
    let (train_x, test_x, train_y, test_y) = train_test_split(&data, &labels, 0.25, 42)?;
    info!(
        "Tuning on {} samples, holding out {}",
        train_x.len(),
        test_x.len()
    );

    let grid = ParameterGrid::new()
        .add_floats("learning_rate", &[0.05, 0.1, 0.5, 1.0, 5.0])
        .add_ints("max_leaf_nodes", &[3, 10, 30, 100]);

    let template = GradientBoostingClassifier::new().with_rounds(50);
    let fitted = GridSearch::new(grid, 2)
        .with_seed(42)
        .run(&template, &train_x, &train_y)?;

    let table = ResultsTable::from_result(fitted.result());
    println!("{}", table.render());
    println!();
    println!("Best: {}", table.best_summary());

    let accuracy = fitted.score(&test_x, &test_y)?;
    println!("Held-out accuracy: {accuracy:.4}");
    Ok(())
}
