//! # gs-report
//!
//! Flattened tabular views of [`gs_types::SearchResult`]: one row per
//! candidate with parameter columns, mean/std scores, and a rank, plus a
//! plain-text rendering and a two-parameter pivot of mean scores.

mod table;

pub use table::{PivotTable, ResultsRow, ResultsTable};
