//! Flattened tabular view of a search result.

use serde::{Deserialize, Serialize};

use gs_types::{score_key, ParameterValue, SearchResult};

/// One row of the flattened results: a candidate's parameter assignment,
/// mean and standard deviation of its fold scores, and its rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsRow {
    pub candidate_index: usize,
    /// `(name, value)` pairs in grid axis order.
    pub params: Vec<(String, ParameterValue)>,
    pub mean_test_score: f64,
    pub std_test_score: f64,
    /// 1 = best. Competition ranking: ties share the smallest rank, so means
    /// [0.81, 0.87, 0.87, 0.79] rank [3, 1, 1, 4].
    pub rank_test_score: usize,
}

/// Per-candidate rows in enumeration order. A pure transformation of
/// [`SearchResult`]; building it never mutates the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsTable {
    pub rows: Vec<ResultsRow>,
}

impl ResultsTable {
    pub fn from_result(result: &SearchResult) -> Self {
        let rows = result
            .records
            .iter()
            .enumerate()
            .map(|(candidate_index, record)| {
                let key = score_key(record.mean_score);
                let rank = 1 + result
                    .records
                    .iter()
                    .filter(|other| score_key(other.mean_score) > key)
                    .count();
                ResultsRow {
                    candidate_index,
                    params: record.candidate.values.clone(),
                    mean_test_score: record.mean_score,
                    std_test_score: record.std_score,
                    rank_test_score: rank,
                }
            })
            .collect();
        Self { rows }
    }

    /// Rows ordered by rank, then by candidate index within a tie.
    pub fn sorted_by_rank(&self) -> Vec<&ResultsRow> {
        let mut rows: Vec<&ResultsRow> = self.rows.iter().collect();
        rows.sort_by_key(|row| (row.rank_test_score, row.candidate_index));
        rows
    }

    /// The rank-1 row; ties resolve to the earliest-enumerated candidate.
    pub fn best_row(&self) -> Option<&ResultsRow> {
        self.sorted_by_rank().into_iter().next()
    }

    /// One-line description of the winner.
    pub fn best_summary(&self) -> String {
        match self.best_row() {
            Some(row) => {
                let params = row
                    .params
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{params} (mean score {:.4} +/- {:.4})",
                    row.mean_test_score, row.std_test_score
                )
            }
            None => "no candidates".to_string(),
        }
    }

    /// Render an aligned plain-text table, best candidate first.
    pub fn render(&self) -> String {
        let param_names: Vec<&str> = self
            .rows
            .first()
            .map(|row| row.params.iter().map(|(name, _)| name.as_str()).collect())
            .unwrap_or_default();

        let mut header: Vec<String> = vec!["rank".to_string()];
        header.extend(param_names.iter().map(|n| n.to_string()));
        header.push("mean_test_score".to_string());
        header.push("std_test_score".to_string());

        let mut body: Vec<Vec<String>> = Vec::with_capacity(self.rows.len());
        for row in self.sorted_by_rank() {
            let mut cells = vec![row.rank_test_score.to_string()];
            cells.extend(row.params.iter().map(|(_, value)| value.to_string()));
            cells.push(format!("{:.4}", row.mean_test_score));
            cells.push(format!("{:.4}", row.std_test_score));
            body.push(cells);
        }

        let mut widths: Vec<usize> = header.iter().map(String::len).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.len());
            }
        }

        let format_line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:>width$}"))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut out = format_line(&header);
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
        for cells in &body {
            out.push('\n');
            out.push_str(&format_line(cells));
        }
        out
    }

    /// Mean scores arranged on two parameter axes (the data behind a
    /// heatmap). Cells average over the remaining parameters; `None` marks
    /// combinations with no row. Returns `None` if either parameter is
    /// missing from the rows.
    pub fn pivot_mean_scores(&self, row_param: &str, col_param: &str) -> Option<PivotTable> {
        let mut row_values: Vec<ParameterValue> = Vec::new();
        let mut col_values: Vec<ParameterValue> = Vec::new();
        for row in &self.rows {
            let rv = row.params.iter().find(|(n, _)| n == row_param)?.1.clone();
            let cv = row.params.iter().find(|(n, _)| n == col_param)?.1.clone();
            if !row_values.contains(&rv) {
                row_values.push(rv);
            }
            if !col_values.contains(&cv) {
                col_values.push(cv);
            }
        }

        let mut cells = vec![vec![None; col_values.len()]; row_values.len()];
        for (i, rv) in row_values.iter().enumerate() {
            for (j, cv) in col_values.iter().enumerate() {
                let matching: Vec<f64> = self
                    .rows
                    .iter()
                    .filter(|row| {
                        row.params.iter().any(|(n, v)| n == row_param && v == rv)
                            && row.params.iter().any(|(n, v)| n == col_param && v == cv)
                    })
                    .map(|row| row.mean_test_score)
                    .collect();
                if !matching.is_empty() {
                    cells[i][j] = Some(matching.iter().sum::<f64>() / matching.len() as f64);
                }
            }
        }

        Some(PivotTable {
            row_param: row_param.to_string(),
            col_param: col_param.to_string(),
            row_values,
            col_values,
            cells,
        })
    }
}

/// Mean scores on a (row parameter x column parameter) lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub row_param: String,
    pub col_param: String,
    pub row_values: Vec<ParameterValue>,
    pub col_values: Vec<ParameterValue>,
    pub cells: Vec<Vec<Option<f64>>>,
}
