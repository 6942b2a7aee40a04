//! Linear least-squares regression with L2 regularization.

use gs_types::{check_dimensions, Candidate, Predictor, PredictorError};

/// Ridge regression fit by the normal equations on mean-centered data, so
/// the intercept is never penalized. `alpha = 0` recovers ordinary least
/// squares. Tunable parameters: `alpha` (>= 0) and `fit_intercept`.
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    alpha: f64,
    fit_intercept: bool,
    weights: Option<Vec<f64>>,
    intercept: f64,
}

impl RidgeRegression {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
            weights: None,
            intercept: 0.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fitted coefficients, one per feature.
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for RidgeRegression {
    fn configure(&mut self, candidate: &Candidate) -> Result<(), PredictorError> {
        for (name, value) in &candidate.values {
            match name.as_str() {
                "alpha" => {
                    let alpha = value.as_f64().ok_or_else(|| PredictorError::InvalidValue {
                        name: name.clone(),
                        message: "expected a number".to_string(),
                    })?;
                    if !alpha.is_finite() || alpha < 0.0 {
                        return Err(PredictorError::InvalidValue {
                            name: name.clone(),
                            message: format!("must be a finite non-negative number, got {alpha}"),
                        });
                    }
                    self.alpha = alpha;
                }
                "fit_intercept" => {
                    self.fit_intercept =
                        value.as_bool().ok_or_else(|| PredictorError::InvalidValue {
                            name: name.clone(),
                            message: "expected a boolean".to_string(),
                        })?;
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
        let n = data.len();
        let d = data[0].len();

        let (x_mean, y_mean) = if self.fit_intercept {
            let mut x_mean = vec![0.0; d];
            for row in data {
                for (m, x) in x_mean.iter_mut().zip(row) {
                    *m += x;
                }
            }
            for m in &mut x_mean {
                *m /= n as f64;
            }
            let y_mean = labels.iter().sum::<f64>() / n as f64;
            (x_mean, y_mean)
        } else {
            (vec![0.0; d], 0.0)
        };

        // Normal equations on centered data: (Xc^T Xc + alpha I) w = Xc^T yc.
        let mut gram = vec![vec![0.0; d]; d];
        let mut moment = vec![0.0; d];
        for (row, &y) in data.iter().zip(labels) {
            let yc = y - y_mean;
            for j in 0..d {
                let xj = row[j] - x_mean[j];
                moment[j] += xj * yc;
                for k in j..d {
                    gram[j][k] += xj * (row[k] - x_mean[k]);
                }
            }
        }
        for j in 0..d {
            for k in 0..j {
                gram[j][k] = gram[k][j];
            }
            gram[j][j] += self.alpha;
        }

        let weights = solve(gram, moment)?;
        self.intercept = y_mean
            - weights
                .iter()
                .zip(&x_mean)
                .map(|(w, m)| w * m)
                .sum::<f64>();
        self.weights = Some(weights);
        Ok(())
    }

    fn predict(&self, data: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError> {
        let weights = self.weights.as_ref().ok_or(PredictorError::NotFitted)?;
        data.iter()
            .map(|row| {
                if row.len() != weights.len() {
                    return Err(PredictorError::DimensionMismatch {
                        message: format!(
                            "expected {} features, got {}",
                            weights.len(),
                            row.len()
                        ),
                    });
                }
                Ok(self.intercept + weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>())
            })
            .collect()
    }

    /// Coefficient of determination R^2.
    fn score(&self, data: &[Vec<f64>], labels: &[f64]) -> Result<f64, PredictorError> {
        check_dimensions(data, labels)?;
        let predictions = self.predict(data)?;

        let mean = labels.iter().sum::<f64>() / labels.len() as f64;
        let ss_res: f64 = predictions
            .iter()
            .zip(labels)
            .map(|(p, y)| (y - p) * (y - p))
            .sum();
        let ss_tot: f64 = labels.iter().map(|y| (y - mean) * (y - mean)).sum();

        if ss_tot == 0.0 {
            // Constant target: perfect predictions score 1, anything else 0.
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }

    fn fresh(&self) -> Box<dyn Predictor> {
        Box::new(Self {
            alpha: self.alpha,
            fit_intercept: self.fit_intercept,
            weights: None,
            intercept: 0.0,
        })
    }

    fn name(&self) -> &str {
        "ridge_regression"
    }
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, PredictorError> {
    let d = b.len();
    for col in 0..d {
        let pivot_row = (col..d)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if a[pivot_row][col].abs() < 1e-12 {
            return Err(PredictorError::Numeric {
                message: "singular normal equations; increase alpha".to_string(),
            });
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..d {
            let factor = a[row][col] / a[col][col];
            for k in col..d {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; d];
    for col in (0..d).rev() {
        let tail: f64 = (col + 1..d).map(|k| a[col][k] * x[k]).sum();
        x[col] = (b[col] - tail) / a[col][col];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_types::ParameterGrid;

    fn line_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        // y = 2x + 1, exactly.
        let data: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let labels: Vec<f64> = data.iter().map(|row| 2.0 * row[0] + 1.0).collect();
        (data, labels)
    }

    #[test]
    fn ols_recovers_an_exact_line() {
        let (data, labels) = line_data();
        let mut model = RidgeRegression::new().with_alpha(0.0);
        model.fit(&data, &labels).unwrap();

        let weights = model.weights().unwrap();
        assert!((weights[0] - 2.0).abs() < 1e-9);
        assert!((model.intercept() - 1.0).abs() < 1e-9);
        assert!((model.score(&data, &labels).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ols_handles_multiple_features() {
        // y = 3a - 2b + 0.5
        let data: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![i as f64, (i * i % 7) as f64])
            .collect();
        let labels: Vec<f64> = data
            .iter()
            .map(|row| 3.0 * row[0] - 2.0 * row[1] + 0.5)
            .collect();

        let mut model = RidgeRegression::new().with_alpha(0.0);
        model.fit(&data, &labels).unwrap();
        let weights = model.weights().unwrap();
        assert!((weights[0] - 3.0).abs() < 1e-8);
        assert!((weights[1] + 2.0).abs() < 1e-8);
        assert!((model.intercept() - 0.5).abs() < 1e-8);
    }

    #[test]
    fn larger_alpha_shrinks_the_weights() {
        let (data, labels) = line_data();

        let mut loose = RidgeRegression::new().with_alpha(0.0);
        loose.fit(&data, &labels).unwrap();
        let mut tight = RidgeRegression::new().with_alpha(100.0);
        tight.fit(&data, &labels).unwrap();

        assert!(tight.weights().unwrap()[0].abs() < loose.weights().unwrap()[0].abs());
    }

    #[test]
    fn without_intercept_the_fit_passes_through_origin() {
        let data: Vec<Vec<f64>> = (1..10).map(|i| vec![i as f64]).collect();
        let labels: Vec<f64> = data.iter().map(|row| 4.0 * row[0]).collect();

        let mut model = RidgeRegression::new()
            .with_alpha(0.0)
            .with_intercept(false);
        model.fit(&data, &labels).unwrap();
        assert_eq!(model.intercept(), 0.0);
        assert!((model.weights().unwrap()[0] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = RidgeRegression::new();
        let err = model.predict(&[vec![1.0]]).unwrap_err();
        assert_eq!(err, PredictorError::NotFitted);
    }

    #[test]
    fn configure_applies_grid_parameters() {
        let grid = ParameterGrid::new()
            .add_floats("alpha", &[0.5])
            .add_bools("fit_intercept", &[false]);
        let candidate = grid.candidates().remove(0);

        let mut model = RidgeRegression::new();
        model.configure(&candidate).unwrap();
        assert_eq!(model.alpha, 0.5);
        assert!(!model.fit_intercept);
    }

    #[test]
    fn configure_rejects_unknown_and_invalid_parameters() {
        let mut model = RidgeRegression::new();

        let bogus = ParameterGrid::new()
            .add_floats("bogus", &[1.0])
            .candidates()
            .remove(0);
        assert!(matches!(
            model.configure(&bogus),
            Err(PredictorError::UnknownParameter { .. })
        ));

        let negative = ParameterGrid::new()
            .add_floats("alpha", &[-1.0])
            .candidates()
            .remove(0);
        assert!(matches!(
            model.configure(&negative),
            Err(PredictorError::InvalidValue { .. })
        ));
    }

    #[test]
    fn fresh_copies_parameters_but_not_the_fit() {
        let (data, labels) = line_data();
        let mut model = RidgeRegression::new().with_alpha(0.25);
        model.fit(&data, &labels).unwrap();

        let copy = model.fresh();
        assert!(copy.predict(&data).is_err()); // unfitted
    }

    #[test]
    fn duplicate_feature_is_singular_without_regularization() {
        // Two identical columns: OLS has no unique solution.
        let data: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, i as f64]).collect();
        let labels: Vec<f64> = (0..10).map(|i| i as f64).collect();

        let mut model = RidgeRegression::new().with_alpha(0.0);
        let err = model.fit(&data, &labels).unwrap_err();
        assert!(matches!(err, PredictorError::Numeric { .. }));

        // A little ridge makes it solvable.
        let mut model = RidgeRegression::new().with_alpha(0.1);
        assert!(model.fit(&data, &labels).is_ok());
    }
}
