//! Parameter grid definitions and candidate enumeration.

use serde::{Deserialize, Serialize};

use crate::errors::{SweepError, SweepResult};

/// A concrete value a tunable parameter can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    // Int before Float so untagged deserialization keeps whole numbers integral.
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ParameterValue {
    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        self.as_i64().and_then(|v| usize::try_from(v).ok())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

/// One named axis of the grid: an ordered sequence of candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAxis {
    pub name: String,
    pub values: Vec<ParameterValue>,
}

/// The full grid: an ordered list of parameter axes.
///
/// Candidates are enumerated as the Cartesian product of the axes with the
/// last-listed axis varying fastest. The order is stable across runs for
/// identical grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    pub axes: Vec<ParameterAxis>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self { axes: Vec::new() }
    }

    pub fn add_values(mut self, name: impl Into<String>, values: Vec<ParameterValue>) -> Self {
        self.axes.push(ParameterAxis {
            name: name.into(),
            values,
        });
        self
    }

    pub fn add_floats(self, name: impl Into<String>, values: &[f64]) -> Self {
        self.add_values(
            name,
            values.iter().copied().map(ParameterValue::Float).collect(),
        )
    }

    pub fn add_ints(self, name: impl Into<String>, values: &[i64]) -> Self {
        self.add_values(
            name,
            values.iter().copied().map(ParameterValue::Int).collect(),
        )
    }

    pub fn add_strs(self, name: impl Into<String>, values: &[&str]) -> Self {
        self.add_values(
            name,
            values
                .iter()
                .map(|v| ParameterValue::Str((*v).to_string()))
                .collect(),
        )
    }

    pub fn add_bools(self, name: impl Into<String>, values: &[bool]) -> Self {
        self.add_values(
            name,
            values.iter().copied().map(ParameterValue::Bool).collect(),
        )
    }

    /// Total number of candidates: the product of the axis lengths.
    /// Zero when the grid has no axes or any axis is empty.
    pub fn candidate_count(&self) -> usize {
        if self.axes.is_empty() {
            return 0;
        }
        let mut total: usize = 1;
        for axis in &self.axes {
            total = match total.checked_mul(axis.values.len()) {
                Some(t) => t,
                None => return usize::MAX,
            };
        }
        total
    }

    /// Check the grid is usable for a search: at least one axis, every axis
    /// non-empty, and no duplicate axis names.
    pub fn validate(&self) -> SweepResult<()> {
        if self.axes.is_empty() {
            return Err(SweepError::InvalidConfiguration(
                "parameter grid is empty".to_string(),
            ));
        }
        for axis in &self.axes {
            if axis.values.is_empty() {
                return Err(SweepError::InvalidConfiguration(format!(
                    "parameter {} has no candidate values",
                    axis.name
                )));
            }
        }
        for (i, axis) in self.axes.iter().enumerate() {
            if self.axes[..i].iter().any(|other| other.name == axis.name) {
                return Err(SweepError::InvalidConfiguration(format!(
                    "duplicate parameter name: {}",
                    axis.name
                )));
            }
        }
        Ok(())
    }

    /// Enumerate every candidate in the fixed Cartesian-product order.
    pub fn candidates(&self) -> Vec<Candidate> {
        if self.axes.is_empty() || self.axes.iter().any(|axis| axis.values.is_empty()) {
            return Vec::new();
        }

        // Cartesian product: extend partial assignments one axis at a time,
        // so the last axis varies fastest.
        let mut result: Vec<Vec<(String, ParameterValue)>> = vec![Vec::new()];
        for axis in &self.axes {
            let mut next = Vec::with_capacity(result.len() * axis.values.len());
            for existing in &result {
                for value in &axis.values {
                    let mut assignment = existing.clone();
                    assignment.push((axis.name.clone(), value.clone()));
                    next.push(assignment);
                }
            }
            result = next;
        }

        result
            .into_iter()
            .enumerate()
            .map(|(index, values)| Candidate { index, values })
            .collect()
    }

    /// Axis names in grid order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.axes.iter().map(|axis| axis.name.as_str()).collect()
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// One full assignment of a value to every parameter in the grid, tagged
/// with its position in the enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: usize,
    /// `(name, value)` pairs in grid axis order.
    pub values: Vec<(String, ParameterValue)>,
}

impl Candidate {
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, value) in &self.values {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}
