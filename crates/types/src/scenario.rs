//! Raw scenario input
//!
//! A [`Scenario`] is what a caller collects before validation: signed
//! integers exactly as typed or read from a file. Nothing here is trusted
//! until [`Scenario::validate`] turns it into an [`AllocationState`].

use banker_errors::{InputError, ValidationError};
use serde::{Deserialize, Serialize};

use crate::AllocationState;

/// Unvalidated allocation, maximum demand and available tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Declared process count (inferred from `allocation` when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processes: Option<usize>,
    /// Declared resource count (inferred from `available` when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<usize>,
    #[serde(default)]
    pub allocation: Vec<Vec<i64>>,
    #[serde(default)]
    pub max_demand: Vec<Vec<i64>>,
    #[serde(default)]
    pub available: Vec<i64>,
}

impl Scenario {
    /// Build a scenario from text rows, one row per process
    ///
    /// # Errors
    ///
    /// Returns an error if any row contains a non-integer token. Empty rows are
    /// kept as zero-length rows, which is how zero resource types are written.
    pub fn from_rows<S: AsRef<str>>(
        allocation: &[S],
        max_demand: &[S],
        available: &str,
    ) -> Result<Self, InputError> {
        Ok(Self {
            processes: None,
            resources: None,
            allocation: parse_rows(allocation)?,
            max_demand: parse_rows(max_demand)?,
            available: parse_row(available)?,
        })
    }

    /// Parse a TOML scenario document
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Parse`] if the document is not valid TOML or
    /// does not match the scenario layout.
    pub fn from_toml_str(contents: &str) -> Result<Self, InputError> {
        toml::from_str(contents).map_err(|e| InputError::Parse {
            message: e.to_string(),
        })
    }

    /// Parse a JSON scenario document
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Parse`] if the document is not valid JSON or
    /// does not match the scenario layout.
    pub fn from_json_str(contents: &str) -> Result<Self, InputError> {
        serde_json::from_str(contents).map_err(|e| InputError::Parse {
            message: e.to_string(),
        })
    }

    /// Declared `(processes, resources)`, falling back to the table sizes
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (
            self.processes.unwrap_or(self.allocation.len()),
            self.resources.unwrap_or(self.available.len()),
        )
    }

    /// Run the tables through [`AllocationState::validate`]
    ///
    /// # Errors
    ///
    /// Propagates any [`ValidationError`] from the validator.
    pub fn validate(&self) -> Result<AllocationState, ValidationError> {
        let (processes, resources) = self.dimensions();
        AllocationState::validate(
            processes,
            resources,
            &self.allocation,
            &self.max_demand,
            &self.available,
        )
    }
}

/// Parse one row of integers separated by commas and/or whitespace
///
/// # Errors
///
/// Returns [`InputError::InvalidNumber`] for any token that is not an
/// integer. A blank row parses to an empty one; a length that does not match
/// the resource count is caught later by validation.
pub fn parse_row(row: &str) -> Result<Vec<i64>, InputError> {
    row.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<i64>().map_err(|_| InputError::InvalidNumber {
                row: row.to_string(),
                token: token.to_string(),
            })
        })
        .collect()
}

fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<Vec<Vec<i64>>, InputError> {
    rows.iter().map(|row| parse_row(row.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_separators() {
        assert_eq!(parse_row("3,3,2").unwrap(), vec![3, 3, 2]);
        assert_eq!(parse_row(" 3, 3 2 ").unwrap(), vec![3, 3, 2]);
        assert_eq!(parse_row("7\t5  3").unwrap(), vec![7, 5, 3]);
        assert_eq!(parse_row("-1,2").unwrap(), vec![-1, 2]);
    }

    #[test]
    fn test_parse_row_errors() {
        match parse_row("1, x, 3") {
            Err(InputError::InvalidNumber { token, .. }) => assert_eq!(token, "x"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_blank_rows_describe_zero_resources() {
        assert_eq!(parse_row("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_row(" , ").unwrap(), Vec::<i64>::new());

        let scenario = Scenario::from_rows(&["", ""], &["", ""], "").unwrap();
        assert_eq!(scenario.dimensions(), (2, 0));
        let state = scenario.validate().unwrap();
        assert_eq!(state.resources(), 0);
        assert_eq!(state.need(1), Some(Vec::new()));
    }

    #[test]
    fn test_blank_row_with_resources_is_a_shape_error() {
        let scenario = Scenario::from_rows(&["1,0", ""], &["2,2", "1,1"], "1,1").unwrap();
        assert!(matches!(
            scenario.validate(),
            Err(ValidationError::Shape {
                row: Some(1),
                expected: 2,
                actual: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_from_rows_validates() {
        let scenario = Scenario::from_rows(&["5", "1"], &["6", "2"], "0").unwrap();
        assert_eq!(scenario.dimensions(), (2, 1));
        let state = scenario.validate().unwrap();
        assert_eq!(state.allocation(), &[vec![5], vec![1]]);
    }

    #[test]
    fn test_declared_dimensions_win() {
        let scenario = Scenario {
            processes: Some(3),
            resources: Some(1),
            allocation: vec![vec![0], vec![0]],
            max_demand: vec![vec![1], vec![1]],
            available: vec![0],
        };
        assert_eq!(scenario.dimensions(), (3, 1));
        assert!(matches!(
            scenario.validate(),
            Err(ValidationError::Shape {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_from_toml_str() {
        let scenario = Scenario::from_toml_str(
            r"
allocation = [[0], [0]]
max_demand = [[1], [1]]
available = [0]
",
        )
        .unwrap();
        assert_eq!(scenario.dimensions(), (2, 1));
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_from_json_str() {
        let scenario = Scenario::from_json_str(
            r#"{"processes": 1, "allocation": [[1, 0]], "max_demand": [[2, 2]], "available": [1, 1]}"#,
        )
        .unwrap();
        assert_eq!(scenario.processes, Some(1));
        assert_eq!(scenario.dimensions(), (1, 2));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        assert!(matches!(
            Scenario::from_toml_str("allocation = ["),
            Err(InputError::Parse { .. })
        ));
        assert!(matches!(
            Scenario::from_json_str("{\"available\": \"x\"}"),
            Err(InputError::Parse { .. })
        ));
    }
}
