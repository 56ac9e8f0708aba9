//! Allocation state validation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Which input table an offending value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Table {
    Allocation,
    MaxDemand,
    Available,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allocation => write!(f, "allocation"),
            Self::MaxDemand => write!(f, "max demand"),
            Self::Available => write!(f, "available"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ValidationError {
    /// A matrix has the wrong number of rows, a row has the wrong number of
    /// columns, or the available vector has the wrong length.
    #[error("{table}{} has length {actual}, expected {expected}", row_suffix(.row))]
    Shape {
        table: Table,
        row: Option<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("negative value {value} in {table} at {}", cell(.process, .resource))]
    NegativeValue {
        table: Table,
        process: Option<usize>,
        resource: usize,
        value: i64,
    },

    #[error("max demand {max_demand} is below allocation {allocation} for process {process}, resource {resource}")]
    InfeasibleDemand {
        process: usize,
        resource: usize,
        allocation: i64,
        max_demand: i64,
    },
}

#[allow(clippy::ref_option)]
fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" row {r}")).unwrap_or_default()
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn cell(process: &Option<usize>, resource: &usize) -> String {
    match process {
        Some(process) => format!("process {process}, resource {resource}"),
        None => format!("resource {resource}"),
    }
}

impl UserFacingError for ValidationError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Shape { .. } => {
                Some("Supply one row per process and one value per resource in every row.")
            }
            Self::NegativeValue { .. } => Some("Resource counts must be zero or greater."),
            Self::InfeasibleDemand { .. } => {
                Some("A process cannot hold more of a resource than its declared maximum.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Shape { .. } => "validation.shape",
            Self::NegativeValue { .. } => "validation.negative_value",
            Self::InfeasibleDemand { .. } => "validation.infeasible_demand",
        };
        Some(code)
    }
}
