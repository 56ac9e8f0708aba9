//! Resource request error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RequestError {
    #[error("unknown process {process}: only {processes} processes exist")]
    UnknownProcess { process: usize, processes: usize },

    #[error("request has {actual} values, expected one per resource ({expected})")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("process {process} requested {requested} of resource {resource} but only needs {need}")]
    ExceedsClaim {
        process: usize,
        resource: usize,
        requested: u64,
        need: u64,
    },
}

impl UserFacingError for RequestError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownProcess { .. } => Some("Processes are numbered from 0."),
            Self::LengthMismatch { .. } => Some("Supply one value per resource."),
            Self::ExceedsClaim { .. } => {
                Some("A process may not request more than its maximum demand minus its allocation.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::UnknownProcess { .. } => "request.unknown_process",
            Self::LengthMismatch { .. } => "request.length_mismatch",
            Self::ExceedsClaim { .. } => "request.exceeds_claim",
        };
        Some(code)
    }
}
