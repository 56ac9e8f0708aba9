//! Scenario input error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum InputError {
    #[error("invalid number '{token}' in row '{row}'")]
    InvalidNumber { row: String, token: String },

    #[error("failed to read scenario {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse scenario: {message}")]
    Parse { message: String },
}

impl UserFacingError for InputError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidNumber { .. } => {
                Some("Rows are integers separated by commas or spaces, e.g. \"3, 3, 2\".")
            }
            Self::Read { .. } => Some("Check that the scenario file exists and is readable."),
            Self::Parse { .. } => Some("Scenario files are TOML, or JSON with a .json extension."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidNumber { .. } => "input.invalid_number",
            Self::Read { .. } => "input.read",
            Self::Parse { .. } => "input.parse",
        };
        Some(code)
    }
}
