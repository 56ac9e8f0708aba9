//! CLI error handling

use std::fmt;

use banker_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Error from the banker crates
    Banker(banker_errors::Error),
    /// Invalid command arguments
    InvalidArguments(String),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Stable code for JSON error output
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Banker(e) => e.user_code().unwrap_or("error.unknown"),
            CliError::InvalidArguments(_) => "cli.invalid_arguments",
            CliError::Io(_) => "error.io",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Banker(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Banker(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<banker_errors::Error> for CliError {
    fn from(e: banker_errors::Error) -> Self {
        CliError::Banker(e)
    }
}

impl From<banker_errors::ValidationError> for CliError {
    fn from(e: banker_errors::ValidationError) -> Self {
        CliError::Banker(e.into())
    }
}

impl From<banker_errors::InputError> for CliError {
    fn from(e: banker_errors::InputError) -> Self {
        CliError::Banker(e.into())
    }
}

impl From<banker_errors::RequestError> for CliError {
    fn from(e: banker_errors::RequestError) -> Self {
        CliError::Banker(e.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
