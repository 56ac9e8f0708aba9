#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the banker toolkit
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone for easier handling.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod input;
pub mod request;
pub mod validation;

// Re-export all error types at the root
pub use config::ConfigError;
pub use input::InputError;
pub use request::RequestError;
pub use validation::{Table, ValidationError};

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("request error: {0}")]
    Request(#[from] RequestError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Validation(err) => err.user_message(),
            Error::Input(err) => err.user_message(),
            Error::Request(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Validation(err) => err.user_hint(),
            Error::Input(err) => err.user_hint(),
            Error::Request(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Input(err) => err.is_retryable(),
            Error::Config(err) => err.is_retryable(),
            Error::Validation(_) | Error::Request(_) => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Validation(err) => err.user_code(),
            Error::Input(err) => err.user_code(),
            Error::Request(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
        }
    }
}
