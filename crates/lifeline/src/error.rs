//! Error types for lifeline.
//!
//! This module defines the crate-level error type. Network failures are
//! described by [`ApiError`](crate::api::ApiError) and wrapped here so that
//! callers which do want to propagate them can use `?`.

use thiserror::Error;

use crate::api::ApiError;

/// The main error type for lifeline operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Network Errors ===
    /// A backend request failed (non-2xx status, transport or decode failure).
    #[error(transparent)]
    Network(#[from] ApiError),

    // === Session Errors ===
    /// A required login field was missing or empty.
    #[error("{field} is required")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Neither the backend nor the offline table accepted the credentials.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The operation needs an authenticated session.
    #[error("no active session")]
    NotLoggedIn,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for lifeline operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for a missing login field.
    #[must_use]
    pub fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    /// Check if this error is a login field validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error came from the network layer.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// The message shown to the operator on the login screen.
    #[must_use]
    pub fn login_message(&self) -> String {
        match self {
            Self::Validation { .. } => "Please enter both username and password".to_string(),
            Self::InvalidCredentials => "Invalid username or password".to_string(),
            other => format!("Login failed: {other}"),
        }
    }
}
