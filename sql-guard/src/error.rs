//! Error types for the sql-guard validation library.
//!
//! Validators never fail with an error: every outcome, including a rejected
//! query or a failing database, is reported as a [`Validation`](crate::core::Validation).
//! `GuardError` covers everything around them: building configuration,
//! parsing SQL outside a validator and running the bundled executors directly.

use thiserror::Error;

/// The main error type for sql-guard.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Invalid validator configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A SQL statement could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A query executor failed.
    #[error("Execution error: {0}")]
    Execution(#[from] crate::sql::ExecutionError),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, GuardError>`.
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Creates a configuration error naming the offending field.
    pub fn configuration(field: &str, message: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("{field}: {message}"))
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            GuardError::Internal(inner) => GuardError::Internal(format!("{msg}: {inner}")),
            other => GuardError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                GuardError::Internal(inner) => GuardError::Internal(format!("{msg}: {inner}")),
                other => GuardError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}
