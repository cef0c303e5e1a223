//! Validator configuration.
//!
//! Configuration is fixed when a validator is constructed. Both config types
//! deserialize from JSON with every field optional; missing fields take the
//! defaults below.

use crate::error::{GuardError, Result};
use crate::sql::{AllowedJoinSet, SqlDialectKind, SyntaxGate};
use serde::{Deserialize, Serialize};

/// Feedback when the parser rejects a query.
pub const DEFAULT_INVALID_SYNTAX_FEEDBACK: &str = "The provided SQL response has invalid syntax.";

/// Largest estimated row count accepted by default.
pub const DEFAULT_ROW_COUNT_CEILING: u64 = 1500;

/// Largest response, in tokens, accepted by default.
pub const DEFAULT_MAX_TOKEN_COUNT: usize = 7000;

/// Feedback when a response exceeds the token limit.
pub const DEFAULT_TOO_LARGE_FEEDBACK: &str = "The SQL result set is too large to fit in the context window. Reduce the size of the result, for example by adding a LIMIT clause.";

/// What the model is told when the executor fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "message", rename_all = "lowercase")]
pub enum ExecutionErrorFeedback {
    /// Forward the executor's message unchanged.
    #[default]
    Verbatim,
    /// Replace it with a fixed message. The executor's message is still logged.
    Generic(String),
}

impl ExecutionErrorFeedback {
    /// Produces feedback for an executor message.
    pub fn render(&self, message: &str) -> String {
        match self {
            Self::Verbatim => message.to_string(),
            Self::Generic(text) => text.clone(),
        }
    }
}

/// Configuration for the SQL validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlValidatorConfig {
    /// Inner-join clauses queries may use; empty means unrestricted
    pub allowed_joins: AllowedJoinSet,
    /// Feedback when the syntax check fails
    pub invalid_syntax_feedback: String,
    /// Largest accepted `rows=` estimate from the query plan
    pub row_count_ceiling: u64,
    /// Whether parse failures reject the response
    pub syntax_gate: SyntaxGate,
    /// Dialect used by the parser
    pub dialect: SqlDialectKind,
    /// Feedback policy for executor failures
    pub execution_error_feedback: ExecutionErrorFeedback,
}

impl Default for SqlValidatorConfig {
    fn default() -> Self {
        Self {
            allowed_joins: AllowedJoinSet::default(),
            invalid_syntax_feedback: DEFAULT_INVALID_SYNTAX_FEEDBACK.to_string(),
            row_count_ceiling: DEFAULT_ROW_COUNT_CEILING,
            syntax_gate: SyntaxGate::default(),
            dialect: SqlDialectKind::default(),
            execution_error_feedback: ExecutionErrorFeedback::default(),
        }
    }
}

impl SqlValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document and validates the result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sql_guard::config::SqlValidatorConfig;
    ///
    /// let config = SqlValidatorConfig::from_json_str(r#"{"row_count_ceiling": 500}"#).unwrap();
    /// assert_eq!(config.row_count_ceiling, 500);
    /// assert!(config.allowed_joins.is_empty());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.row_count_ceiling == 0 {
            return Err(GuardError::configuration(
                "row_count_ceiling",
                "must be greater than zero",
            ));
        }
        if self.invalid_syntax_feedback.trim().is_empty() {
            return Err(GuardError::configuration(
                "invalid_syntax_feedback",
                "must not be empty",
            ));
        }
        if let ExecutionErrorFeedback::Generic(message) = &self.execution_error_feedback {
            if message.trim().is_empty() {
                return Err(GuardError::configuration(
                    "execution_error_feedback",
                    "generic message must not be empty",
                ));
            }
        }
        Ok(())
    }

    pub fn with_allowed_joins<I, S>(mut self, joins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_joins = AllowedJoinSet::new(joins);
        self
    }

    pub fn with_invalid_syntax_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.invalid_syntax_feedback = feedback.into();
        self
    }

    pub fn with_row_count_ceiling(mut self, ceiling: u64) -> Self {
        self.row_count_ceiling = ceiling;
        self
    }

    pub fn with_syntax_gate(mut self, gate: SyntaxGate) -> Self {
        self.syntax_gate = gate;
        self
    }

    pub fn with_dialect(mut self, dialect: SqlDialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_execution_error_feedback(mut self, policy: ExecutionErrorFeedback) -> Self {
        self.execution_error_feedback = policy;
        self
    }
}

/// Configuration for the response size guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseSizeConfig {
    /// Largest accepted response, in tokens
    pub max_token_count: usize,
    /// Feedback when the limit is exceeded
    pub too_large_feedback: String,
}

impl Default for ResponseSizeConfig {
    fn default() -> Self {
        Self {
            max_token_count: DEFAULT_MAX_TOKEN_COUNT,
            too_large_feedback: DEFAULT_TOO_LARGE_FEEDBACK.to_string(),
        }
    }
}

impl ResponseSizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document and validates the result.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_token_count == 0 {
            return Err(GuardError::configuration(
                "max_token_count",
                "must be greater than zero",
            ));
        }
        if self.too_large_feedback.trim().is_empty() {
            return Err(GuardError::configuration(
                "too_large_feedback",
                "must not be empty",
            ));
        }
        Ok(())
    }

    pub fn with_max_token_count(mut self, max: usize) -> Self {
        self.max_token_count = max;
        self
    }

    pub fn with_too_large_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.too_large_feedback = feedback.into();
        self
    }
}
