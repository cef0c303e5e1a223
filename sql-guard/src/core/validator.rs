//! The validator trait shared by every response check.

use super::{Memory, PromptResponse, TurnContext, Validation};
use crate::tokenizer::Tokenizer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

/// Metadata describing a validator for logs and reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorMetadata {
    /// A human-readable description of what this validator checks
    pub description: Option<String>,
    /// Additional key-value pairs for custom metadata
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub custom: HashMap<String, String>,
}

impl ValidatorMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a custom metadata entry.
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// Decides whether a model response is acceptable.
///
/// Implementations hold only immutable configuration, so one instance can
/// serve any number of concurrent calls. `validate_response` never fails:
/// every error raised by a collaborator is turned into
/// [`Validation::Invalid`].
///
/// Validators are independent of each other. Callers that want several
/// checks run them in sequence and stop at the first rejection.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use sql_guard::core::{Memory, PromptResponse, ResponseValidator, TurnContext, Validation};
/// use sql_guard::tokenizer::Tokenizer;
///
/// #[derive(Debug)]
/// struct NonEmpty;
///
/// #[async_trait]
/// impl ResponseValidator for NonEmpty {
///     type Value = String;
///
///     async fn validate_response(
///         &self,
///         _context: &TurnContext,
///         _memory: &dyn Memory,
///         _tokenizer: &dyn Tokenizer,
///         response: &PromptResponse,
///         _remaining_attempts: u32,
///     ) -> Validation<String> {
///         match response.content() {
///             "" => Validation::invalid("The response was empty."),
///             text => Validation::valid(text.to_string()),
///         }
///     }
///
///     fn name(&self) -> &str {
///         "non_empty"
///     }
/// }
/// ```
#[async_trait]
pub trait ResponseValidator: Debug + Send + Sync {
    /// The value produced when a response is accepted.
    type Value: Send;

    /// Validates one response.
    ///
    /// # Arguments
    ///
    /// * `context` - The current conversation turn (passed through)
    /// * `memory` - Session state (passed through)
    /// * `tokenizer` - Tokenizer for the model that produced the response
    /// * `response` - The response to validate
    /// * `remaining_attempts` - Attempts the caller has left; informational only
    async fn validate_response(
        &self,
        context: &TurnContext,
        memory: &dyn Memory,
        tokenizer: &dyn Tokenizer,
        response: &PromptResponse,
        remaining_attempts: u32,
    ) -> Validation<Self::Value>;

    /// Returns the name of the validator.
    fn name(&self) -> &str;

    /// Returns the metadata associated with this validator.
    fn metadata(&self) -> ValidatorMetadata {
        ValidatorMetadata::new()
    }
}

/// A boxed validator for use in collections.
pub type BoxedValidator<T> = Box<dyn ResponseValidator<Value = T>>;
