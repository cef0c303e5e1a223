//! Token-count guard for executed result payloads.

use crate::config::ResponseSizeConfig;
use crate::core::{
    Memory, PromptResponse, ResponseValidator, TurnContext, Validation, ValidatorMetadata,
};
use crate::error::Result;
use crate::extract::extract_objects;
use crate::tokenizer::Tokenizer;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// Rejects responses too large for the model's context window.
///
/// No SQL is parsed. Accepted responses yield the JSON objects found in the
/// text, which is how result rows are usually rendered.
#[derive(Debug, Clone, Default)]
pub struct ResponseSizeValidator {
    config: ResponseSizeConfig,
}

impl ResponseSizeValidator {
    pub fn new(config: ResponseSizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResponseSizeConfig {
        &self.config
    }

    /// Validates `text` using `tokenizer` for the count.
    pub fn validate_text(
        &self,
        tokenizer: &dyn Tokenizer,
        text: &str,
    ) -> Validation<Vec<Map<String, Value>>> {
        let tokens = tokenizer.count_tokens(text);
        let max = self.config.max_token_count;
        if tokens > max {
            warn!(tokens, max, "rejected: response too large");
            return Validation::invalid(self.config.too_large_feedback.clone());
        }
        debug!(tokens, "response within token limit");
        Validation::valid(extract_objects(text))
    }
}

#[async_trait]
impl ResponseValidator for ResponseSizeValidator {
    type Value = Vec<Map<String, Value>>;

    #[instrument(
        skip(self, _context, _memory, tokenizer, response, _remaining_attempts),
        fields(validator = "response_size")
    )]
    async fn validate_response(
        &self,
        _context: &TurnContext,
        _memory: &dyn Memory,
        tokenizer: &dyn Tokenizer,
        response: &PromptResponse,
        _remaining_attempts: u32,
    ) -> Validation<Self::Value> {
        self.validate_text(tokenizer, response.content())
    }

    fn name(&self) -> &str {
        "response_size"
    }

    fn metadata(&self) -> ValidatorMetadata {
        ValidatorMetadata::new()
            .with_description(format!(
                "Checks the response is at most {} tokens",
                self.config.max_token_count
            ))
            .with_custom("max_token_count", self.config.max_token_count.to_string())
    }
}
