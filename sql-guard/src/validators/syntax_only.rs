//! Syntax-only validation, for callers without a database connection.

use crate::config::SqlValidatorConfig;
use crate::core::{
    Memory, PromptResponse, ResponseValidator, TurnContext, Validation, ValidatorMetadata,
};
use crate::error::Result;
use crate::sql::{sanitize, SyntaxChecker};
use crate::tokenizer::Tokenizer;
use async_trait::async_trait;
use tracing::{instrument, warn};

/// Strips any preamble and accepts the query if it parses.
#[derive(Debug, Clone)]
pub struct SqlSyntaxValidator {
    syntax: SyntaxChecker,
    invalid_syntax_feedback: String,
}

impl SqlSyntaxValidator {
    /// Reads the dialect, syntax gate and syntax feedback from `config`.
    pub fn new(config: &SqlValidatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            syntax: SyntaxChecker::new(config.dialect, config.syntax_gate),
            invalid_syntax_feedback: config.invalid_syntax_feedback.clone(),
        })
    }

    pub fn validate_sql(&self, text: &str) -> Validation<String> {
        let sql = sanitize(text);
        if self.syntax.check(sql).passes() {
            Validation::valid(sql.to_string())
        } else {
            warn!("rejected: invalid syntax");
            Validation::invalid(self.invalid_syntax_feedback.clone())
        }
    }
}

impl Default for SqlSyntaxValidator {
    fn default() -> Self {
        let config = SqlValidatorConfig::default();
        Self {
            syntax: SyntaxChecker::new(config.dialect, config.syntax_gate),
            invalid_syntax_feedback: config.invalid_syntax_feedback,
        }
    }
}

#[async_trait]
impl ResponseValidator for SqlSyntaxValidator {
    type Value = String;

    #[instrument(
        skip(self, _context, _memory, _tokenizer, response, _remaining_attempts),
        fields(validator = "sql_syntax")
    )]
    async fn validate_response(
        &self,
        _context: &TurnContext,
        _memory: &dyn Memory,
        _tokenizer: &dyn Tokenizer,
        response: &PromptResponse,
        _remaining_attempts: u32,
    ) -> Validation<String> {
        self.validate_sql(response.content())
    }

    fn name(&self) -> &str {
        "sql_syntax"
    }

    fn metadata(&self) -> ValidatorMetadata {
        ValidatorMetadata::new().with_description("Checks that the query parses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::SyntaxGate;

    #[test]
    fn test_valid_and_invalid() {
        let validator = SqlSyntaxValidator::default();
        assert_eq!(
            validator.validate_sql("Query:\nSELECT id FROM Items"),
            Validation::valid("SELECT id FROM Items".to_string())
        );
        assert_eq!(
            validator.validate_sql("SELEKT * FORM x"),
            Validation::invalid("The provided SQL response has invalid syntax.")
        );
    }

    #[test]
    fn test_bypassed_gate() {
        let config = SqlValidatorConfig::default().with_syntax_gate(SyntaxGate::Bypassed);
        let validator = SqlSyntaxValidator::new(&config).unwrap();
        assert!(validator.validate_sql("SELEKT * FORM x").is_valid());
    }
}
