//! Syntax check plus an `EXPLAIN` check, without cost or join rules.

use crate::config::SqlValidatorConfig;
use crate::core::{
    Memory, PromptResponse, ResponseValidator, TurnContext, Validation, ValidatorMetadata,
};
use crate::error::Result;
use crate::sql::{QueryExecutor, SyntaxChecker};
use crate::tokenizer::Tokenizer;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Accepts a response when it parses and the database can plan it.
///
/// The response is used as-is: no preamble stripping, no row ceiling and
/// no join rules. Of [`SqlValidatorConfig`] only the dialect, syntax gate,
/// syntax feedback and execution-error policy are read.
#[derive(Debug, Clone)]
pub struct SqlResponseValidator {
    executor: Arc<dyn QueryExecutor>,
    syntax: SyntaxChecker,
    config: SqlValidatorConfig,
}

impl SqlResponseValidator {
    pub fn new(executor: Arc<dyn QueryExecutor>, config: SqlValidatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            executor,
            syntax: SyntaxChecker::new(config.dialect, config.syntax_gate),
            config,
        })
    }

    pub fn config(&self) -> &SqlValidatorConfig {
        &self.config
    }

    /// Validates raw model text.
    pub async fn validate_sql(&self, sql: &str) -> Validation<String> {
        if !self.syntax.check(sql).passes() {
            warn!("rejected: invalid syntax");
            return Validation::invalid(self.config.invalid_syntax_feedback.clone());
        }

        match self.executor.execute(&format!("EXPLAIN {sql}")).await {
            Ok(_) => {
                info!("query accepted");
                Validation::valid(sql.to_string())
            }
            Err(e) => {
                warn!(error = %e, "rejected: executor error");
                let feedback = self.config.execution_error_feedback.render(e.message());
                Validation::invalid(feedback)
            }
        }
    }
}

#[async_trait]
impl ResponseValidator for SqlResponseValidator {
    type Value = String;

    #[instrument(
        skip(self, _context, _memory, _tokenizer, response, _remaining_attempts),
        fields(validator = "sql_response")
    )]
    async fn validate_response(
        &self,
        _context: &TurnContext,
        _memory: &dyn Memory,
        _tokenizer: &dyn Tokenizer,
        response: &PromptResponse,
        _remaining_attempts: u32,
    ) -> Validation<String> {
        self.validate_sql(response.content()).await
    }

    fn name(&self) -> &str {
        "sql_response"
    }

    fn metadata(&self) -> ValidatorMetadata {
        ValidatorMetadata::new()
            .with_description("Checks syntax and that the database can plan the query")
            .with_custom("dialect", format!("{:?}", self.config.dialect))
    }
}
