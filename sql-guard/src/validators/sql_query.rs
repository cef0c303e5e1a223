//! Full validation of a generated SQL query.

use crate::config::SqlValidatorConfig;
use crate::core::{
    Memory, PromptResponse, ResponseValidator, TurnContext, Validation, ValidatorMetadata,
};
use crate::error::Result;
use crate::logging::LogConfig;
use crate::sql::{join_feedback, sanitize, JoinConformanceChecker, QueryExecutor, SyntaxChecker};
use crate::tokenizer::Tokenizer;
use crate::{log_executor, log_stage};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Feedback for a query whose plan estimates too many rows.
pub fn row_count_feedback(rows: u64, ceiling: u64) -> String {
    format!(
        "The provided SQL generates too many rows: ({rows}). The maximum allowed is {ceiling}. \
         Adjust the query to LIMIT the results."
    )
}

/// Validates model output that should be a single `SELECT` query.
///
/// Stages run in order and the first failure decides the feedback:
///
/// 1. strip any text before the first `SELECT`
/// 2. parse the query, which must be a single statement (unless the
///    syntax gate is bypassed)
/// 3. run `EXPLAIN <query>` and reject estimates above the row ceiling;
///    executor errors become feedback
/// 4. reject inner joins missing from the allow-list
///
/// An accepted response yields the sanitized query.
///
/// # Examples
///
/// ```rust
/// use sql_guard::config::SqlValidatorConfig;
/// use sql_guard::sql::testing::StaticExecutor;
/// use sql_guard::validators::SqlQueryValidator;
/// use std::sync::Arc;
///
/// # async fn example() -> sql_guard::error::Result<()> {
/// let executor = Arc::new(StaticExecutor::with_plan_lines([
///     "Limit  (cost=0.00..0.29 rows=10 width=36)",
/// ]));
/// let validator = SqlQueryValidator::new(executor, SqlValidatorConfig::default())?;
///
/// let outcome = validator
///     .validate_sql("Here is your query: SELECT * FROM Items LIMIT 10")
///     .await;
/// assert_eq!(outcome.value().map(String::as_str), Some("SELECT * FROM Items LIMIT 10"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryValidator {
    executor: Arc<dyn QueryExecutor>,
    syntax: SyntaxChecker,
    joins: JoinConformanceChecker,
    config: SqlValidatorConfig,
    log_config: LogConfig,
}

impl SqlQueryValidator {
    /// Creates a validator, rejecting unusable configuration.
    pub fn new(executor: Arc<dyn QueryExecutor>, config: SqlValidatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            executor,
            syntax: SyntaxChecker::new(config.dialect, config.syntax_gate),
            joins: JoinConformanceChecker::new(config.allowed_joins.clone()),
            config,
            log_config: LogConfig::default(),
        })
    }

    /// Creates a validator with the default configuration.
    pub fn with_defaults(executor: Arc<dyn QueryExecutor>) -> Self {
        let config = SqlValidatorConfig::default();
        Self {
            executor,
            syntax: SyntaxChecker::new(config.dialect, config.syntax_gate),
            joins: JoinConformanceChecker::default(),
            config,
            log_config: LogConfig::default(),
        }
    }

    /// Sets how much of the pipeline is logged.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    pub fn config(&self) -> &SqlValidatorConfig {
        &self.config
    }

    /// Runs the pipeline on raw model text.
    pub async fn validate_sql(&self, text: &str) -> Validation<String> {
        let sql = sanitize(text);
        let log = &self.log_config;
        let ceiling = self.config.row_count_ceiling;

        log_stage!(log, stage = "syntax", sql = %log.field(sql));
        if !self.syntax.check(sql).passes() {
            warn!(sql = %log.field(sql), "rejected: invalid syntax");
            return Validation::invalid(self.config.invalid_syntax_feedback.clone());
        }

        let explain = format!("EXPLAIN {sql}");
        log_executor!(
            log,
            statement = %log.field(&explain),
            "requesting query plan"
        );
        let plan = match self.executor.execute(&explain).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %log.field(e.message()), "rejected: executor error");
                let feedback = self.config.execution_error_feedback.render(e.message());
                return Validation::invalid(feedback);
            }
        };

        log_stage!(log, stage = "cost", plan_lines = plan.records.len());
        match plan.estimated_rows() {
            Some(rows) if rows > ceiling => {
                warn!(rows, ceiling, "rejected: row estimate above ceiling");
                return Validation::invalid(row_count_feedback(rows, ceiling));
            }
            Some(rows) => debug!(rows, "row estimate within ceiling"),
            None => debug!("no row estimate in plan"),
        }

        log_stage!(log, stage = "joins", allowed = self.joins.allowed().len());
        let disallowed = self.joins.disallowed_joins(sql);
        if !disallowed.is_empty() {
            warn!(count = disallowed.len(), "rejected: joins outside allow-list");
            return Validation::invalid(join_feedback(&disallowed));
        }

        info!("query accepted");
        Validation::valid(sql.to_string())
    }
}

#[async_trait]
impl ResponseValidator for SqlQueryValidator {
    type Value = String;

    #[instrument(
        skip(self, _context, _memory, _tokenizer, response, _remaining_attempts),
        fields(validator = "sql_query")
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
        "sql_query"
    }

    fn metadata(&self) -> ValidatorMetadata {
        ValidatorMetadata::new()
            .with_description(format!(
                "Checks syntax, EXPLAIN row estimates (<= {}) and allowed joins",
                self.config.row_count_ceiling
            ))
            .with_custom("row_count_ceiling", self.config.row_count_ceiling.to_string())
            .with_custom("allowed_joins", self.config.allowed_joins.len().to_string())
            .with_custom("syntax_gate", format!("{:?}", self.config.syntax_gate))
    }
}
