//! Prelude for commonly used types and traits in sql-guard.

pub use crate::config::{ExecutionErrorFeedback, ResponseSizeConfig, SqlValidatorConfig};
pub use crate::core::{
    InMemoryState, Memory, PromptResponse, ResponseValidator, TurnContext, Validation,
};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::logging::LogConfig;
pub use crate::sql::{
    AllowedJoinSet, DataFusionExecutor, ExecutionError, QueryExecutor, SqlDialectKind, SyntaxGate,
};
pub use crate::tokenizer::{RegexTokenizer, Tokenizer};
pub use crate::validators::{
    ResponseSizeValidator, SqlQueryValidator, SqlResponseValidator, SqlSyntaxValidator,
};
