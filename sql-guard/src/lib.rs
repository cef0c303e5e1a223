//! # sql-guard - Validation for model-generated SQL
//!
//! sql-guard sits between a language model's output and its use. Each
//! validator takes one response and returns either the value to use or
//! feedback text to send back to the model for another attempt.
//!
//! ## Quick Start
//!
//! ```rust
//! use sql_guard::prelude::*;
//! use sql_guard::sql::testing::StaticExecutor;
//! use std::sync::Arc;
//!
//! # async fn example() -> sql_guard::error::Result<()> {
//! // Any QueryExecutor works; this one answers every EXPLAIN with a fixed plan.
//! let executor = Arc::new(StaticExecutor::with_plan_lines([
//!     "Seq Scan on items  (cost=0.00..80.00 rows=5000 width=36)",
//! ]));
//!
//! let validator = SqlQueryValidator::new(
//!     executor,
//!     SqlValidatorConfig::default()
//!         .with_row_count_ceiling(1500)
//!         .with_allowed_joins(["INNER JOIN Orders ON Orders.id = Items.orderId"]),
//! )?;
//!
//! let outcome = validator
//!     .validate_response(
//!         &TurnContext::default(),
//!         &InMemoryState::new(),
//!         &RegexTokenizer::default(),
//!         &PromptResponse::success("Sure: SELECT * FROM Items"),
//!         2,
//!     )
//!     .await;
//!
//! match outcome {
//!     Validation::Valid { value } => println!("run {value}"),
//!     Validation::Invalid { feedback } => println!("retry with: {feedback}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Validators
//!
//! - **`SqlQueryValidator`**: sanitize, parse, `EXPLAIN` row ceiling, join allow-list
//! - **`SqlResponseValidator`**: parse, then `EXPLAIN` as a validity check
//! - **`SqlSyntaxValidator`**: sanitize and parse only
//! - **`ResponseSizeValidator`**: token limit for result payloads
//!
//! ## Architecture
//!
//! - **`core`**: `ResponseValidator`, `Validation` and the response types
//! - **`sql`**: sanitizer, syntax checker, plans, executors, join allow-lists
//! - **`validators`**: the validators above
//! - **`config`**: serde-backed validator configuration
//! - **`tokenizer`**: token counting
//! - **`extract`**: JSON object extraction
//! - **`logging`**: `tracing` setup helpers

pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod logging;
pub mod prelude;
pub mod sql;
pub mod tokenizer;
pub mod validators;
