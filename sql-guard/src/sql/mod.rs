//! SQL-specific building blocks used by the validators.
//!
//! Each stage is usable on its own:
//!
//! ```text
//! sanitize ──► SyntaxChecker ──► QueryExecutor (EXPLAIN) ──► QueryPlan::estimated_rows
//!                                                        └─► JoinConformanceChecker
//! ```

mod executor;
mod joins;
mod plan;
mod sanitize;
mod syntax;

pub use executor::testing;
#[cfg(feature = "postgres")]
pub use executor::PostgresExecutor;
pub use executor::{DataFusionExecutor, ExecutionError, QueryExecutor};
pub use joins::{
    find_inner_joins, join_feedback, AllowedJoinSet, JoinClause, JoinConformanceChecker,
    JOIN_FEEDBACK_DELIMITER,
};
pub use plan::{extract_row_estimate, PlanRecord, QueryPlan};
pub use sanitize::{sanitize, QUERY_KEYWORD};
pub use syntax::{ParseOutcome, SqlDialectKind, SyntaxChecker, SyntaxGate};
