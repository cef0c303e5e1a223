//! Query executors consulted for `EXPLAIN` plans.
//!
//! A validator only ever sends read-only `EXPLAIN <query>` checks. The
//! executor's error text is what the model sees as feedback when a check
//! fails, so [`ExecutionError`] displays its message and nothing else.

use super::plan::{PlanRecord, QueryPlan};
use arrow::util::display::array_value_to_string;
use async_trait::async_trait;
use datafusion::execution::context::SQLOptions;
use datafusion::prelude::SessionContext;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, instrument};

/// An executor failure, e.g. a missing relation or denied permission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecutionError {
    message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend's message, unmodified.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<datafusion::error::DataFusionError> for ExecutionError {
    fn from(e: datafusion::error::DataFusionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<arrow::error::ArrowError> for ExecutionError {
    fn from(e: arrow::error::ArrowError) -> Self {
        Self::new(e.to_string())
    }
}

/// Runs SQL against the database the generated queries target.
#[async_trait]
pub trait QueryExecutor: Debug + Send + Sync {
    /// Executes `sql` and returns its output as plan records.
    async fn execute(&self, sql: &str) -> std::result::Result<QueryPlan, ExecutionError>;
}

/// Executes queries in-process with DataFusion.
///
/// DDL and DML are refused, so a plan check can never change the registered
/// tables. For `EXPLAIN` statements each record holds the `plan` column;
/// otherwise all columns of a row are joined with tabs. DataFusion plans do
/// not carry `rows=` estimates, so cost checks against this executor only
/// catch planning errors.
///
/// # Examples
///
/// ```rust
/// use datafusion::prelude::SessionContext;
/// use sql_guard::sql::{DataFusionExecutor, QueryExecutor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = DataFusionExecutor::new(SessionContext::new());
/// let plan = executor.execute("EXPLAIN SELECT 1").await?;
/// assert!(!plan.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DataFusionExecutor {
    ctx: SessionContext,
}

impl Debug for DataFusionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFusionExecutor")
            .field("session_id", &self.ctx.session_id())
            .finish()
    }
}

impl DataFusionExecutor {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// Returns the underlying session, e.g. to register tables.
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }
}

#[async_trait]
impl QueryExecutor for DataFusionExecutor {
    #[instrument(skip(self))]
    async fn execute(&self, sql: &str) -> std::result::Result<QueryPlan, ExecutionError> {
        let options = SQLOptions::new()
            .with_allow_ddl(false)
            .with_allow_dml(false);
        let df = self.ctx.sql_with_options(sql, options).await?;
        let batches = df.collect().await?;

        let mut records = Vec::new();
        for batch in &batches {
            let plan_column = batch.column_by_name("plan");
            for row in 0..batch.num_rows() {
                let text = match plan_column {
                    Some(column) => array_value_to_string(column, row)?,
                    None => batch
                        .columns()
                        .iter()
                        .map(|column| array_value_to_string(column, row))
                        .collect::<std::result::Result<Vec<_>, _>>()?
                        .join("\t"),
                };
                records.push(PlanRecord::new(text));
            }
        }

        debug!(records = records.len(), "query executed");
        Ok(QueryPlan::new(records))
    }
}

#[cfg(feature = "postgres")]
pub use postgres::PostgresExecutor;

#[cfg(feature = "postgres")]
mod postgres {
    use super::{ExecutionError, QueryExecutor};
    use crate::sql::plan::{PlanRecord, QueryPlan};
    use async_trait::async_trait;
    use sqlx::{PgPool, Row};
    use tracing::instrument;

    /// Executes queries against PostgreSQL.
    ///
    /// Database errors surface with the server's message only, e.g.
    /// `relation "foo" does not exist`.
    #[derive(Debug, Clone)]
    pub struct PostgresExecutor {
        pool: PgPool,
    }

    impl PostgresExecutor {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }

        /// Connects a new pool to `database_url`.
        pub async fn connect(database_url: &str) -> crate::error::Result<Self> {
            let pool = PgPool::connect(database_url)
                .await
                .map_err(|e| crate::error::GuardError::configuration("database_url", e))?;
            Ok(Self::new(pool))
        }
    }

    fn backend_message(e: sqlx::Error) -> ExecutionError {
        match e.as_database_error() {
            Some(db_err) => ExecutionError::new(db_err.message()),
            None => ExecutionError::new(e.to_string()),
        }
    }

    #[async_trait]
    impl QueryExecutor for PostgresExecutor {
        #[instrument(skip(self))]
        async fn execute(&self, sql: &str) -> std::result::Result<QueryPlan, ExecutionError> {
            let rows = sqlx::query(sql)
                .fetch_all(&self.pool)
                .await
                .map_err(backend_message)?;

            Ok(QueryPlan::new(
                rows.iter()
                    .map(|row| PlanRecord {
                        query_plan: row.try_get::<String, _>("QUERY PLAN").ok(),
                    })
                    .collect(),
            ))
        }
    }
}

/// Scripted executors for tests and examples.
pub mod testing {
    use super::{ExecutionError, QueryExecutor};
    use crate::sql::plan::QueryPlan;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the same canned response for every statement and records
    /// what it was asked to run.
    #[derive(Debug)]
    pub struct StaticExecutor {
        response: std::result::Result<QueryPlan, ExecutionError>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticExecutor {
        /// Answers every statement with a plan built from `lines`.
        pub fn with_plan_lines<I, S>(lines: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self::with_plan(QueryPlan::from_lines(lines))
        }

        pub fn with_plan(plan: QueryPlan) -> Self {
            Self {
                response: Ok(plan),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Fails every statement with `message`.
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                response: Err(ExecutionError::new(message)),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Statements received so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .map(|calls| calls.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl QueryExecutor for StaticExecutor {
        async fn execute(&self, sql: &str) -> std::result::Result<QueryPlan, ExecutionError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(sql.to_string());
            }
            self.response.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticExecutor;
    use super::*;
    use datafusion::arrow::array::{Int64Array, StringArray};
    use datafusion::arrow::datatypes::{DataType, Field, Schema};
    use datafusion::arrow::record_batch::RecordBatch;
    use datafusion::datasource::MemTable;
    use std::sync::Arc;

    fn items_context() -> SessionContext {
        let ctx = SessionContext::new();
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("title", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec![Some("Fries"), Some("Cola"), None])),
            ],
        )
        .unwrap();
        let provider = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
        ctx.register_table("items", Arc::new(provider)).unwrap();
        ctx
    }

    #[test]
    fn test_execution_error_displays_message_only() {
        let err = ExecutionError::new("relation \"Foo\" does not exist");
        assert_eq!(err.to_string(), "relation \"Foo\" does not exist");
        assert_eq!(err.message(), "relation \"Foo\" does not exist");
    }

    #[tokio::test]
    async fn test_datafusion_explain_returns_plan_lines() {
        let executor = DataFusionExecutor::new(items_context());
        let plan = executor
            .execute("EXPLAIN SELECT id FROM items")
            .await
            .unwrap();
        assert!(!plan.is_empty());
        assert!(plan
            .records
            .iter()
            .all(|record| record.query_plan.is_some()));
    }

    #[tokio::test]
    async fn test_datafusion_plain_query_joins_columns() {
        let executor = DataFusionExecutor::new(items_context());
        let plan = executor
            .execute("SELECT id, title FROM items WHERE id = 1")
            .await
            .unwrap();
        assert_eq!(plan.records, vec![PlanRecord::new("1\tFries")]);
    }

    #[tokio::test]
    async fn test_datafusion_missing_table_is_an_error() {
        let executor = DataFusionExecutor::new(items_context());
        let err = executor
            .execute("EXPLAIN SELECT * FROM orders")
            .await
            .unwrap_err();
        assert!(err.message().contains("orders"));
    }

    #[tokio::test]
    async fn test_datafusion_refuses_ddl() {
        let executor = DataFusionExecutor::new(items_context());
        assert!(executor.execute("DROP TABLE items").await.is_err());
        assert!(executor.execute("SELECT id FROM items").await.is_ok());
    }

    #[tokio::test]
    async fn test_static_executor_records_calls() {
        let executor = StaticExecutor::with_plan_lines(["Seq Scan (rows=3)"]);
        let plan = executor.execute("EXPLAIN SELECT 1").await.unwrap();
        assert_eq!(plan.estimated_rows(), Some(3));
        assert_eq!(executor.calls(), vec!["EXPLAIN SELECT 1".to_string()]);

        let failing = StaticExecutor::failing("permission denied for table items");
        let err = failing.execute("EXPLAIN SELECT 1").await.unwrap_err();
        assert_eq!(err.message(), "permission denied for table items");
    }
}
