//! Runs the validators against an in-process DataFusion catalog.

use datafusion::arrow::array::{Int64Array, StringArray};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::SessionContext;
use sql_guard::prelude::*;
use std::sync::Arc;

fn items_executor() -> DataFusionExecutor {
    let ctx = SessionContext::new();
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("order_id", DataType::Int64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
            Arc::new(StringArray::from(vec![
                Some("Fries"),
                Some("Cola"),
                Some("Burger"),
                None,
            ])),
            Arc::new(Int64Array::from(vec![Some(10), Some(10), None, Some(11)])),
        ],
    )
    .unwrap();
    let provider = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    ctx.register_table("items", Arc::new(provider)).unwrap();
    DataFusionExecutor::new(ctx)
}

#[tokio::test]
async fn test_known_table_is_accepted_without_row_estimate() {
    let validator = SqlQueryValidator::with_defaults(Arc::new(items_executor()));

    let outcome = validator
        .validate_sql("Query: SELECT id, title FROM items WHERE id > 1")
        .await;

    assert_eq!(
        outcome.into_value().as_deref(),
        Some("SELECT id, title FROM items WHERE id > 1")
    );
}

#[tokio::test]
async fn test_missing_table_feedback_is_executor_message() {
    let executor = Arc::new(items_executor());
    let expected = executor
        .execute("EXPLAIN SELECT * FROM orders")
        .await
        .unwrap_err();
    let validator = SqlQueryValidator::with_defaults(executor);

    let outcome = validator.validate_sql("SELECT * FROM orders").await;

    assert_eq!(outcome.feedback(), Some(expected.message()));
}

#[tokio::test]
async fn test_generic_error_policy_hides_executor_message() {
    let validator = SqlQueryValidator::new(
        Arc::new(items_executor()),
        SqlValidatorConfig::default().with_execution_error_feedback(
            ExecutionErrorFeedback::Generic("The query failed to run.".to_string()),
        ),
    )
    .unwrap();

    let outcome = validator.validate_sql("SELECT * FROM orders").await;

    assert_eq!(outcome.feedback(), Some("The query failed to run."));
}

#[tokio::test]
async fn test_response_validator_checks_with_explain() {
    let validator =
        SqlResponseValidator::new(Arc::new(items_executor()), SqlValidatorConfig::default())
            .unwrap();

    assert!(validator
        .validate_sql("SELECT title FROM items")
        .await
        .is_valid());
    assert!(validator
        .validate_sql("SELECT title FROM missing_table")
        .await
        .is_invalid());
}

#[tokio::test]
async fn test_write_statements_never_reach_the_catalog() {
    let executor = Arc::new(items_executor());
    let validator = SqlQueryValidator::new(
        executor.clone(),
        SqlValidatorConfig::default().with_syntax_gate(SyntaxGate::Bypassed),
    )
    .unwrap();
    let refusal = executor
        .execute("EXPLAIN DROP TABLE items")
        .await
        .unwrap_err();
    assert!(refusal.message().contains("DDL"), "{}", refusal.message());

    // Sanitizing keeps the statement as-is; the executor refuses it.
    let outcome = validator.validate_sql("DROP TABLE items").await;

    assert_eq!(outcome, Validation::invalid(refusal.message()));
    let still_there = executor.execute("SELECT count(*) FROM items").await.unwrap();
    assert_eq!(still_there.records.len(), 1);
    assert_eq!(still_there.records[0].query_plan.as_deref(), Some("4"));
}

#[tokio::test]
async fn test_statement_batch_is_rejected_before_planning() {
    let validator = SqlQueryValidator::with_defaults(Arc::new(items_executor()));

    let outcome = validator
        .validate_sql("Sure: SELECT id FROM items; DROP TABLE items")
        .await;

    assert_eq!(
        outcome.feedback(),
        Some("The provided SQL response has invalid syntax.")
    );
}
