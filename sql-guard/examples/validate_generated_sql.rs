//! Validates a handful of model responses against an in-memory catalog.
//!
//! ```sh
//! cargo run --example validate_generated_sql
//! ```

use datafusion::arrow::array::{Int64Array, StringArray};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::SessionContext;
use sql_guard::logging::setup::{init_logging, LoggingConfig};
use sql_guard::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::development())?;

    let ctx = SessionContext::new();
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("title", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec!["Fries", "Cola", "Burger"])),
        ],
    )?;
    let table = MemTable::try_new(schema, vec![vec![batch]]).context("building items table")?;
    ctx.register_table("items", Arc::new(table))
        .context("registering items table")?;

    let validator = SqlQueryValidator::new(
        Arc::new(DataFusionExecutor::new(ctx)),
        SqlValidatorConfig::default(),
    )?;

    let responses = [
        "Here is your query: SELECT title FROM items LIMIT 2",
        "SELEKT title FORM items",
        "SELECT * FROM orders",
    ];

    for response in responses {
        match validator.validate_sql(response).await {
            Validation::Valid { value } => println!("accepted: {value}"),
            Validation::Invalid { feedback } => println!("rejected: {feedback}"),
        }
    }

    Ok(())
}
