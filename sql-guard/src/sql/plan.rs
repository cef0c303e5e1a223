//! Query plans returned by an executor and row-count estimation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One line of executor output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// The plan text, e.g. `Seq Scan on items  (cost=0.00..22.70 rows=1270 width=36)`
    #[serde(rename = "QUERY PLAN", default)]
    pub query_plan: Option<String>,
}

impl PlanRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            query_plan: Some(text.into()),
        }
    }
}

/// Ordered executor output. Empty when the executor returned nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    #[serde(default)]
    pub records: Vec<PlanRecord>,
}

impl QueryPlan {
    pub fn new(records: Vec<PlanRecord>) -> Self {
        Self { records }
    }

    /// Builds a plan from lines of text.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: lines.into_iter().map(PlanRecord::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Estimated row count from the first plan line, if it carries one.
    ///
    /// Only the first record is read: in `EXPLAIN` output it is the root
    /// node, whose estimate covers the whole query.
    pub fn estimated_rows(&self) -> Option<u64> {
        let text = self.records.first()?.query_plan.as_deref()?;
        extract_row_estimate(text)
    }
}

static ROWS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"rows=(\d+)").expect("Hard-coded regex pattern should be valid")
});

/// Finds the first `rows=<digits>` in a plan line.
///
/// Returns `None` when the pattern is absent or the digits overflow `u64`.
pub fn extract_row_estimate(text: &str) -> Option<u64> {
    ROWS_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
