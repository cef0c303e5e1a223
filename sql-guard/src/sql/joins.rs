//! Join allow-listing for generated queries.
//!
//! Inner joins are found by scanning the query text, not the parsed tree,
//! and each clause is compared verbatim against the configured allow-list.
//! A clause matches `INNER JOIN <table> ON <left> = <right>` with any
//! whitespace and any keyword case. Tokens stop at whitespace, `=`, `;`,
//! `,` and parentheses.
//!
//! Joins outside that shape are not seen and so are never rejected:
//!
//! - `ON (a.id = b.id)`, a parenthesized condition
//! - `JOIN`, `LEFT JOIN` and other joins without the `INNER` keyword
//! - `INNER JOIN Users u ON ...`, an aliased table
//!
//! For `ON a = b AND c = d` only `... ON a = b` is compared.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Separator between clauses in join feedback.
pub const JOIN_FEEDBACK_DELIMITER: &str = " | ";

static INNER_JOIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)INNER\s+JOIN\s+[^\s=;,()]+\s+ON\s+[^\s=;,()]+\s*=\s*[^\s=;,()]+")
        .expect("Hard-coded regex pattern should be valid")
});

/// An inner-join clause as it appears in the query text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinClause(String);

impl JoinClause {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join clauses a query may use, compared by exact string equality.
///
/// An empty set means no restriction is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedJoinSet(BTreeSet<String>);

impl AllowedJoinSet {
    pub fn new<I, S>(joins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(joins.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, clause: &JoinClause) -> bool {
        self.0.contains(clause.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedJoinSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Returns every non-overlapping inner-join clause in `sql`, in order.
pub fn find_inner_joins(sql: &str) -> Vec<JoinClause> {
    INNER_JOIN_PATTERN
        .find_iter(sql)
        .map(|m| JoinClause(m.as_str().to_string()))
        .collect()
}

/// Checks a query's joins against an [`AllowedJoinSet`].
#[derive(Debug, Clone, Default)]
pub struct JoinConformanceChecker {
    allowed: AllowedJoinSet,
}

impl JoinConformanceChecker {
    pub fn new(allowed: AllowedJoinSet) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &AllowedJoinSet {
        &self.allowed
    }

    /// Returns the clauses in `sql` that are not on the allow-list.
    ///
    /// Always empty when the allow-list is empty.
    pub fn disallowed_joins(&self, sql: &str) -> Vec<JoinClause> {
        if self.allowed.is_empty() {
            return Vec::new();
        }
        find_inner_joins(sql)
            .into_iter()
            .filter(|clause| !self.allowed.contains(clause))
            .collect()
    }
}

/// Builds the feedback listing every disallowed clause.
pub fn join_feedback(disallowed: &[JoinClause]) -> String {
    let clauses = disallowed
        .iter()
        .map(JoinClause::as_str)
        .collect::<Vec<_>>()
        .join(JOIN_FEEDBACK_DELIMITER);
    format!(
        "The provided SQL uses joins that do not adhere to the schema. \
         Only use the documented relationships. Disallowed joins: {clauses}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS_JOIN: &str = "INNER JOIN Orders ON Orders.id = Items.orderId";

    #[test]
    fn test_find_inner_joins() {
        let sql = format!(
            "SELECT * FROM Items {ORDERS_JOIN} inner  join\n Customers on Customers.id=Orders.customerId"
        );
        let joins = find_inner_joins(&sql);
        assert_eq!(
            joins.iter().map(JoinClause::as_str).collect::<Vec<_>>(),
            vec![
                ORDERS_JOIN,
                "inner  join\n Customers on Customers.id=Orders.customerId"
            ]
        );
    }

    #[test]
    fn test_ignores_other_join_kinds() {
        let sql = "SELECT * FROM a LEFT JOIN b ON a.id = b.a_id JOIN c ON c.id = b.c_id";
        assert!(find_inner_joins(sql).is_empty());
    }

    #[test]
    fn test_unrecognised_join_shapes_pass_any_allow_list() {
        let checker = JoinConformanceChecker::new(AllowedJoinSet::new([ORDERS_JOIN]));
        for sql in [
            "SELECT * FROM Items JOIN Users ON Users.id = Items.userId",
            "SELECT * FROM Items INNER JOIN Users u ON u.id = Items.userId",
            "SELECT * FROM Items INNER JOIN Users ON (Users.id = Items.userId)",
        ] {
            assert!(checker.disallowed_joins(sql).is_empty(), "{sql}");
        }
    }

    #[test]
    fn test_compound_condition_keeps_first_equality() {
        let sql = "SELECT * FROM Items INNER JOIN Orders ON Orders.id = Items.orderId AND Orders.open";
        assert_eq!(
            find_inner_joins(sql)
                .iter()
                .map(JoinClause::as_str)
                .collect::<Vec<_>>(),
            vec![ORDERS_JOIN]
        );
    }

    #[test]
    fn test_clause_stops_at_terminators() {
        let sql = "SELECT * FROM Items INNER JOIN Orders ON Orders.id = Items.orderId;";
        assert_eq!(find_inner_joins(sql)[0].as_str(), ORDERS_JOIN);
    }

    #[test]
    fn test_allowed_join_passes() {
        let checker = JoinConformanceChecker::new(AllowedJoinSet::new([ORDERS_JOIN]));
        let sql = format!("SELECT * FROM Items {ORDERS_JOIN}");
        assert!(checker.disallowed_joins(&sql).is_empty());
    }

    #[test]
    fn test_empty_allow_list_is_unrestricted() {
        let checker = JoinConformanceChecker::default();
        let sql = format!("SELECT * FROM Items {ORDERS_JOIN}");
        assert!(checker.disallowed_joins(&sql).is_empty());
    }

    #[test]
    fn test_exact_match_required() {
        let checker = JoinConformanceChecker::new(AllowedJoinSet::new([ORDERS_JOIN]));
        let sql = "SELECT * FROM Items inner join Orders on Orders.id = Items.orderId";
        assert_eq!(checker.disallowed_joins(sql).len(), 1);
    }

    #[test]
    fn test_feedback_lists_every_clause() {
        let checker = JoinConformanceChecker::new(AllowedJoinSet::new([ORDERS_JOIN]));
        let sql = "SELECT * FROM a INNER JOIN b ON a.id = b.a_id INNER JOIN c ON c.id = b.c_id";
        let feedback = join_feedback(&checker.disallowed_joins(sql));
        assert!(feedback.ends_with(
            "Disallowed joins: INNER JOIN b ON a.id = b.a_id | INNER JOIN c ON c.id = b.c_id"
        ));
        assert!(feedback.contains("adhere to the schema"));
    }

    #[test]
    fn test_allowed_join_set_serde() {
        let set: AllowedJoinSet = serde_json::from_str(&format!("[\"{ORDERS_JOIN}\"]")).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next(), Some(ORDERS_JOIN));
    }
}
