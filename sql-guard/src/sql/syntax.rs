//! Syntax checking backed by `sqlparser`.

use crate::error::{GuardError, Result};
use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    AnsiDialect, BigQueryDialect, Dialect, GenericDialect, MsSqlDialect, MySqlDialect,
    PostgreSqlDialect, SQLiteDialect, SnowflakeDialect,
};
use sqlparser::parser::Parser;
use tracing::debug;

/// The SQL dialect used when parsing model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialectKind {
    #[default]
    PostgreSql,
    Generic,
    MySql,
    SQLite,
    MsSql,
    BigQuery,
    Snowflake,
    Ansi,
}

impl SqlDialectKind {
    fn dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::PostgreSql => Box::new(PostgreSqlDialect {}),
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySql => Box::new(MySqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {}),
            Self::MsSql => Box::new(MsSqlDialect {}),
            Self::BigQuery => Box::new(BigQueryDialect),
            Self::Snowflake => Box::new(SnowflakeDialect),
            Self::Ansi => Box::new(AnsiDialect {}),
        }
    }
}

/// Whether a parse failure rejects the response.
///
/// `Bypassed` lets every input through the syntax step. Use it when the
/// parser is known to reject valid queries in the target dialect; the
/// database then becomes the only judge of syntax via `EXPLAIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxGate {
    #[default]
    Enforced,
    Bypassed,
}

/// Outcome of running the syntax checker.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Exactly one query was parsed.
    Parsed(Vec<Statement>),
    /// The parser rejected the text, or it is not exactly one query.
    Failed(String),
    /// The gate is bypassed; the parser was not consulted.
    Bypassed,
}

impl ParseOutcome {
    /// Returns true unless the outcome is [`ParseOutcome::Failed`].
    pub fn passes(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Returns the parsed statements, if the parser ran and succeeded.
    pub fn statements(&self) -> Option<&[Statement]> {
        match self {
            Self::Parsed(statements) => Some(statements),
            _ => None,
        }
    }

    /// Converts the outcome into the parsed statements.
    ///
    /// A bypassed check yields no statements.
    pub fn into_result(self) -> Result<Vec<Statement>> {
        match self {
            Self::Parsed(statements) => Ok(statements),
            Self::Failed(message) => Err(GuardError::Parse(message)),
            Self::Bypassed => Ok(Vec::new()),
        }
    }
}

/// Parses query text in a fixed dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxChecker {
    dialect: SqlDialectKind,
    gate: SyntaxGate,
}

impl SyntaxChecker {
    pub fn new(dialect: SqlDialectKind, gate: SyntaxGate) -> Self {
        Self { dialect, gate }
    }

    pub fn dialect(&self) -> SqlDialectKind {
        self.dialect
    }

    pub fn gate(&self) -> SyntaxGate {
        self.gate
    }

    /// Checks the syntax of `sql`.
    ///
    /// Passes only a single query statement. No statement, several
    /// statements, or anything other than a query counts as a failure, since
    /// the text is later sent to the database behind `EXPLAIN`.
    pub fn check(&self, sql: &str) -> ParseOutcome {
        if self.gate == SyntaxGate::Bypassed {
            return ParseOutcome::Bypassed;
        }

        let dialect = self.dialect.dialect();
        match Parser::parse_sql(dialect.as_ref(), sql) {
            Ok(statements) => match statements.as_slice() {
                [] => {
                    debug!("parser found no statement");
                    ParseOutcome::Failed("no SQL statement found".to_string())
                }
                [Statement::Query(_)] => ParseOutcome::Parsed(statements),
                [_] => {
                    debug!("statement is not a query");
                    ParseOutcome::Failed("only a single query is allowed".to_string())
                }
                _ => {
                    debug!(count = statements.len(), "several statements found");
                    ParseOutcome::Failed(format!(
                        "expected one statement, found {}",
                        statements.len()
                    ))
                }
            },
            Err(e) => {
                debug!(error = %e, dialect = ?self.dialect, "parser rejected query");
                ParseOutcome::Failed(e.to_string())
            }
        }
    }
}
