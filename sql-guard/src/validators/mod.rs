//! Response validators.
//!
//! | Validator | Stages | Accepted value |
//! |---|---|---|
//! | [`SqlQueryValidator`] | sanitize, syntax, `EXPLAIN` row ceiling, join allow-list | sanitized query |
//! | [`SqlResponseValidator`] | syntax, `EXPLAIN` check | raw query |
//! | [`SqlSyntaxValidator`] | sanitize, syntax | sanitized query |
//! | [`ResponseSizeValidator`] | token count | JSON objects in the text |

mod size;
mod sql_query;
mod sql_response;
mod syntax_only;

pub use size::ResponseSizeValidator;
pub use sql_query::{row_count_feedback, SqlQueryValidator};
pub use sql_response::SqlResponseValidator;
pub use syntax_only::SqlSyntaxValidator;
