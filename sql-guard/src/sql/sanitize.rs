//! Strips commentary that models put in front of a statement.

/// The keyword a query is expected to start with. Matched case-sensitively.
pub const QUERY_KEYWORD: &str = "SELECT";

/// Returns `text` starting at the first occurrence of `SELECT`.
///
/// Text without the keyword is returned unchanged. The function is total and
/// idempotent.
///
/// # Examples
///
/// ```rust
/// use sql_guard::sql::sanitize;
///
/// assert_eq!(
///     sanitize("Here is your query: SELECT * FROM Items LIMIT 10"),
///     "SELECT * FROM Items LIMIT 10"
/// );
/// assert_eq!(sanitize("no statement here"), "no statement here");
/// ```
pub fn sanitize(text: &str) -> &str {
    match text.find(QUERY_KEYWORD) {
        Some(index) => &text[index..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_preamble() {
        assert_eq!(
            sanitize("Sure! Here it is:\n\nSELECT id FROM Items"),
            "SELECT id FROM Items"
        );
    }

    #[test]
    fn test_keeps_text_without_keyword() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("WITH x AS (select 1)"), "WITH x AS (select 1)");
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        assert_eq!(sanitize("select 1"), "select 1");
        assert_eq!(sanitize("note: select SELECT 2"), "SELECT 2");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "x SELECT a FROM (SELECT b FROM c) t";
        assert_eq!(sanitize(text), "SELECT a FROM (SELECT b FROM c) t");
    }

    #[test]
    fn test_idempotent() {
        let text = "Answer: SELECT 1";
        assert_eq!(sanitize(sanitize(text)), sanitize(text));
    }
}
