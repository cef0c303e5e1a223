//! Pulls JSON objects out of free-form model output.

use serde_json::{Map, Value};

/// Returns every JSON object embedded in `text`, in order of appearance.
///
/// Scanning resumes after each object found, so nested objects are returned
/// only as part of their parent. Objects inside a top-level array are
/// returned one by one. Text that is not JSON is skipped.
///
/// # Examples
///
/// ```rust
/// use sql_guard::extract::extract_objects;
///
/// let objects = extract_objects(r#"Result: [{"id": 1}, {"id": 2}] done"#);
/// assert_eq!(objects.len(), 2);
/// assert_eq!(objects[1]["id"], 2);
/// ```
pub fn extract_objects(text: &str) -> Vec<Map<String, Value>> {
    let mut objects = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('{') {
        let start = cursor + offset;
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(object))) => {
                objects.push(object);
                cursor = start + stream.byte_offset();
            }
            _ => cursor = start + 1,
        }
    }

    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_objects() {
        assert!(extract_objects("").is_empty());
        assert!(extract_objects("plain text { not json").is_empty());
    }

    #[test]
    fn test_objects_surrounded_by_text() {
        let text = "Here you go:\n{\"title\": \"Fries\", \"price\": 2.5}\nand {\"title\": \"Cola\"}";
        let objects = extract_objects(text);
        assert_eq!(objects.len(), 2);
        assert_eq!(Value::Object(objects[0].clone()), json!({"title": "Fries", "price": 2.5}));
        assert_eq!(objects[1]["title"], "Cola");
    }

    #[test]
    fn test_nested_objects_stay_with_parent() {
        let objects = extract_objects(r#"{"row": {"id": 1}}"#);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["row"]["id"], 1);
    }

    #[test]
    fn test_recovers_after_malformed_prefix() {
        let objects = extract_objects(r#"{broken {"ok": true}"#);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["ok"], true);
    }
}
