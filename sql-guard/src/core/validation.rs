//! The outcome of validating one model response.

use serde::{Deserialize, Serialize};

/// Result of a single validation call.
///
/// Exactly one payload is ever populated: an accepted value, or feedback
/// text meant to be sent back to the model for a corrective retry.
///
/// Serializes as `{"kind": "Valid", "value": ...}` or
/// `{"kind": "Invalid", "feedback": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Validation<T> {
    /// The response was accepted.
    Valid {
        /// The value the caller should use in place of the raw response
        value: T,
    },
    /// The response was rejected.
    Invalid {
        /// Guidance for the next attempt
        feedback: String,
    },
}

impl<T> Validation<T> {
    /// Creates an accepted outcome.
    pub fn valid(value: T) -> Self {
        Self::Valid { value }
    }

    /// Creates a rejected outcome.
    pub fn invalid(feedback: impl Into<String>) -> Self {
        Self::Invalid {
            feedback: feedback.into(),
        }
    }

    /// Returns true if the response was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Returns true if the response was rejected.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Returns the accepted value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Valid { value } => Some(value),
            Self::Invalid { .. } => None,
        }
    }

    /// Returns the feedback text, if any.
    pub fn feedback(&self) -> Option<&str> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid { feedback } => Some(feedback),
        }
    }

    /// Consumes the outcome and returns the accepted value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Valid { value } => Some(value),
            Self::Invalid { .. } => None,
        }
    }

    /// Maps the accepted value, leaving feedback untouched.
    pub fn map<U, F>(self, f: F) -> Validation<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Valid { value } => Validation::Valid { value: f(value) },
            Self::Invalid { feedback } => Validation::Invalid { feedback },
        }
    }

    /// Converts into a standard `Result`, with the feedback as the error.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Self::Valid { value } => Ok(value),
            Self::Invalid { feedback } => Err(feedback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exactly_one_payload() {
        let valid = Validation::valid("SELECT 1".to_string());
        assert!(valid.is_valid());
        assert!(!valid.is_invalid());
        assert_eq!(valid.value().map(String::as_str), Some("SELECT 1"));
        assert_eq!(valid.feedback(), None);

        let invalid: Validation<String> = Validation::invalid("bad syntax");
        assert!(invalid.is_invalid());
        assert_eq!(invalid.value(), None);
        assert_eq!(invalid.feedback(), Some("bad syntax"));
    }

    #[test]
    fn test_map_and_into_result() {
        let valid = Validation::valid(3).map(|n| n * 2);
        assert_eq!(valid.into_result(), Ok(6));

        let invalid: Validation<i32> = Validation::invalid("nope");
        assert_eq!(invalid.map(|n| n * 2).into_result(), Err("nope".to_string()));
    }

    #[test]
    fn test_serialized_shape() {
        let valid = Validation::valid("SELECT 1".to_string());
        assert_eq!(
            serde_json::to_value(&valid).unwrap(),
            json!({"kind": "Valid", "value": "SELECT 1"})
        );

        let invalid: Validation<String> = Validation::invalid("too many rows");
        assert_eq!(
            serde_json::to_value(&invalid).unwrap(),
            json!({"kind": "Invalid", "feedback": "too many rows"})
        );

        let parsed: Validation<String> =
            serde_json::from_value(json!({"kind": "Invalid", "feedback": "x"})).unwrap();
        assert_eq!(parsed, Validation::invalid("x"));
    }
}
