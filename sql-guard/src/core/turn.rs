//! Conversation handles passed through to validators.
//!
//! The embedding framework owns conversation and session state. Validators
//! receive read-only views of both and the SQL validators never inspect them;
//! they exist so every validator shares one call signature.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;

/// The current turn of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnContext {
    conversation_id: Option<String>,
    activity_text: Option<String>,
}

impl TurnContext {
    /// Creates a context for the given conversation.
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: Some(conversation_id.into()),
            activity_text: None,
        }
    }

    /// Attaches the text of the incoming activity.
    pub fn with_activity_text(mut self, text: impl Into<String>) -> Self {
        self.activity_text = Some(text.into());
        self
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn activity_text(&self) -> Option<&str> {
        self.activity_text.as_deref()
    }
}

/// Read access to session state.
pub trait Memory: Debug + Send + Sync {
    /// Returns the value stored under a dotted path such as `temp.input`.
    fn get_value(&self, path: &str) -> Option<Value>;

    /// Returns true if a value is stored under the path.
    fn has_value(&self, path: &str) -> bool {
        self.get_value(path).is_some()
    }
}

/// A `HashMap`-backed [`Memory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryState {
    values: HashMap<String, Value>,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous one.
    pub fn set_value(&mut self, path: impl Into<String>, value: Value) {
        self.values.insert(path.into(), value);
    }

    /// Removes a value.
    pub fn delete_value(&mut self, path: &str) -> Option<Value> {
        self.values.remove(path)
    }
}

impl Memory for InMemoryState {
    fn get_value(&self, path: &str) -> Option<Value> {
        self.values.get(path).cloned()
    }
}
