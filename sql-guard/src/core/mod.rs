//! Core types shared by every validator.
//!
//! - **[`ResponseValidator`]**: the capability every validator implements
//! - **[`Validation`]**: the `Valid` / `Invalid` outcome of one call
//! - **[`PromptResponse`]**: the model output being judged
//! - **[`TurnContext`]** and **[`Memory`]**: conversation handles passed through untouched
//!
//! ## Flow
//!
//! ```text
//! PromptResponse ──► ResponseValidator::validate_response ──► Validation
//!                          │
//!                          ├─ Valid { value }      accept, use value
//!                          └─ Invalid { feedback } send feedback, retry
//! ```

mod response;
mod turn;
mod validation;
mod validator;

pub use response::{Message, PromptResponse, PromptResponseStatus};
pub use turn::{InMemoryState, Memory, TurnContext};
pub use validation::Validation;
pub use validator::{BoxedValidator, ResponseValidator, ValidatorMetadata};
