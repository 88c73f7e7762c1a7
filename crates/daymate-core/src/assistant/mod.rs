//! Built-in assistant: canned keyword replies and alarm suggestions.

pub mod responder;
pub mod suggestions;

use serde::{Deserialize, Serialize};

pub use responder::{classify, Category, Responder, ResponseCategory};
pub use suggestions::{smart_alarm_suggestions, UserPreferences, WorkHours};

/// Assistant answer plus follow-up suggestion chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub suggestions: Vec<String>,
}
