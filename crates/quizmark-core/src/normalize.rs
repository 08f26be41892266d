//! Answer normalization.
//!
//! Every comparison in [`crate::grading`] reads both the submitted and the
//! canonical answer through the helpers here, so a sequence stored as a
//! native array and the same sequence stored as its JSON text compare the
//! same way.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{element_text, AnswerValue};

/// How letter case is treated when comparing two answer fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFolding {
    /// Uppercase both sides (option labels).
    Upper,
    /// Lowercase both sides (natural-language text).
    Lower,
    /// Compare as written.
    Sensitive,
}

impl CaseFolding {
    /// Trim and fold a fragment for comparison.
    pub fn apply(self, s: &str) -> String {
        let trimmed = s.trim();
        match self {
            CaseFolding::Upper => trimmed.to_uppercase(),
            CaseFolding::Lower => trimmed.to_lowercase(),
            CaseFolding::Sensitive => trimmed.to_string(),
        }
    }
}

/// Read an answer as a sequence of fragments.
///
/// Text that looks like a JSON array is parsed into its elements; text that
/// looks like a JSON object is kept as one element in compact form. Anything
/// that fails to parse is returned as a single element, unchanged.
pub fn coerce_to_sequence(value: &AnswerValue) -> Vec<String> {
    match value {
        AnswerValue::Missing => Vec::new(),
        AnswerValue::Text(text) => sniff_text(text),
        AnswerValue::Sequence(items) => items.clone(),
    }
}

/// Read an answer as a single fragment.
///
/// A one-element sequence yields that element; longer sequences are joined
/// with `,` so they never match a single label. The join is intentional for
/// free text too: `["a","b"]` and `"a,b"` read as the same answer.
pub fn coerce_to_scalar(value: &AnswerValue) -> String {
    let mut items = coerce_to_sequence(value);
    match items.len() {
        0 => String::new(),
        1 => items.remove(0),
        _ => items.join(","),
    }
}

/// True when the answer carries no content: missing, whitespace-only text,
/// or a sequence whose every element is blank.
pub fn is_blank(value: &AnswerValue) -> bool {
    coerce_to_sequence(value)
        .iter()
        .all(|item| item.trim().is_empty())
}

fn sniff_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(items) = serde_json::from_str::<Vec<Value>>(trimmed) {
            return items.into_iter().map(element_text).collect();
        }
    } else if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(object) = serde_json::from_str::<Map<String, Value>>(trimmed) {
            return vec![Value::Object(object).to_string()];
        }
    }

    vec![text.to_string()]
}
