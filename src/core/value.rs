//! Field values as seen by the validation engine.

use serde::Serialize;
use serde_json::Value as Json;

/// A resolved field value: a scalar or an arbitrarily nested list.
///
/// Rules only ever observe scalars. The engine recurses through lists and
/// applies the whole rule chain to every leaf, so a list-valued field
/// passes exactly when each of its elements passes.
///
/// Scalars are the string view of the underlying input node: form and
/// query data arrive as text, and JSON numbers and booleans are rendered
/// through their display form. `null` is indistinguishable from an empty
/// submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single value.
    Scalar(String),
    /// An ordered collection of values, possibly nested.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// The empty scalar — what absent input looks like to the rules.
    #[must_use]
    pub fn empty() -> Self {
        FieldValue::Scalar(String::new())
    }

    /// Builds a field value from an input source node.
    ///
    /// Objects flatten to a list over their member values, so a rule chain
    /// applied to a map-valued field checks every entry.
    #[must_use]
    pub fn from_json(node: &Json) -> Self {
        match node {
            Json::Null => FieldValue::empty(),
            Json::Bool(flag) => FieldValue::Scalar(flag.to_string()),
            Json::Number(number) => FieldValue::Scalar(number.to_string()),
            Json::String(text) => FieldValue::Scalar(text.clone()),
            Json::Array(items) => {
                FieldValue::List(items.iter().map(FieldValue::from_json).collect())
            }
            Json::Object(members) => {
                FieldValue::List(members.values().map(FieldValue::from_json).collect())
            }
        }
    }

    /// The scalar text, or `None` for lists.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    /// Whether this is a list value.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Scalar(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Scalar(text)
    }
}

// ============================================================================
// TESTS
// ============================================================================
