//! Pre-validation filter pipeline.

use std::fmt;

use crate::core::FieldValue;

type Filter = Box<dyn Fn(&str) -> String>;

/// Ordered transforms applied to a value before any rule runs.
///
/// The whole chain runs over every scalar; lists are filtered
/// element-wise, recursively, so nested lists end up transformed down to
/// their leaves. The chain is cleared together with the rule chain after
/// each `validate` call.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    /// Appends a transform to the chain.
    pub fn push(&mut self, filter: impl Fn(&str) -> String + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Number of queued transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Applies the chain. Absent values pass through untouched.
    pub fn apply(&self, value: Option<FieldValue>) -> Option<FieldValue> {
        value.map(|value| self.apply_value(value))
    }

    fn apply_value(&self, value: FieldValue) -> FieldValue {
        match value {
            FieldValue::Scalar(mut text) => {
                for filter in &self.filters {
                    text = filter(&text);
                }
                FieldValue::Scalar(text)
            }
            FieldValue::List(items) => FieldValue::List(
                items
                    .into_iter()
                    .map(|item| self.apply_value(item))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("len", &self.filters.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
