//! Input sources and the dot-path value accessor.

use std::collections::HashMap;

use serde_json::Value as Json;

/// Read-only access to the raw data under validation.
///
/// The validator never writes through this interface and never cares how
/// the data was populated — decoded request bodies, query strings and
/// hand-built maps all look the same behind `get`.
pub trait InputSource {
    /// Looks up a top-level entry. `None` means the key is absent, which
    /// is distinct from an entry holding an empty string or `null`.
    fn get(&self, key: &str) -> Option<&Json>;
}

impl InputSource for serde_json::Map<String, Json> {
    fn get(&self, key: &str) -> Option<&Json> {
        serde_json::Map::get(self, key)
    }
}

impl InputSource for HashMap<String, Json> {
    fn get(&self, key: &str) -> Option<&Json> {
        HashMap::get(self, key)
    }
}

/// A `serde_json::Value` acts as a source when it is an object; any other
/// shape has no addressable entries.
impl InputSource for Json {
    fn get(&self, key: &str) -> Option<&Json> {
        self.as_object().and_then(|members| members.get(key))
    }
}

/// Resolves `key` against the source, treating `.` as a path separator.
///
/// `"billing.address.zip"` descends through nested objects; numeric
/// segments index into arrays (`"emails.1"`). Resolution stops with `None`
/// as soon as a segment is missing, is blank, or the current node cannot
/// be descended into. No coercion happens on the way down — the leaf node
/// is returned as-is.
pub fn resolve<'a, S>(source: &'a S, key: &str) -> Option<&'a Json>
where
    S: InputSource + ?Sized,
{
    let mut segments = key.split('.');
    let first = segments.next()?;
    if first.trim().is_empty() {
        return None;
    }

    let mut node = source.get(first)?;
    for segment in segments {
        if segment.trim().is_empty() {
            return None;
        }
        node = match node {
            Json::Object(members) => members.get(segment)?,
            Json::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

// ============================================================================
// TESTS
// ============================================================================
