//! Configuration errors.
//!
//! Validation failures are never errors in the Rust sense — they are
//! recorded as data in the validator's error map. `ConfigError` covers the
//! other category: the rule chain itself cannot be built as requested.

use thiserror::Error;

/// A fatal error raised while configuring a validator.
///
/// Unlike per-field validation failures, these indicate a broken call site
/// (an unparseable format pattern, a date limit that resolves to nothing)
/// and are surfaced immediately instead of being deferred to `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A date format pattern was not a `/`-separated permutation of the
    /// `d`, `m` and `Y` components.
    #[error("unrecognized date format pattern `{0}`")]
    BadDateFormat(String),

    /// A `min_date`/`max_date` limit could not be resolved to a calendar
    /// date at registration time.
    #[error("cannot resolve {rule} limit: {detail}")]
    UnresolvedDateLimit {
        /// The rule being registered.
        rule: &'static str,
        /// What went wrong while resolving the limit.
        detail: String,
    },
}

// ============================================================================
// TESTS
// ============================================================================
