//! The built-in rule library.
//!
//! Every rule is a named boolean check over a scalar value, carried as a
//! variant of [`Rule`] with its typed arguments. Rules never allocate
//! errors themselves — the engine asks the message catalog for a template
//! keyed by [`Rule::id`] when a rule fails.

pub mod date;

mod checksum;

use std::fmt;
use std::net::IpAddr;
use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use regex::Regex;

use crate::core::{FieldValue, InputSource, resolve};
use date::DateFormat;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern compiles"));

/// A free-form predicate registered under a caller-chosen rule name.
pub type CustomFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

// ============================================================================
// RULE
// ============================================================================

/// One validation rule with its arguments.
///
/// Most rules skip empty values: format checks like [`Rule::Email`] or
/// [`Rule::Date`] pass on an empty (or absent) field and leave emptiness
/// enforcement to [`Rule::Required`], which is the only rule that fails on
/// blank input.
#[derive(Clone)]
pub enum Rule {
    /// Trimmed value must be non-empty.
    Required,
    /// Valid email address syntax, if present.
    Email,
    /// Valid IPv4/IPv6 address, if present.
    Ip,
    /// Valid http(s) URL, if present.
    Url,
    /// Parses fully as a floating point number, if present.
    Float,
    /// Parses fully as an integer, if present.
    Integer,
    /// Decimal digits only, if present.
    Digits,
    /// Alphanumeric characters only, if present.
    Alnum,
    /// Equal to its own lowercased form.
    Lowercase,
    /// Equal to its own uppercased form.
    Uppercase,
    /// Numeric value above `limit`; `inclusive` admits equality.
    Min { limit: f64, inclusive: bool },
    /// Numeric value below `limit`; `inclusive` admits equality.
    Max { limit: f64, inclusive: bool },
    /// Both bounds at once, with a shared error message.
    Between { min: f64, max: f64, inclusive: bool },
    /// Strictly greater than zero.
    Positive,
    /// Strictly less than zero.
    Negative,
    /// Trimmed character count equals `len`.
    Length { len: usize },
    /// Trimmed character count is at least `len`.
    MinLength { len: usize },
    /// Trimmed character count is at most `len`.
    MaxLength { len: usize },
    /// Equals the live value of another field; `label` names it in errors.
    Matches { field: String, label: String },
    /// Differs from the live value of another field.
    NotMatches { field: String, label: String },
    /// Starts with `prefix`, if present.
    StartsWith { prefix: String },
    /// Does not start with `prefix`, if present.
    NotStartsWith { prefix: String },
    /// Ends with `suffix`, if present.
    EndsWith { suffix: String },
    /// Does not end with `suffix`, if present.
    NotEndsWith { suffix: String },
    /// A real calendar date in the given format, if present.
    Date {
        format: DateFormat,
        separator: Option<char>,
    },
    /// A date no earlier than `limit`. Unparseable values fail.
    MinDate { limit: NaiveDate, format: DateFormat },
    /// A date no later than `limit`. Unparseable values fail.
    MaxDate { limit: NaiveDate, format: DateFormat },
    /// Payment-card number passing the Luhn checksum.
    Ccnum,
    /// Member of the allowed set.
    OneOf { allowed: Vec<String> },
    /// Not a member of the denied set.
    NoneOf { denied: Vec<String> },
    /// A caller-supplied predicate under its own rule name.
    Custom { name: String, check: CustomFn },
}

impl Rule {
    /// The rule's identifier — the key used for message template lookup
    /// and session-wide overrides.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Ip => "ip",
            Rule::Url => "url",
            Rule::Float => "float",
            Rule::Integer => "integer",
            Rule::Digits => "digits",
            Rule::Alnum => "alnum",
            Rule::Lowercase => "lowercase",
            Rule::Uppercase => "uppercase",
            Rule::Min { .. } => "min",
            Rule::Max { .. } => "max",
            Rule::Between { .. } => "between",
            Rule::Positive => "positive",
            Rule::Negative => "negative",
            Rule::Length { .. } => "length",
            Rule::MinLength { .. } => "min_length",
            Rule::MaxLength { .. } => "max_length",
            Rule::Matches { .. } => "matches",
            Rule::NotMatches { .. } => "not_matches",
            Rule::StartsWith { .. } => "starts_with",
            Rule::NotStartsWith { .. } => "not_starts_with",
            Rule::EndsWith { .. } => "ends_with",
            Rule::NotEndsWith { .. } => "not_ends_with",
            Rule::Date { .. } => "date",
            Rule::MinDate { .. } => "min_date",
            Rule::MaxDate { .. } => "max_date",
            Rule::Ccnum => "ccnum",
            Rule::OneOf { .. } => "one_of",
            Rule::NoneOf { .. } => "none_of",
            Rule::Custom { name, .. } => name,
        }
    }

    /// Evaluates the rule against a scalar value.
    ///
    /// `data` is the live input source; only the cross-field rules read it.
    pub(crate) fn evaluate<S>(&self, value: &str, data: &S) -> bool
    where
        S: InputSource,
    {
        match self {
            Rule::Required => !value.trim().is_empty(),
            Rule::Email => value.is_empty() || EMAIL_REGEX.is_match(value),
            Rule::Ip => value.trim().is_empty() || value.trim().parse::<IpAddr>().is_ok(),
            Rule::Url => value.trim().is_empty() || URL_REGEX.is_match(value),
            Rule::Float => value.is_empty() || value.trim().parse::<f64>().is_ok(),
            Rule::Integer => {
                let trimmed = value.trim();
                trimmed.is_empty() || trimmed.parse::<i64>().is_ok()
            }
            Rule::Digits => value.is_empty() || value.chars().all(|c| c.is_ascii_digit()),
            Rule::Alnum => value.is_empty() || value.chars().all(char::is_alphanumeric),
            Rule::Lowercase => value == value.to_lowercase(),
            Rule::Uppercase => value == value.to_uppercase(),
            Rule::Min { limit, inclusive } => above(value, *limit, *inclusive),
            Rule::Max { limit, inclusive } => below(value, *limit, *inclusive),
            Rule::Between {
                min,
                max,
                inclusive,
            } => above(value, *min, *inclusive) && below(value, *max, *inclusive),
            Rule::Positive => above(value, 0.0, false),
            Rule::Negative => below(value, 0.0, false),
            Rule::Length { len } => value.trim().chars().count() == *len,
            Rule::MinLength { len } => value.trim().chars().count() >= *len,
            Rule::MaxLength { len } => value.trim().chars().count() <= *len,
            Rule::Matches { field, .. } => other_scalar(data, field) == value,
            Rule::NotMatches { field, .. } => other_scalar(data, field) != value,
            Rule::StartsWith { prefix } => value.is_empty() || value.starts_with(prefix),
            Rule::NotStartsWith { prefix } => value.is_empty() || !value.starts_with(prefix),
            Rule::EndsWith { suffix } => value.is_empty() || value.ends_with(suffix),
            Rule::NotEndsWith { suffix } => value.is_empty() || !value.ends_with(suffix),
            Rule::Date { format, separator } => {
                value.trim().is_empty() || format.parse_date(value, *separator).is_some()
            }
            Rule::MinDate { limit, format } => format
                .parse_date(value, None)
                .is_some_and(|date| date >= *limit),
            Rule::MaxDate { limit, format } => format
                .parse_date(value, None)
                .is_some_and(|date| date <= *limit),
            Rule::Ccnum => checksum::luhn_valid(value),
            Rule::OneOf { allowed } => allowed.iter().any(|entry| entry == value),
            Rule::NoneOf { denied } => !denied.iter().any(|entry| entry == value),
            Rule::Custom { check, .. } => check(value),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule").field(&self.id()).finish()
    }
}

/// Numeric lower-bound comparison. Empty values pass; non-numeric text
/// compares as zero.
fn above(value: &str, limit: f64, inclusive: bool) -> bool {
    if value.is_empty() {
        return true;
    }
    let number = value.trim().parse::<f64>().unwrap_or(0.0);
    number > limit || (inclusive && number == limit)
}

/// Numeric upper-bound comparison, same conventions as [`above`].
fn below(value: &str, limit: f64, inclusive: bool) -> bool {
    if value.is_empty() {
        return true;
    }
    let number = value.trim().parse::<f64>().unwrap_or(0.0);
    number < limit || (inclusive && number == limit)
}

/// The scalar text of another field, resolved right now. Absent fields
/// and list values compare as the empty string.
fn other_scalar<S>(data: &S, key: &str) -> String
where
    S: InputSource,
{
    resolve(data, key)
        .map(FieldValue::from_json)
        .and_then(|value| value.as_scalar().map(str::to_string))
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================
