//! The fluent validator: rule chain construction, the validation engine,
//! and the per-session error surface.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value as Json;

use crate::core::{FieldValue, InputSource, resolve};
use crate::filters::FilterChain;
use crate::messages::{MessageCatalog, Template, fill};
use crate::rules::date::{DateFormat, DateLimit};
use crate::rules::{CustomFn, Rule};

// ============================================================================
// ERROR MAP
// ============================================================================

/// Formatted validation errors keyed by field, in insertion order.
///
/// Each field holds at most one message: the first rule that failed for
/// it. The map only grows during a session; [`ErrorMap::clear`] (or
/// [`Validator::clear_errors`]) is the one way to shrink it.
#[derive(Debug, Clone, Default)]
pub struct ErrorMap {
    entries: IndexMap<String, String>,
}

impl ErrorMap {
    pub(crate) fn insert(&mut self, key: String, message: String) {
        self.entries.insert(key, message);
    }

    /// Whether any error has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with a recorded error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The message recorded for a field, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates `(field key, message)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }

    /// Iterates the messages alone, in insertion order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Drops every recorded error.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The errors as a JSON object, message keyed by field.
    #[must_use]
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.entries
                .iter()
                .map(|(key, message)| (key.clone(), Json::String(message.clone())))
                .collect(),
        )
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// One queued rule plus its optional call-site message.
#[derive(Debug, Clone)]
struct RuleEntry {
    rule: Rule,
    message: Option<String>,
}

/// A fluent, rule-chain validator over a read-only input source.
///
/// Rules queue up against the field that will be named by the next
/// [`validate`](Validator::validate) call; validating consumes the queued
/// chain (and filter pipeline) whether the field passes or fails, so the
/// same instance moves cleanly from field to field. Errors, field labels
/// and custom rule registrations live for the whole session.
///
/// # Examples
///
/// ```rust,ignore
/// use formcheck::prelude::*;
/// use serde_json::json;
///
/// let mut form = Validator::new(json!({
///     "email": "ada@example.com",
///     "age": "36",
/// }));
///
/// form.required().email().validate("email");
/// form.required().integer().min(18.0).validate_as("age", "Age");
///
/// assert!(!form.has_errors());
/// ```
pub struct Validator<S> {
    data: S,
    chain: Vec<RuleEntry>,
    filters: FilterChain,
    custom_fns: HashMap<String, CustomFn>,
    catalog: MessageCatalog,
    labels: HashMap<String, String>,
    errors: ErrorMap,
    default_date_format: DateFormat,
}

impl<S> Validator<S>
where
    S: InputSource,
{
    /// Creates a validator over `data` with the built-in English messages.
    pub fn new(data: S) -> Self {
        Self::with_catalog(data, MessageCatalog::builtin())
    }

    /// Creates a validator with an explicit message catalog (typically a
    /// custom table chained over the built-in one).
    pub fn with_catalog(data: S, catalog: MessageCatalog) -> Self {
        Self {
            data,
            chain: Vec::new(),
            filters: FilterChain::default(),
            custom_fns: HashMap::new(),
            catalog,
            labels: HashMap::new(),
            errors: ErrorMap::default(),
            default_date_format: DateFormat::default(),
        }
    }

    /// Rebinds the validator to a new input source. Errors, labels and
    /// custom rule registrations are kept.
    pub fn set_data(&mut self, data: S) -> &mut Self {
        self.data = data;
        self
    }

    /// The current input source.
    pub fn data(&self) -> &S {
        &self.data
    }

    /// Sets the date format used by [`date`](Validator::date),
    /// [`min_date`](Validator::min_date) and
    /// [`max_date`](Validator::max_date) when none is given explicitly.
    pub fn set_date_format(&mut self, format: DateFormat) -> &mut Self {
        self.default_date_format = format;
        self
    }

    /// Overrides the default error template for a rule id, for the rest
    /// of the session and independent of any one field.
    pub fn set_message(
        &mut self,
        rule_id: impl Into<Cow<'static, str>>,
        template: impl Into<Template>,
    ) -> &mut Self {
        self.catalog.set(rule_id, template);
        self
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Queues a transform applied to the field's value (element-wise for
    /// lists) before any rule runs. Cleared after the next `validate`.
    pub fn filter(&mut self, filter: impl Fn(&str) -> String + 'static) -> &mut Self {
        self.filters.push(filter);
        self
    }

    // ------------------------------------------------------------------
    // Rule builders
    // ------------------------------------------------------------------

    fn push(&mut self, rule: Rule) -> &mut Self {
        self.chain.push(RuleEntry {
            rule,
            message: None,
        });
        self
    }

    /// Field must be filled in: fails when the trimmed value is empty.
    pub fn required(&mut self) -> &mut Self {
        self.push(Rule::Required)
    }

    /// Field, if completed, must be a valid email address.
    pub fn email(&mut self) -> &mut Self {
        self.push(Rule::Email)
    }

    /// Field, if completed, must be a valid IP address.
    pub fn ip(&mut self) -> &mut Self {
        self.push(Rule::Ip)
    }

    /// Field, if completed, must be a valid internet address.
    pub fn url(&mut self) -> &mut Self {
        self.push(Rule::Url)
    }

    /// Field, if completed, must parse as a floating point number.
    pub fn float(&mut self) -> &mut Self {
        self.push(Rule::Float)
    }

    /// Field, if completed, must parse as an integer.
    pub fn integer(&mut self) -> &mut Self {
        self.push(Rule::Integer)
    }

    /// Every character, if the field is completed, must be a decimal
    /// digit. Like [`integer`](Validator::integer) without an upper limit.
    pub fn digits(&mut self) -> &mut Self {
        self.push(Rule::Digits)
    }

    /// Every character, if the field is completed, must be alphanumeric.
    pub fn alnum(&mut self) -> &mut Self {
        self.push(Rule::Alnum)
    }

    /// Field must equal its own lowercased form.
    pub fn lowercase(&mut self) -> &mut Self {
        self.push(Rule::Lowercase)
    }

    /// Field must equal its own uppercased form.
    pub fn uppercase(&mut self) -> &mut Self {
        self.push(Rule::Uppercase)
    }

    /// Field must be a number greater than or equal to `limit`.
    pub fn min(&mut self, limit: f64) -> &mut Self {
        self.push(Rule::Min {
            limit,
            inclusive: true,
        })
    }

    /// Field must be a number strictly greater than `limit`.
    pub fn min_exclusive(&mut self, limit: f64) -> &mut Self {
        self.push(Rule::Min {
            limit,
            inclusive: false,
        })
    }

    /// Field must be a number less than or equal to `limit`.
    pub fn max(&mut self, limit: f64) -> &mut Self {
        self.push(Rule::Max {
            limit,
            inclusive: true,
        })
    }

    /// Field must be a number strictly less than `limit`.
    pub fn max_exclusive(&mut self, limit: f64) -> &mut Self {
        self.push(Rule::Max {
            limit,
            inclusive: false,
        })
    }

    /// Field must be a number between `min` and `max`, bounds included.
    pub fn between(&mut self, min: f64, max: f64) -> &mut Self {
        self.push(Rule::Between {
            min,
            max,
            inclusive: true,
        })
    }

    /// Field must be a number strictly between `min` and `max`.
    pub fn between_exclusive(&mut self, min: f64, max: f64) -> &mut Self {
        self.push(Rule::Between {
            min,
            max,
            inclusive: false,
        })
    }

    /// Field must be a number strictly greater than zero.
    pub fn positive(&mut self) -> &mut Self {
        self.push(Rule::Positive)
    }

    /// Field must be a number strictly less than zero.
    pub fn negative(&mut self) -> &mut Self {
        self.push(Rule::Negative)
    }

    /// Field must be exactly `len` characters long (trimmed).
    pub fn length(&mut self, len: usize) -> &mut Self {
        self.push(Rule::Length { len })
    }

    /// Field must be at least `len` characters long (trimmed).
    pub fn min_length(&mut self, len: usize) -> &mut Self {
        self.push(Rule::MinLength { len })
    }

    /// Field must be at most `len` characters long (trimmed).
    pub fn max_length(&mut self, len: usize) -> &mut Self {
        self.push(Rule::MaxLength { len })
    }

    /// Field must equal another field's value (password confirmation and
    /// the like). The other field is read when validation runs; `label`
    /// names it in the error message.
    pub fn matches(&mut self, field: impl Into<String>, label: impl Into<String>) -> &mut Self {
        self.push(Rule::Matches {
            field: field.into(),
            label: label.into(),
        })
    }

    /// Field must differ from another field's value.
    pub fn not_matches(&mut self, field: impl Into<String>, label: impl Into<String>) -> &mut Self {
        self.push(Rule::NotMatches {
            field: field.into(),
            label: label.into(),
        })
    }

    /// Field must start with `prefix`.
    pub fn starts_with(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.push(Rule::StartsWith {
            prefix: prefix.into(),
        })
    }

    /// Field must not start with `prefix`.
    pub fn not_starts_with(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.push(Rule::NotStartsWith {
            prefix: prefix.into(),
        })
    }

    /// Field must end with `suffix`.
    pub fn ends_with(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.push(Rule::EndsWith {
            suffix: suffix.into(),
        })
    }

    /// Field must not end with `suffix`.
    pub fn not_ends_with(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.push(Rule::NotEndsWith {
            suffix: suffix.into(),
        })
    }

    /// Field, if completed, must be a valid date in the session's default
    /// format.
    pub fn date(&mut self) -> &mut Self {
        let format = self.default_date_format;
        self.date_fmt(format)
    }

    /// Field, if completed, must be a valid date in `format`.
    pub fn date_fmt(&mut self, format: DateFormat) -> &mut Self {
        self.push(Rule::Date {
            format,
            separator: None,
        })
    }

    /// Like [`date_fmt`](Validator::date_fmt), but the components must be
    /// split by exactly `separator`.
    pub fn date_fmt_sep(&mut self, format: DateFormat, separator: char) -> &mut Self {
        self.push(Rule::Date {
            format,
            separator: Some(separator),
        })
    }

    /// Field must be a date no earlier than `limit`, in the session's
    /// default format.
    ///
    /// The limit resolves to a concrete date *now*: register this rule
    /// after any field it references holds its final value.
    ///
    /// # Panics
    ///
    /// Panics when the limit cannot be resolved (missing referenced field,
    /// unparseable literal) — a broken call site, not a validation
    /// failure.
    pub fn min_date(&mut self, limit: impl Into<DateLimit>) -> &mut Self {
        let format = self.default_date_format;
        self.min_date_fmt(limit, format)
    }

    /// [`min_date`](Validator::min_date) with an explicit format.
    ///
    /// # Panics
    ///
    /// Panics when the limit cannot be resolved.
    pub fn min_date_fmt(&mut self, limit: impl Into<DateLimit>, format: DateFormat) -> &mut Self {
        let limit = match limit.into().resolve_against(format, &self.data, "min_date") {
            Ok(date) => date,
            Err(error) => panic!("{error}"),
        };
        self.push(Rule::MinDate { limit, format })
    }

    /// Field must be a date no later than `limit`, in the session's
    /// default format.
    ///
    /// # Panics
    ///
    /// Panics when the limit cannot be resolved.
    pub fn max_date(&mut self, limit: impl Into<DateLimit>) -> &mut Self {
        let format = self.default_date_format;
        self.max_date_fmt(limit, format)
    }

    /// [`max_date`](Validator::max_date) with an explicit format.
    ///
    /// # Panics
    ///
    /// Panics when the limit cannot be resolved.
    pub fn max_date_fmt(&mut self, limit: impl Into<DateLimit>, format: DateFormat) -> &mut Self {
        let limit = match limit.into().resolve_against(format, &self.data, "max_date") {
            Ok(date) => date,
            Err(error) => panic!("{error}"),
        };
        self.push(Rule::MaxDate { limit, format })
    }

    /// Field must be a payment-card number passing the Luhn checksum.
    pub fn ccnum(&mut self) -> &mut Self {
        self.push(Rule::Ccnum)
    }

    /// Field must be one of the allowed values.
    pub fn one_of<I, T>(&mut self, allowed: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.push(Rule::OneOf {
            allowed: allowed.into_iter().map(Into::into).collect(),
        })
    }

    /// [`one_of`](Validator::one_of) with the allowed values given as one
    /// comma-separated string.
    pub fn one_of_str(&mut self, allowed: &str) -> &mut Self {
        self.one_of(allowed.split(','))
    }

    /// Field must not be one of the denied values.
    pub fn none_of<I, T>(&mut self, denied: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.push(Rule::NoneOf {
            denied: denied.into_iter().map(Into::into).collect(),
        })
    }

    /// [`none_of`](Validator::none_of) with the denied values given as one
    /// comma-separated string.
    pub fn none_of_str(&mut self, denied: &str) -> &mut Self {
        self.none_of(denied.split(','))
    }

    /// Queues a free-form rule under `name`.
    ///
    /// The first predicate registered for a given name is cached for the
    /// validator's lifetime and reused by every later registration under
    /// that name — including across validate cycles — so a name maps to
    /// one predicate per session.
    pub fn custom(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        let check: CustomFn = self
            .custom_fns
            .entry(name.clone())
            .or_insert_with(|| Arc::new(check))
            .clone();
        self.push(Rule::Custom { name, check })
    }

    /// Queues a free-form rule from a pattern string: if `pattern`
    /// compiles as a regular expression the value must match it,
    /// otherwise the value must equal the string itself.
    pub fn custom_pattern(&mut self, name: impl Into<String>, pattern: &str) -> &mut Self {
        match Regex::new(pattern) {
            Ok(regex) => self.custom(name, move |value| regex.is_match(value)),
            Err(_) => {
                let literal = pattern.to_string();
                self.custom(name, move |value| value == literal)
            }
        }
    }

    /// Attaches a custom error template to the most recently queued rule.
    /// The template's `{}` placeholder receives the field label.
    pub fn message(&mut self, template: impl Into<String>) -> &mut Self {
        if let Some(last) = self.chain.last_mut() {
            last.message = Some(template.into());
        }
        self
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Validates `key` against the queued rule chain.
    ///
    /// The field's value is resolved (dot paths included), run through the
    /// filter pipeline, then checked rule by rule in registration order —
    /// element-wise for list values, stopping at the first failure. The
    /// chain and filters are consumed either way.
    ///
    /// Returns the filtered value on success (the empty scalar when the
    /// field was absent), or `None` when a rule failed and an error was
    /// recorded.
    pub fn validate(&mut self, key: &str) -> Option<FieldValue> {
        self.run(key, None)
    }

    /// [`validate`](Validator::validate) with a human-readable label used
    /// in error messages for this field, now and in later validations.
    pub fn validate_as(&mut self, key: &str, label: impl Into<String>) -> Option<FieldValue> {
        self.run(key, Some(label.into()))
    }

    fn run(&mut self, key: &str, label: Option<String>) -> Option<FieldValue> {
        let label = label.unwrap_or_else(|| {
            self.labels
                .get(key)
                .cloned()
                .unwrap_or_else(|| self.catalog.label_for(key))
        });
        self.labels.insert(key.to_string(), label);

        // The chains are consumed by this validation whatever the outcome.
        let chain = std::mem::take(&mut self.chain);
        let filters = std::mem::take(&mut self.filters);

        let resolved = resolve(&self.data, key).map(FieldValue::from_json);
        let value = filters.apply(resolved).unwrap_or_else(FieldValue::empty);

        match walk(&chain, &self.data, &value) {
            Ok(()) => Some(value),
            Err(failed) => {
                self.register_error(key, &chain[failed]);
                None
            }
        }
    }

    fn register_error(&mut self, key: &str, entry: &RuleEntry) {
        let template = match &entry.message {
            Some(custom) => custom.clone(),
            None => self.catalog.template_for(&entry.rule),
        };
        let label = self.labels.get(key).map_or(key, String::as_str);
        self.errors.insert(key.to_string(), fill(&template, label));
    }

    // ------------------------------------------------------------------
    // Error surface
    // ------------------------------------------------------------------

    /// Whether any field has failed so far this session.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The recorded error message for a field, if any.
    #[must_use]
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key)
    }

    /// All recorded errors.
    #[must_use]
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Drops every recorded error, keeping labels and registrations.
    pub fn clear_errors(&mut self) -> &mut Self {
        self.errors.clear();
        self
    }
}

/// Checks `value` against the chain: list values element-wise (stopping
/// at the first failing element), scalars rule by rule in order. Returns
/// the index of the failing rule.
fn walk<S>(chain: &[RuleEntry], data: &S, value: &FieldValue) -> Result<(), usize>
where
    S: InputSource,
{
    match value {
        FieldValue::List(items) => {
            for item in items {
                walk(chain, data, item)?;
            }
            Ok(())
        }
        FieldValue::Scalar(text) => {
            for (index, entry) in chain.iter().enumerate() {
                if !entry.rule.evaluate(text, data) {
                    return Err(index);
                }
            }
            Ok(())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
