//! Error message templates and catalogs.
//!
//! Every template carries exactly one `{}` placeholder, filled with the
//! failing field's label when the error is recorded. Catalogs can be
//! chained: a lookup that misses in one table falls through to its parent,
//! which is how alternate message sets (translations, house style) layer
//! over the built-in English table without replacing it wholesale.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::rules::Rule;

/// Substitutes the single `{}` placeholder with the field label.
pub(crate) fn fill(template: &str, label: &str) -> String {
    template.replacen("{}", label, 1)
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// An error template: fixed text, or computed from a rule's arguments
/// (bounds, lengths, the other field's label, ...).
#[derive(Debug, Clone)]
pub enum Template {
    /// A literal template string.
    Text(Cow<'static, str>),
    /// A function building the template from the failing rule.
    Computed(fn(&Rule) -> String),
}

impl Template {
    pub(crate) fn render(&self, rule: &Rule) -> String {
        match self {
            Template::Text(text) => text.clone().into_owned(),
            Template::Computed(build) => build(rule),
        }
    }
}

impl From<&'static str> for Template {
    fn from(text: &'static str) -> Self {
        Template::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::Text(Cow::Owned(text))
    }
}

// ============================================================================
// MESSAGE CATALOG
// ============================================================================

/// A rule-id-keyed table of error templates.
///
/// Also owns the default field-label template (used when a field is
/// validated without an explicit label) and the global fallback template
/// (used when no table in the chain knows the failing rule).
///
/// # Examples
///
/// ```rust,ignore
/// let mut catalog = MessageCatalog::empty();
/// catalog.set("required", "{} must not be left blank.");
/// let catalog = catalog.with_parent(Arc::new(MessageCatalog::builtin()));
/// // `required` now uses the override, every other rule falls through.
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<Cow<'static, str>, Template>,
    field_label: Cow<'static, str>,
    fallback: Cow<'static, str>,
    parent: Option<Arc<MessageCatalog>>,
}

impl MessageCatalog {
    /// A catalog with no rule templates. Lookups resolve through the
    /// parent (if any) or the global fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
            field_label: Cow::Borrowed(DEFAULT_FIELD_LABEL),
            fallback: Cow::Borrowed(DEFAULT_FALLBACK),
            parent: None,
        }
    }

    /// The built-in English catalog covering every built-in rule.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();

        catalog.set("required", "{} is required.");
        catalog.set("email", "{} is an invalid email address.");
        catalog.set("ip", "{} is an invalid IP address.");
        catalog.set("url", "{} is an invalid url.");
        catalog.set("float", "{} must consist of numbers only.");
        catalog.set("integer", "{} must consist of integer value.");
        catalog.set("digits", "{} must consist only of digits.");
        catalog.set("alnum", "{} must contain only alphanumeric characters.");
        catalog.set("lowercase", "{} must contain only lowercase characters.");
        catalog.set("uppercase", "{} must contain only uppercase characters.");
        catalog.set("positive", "{} must be a positive number.");
        catalog.set("negative", "{} must be a negative number.");
        catalog.set("date", "{} is not valid date.");
        catalog.set("ccnum", "{} must be a valid credit card number.");

        catalog.set("min", Template::Computed(min_template));
        catalog.set("max", Template::Computed(max_template));
        catalog.set("between", Template::Computed(between_template));
        catalog.set("length", Template::Computed(length_template));
        catalog.set("min_length", Template::Computed(min_length_template));
        catalog.set("max_length", Template::Computed(max_length_template));
        catalog.set("matches", Template::Computed(matches_template));
        catalog.set("not_matches", Template::Computed(not_matches_template));
        catalog.set("starts_with", Template::Computed(starts_with_template));
        catalog.set(
            "not_starts_with",
            Template::Computed(not_starts_with_template),
        );
        catalog.set("ends_with", Template::Computed(ends_with_template));
        catalog.set("not_ends_with", Template::Computed(not_ends_with_template));
        catalog.set("min_date", Template::Computed(min_date_template));
        catalog.set("max_date", Template::Computed(max_date_template));
        catalog.set("one_of", Template::Computed(one_of_template));
        catalog.set("none_of", Template::Computed(none_of_template));

        catalog
    }

    /// Registers (or replaces) the template for a rule id.
    pub fn set(&mut self, id: impl Into<Cow<'static, str>>, template: impl Into<Template>) {
        self.templates.insert(id.into(), template.into());
    }

    /// Sets the template used to derive a label from a bare field key.
    pub fn set_field_label(&mut self, template: impl Into<Cow<'static, str>>) {
        self.field_label = template.into();
    }

    /// Sets the global fallback used when no table knows a rule.
    pub fn set_fallback(&mut self, template: impl Into<Cow<'static, str>>) {
        self.fallback = template.into();
    }

    /// Chains `parent` behind this catalog for lookups that miss here.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_parent(mut self, parent: Arc<MessageCatalog>) -> Self {
        self.parent = Some(parent);
        self
    }

    fn lookup(&self, id: &str) -> Option<&Template> {
        self.templates
            .get(id)
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.lookup(id)))
    }

    /// The error template for a failed rule: this table's entry, a
    /// parent's, or the global fallback.
    pub(crate) fn template_for(&self, rule: &Rule) -> String {
        match self.lookup(rule.id()) {
            Some(template) => template.render(rule),
            None => self.fallback.clone().into_owned(),
        }
    }

    /// The default human-readable label for a field key.
    pub(crate) fn label_for(&self, key: &str) -> String {
        fill(&self.field_label, key)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const DEFAULT_FIELD_LABEL: &str = "Field with the name of \"{}\"";
const DEFAULT_FALLBACK: &str = "{} has an error.";

// ============================================================================
// BUILT-IN COMPUTED TEMPLATES
// ============================================================================

fn bound_template(direction: &str, limit: f64, inclusive: bool) -> String {
    let mut message = format!("{{}} must be {direction} than ");
    if inclusive {
        message.push_str("or equal to ");
    }
    message.push_str(&format!("{limit}."));
    message
}

fn min_template(rule: &Rule) -> String {
    match rule {
        Rule::Min { limit, inclusive } => bound_template("greater", *limit, *inclusive),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn max_template(rule: &Rule) -> String {
    match rule {
        Rule::Max { limit, inclusive } => bound_template("less", *limit, *inclusive),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn between_template(rule: &Rule) -> String {
    match rule {
        Rule::Between {
            min,
            max,
            inclusive,
        } => {
            let mut message = format!("{{}} must be between {min} and {max}.");
            if !inclusive {
                message.push_str("(Without limits)");
            }
            message
        }
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn length_template(rule: &Rule) -> String {
    match rule {
        Rule::Length { len } => format!("{{}} must be exactly {len} characters in length."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn min_length_template(rule: &Rule) -> String {
    match rule {
        Rule::MinLength { len } => format!("{{}} must be at least {len} characters or longer."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn max_length_template(rule: &Rule) -> String {
    match rule {
        Rule::MaxLength { len } => format!("{{}} must be no longer than {len} characters."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn matches_template(rule: &Rule) -> String {
    match rule {
        Rule::Matches { label, .. } => format!("{{}} must match {label}."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn not_matches_template(rule: &Rule) -> String {
    match rule {
        Rule::NotMatches { label, .. } => format!("{{}} must not match {label}."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn starts_with_template(rule: &Rule) -> String {
    match rule {
        Rule::StartsWith { prefix } => format!("{{}} must start with \"{prefix}\"."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn not_starts_with_template(rule: &Rule) -> String {
    match rule {
        Rule::NotStartsWith { prefix } => format!("{{}} must not start with \"{prefix}\"."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn ends_with_template(rule: &Rule) -> String {
    match rule {
        Rule::EndsWith { suffix } => format!("{{}} must end with \"{suffix}\"."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn not_ends_with_template(rule: &Rule) -> String {
    match rule {
        Rule::NotEndsWith { suffix } => format!("{{}} must not end with \"{suffix}\"."),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn min_date_template(rule: &Rule) -> String {
    match rule {
        Rule::MinDate { limit, format } => {
            format!("{{}} must be later than {}.", format.render(*limit))
        }
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn max_date_template(rule: &Rule) -> String {
    match rule {
        Rule::MaxDate { limit, format } => {
            format!("{{}} must be before {}.", format.render(*limit))
        }
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn one_of_template(rule: &Rule) -> String {
    match rule {
        Rule::OneOf { allowed } => format!("{{}} must be one of {}.", allowed.join(", ")),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

fn none_of_template(rule: &Rule) -> String {
    match rule {
        Rule::NoneOf { denied } => format!("{{}} must not be one of {}.", denied.join(", ")),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
