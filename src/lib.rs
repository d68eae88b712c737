//! # formcheck
//!
//! Rule-based validation for form and payload data with a fluent builder
//! API.
//!
//! A [`Validator`] wraps a read-only input source (a decoded request
//! body, a query-string map, any [`InputSource`]). For each field you
//! queue filters and rules, then call [`validate`](Validator::validate):
//! the field's value is looked up (dot paths reach into nested data), run
//! through the filter pipeline, and checked against each rule in order.
//! The first failing rule records a formatted message in the session's
//! error map; list-valued fields are checked element by element.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formcheck::prelude::*;
//! use serde_json::json;
//!
//! let mut form = Validator::new(json!({
//!     "email": "ada@example.com",
//!     "age": "36",
//!     "card": "4532 0151 1283 0366",
//! }));
//!
//! form.required().email().validate("email");
//! form.required().integer().between(18.0, 120.0).validate_as("age", "Age");
//! form.filter(|v| v.replace(' ', "")).ccnum().validate("card");
//!
//! if form.has_errors() {
//!     for (field, message) in form.errors().iter() {
//!         eprintln!("{field}: {message}");
//!     }
//! }
//! ```
//!
//! ## Messages
//!
//! Error text resolves in order: the template given at the call site via
//! [`message`](Validator::message), the rule's entry in the session's
//! [`MessageCatalog`], the catalog's parent chain, and finally the global
//! fallback. Templates carry one `{}` placeholder for the field label.
//!
//! ## Extending
//!
//! [`custom`](Validator::custom) queues a predicate under its own rule
//! name; [`custom_pattern`](Validator::custom_pattern) does the same from
//! a regex (or literal-equality) string. Per-rule templates can be
//! overridden session-wide with [`set_message`](Validator::set_message).

pub mod core;
pub mod filters;
pub mod messages;
pub mod prelude;
pub mod rules;
pub mod validator;

pub use self::core::{ConfigError, FieldValue, InputSource};
pub use messages::{MessageCatalog, Template};
pub use rules::Rule;
pub use rules::date::{DateFormat, DateLimit};
pub use validator::{ErrorMap, Validator};
