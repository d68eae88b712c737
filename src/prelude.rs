//! Prelude module for convenient imports.
//!
//! Brings in the validator, the value and source types, and everything
//! needed to configure messages and date rules:
//!
//! ```rust,ignore
//! use formcheck::prelude::*;
//! ```

pub use crate::core::{ConfigError, FieldValue, InputSource};
pub use crate::messages::{MessageCatalog, Template};
pub use crate::rules::Rule;
pub use crate::rules::date::{DateFormat, DateLimit};
pub use crate::validator::{ErrorMap, Validator};
