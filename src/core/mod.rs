//! Core types: field values, input sources, configuration errors.

pub mod error;
pub mod source;
pub mod value;

pub use error::ConfigError;
pub use source::{InputSource, resolve};
pub use value::FieldValue;
