//! Format-agnostic building blocks used by both the OOXML layer and the
//! pipeline stages: the generic document-level error type, document
//! metadata, unit conversion and color parsing for style rules, and XML
//! escaping helpers.

pub mod error;
pub mod metadata;
pub mod style;
pub mod unit;
pub mod xml;

pub use error::{Error, Result};
pub use metadata::Metadata;
