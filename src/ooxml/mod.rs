//! Office Open XML (OOXML) support, scoped to Word (.docx) documents.
//!
//! The module is organized into two layers:
//!
//! 1. **OPC layer** (`opc`): package structure, parts, relationships, ZIP I/O
//! 2. **`docx`**: Word-specific parsing (paragraphs, runs, tables, styles,
//!    sections, fields, revisions) plus `Package`, the surgical read/mutate
//!    entry point the rest of the crate drives
//!
//! `custom_properties` and `metadata` extract the package-level core and
//! custom document properties.
//!
//! # Example
//!
//! ```rust,no_run
//! use scribeforge::ooxml::docx::Package;
//!
//! let pkg = Package::open("document.docx")?;
//! let doc = pkg.document()?;
//!
//! let text = doc.text()?;
//! println!("Document contains {} paragraphs", doc.paragraph_count()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod custom_properties;
pub mod docx;
pub mod error;
pub mod metadata;
pub mod opc;

pub use opc::{OpcPackage, PackURI};

pub use custom_properties::{CustomProperties, PropertyValue};

pub use error::{OoxmlError, Result};
