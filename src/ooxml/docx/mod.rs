//! Word (.docx) document support.
//!
//! This module provides reading and targeted in-place mutation of Microsoft
//! Word documents in the Office Open XML format.
//!
//! # Architecture
//!
//! - `Package`: the overall .docx file package
//! - `Document`: the main document content and API
//! - `Paragraph`/`Run`: paragraph and run-level text and formatting
//! - `Table`: a table with rows and cells
//! - `Section`: a document section with page properties
//! - `Styles`: the collection of document styles
//! - `Field`: field codes (e.g. TOC, PAGE, REF)
//! - `Revision`: tracked-change markup
//! - `DocumentStatistics`: word/character/paragraph counts
//!
//! # Example
//!
//! ```rust,no_run
//! use scribeforge::ooxml::docx::Package;
//!
//! let package = Package::open("document.docx")?;
//! let doc = package.document()?;
//!
//! for para in doc.paragraphs()? {
//!     println!("Paragraph: {}", para.text()?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
pub mod enums;
pub mod field;
pub mod package;
pub mod paragraph;
pub mod parts;
pub mod revision;
pub mod section;
pub mod statistics;
pub mod styles;
pub mod table;
pub(crate) mod xmlattr;

pub use document::Document;
pub use enums::{WdHeaderFooter, WdOrientation, WdSectionStart, WdStyleType};
pub use field::Field;
pub use package::Package;
pub use paragraph::{Paragraph, Run, RunProperties};
pub use revision::{Revision, RevisionType};
pub use section::{Emu, Margins, PageSize, Section, Sections};
pub use statistics::DocumentStatistics;
pub use styles::{Style, Styles};
pub use table::{Cell, Row, Table, VMergeState};
