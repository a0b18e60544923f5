/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the OPC layer used to read and write DOCX packages:
/// package structure (parts, relationships), content type management, and
/// ZIP-based physical packaging.
///
/// # Performance Features
///
/// - Uses `quick-xml` for efficient zero-copy XML parsing
/// - Minimizes allocations by borrowing data where possible
/// - Uses hash maps for O(1) lookups

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
