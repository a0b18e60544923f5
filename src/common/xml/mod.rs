//! XML text helpers shared by the OOXML reader and the part mutators.

pub mod escape;

pub use escape::{escape_xml, unescape_xml};
