//! The automation seam: a trait abstracting "a Word document we can read
//! from and surgically mutate", and one concrete implementation backed by
//! the OOXML layer.
//!
//! Every stage above this module (extractor, executor, validator) talks to
//! `dyn WordAutomation`, never to `ooxml::docx::Package` directly. That keeps
//! the pipeline stages testable against a fake and keeps the OOXML
//! dependency confined to one file.
mod ooxml_automation;

pub use ooxml_automation::OoxmlAutomation;

use crate::error::Result;
use crate::ooxml::docx::{Field, Paragraph, Style, Table};

/// A heading occurrence, resolved against the paragraph stream.
#[derive(Debug, Clone)]
pub struct HeadingRef {
    pub paragraph_index: usize,
    pub text: String,
    pub level: u8,
    /// Whether the heading's paragraph lies inside a `<w:tc>` table cell.
    pub in_table: bool,
    /// Document-order index of the enclosing table, if `in_table`.
    pub table_index: Option<usize>,
}

/// One table's body-order anchor and per-cell paragraph anchors, resolved by
/// the same raw-XML body walk that tags headings with table membership.
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Document-order paragraph index of the table's first paragraph (the
    /// position a table occupies in the flat paragraph stream).
    pub anchor_paragraph_index: usize,
    /// Rows of cells; each cell holds the document-order paragraph index of
    /// its first paragraph. A `<w:tc>` always contains at least one block,
    /// so this falls back to `anchor_paragraph_index` only if the raw XML
    /// is malformed enough to lack one.
    pub cell_references: Vec<Vec<usize>>,
}

/// The operations the Extractor, Executor and Validator need from an open
/// document. Mutating methods operate on raw part XML, matching the
/// surgical-edit design: the whitelist of atomic operations never needs to
/// reserialize a whole document tree.
pub trait WordAutomation {
    /// Full plain-text content, paragraph breaks as `\n`.
    fn document_text(&self) -> Result<String>;

    fn paragraphs(&self) -> Result<Vec<Paragraph>>;

    fn paragraph(&self, index: usize) -> Result<Option<Paragraph>>;

    fn headings(&self) -> Result<Vec<HeadingRef>>;

    fn tables(&self) -> Result<Vec<Table>>;

    /// Document-order layout info for every table: its anchor paragraph
    /// position and a per-cell paragraph-index grid, zipped against
    /// [`Self::tables`] by position.
    fn table_layout(&self) -> Result<Vec<TableLayout>>;

    fn fields(&self) -> Result<Vec<Field>>;

    /// All named styles, paragraph and character alike.
    fn styles(&self) -> Result<Vec<Style>>;

    fn style_by_name(&self, name: &str) -> Result<Option<Style>>;

    /// Raw XML of a part, addressed by its pack URI (e.g. `/word/document.xml`).
    fn part_xml(&self, uri: &str) -> Result<Option<String>>;

    /// Overwrite a part's raw XML in place. The caller is responsible for
    /// well-formedness; this is the one seam atomic operations use to
    /// mutate the document.
    fn set_part_xml(&mut self, uri: &str, content_type: &str, xml: String) -> Result<()>;

    /// Persist the in-memory package to `path`.
    fn save(&mut self, path: &std::path::Path) -> Result<()>;

    fn metadata(&self) -> crate::common::Metadata;

    /// Every part in the package keyed by its pack URI, content type and
    /// byte size — the Extractor's loss-closure pass over the raw package
    /// filters this down to headers/footers/footnotes/etc. and media.
    fn part_inventory(&self) -> Result<Vec<PartDescriptor>>;

    /// Raw bytes of a part, for media capture.
    fn part_blob(&self, uri: &str) -> Result<Option<Vec<u8>>>;
}

/// One package part's identity, independent of its interpretation.
#[derive(Debug, Clone)]
pub struct PartDescriptor {
    pub uri: String,
    pub content_type: String,
    pub size_bytes: u64,
}
