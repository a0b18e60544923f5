/// Document - the main content of a Word document.
use crate::ooxml::docx::field::Field;
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::parts::DocumentPart;
use crate::ooxml::docx::section::{Section, Sections};
use crate::ooxml::docx::statistics::{
    DocumentStatistics, count_characters, count_characters_no_spaces, count_words,
    estimate_line_count, estimate_page_count,
};
use crate::ooxml::docx::styles::Styles;
use crate::ooxml::docx::table::Table;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::relationship_type;
use quick_xml::Reader;
use quick_xml::events::Event;

/// The main document content of a Word (.docx) package.
///
/// Wraps the `/word/document.xml` part, providing read access to paragraphs,
/// tables, sections and styles. There is no mutation surface here: targeted
/// edits go through `Package::part_xml`/`Package::set_part_xml` directly on
/// the raw bytes, since operations must leave unrelated content untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use scribeforge::ooxml::docx::Package;
///
/// let pkg = Package::open("document.docx")?;
/// let doc = pkg.document()?;
///
/// for para in doc.paragraphs()? {
///     println!("Paragraph: {}", para.text()?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Document<'a> {
    part: DocumentPart<'a>,
    opc: &'a OpcPackage,
}

impl<'a> Document<'a> {
    /// Create a new Document from a document part and owning package.
    pub(crate) fn new(part: DocumentPart<'a>, opc: &'a OpcPackage) -> Self {
        Self { part, opc }
    }

    /// Get the underlying document part.
    #[inline]
    pub fn part(&self) -> &DocumentPart<'a> {
        &self.part
    }

    /// Get the underlying OPC package.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        self.opc
    }

    /// Extract all text content from the document.
    pub fn text(&self) -> Result<String> {
        self.part.extract_text()
    }

    /// Get the number of paragraphs in the document.
    pub fn paragraph_count(&self) -> Result<usize> {
        self.part.paragraph_count()
    }

    /// Get the number of tables in the document.
    pub fn table_count(&self) -> Result<usize> {
        self.part.table_count()
    }

    /// Get all paragraphs in the document, in document order.
    pub fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        Ok(self.part.paragraphs()?.into_iter().collect())
    }

    /// Get a specific paragraph by index.
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn paragraph(&self, index: usize) -> Result<Option<Paragraph>> {
        Ok(self.paragraphs()?.into_iter().nth(index))
    }

    /// Get all tables in the document, in document order.
    pub fn tables(&self) -> Result<Vec<Table>> {
        Ok(self.part.tables()?.into_iter().collect())
    }

    /// Get a specific table by index.
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn table(&self, index: usize) -> Result<Option<Table>> {
        Ok(self.tables()?.into_iter().nth(index))
    }

    /// Concatenate the text of paragraphs `start..end` (exclusive).
    pub fn text_range(&self, start: usize, end: usize) -> Result<String> {
        let paragraphs = self.paragraphs()?;
        let mut text = String::new();
        for para in paragraphs.iter().skip(start).take(end.saturating_sub(start)) {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&para.text()?);
        }
        Ok(text)
    }

    /// Get all sections in the document, in document order.
    ///
    /// Each section corresponds to a `<w:sectPr>` element, either nested
    /// inside a paragraph's `<w:pPr>` (marking the end of a section) or at
    /// the very end of the document body (the last/only section). A document
    /// with no explicit section break still has exactly one section.
    pub fn sections(&self) -> Result<Sections> {
        let sections = self.extract_sections()?;
        Ok(Sections::new(sections))
    }

    fn extract_sections(&self) -> Result<Vec<Section>> {
        let xml_bytes = self.part.xml_bytes();
        let mut reader = Reader::from_reader(xml_bytes);
        reader.config_mut().trim_text(true);

        let mut sections = Vec::new();
        let mut current_sect_pr: Option<Vec<u8>> = None;
        let mut depth = 0i32;
        let mut buf = Vec::with_capacity(512);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if e.local_name().as_ref() == b"sectPr" && current_sect_pr.is_none() {
                        let mut bytes = Vec::with_capacity(1024);
                        bytes.extend_from_slice(b"<w:sectPr");
                        for attr in e.attributes().flatten() {
                            bytes.push(b' ');
                            bytes.extend_from_slice(attr.key.as_ref());
                            bytes.extend_from_slice(b"=\"");
                            bytes.extend_from_slice(&attr.value);
                            bytes.push(b'"');
                        }
                        bytes.push(b'>');
                        current_sect_pr = Some(bytes);
                        depth = 1;
                    } else if let Some(ref mut bytes) = current_sect_pr {
                        depth += 1;
                        bytes.push(b'<');
                        bytes.extend_from_slice(e.name().as_ref());
                        for attr in e.attributes().flatten() {
                            bytes.push(b' ');
                            bytes.extend_from_slice(attr.key.as_ref());
                            bytes.extend_from_slice(b"=\"");
                            bytes.extend_from_slice(&attr.value);
                            bytes.push(b'"');
                        }
                        bytes.push(b'>');
                    }
                },
                Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"sectPr" && current_sect_pr.is_none() {
                        let mut bytes = Vec::with_capacity(64);
                        bytes.extend_from_slice(b"<w:sectPr");
                        for attr in e.attributes().flatten() {
                            bytes.push(b' ');
                            bytes.extend_from_slice(attr.key.as_ref());
                            bytes.extend_from_slice(b"=\"");
                            bytes.extend_from_slice(&attr.value);
                            bytes.push(b'"');
                        }
                        bytes.extend_from_slice(b"/>");
                        sections.push(Section::from_xml_bytes(bytes)?);
                    } else if let Some(ref mut bytes) = current_sect_pr {
                        bytes.push(b'<');
                        bytes.extend_from_slice(e.name().as_ref());
                        for attr in e.attributes().flatten() {
                            bytes.push(b' ');
                            bytes.extend_from_slice(attr.key.as_ref());
                            bytes.extend_from_slice(b"=\"");
                            bytes.extend_from_slice(&attr.value);
                            bytes.push(b'"');
                        }
                        bytes.extend_from_slice(b"/>");
                    }
                },
                Ok(Event::Text(e)) => {
                    if let Some(ref mut bytes) = current_sect_pr {
                        bytes.extend_from_slice(e.as_ref());
                    }
                },
                Ok(Event::End(e)) => {
                    if let Some(ref mut bytes) = current_sect_pr {
                        bytes.extend_from_slice(b"</");
                        bytes.extend_from_slice(e.name().as_ref());
                        bytes.push(b'>');

                        depth -= 1;
                        if depth == 0 && e.local_name().as_ref() == b"sectPr" {
                            let bytes = current_sect_pr.take().unwrap();
                            sections.push(Section::from_xml_bytes(bytes)?);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        if sections.is_empty() {
            sections.push(Section::from_xml_bytes(b"<w:sectPr/>".to_vec())?);
        }

        Ok(sections)
    }

    /// Get the document's styles.
    pub fn styles(&self) -> Result<Styles<'a>> {
        let main_part = self.opc.main_document_part()?;
        let rel = main_part
            .rels()
            .part_with_reltype(relationship_type::STYLES)
            .map_err(|e| OoxmlError::PartNotFound(format!("styles part: {}", e)))?;
        let styles_partname = rel.target_partname()?;
        let styles_part = self.opc.get_part(&styles_partname)?;
        Ok(Styles::from_part(styles_part))
    }

    /// Get all fields (PAGE, DATE, REF, TOC, ...) in the document.
    pub fn fields(&self) -> Result<Vec<Field>> {
        let xml_bytes = self.part.xml_bytes();
        Field::extract_from_document(xml_bytes)
    }

    /// Get the number of fields in the document.
    pub fn field_count(&self) -> Result<usize> {
        Ok(self.fields()?.len())
    }

    /// Compute word/character/paragraph/table/page statistics for the document.
    pub fn statistics(&self) -> Result<DocumentStatistics> {
        let mut stats = DocumentStatistics::new();

        let text = self.text()?;
        stats.set_word_count(count_words(&text));
        stats.set_character_count(count_characters(&text));
        stats.set_character_count_no_spaces(count_characters_no_spaces(&text));
        stats.set_paragraph_count(self.paragraph_count()?);
        stats.set_table_count(self.table_count()?);

        let line_count = estimate_line_count(&text, 80);
        stats.set_line_count(line_count);
        stats.set_page_count(estimate_page_count(line_count, 45));

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    // Integration tests build a minimal in-memory package via `Package::from_reader`.
}
