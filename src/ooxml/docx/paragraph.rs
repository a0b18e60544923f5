/// Paragraph and Run structures for Word documents.
use crate::ooxml::docx::revision::{Revision, parse_revisions};
use crate::ooxml::docx::xmlattr::{read_attr, read_toggle_property};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;

/// A paragraph in a Word document.
///
/// Represents a `<w:p>` element. Paragraphs own their raw XML bytes and
/// expose streaming accessors over it; nothing is parsed eagerly.
#[derive(Debug, Clone)]
pub struct Paragraph {
    xml_bytes: Vec<u8>,
}

impl Paragraph {
    /// Create a new Paragraph from XML bytes.
    #[inline]
    pub fn new(xml_bytes: Vec<u8>) -> Self {
        Self { xml_bytes }
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        &self.xml_bytes
    }

    /// Get the text content of this paragraph.
    ///
    /// Concatenates all text from all runs in the paragraph, expanding
    /// `<w:tab/>` to a tab character and `<w:br/>` to a newline.
    pub fn text(&self) -> Result<String> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut result = String::with_capacity(self.xml_bytes.len() / 4);
        let mut in_text_element = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"t" => in_text_element = true,
                        b"tab" => result.push('\t'),
                        b"br" | b"cr" => result.push('\n'),
                        _ => {},
                    }
                },
                Ok(Event::Text(e)) if in_text_element => {
                    let text = e
                        .decode()
                        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                    result.push_str(&text);
                },
                Ok(Event::End(e)) => {
                    if e.local_name().as_ref() == b"t" {
                        in_text_element = false;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(result)
    }

    /// Get an iterator over the runs in this paragraph.
    pub fn runs(&self) -> Result<SmallVec<[Run; 8]>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut runs = SmallVec::new();
        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut current: Option<Vec<u8>> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = e.local_name();
                    if name.as_ref() == b"r" && depth == 0 {
                        let mut owned = Vec::new();
                        owned.extend_from_slice(b"<w:r>");
                        current = Some(owned);
                    } else if let Some(ref mut owned) = current {
                        owned.extend_from_slice(b"<");
                        owned.extend_from_slice(e.name().as_ref());
                        for attr in e.attributes().flatten() {
                            owned.push(b' ');
                            owned.extend_from_slice(attr.key.as_ref());
                            owned.extend_from_slice(b"=\"");
                            owned.extend_from_slice(&attr.value);
                            owned.push(b'"');
                        }
                        owned.push(b'>');
                    }
                    if current.is_some() {
                        depth += 1;
                    }
                },
                Ok(Event::Empty(e)) => {
                    if let Some(ref mut owned) = current {
                        owned.extend_from_slice(b"<");
                        owned.extend_from_slice(e.name().as_ref());
                        for attr in e.attributes().flatten() {
                            owned.push(b' ');
                            owned.extend_from_slice(attr.key.as_ref());
                            owned.extend_from_slice(b"=\"");
                            owned.extend_from_slice(&attr.value);
                            owned.push(b'"');
                        }
                        owned.extend_from_slice(b"/>");
                    }
                },
                Ok(Event::Text(e)) => {
                    if let Some(ref mut owned) = current {
                        owned.extend_from_slice(e.as_ref());
                    }
                },
                Ok(Event::End(e)) => {
                    if current.is_some() {
                        depth = depth.saturating_sub(1);
                        if let Some(ref mut owned) = current {
                            owned.extend_from_slice(b"</");
                            owned.extend_from_slice(e.name().as_ref());
                            owned.push(b'>');
                        }
                        if depth == 0 && e.local_name().as_ref() == b"r" {
                            runs.push(Run::new(current.take().unwrap()));
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(runs)
    }

    /// Extract the tracked-change revisions overlapping this paragraph.
    pub fn revisions(&self) -> Result<SmallVec<[Revision; 4]>> {
        parse_revisions(self.xml_bytes())
    }

    /// The style id referenced by this paragraph's `<w:pStyle>`, if any.
    pub fn style_id(&self) -> Result<Option<String>> {
        read_attr(self.xml_bytes(), b"pStyle", b"val")
    }

    /// The outline level (`<w:outlineLvl w:val="N"/>`), 0-based, if set directly.
    pub fn outline_level(&self) -> Result<Option<u8>> {
        Ok(read_attr(self.xml_bytes(), b"outlineLvl", b"val")?
            .and_then(|v| v.parse::<u8>().ok()))
    }

    /// Whether `<w:dirty>` or `w:dirty="1"` markers are present in field codes.
    pub fn has_dirty_field(&self) -> bool {
        memchr::memmem::find(self.xml_bytes(), b"w:dirty=\"true\"").is_some()
            || memchr::memmem::find(self.xml_bytes(), b"w:dirty=\"1\"").is_some()
    }
}

/// Cached formatting properties for a Run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunProperties {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Run {
    xml_bytes: Vec<u8>,
}

impl Run {
    pub fn new(xml_bytes: Vec<u8>) -> Self {
        Self { xml_bytes }
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        &self.xml_bytes
    }

    /// Get the text content of this run.
    pub fn text(&self) -> Result<String> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut result = String::with_capacity(self.xml_bytes.len() / 8);
        let mut in_text_element = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"t" => in_text_element = true,
                        b"tab" => result.push('\t'),
                        b"br" => result.push('\n'),
                        _ => {},
                    }
                },
                Ok(Event::Text(e)) if in_text_element => {
                    let text = e
                        .decode()
                        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                    result.push_str(&text);
                },
                Ok(Event::End(e)) => {
                    if e.local_name().as_ref() == b"t" {
                        in_text_element = false;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(result)
    }

    /// Whether the run carries `<w:b/>` (bold) in its `<w:rPr>`.
    pub fn bold(&self) -> Result<Option<bool>> {
        read_toggle_property(self.xml_bytes(), b"b")
    }

    /// Whether the run carries `<w:i/>` (italic) in its `<w:rPr>`.
    pub fn italic(&self) -> Result<Option<bool>> {
        read_toggle_property(self.xml_bytes(), b"i")
    }

    /// Whether the run carries `<w:u w:val="..."/>` (underline), excluding "none".
    pub fn underline(&self) -> Result<Option<bool>> {
        match read_attr(self.xml_bytes(), b"u", b"val")? {
            Some(v) => Ok(Some(v != "none")),
            None => Ok(None),
        }
    }

    /// Whether the run carries `<w:strike/>`.
    pub fn strikethrough(&self) -> Result<Option<bool>> {
        read_toggle_property(self.xml_bytes(), b"strike")
    }

    /// The east-Asian or latin font name from `<w:rFonts>`, if present.
    pub fn font_name(&self) -> Result<Option<String>> {
        if let Some(name) = read_attr(self.xml_bytes(), b"rFonts", b"ascii")? {
            return Ok(Some(name));
        }
        read_attr(self.xml_bytes(), b"rFonts", b"eastAsia")
    }

    /// Font size in half-points from `<w:sz w:val="..."/>`, converted to points.
    pub fn font_size_pt(&self) -> Result<Option<f64>> {
        Ok(read_attr(self.xml_bytes(), b"sz", b"val")?
            .and_then(|v| v.parse::<f64>().ok())
            .map(|half_points| half_points / 2.0))
    }

    /// Font color hex (`#RRGGBB`) from `<w:color w:val="..."/>`, if present and not "auto".
    pub fn color_hex(&self) -> Result<Option<String>> {
        match read_attr(self.xml_bytes(), b"color", b"val")? {
            Some(v) if v.eq_ignore_ascii_case("auto") => Ok(None),
            Some(v) => Ok(Some(format!("#{}", v.to_uppercase()))),
            None => Ok(None),
        }
    }

    /// Get both text and resolved properties in a single parse.
    pub fn get_text_and_properties(&self) -> Result<(String, RunProperties)> {
        Ok((
            self.text()?,
            RunProperties {
                bold: self.bold()?,
                italic: self.italic()?,
                underline: self.underline()?,
                strikethrough: self.strikethrough()?,
            },
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text() {
        let xml = br#"<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>World</w:t></w:r></w:p>"#;
        let p = Paragraph::new(xml.to_vec());
        assert_eq!(p.text().unwrap(), "Hello World");
    }

    #[test]
    fn test_paragraph_runs() {
        let xml = br#"<w:p><w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r></w:p>"#;
        let p = Paragraph::new(xml.to_vec());
        let runs = p.runs().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text().unwrap(), "a");
        assert_eq!(runs[1].text().unwrap(), "b");
    }

    #[test]
    fn test_style_id_and_outline_level() {
        let xml = br#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:outlineLvl w:val="0"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#;
        let p = Paragraph::new(xml.to_vec());
        assert_eq!(p.style_id().unwrap(), Some("Heading1".to_string()));
        assert_eq!(p.outline_level().unwrap(), Some(0));
    }

    #[test]
    fn test_run_properties() {
        let xml = br#"<w:r><w:rPr><w:b/><w:color w:val="FF0000"/><w:sz w:val="24"/></w:rPr><w:t>bold red</w:t></w:r>"#;
        let r = Run::new(xml.to_vec());
        assert_eq!(r.bold().unwrap(), Some(true));
        assert_eq!(r.color_hex().unwrap(), Some("#FF0000".to_string()));
        assert_eq!(r.font_size_pt().unwrap(), Some(12.0));
    }
}
