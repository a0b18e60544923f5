use super::{HeadingRef, PartDescriptor, TableLayout, WordAutomation};
use crate::error::Result;
use crate::ooxml::docx::{Field, Package, Paragraph, Style, Table};
use crate::ooxml::opc::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

/// `WordAutomation` backed by the in-process OOXML reader/writer. This is
/// the only implementation shipped; a mock implementation for stage tests
/// lives alongside the stages that need one.
pub struct OoxmlAutomation {
    package: Package,
}

impl OoxmlAutomation {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            package: Package::open(path)?,
        })
    }

    pub fn from_package(package: Package) -> Self {
        Self { package }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }
}

impl WordAutomation for OoxmlAutomation {
    fn document_text(&self) -> Result<String> {
        Ok(self.package.document()?.text()?)
    }

    fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        Ok(self.package.document()?.paragraphs()?)
    }

    fn paragraph(&self, index: usize) -> Result<Option<Paragraph>> {
        Ok(self.package.document()?.paragraph(index)?)
    }

    fn headings(&self) -> Result<Vec<HeadingRef>> {
        let doc = self.package.document()?;
        let mut styles = doc.styles()?;
        let paragraphs = doc.paragraphs()?;
        let (membership, _) = walk_body_layout(doc.part().xml_bytes());
        let mut out = Vec::new();
        for (index, para) in paragraphs.iter().enumerate() {
            let Some(style_id) = para.style_id()? else {
                continue;
            };
            let Some(style) = styles.get_by_id(&style_id)? else {
                continue;
            };
            let Some(level) = heading_level_from_style(style.name()) else {
                continue;
            };
            let (in_table, table_index) = membership.get(index).copied().unwrap_or((false, None));
            out.push(HeadingRef {
                paragraph_index: index,
                text: para.text()?,
                level,
                in_table,
                table_index,
            });
        }
        Ok(out)
    }

    fn tables(&self) -> Result<Vec<Table>> {
        Ok(self.package.document()?.tables()?)
    }

    fn table_layout(&self) -> Result<Vec<TableLayout>> {
        let doc = self.package.document()?;
        let (_, layouts) = walk_body_layout(doc.part().xml_bytes());
        Ok(layouts)
    }

    fn fields(&self) -> Result<Vec<Field>> {
        Ok(self.package.document()?.fields()?)
    }

    fn styles(&self) -> Result<Vec<Style>> {
        let mut styles = self.package.document()?.styles()?;
        Ok(styles.iter()?.cloned().collect())
    }

    fn style_by_name(&self, name: &str) -> Result<Option<Style>> {
        let mut styles = self.package.document()?.styles()?;
        Ok(styles.get_by_name(name)?.cloned())
    }

    fn part_xml(&self, uri: &str) -> Result<Option<String>> {
        Ok(self.package.part_xml(uri)?)
    }

    fn set_part_xml(&mut self, uri: &str, content_type: &str, xml: String) -> Result<()> {
        self.package.set_part_xml(uri, content_type, xml)?;
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        self.package.save(path)?;
        Ok(())
    }

    fn metadata(&self) -> crate::common::Metadata {
        self.package.metadata().clone()
    }

    fn part_inventory(&self) -> Result<Vec<PartDescriptor>> {
        Ok(self
            .package
            .opc_package()
            .iter_parts()
            .map(|part| PartDescriptor {
                uri: part.partname().membername().to_string(),
                content_type: part.content_type().to_string(),
                size_bytes: part.blob().len() as u64,
            })
            .collect())
    }

    fn part_blob(&self, uri: &str) -> Result<Option<Vec<u8>>> {
        let Ok(partname) = PackURI::new(format!("/{}", uri.trim_start_matches('/'))) else {
            return Ok(None);
        };
        match self.package.opc_package().get_part(&partname) {
            Ok(part) => Ok(Some(part.blob().to_vec())),
            Err(_) => Ok(None),
        }
    }
}

/// Tracks one top-level `<w:tbl>` while walking the body: its assigned
/// index, the paragraph-stream position it anchors to, and the per-row
/// cell paragraph indices collected so far. `tbl_depth`/`in_cell` let a
/// table nested inside one of this table's cells contribute its paragraphs
/// to `in_table`/`table_index` without polluting this table's own rows.
struct TableFrame {
    index: usize,
    anchor_paragraph_index: usize,
    rows: Vec<Vec<usize>>,
    tbl_depth: usize,
    in_cell: bool,
    cell_recorded: bool,
}

/// Single raw-XML pass over the document body that resolves, for every
/// paragraph in document order, whether it sits inside a table and which
/// one, plus each table's anchor position and cell_references grid. Kept
/// as one walk (rather than two) so the paragraph counters driving both
/// outputs never drift apart.
fn walk_body_layout(xml: &[u8]) -> (Vec<(bool, Option<usize>)>, Vec<TableLayout>) {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::with_capacity(512);

    let mut membership: Vec<(bool, Option<usize>)> = Vec::new();
    let mut layouts: Vec<TableLayout> = Vec::new();
    let mut stack: Vec<TableFrame> = Vec::new();
    let mut next_table_index = 0usize;
    let mut paragraph_index = 0usize;
    let mut in_paragraph = false;

    let mut record_paragraph = |stack: &mut [TableFrame], paragraph_index: usize, membership: &mut Vec<(bool, Option<usize>)>| {
        let Some(frame) = stack.last_mut() else {
            membership.push((false, None));
            return;
        };
        membership.push((true, Some(frame.index)));
        if frame.tbl_depth == 1 && frame.in_cell && !frame.cell_recorded {
            if let Some(row) = frame.rows.last_mut() {
                row.push(paragraph_index);
            }
            frame.cell_recorded = true;
        }
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => {
                    if let Some(frame) = stack.last_mut() {
                        frame.tbl_depth += 1;
                    } else {
                        stack.push(TableFrame {
                            index: next_table_index,
                            anchor_paragraph_index: paragraph_index,
                            rows: Vec::new(),
                            tbl_depth: 1,
                            in_cell: false,
                            cell_recorded: false,
                        });
                        next_table_index += 1;
                    }
                },
                b"tr" => {
                    if let Some(frame) = stack.last_mut()
                        && frame.tbl_depth == 1
                    {
                        frame.rows.push(Vec::new());
                    }
                },
                b"tc" => {
                    if let Some(frame) = stack.last_mut()
                        && frame.tbl_depth == 1
                    {
                        frame.in_cell = true;
                        frame.cell_recorded = false;
                    }
                },
                b"p" => {
                    if !in_paragraph {
                        record_paragraph(&mut stack, paragraph_index, &mut membership);
                        paragraph_index += 1;
                    }
                    in_paragraph = true;
                },
                _ => {},
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"p" => {
                record_paragraph(&mut stack, paragraph_index, &mut membership);
                paragraph_index += 1;
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => in_paragraph = false,
                b"tc" => {
                    if let Some(frame) = stack.last_mut()
                        && frame.tbl_depth == 1
                    {
                        frame.in_cell = false;
                    }
                },
                b"tbl" => {
                    if let Some(frame) = stack.last_mut() {
                        frame.tbl_depth -= 1;
                        if frame.tbl_depth == 0 {
                            let frame = stack.pop().expect("frame just matched above");
                            layouts.push(TableLayout {
                                anchor_paragraph_index: frame.anchor_paragraph_index,
                                cell_references: frame.rows,
                            });
                        }
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
        buf.clear();
    }

    (membership, layouts)
}

/// Word's built-in heading styles are named `heading 1`..`heading 9`
/// (the style *name*, case-insensitive; the style *id* is usually
/// `Heading1` etc. but localized templates rename both).
fn heading_level_from_style(name: Option<&str>) -> Option<u8> {
    let name = name?.trim().to_ascii_lowercase();
    let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
    if !name.starts_with("heading") || digits.is_empty() {
        return None;
    }
    digits.parse::<u8>().ok().filter(|lvl| (1..=9).contains(lvl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_body_layout_flags_paragraphs_inside_a_table_cell() {
        let xml = br#"<w:body>
            <w:p><w:r><w:t>before</w:t></w:r></w:p>
            <w:tbl>
                <w:tr><w:tc><w:p><w:r><w:t>r1c1</w:t></w:r></w:p></w:tc>
                <w:tc><w:p><w:r><w:t>r1c2</w:t></w:r></w:p></w:tc></w:tr>
                <w:tr><w:tc><w:p><w:r><w:t>r2c1</w:t></w:r></w:p></w:tc>
                <w:tc><w:p><w:r><w:t>r2c2</w:t></w:r></w:p></w:tc></w:tr>
            </w:tbl>
            <w:p><w:r><w:t>after</w:t></w:r></w:p>
        </w:body>"#;
        let (membership, layouts) = walk_body_layout(xml);
        assert_eq!(membership.len(), 6);
        assert_eq!(membership[0], (false, None));
        assert_eq!(membership[1], (true, Some(0)));
        assert_eq!(membership[5], (false, None));
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].anchor_paragraph_index, 1);
        assert_eq!(layouts[0].cell_references, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn recognizes_heading_styles_by_name() {
        assert_eq!(heading_level_from_style(Some("heading 1")), Some(1));
        assert_eq!(heading_level_from_style(Some("Heading 3")), Some(3));
        assert_eq!(heading_level_from_style(Some("Normal")), None);
        assert_eq!(heading_level_from_style(Some("heading 10")), None);
    }
}
