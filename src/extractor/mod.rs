//! `extract(docx) -> (structure.v1, inventory.full.v1)`.
//!
//! Walks styles, paragraphs, headings, fields and tables through the
//! `WordAutomation` trait, in the order the teacher's own `ooxml::docx`
//! reader streams them — never a full DOM, `SmallVec`/`Vec` accumulation
//! only. Parts the skeleton can't represent faithfully go into the
//! inventory as raw XML text, keyed by a stable part key.
pub mod revisions;

use crate::automation::WordAutomation;
use crate::config::RevisionStrategy;
use crate::error::{PipelineError, Result};
use crate::monitoring::Warning;
use crate::ooxml::docx::statistics::{estimate_line_count, estimate_page_count};
use crate::schema::inventory::{InventoryFull, MediaDescriptor, OpaqueReference};
use crate::schema::structure::{
    Alignment, FieldSpec, FontSpec, HeadingSpec, LineSpacingMode, ParagraphFormatSpec,
    ParagraphSpec, Structure, StructureMetadata, StyleSpec, StyleType, TableSpec,
};
use crate::ooxml::docx::enums::WdStyleType;
use std::collections::HashMap;

const AVG_CHARS_PER_LINE: usize = 80;
const AVG_LINES_PER_PAGE: usize = 45;

/// Part names, relative to the package root, the skeleton cannot represent
/// faithfully and must be carried into `inventory.full.v1` verbatim.
const INVENTORY_PART_PREFIXES: &[&str] = &[
    "word/header",
    "word/footer",
    "word/footnotes.xml",
    "word/endnotes.xml",
    "word/numbering.xml",
    "word/settings.xml",
];
const CUSTOM_XML_PREFIX: &str = "customXml/";

/// Pre-processes revisions per `strategy`, then walks the document into
/// `(structure.v1, inventory.full.v1)`. Any `automation` failure is mapped
/// to `EXTRACTION_ERROR` by `PipelineError`'s blanket `From` conversion.
pub fn extract(
    automation: &mut dyn WordAutomation,
    strategy: RevisionStrategy,
    warnings: &mut Vec<Warning>,
) -> Result<(Structure, InventoryFull)> {
    apply_revision_strategy(automation, strategy, warnings)?;

    let structure = extract_structure(automation, warnings)?;
    let inventory = extract_inventory(automation)?;
    Ok((structure, inventory))
}

fn apply_revision_strategy(
    automation: &mut dyn WordAutomation,
    strategy: RevisionStrategy,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    const DOCUMENT_PART: &str = "/word/document.xml";
    const DOCUMENT_CONTENT_TYPE: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        return Err(PipelineError::Extraction(
            "package has no main document part".to_string(),
        ));
    };
    let (rewritten, warning) = revisions::apply_strategy(&xml, strategy);
    if let Some(warning) = warning {
        warnings.push(Warning::new("REVISION_BYPASS", warning.message));
    }
    if rewritten != xml {
        automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, rewritten)?;
    }
    Ok(())
}

fn extract_structure(
    automation: &dyn WordAutomation,
    warnings: &mut Vec<Warning>,
) -> Result<Structure> {
    let metadata = automation.metadata();
    let structure_metadata = StructureMetadata {
        title: metadata.title.clone(),
        author: metadata.author.clone(),
        created_time: metadata.created.map(|t| t.to_rfc3339()),
        modified_time: metadata.modified.map(|t| t.to_rfc3339()),
        application: metadata.application.clone(),
        page_count: metadata.page_count,
        paragraph_count: None,
        word_count: metadata.word_count,
    };

    let styles = automation
        .styles()?
        .into_iter()
        .map(|style| style_spec(&style))
        .collect::<Result<Vec<_>>>()?;

    let paragraphs_raw = automation.paragraphs()?;
    let mut running_lines = 0usize;
    let mut paragraph_specs = Vec::with_capacity(paragraphs_raw.len());
    for (index, para) in paragraphs_raw.iter().enumerate() {
        let text = para.text()?;
        let preview_text = truncate_preview(&text);
        let style_id = para.style_id()?;
        let style_name = match &style_id {
            Some(id) => automation
                .styles()?
                .into_iter()
                .find(|s| s.style_id() == id)
                .and_then(|s| s.name().map(str::to_string)),
            None => None,
        };
        let heading_level = heading_level_from_outline(para.outline_level()?, warnings);
        running_lines += estimate_line_count(&text, AVG_CHARS_PER_LINE).max(1);
        let page_number = Some(estimate_page_count(running_lines, AVG_LINES_PER_PAGE).max(1) as u32);

        paragraph_specs.push(ParagraphSpec {
            index,
            style_name,
            preview_text,
            is_heading: heading_level.is_some(),
            heading_level,
            page_number,
        });
    }

    let headings = automation
        .headings()?
        .into_iter()
        .map(|h| HeadingSpec {
            text: h.text,
            level: h.level,
            style_name: paragraph_specs
                .get(h.paragraph_index)
                .and_then(|p| p.style_name.clone()),
            paragraph_index: h.paragraph_index,
            page_number: paragraph_specs.get(h.paragraph_index).and_then(|p| p.page_number),
            in_table: h.in_table,
            table_index: h.table_index,
        })
        .collect::<Vec<_>>();

    let fields = automation
        .fields()?
        .into_iter()
        .map(|field| FieldSpec {
            field_type: field.field_type().to_string(),
            code: field.instruction().to_string(),
            result: field.result().unwrap_or_default().to_string(),
            paragraph_index: field.paragraph_index(),
            is_locked: field.is_locked(),
            needs_update: field.is_dirty(),
        })
        .collect::<Vec<_>>();

    let table_layouts = automation.table_layout()?;
    let tables = automation
        .tables()?
        .into_iter()
        .enumerate()
        .map(|(index, table)| -> Result<TableSpec> {
            let rows = table.row_count()?;
            let columns = table.column_count()?;
            let has_header = table
                .rows()?
                .first()
                .map(|row| row.is_header_row())
                .transpose()?
                .unwrap_or(false);
            let layout = table_layouts.get(index);
            Ok(TableSpec {
                index,
                paragraph_index: layout.map(|l| l.anchor_paragraph_index).unwrap_or(0),
                rows,
                columns,
                has_header,
                style_name: None,
                cell_references: layout.map(|l| l.cell_references.clone()).unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut structure = Structure {
        schema_version: crate::schema::structure::SCHEMA_VERSION.to_string(),
        metadata: structure_metadata,
        styles,
        paragraphs: paragraph_specs,
        headings,
        fields,
        tables,
    };
    structure.metadata.paragraph_count = Some(structure.paragraphs.len() as u32);
    Ok(structure)
}

fn heading_level_from_outline(
    outline_level: Option<u8>,
    warnings: &mut Vec<Warning>,
) -> Option<u8> {
    let level = outline_level?;
    if (0..9).contains(&level) {
        Some(level + 1)
    } else {
        warnings.push(Warning::new(
            "INVALID_OUTLINE_LEVEL",
            format!("outline level {} out of [0,8], treated as non-heading", level),
        ));
        None
    }
}

/// Truncate at a Unicode scalar boundary, never mid-surrogate — `char`
/// iteration in Rust already guarantees this, it just needs a cap applied.
fn truncate_preview(text: &str) -> String {
    text.chars()
        .take(crate::schema::structure::PREVIEW_TEXT_MAX_SCALARS)
        .collect()
}

fn style_spec(style: &crate::ooxml::docx::Style) -> Result<StyleSpec> {
    let style_type = match style.style_type() {
        WdStyleType::Paragraph => StyleType::Paragraph,
        WdStyleType::Character => StyleType::Character,
        WdStyleType::Table => StyleType::Table,
        WdStyleType::List => StyleType::Linked,
    };
    let font = FontSpec {
        east_asian: style.font_east_asian()?,
        latin: style.font_latin()?,
        size_pt: style.font_size_pt()?,
        bold: style.font_bold()?,
        italic: style.font_italic()?,
        underline: style.font_underline()?,
        color: style.font_color_hex()?,
    };
    let paragraph = ParagraphFormatSpec {
        line_spacing_mode: style.line_spacing_rule()?.as_deref().and_then(parse_line_spacing_mode),
        line_spacing_value: style.line_spacing_value_raw()?,
        space_before_pt: style.space_before_pt()?,
        space_after_pt: style.space_after_pt()?,
        alignment: style.alignment()?.as_deref().and_then(parse_alignment),
        indent_left_pt: style.indent_left_pt()?,
        indent_right_pt: style.indent_right_pt()?,
    };
    Ok(StyleSpec {
        name: style.name().unwrap_or(style.style_id()).to_string(),
        style_type,
        font,
        paragraph,
        is_builtin: style.is_builtin(),
        is_modified: style.is_custom(),
    })
}

fn parse_line_spacing_mode(raw: &str) -> Option<LineSpacingMode> {
    match raw {
        "auto" => Some(LineSpacingMode::Single),
        "atLeast" | "exact" => Some(LineSpacingMode::Exactly),
        _ => Some(LineSpacingMode::Multiple),
    }
}

fn parse_alignment(raw: &str) -> Option<Alignment> {
    match raw {
        "left" | "start" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" | "end" => Some(Alignment::Right),
        "both" | "justify" => Some(Alignment::Justify),
        _ => None,
    }
}

fn extract_inventory(automation: &dyn WordAutomation) -> Result<InventoryFull> {
    let mut ooxml_fragments = HashMap::new();
    let mut media_indexes = HashMap::new();
    let formulas = Vec::new();
    let charts = Vec::new();
    let content_controls = Vec::new();

    for part in automation.part_inventory()? {
        let key = part.uri.trim_start_matches('/').to_string();
        let captured = INVENTORY_PART_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
            || key.starts_with(CUSTOM_XML_PREFIX);
        let is_media = key.starts_with("word/media/");

        if is_media {
            if let Some(blob) = automation.part_blob(&part.uri)? {
                media_indexes.insert(
                    key.clone(),
                    MediaDescriptor {
                        media_id: key.clone(),
                        filename: key.rsplit('/').next().unwrap_or(&key).to_string(),
                        content_type: part.content_type.clone(),
                        size_bytes: blob.len() as u64,
                        embedded: true,
                    },
                );
            }
            continue;
        }

        if captured
            && let Some(blob) = automation.part_blob(&part.uri)?
            && let Ok(text) = String::from_utf8(blob)
        {
            ooxml_fragments.insert(key, text);
        }
    }

    Ok(InventoryFull {
        schema_version: crate::schema::inventory::SCHEMA_VERSION.to_string(),
        ooxml_fragments,
        media_indexes,
        content_controls,
        formulas,
        charts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::OoxmlAutomation;
    use crate::ooxml::docx::Package;
    use std::io::Cursor;

    fn open_fixture() -> OoxmlAutomation {
        let bytes = crate::ooxml::opc::package::tests::create_minimal_docx();
        let package = Package::from_reader(Cursor::new(bytes)).unwrap();
        OoxmlAutomation::from_package(package)
    }

    #[test]
    fn extracts_a_minimal_document() {
        let mut automation = open_fixture();
        let mut warnings = Vec::new();
        let (structure, inventory) =
            extract(&mut automation, RevisionStrategy::Bypass, &mut warnings).unwrap();
        assert!(structure.validate().is_ok());
        assert!(inventory.validate().is_ok());
        assert_eq!(structure.paragraphs.len(), 1);
        assert_eq!(structure.paragraphs[0].preview_text, "Test");
    }

    #[test]
    fn bypass_strategy_emits_a_warning() {
        let mut automation = open_fixture();
        let mut warnings = Vec::new();
        extract(&mut automation, RevisionStrategy::Bypass, &mut warnings).unwrap();
        assert!(warnings.iter().any(|w| w.kind == "REVISION_BYPASS"));
    }
}
