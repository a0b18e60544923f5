//! `structure.v1` — the skeleton projection of a DOCX.
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// The `schema_version` value every `Structure` document must carry.
pub const SCHEMA_VERSION: &str = "structure.v1";

/// Maximum length, in Unicode scalars, of a paragraph preview.
pub const PREVIEW_TEXT_MAX_SCALARS: usize = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Structure {
    pub schema_version: String,
    pub metadata: StructureMetadata,
    #[serde(default)]
    pub styles: Vec<StyleSpec>,
    #[serde(default)]
    pub paragraphs: Vec<ParagraphSpec>,
    #[serde(default)]
    pub headings: Vec<HeadingSpec>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created_time: Option<String>,
    pub modified_time: Option<String>,
    pub application: Option<String>,
    pub page_count: Option<u32>,
    pub paragraph_count: Option<u32>,
    pub word_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Linked,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineSpacingMode {
    Single,
    Multiple,
    Exactly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontSpec {
    pub east_asian: Option<String>,
    pub latin: Option<String>,
    pub size_pt: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParagraphFormatSpec {
    pub line_spacing_mode: Option<LineSpacingMode>,
    pub line_spacing_value: Option<f64>,
    pub space_before_pt: Option<f64>,
    pub space_after_pt: Option<f64>,
    pub alignment: Option<Alignment>,
    pub indent_left_pt: Option<f64>,
    pub indent_right_pt: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub style_type: StyleType,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default)]
    pub paragraph: ParagraphFormatSpec,
    pub is_builtin: bool,
    pub is_modified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParagraphSpec {
    pub index: usize,
    pub style_name: Option<String>,
    pub preview_text: String,
    pub is_heading: bool,
    pub heading_level: Option<u8>,
    pub page_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadingSpec {
    pub text: String,
    pub level: u8,
    pub style_name: Option<String>,
    pub paragraph_index: usize,
    pub page_number: Option<u32>,
    pub in_table: bool,
    pub table_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: String,
    pub code: String,
    pub result: String,
    pub paragraph_index: usize,
    pub is_locked: bool,
    pub needs_update: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    pub index: usize,
    pub paragraph_index: usize,
    pub rows: usize,
    pub columns: usize,
    pub has_header: bool,
    pub style_name: Option<String>,
    pub cell_references: Vec<Vec<usize>>,
}

impl Structure {
    /// Validate the `schema_version` discriminator and the cross-reference
    /// invariants from the data model: dense paragraph indices, every
    /// heading/field/table reference an existing paragraph, preview text
    /// capped at 120 scalars.
    pub fn validate(&self) -> std::result::Result<(), PipelineError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(PipelineError::Extraction(format!(
                "unsupported structure schema_version: {}, expected {}",
                self.schema_version, SCHEMA_VERSION
            )));
        }

        for (i, p) in self.paragraphs.iter().enumerate() {
            if p.index != i {
                return Err(PipelineError::Extraction(format!(
                    "paragraph indices are not dense/contiguous: expected {} at position {}, got {}",
                    i, i, p.index
                )));
            }
            if p.preview_text.chars().count() > PREVIEW_TEXT_MAX_SCALARS {
                return Err(PipelineError::Extraction(format!(
                    "paragraph {} preview_text exceeds {} scalars",
                    p.index, PREVIEW_TEXT_MAX_SCALARS
                )));
            }
        }

        let paragraph_count = self.paragraphs.len();
        for h in &self.headings {
            if h.paragraph_index >= paragraph_count {
                return Err(PipelineError::Extraction(format!(
                    "heading {:?} references nonexistent paragraph {}",
                    h.text, h.paragraph_index
                )));
            }
        }
        for f in &self.fields {
            if f.paragraph_index >= paragraph_count {
                return Err(PipelineError::Extraction(format!(
                    "field {:?} references nonexistent paragraph {}",
                    f.field_type, f.paragraph_index
                )));
            }
        }
        for t in &self.tables {
            if t.paragraph_index >= paragraph_count {
                return Err(PipelineError::Extraction(format!(
                    "table {} references nonexistent paragraph {}",
                    t.index, t.paragraph_index
                )));
            }
            for row in &t.cell_references {
                for &idx in row {
                    if idx >= paragraph_count {
                        return Err(PipelineError::Extraction(format!(
                            "table {} cell references nonexistent paragraph {}",
                            t.index, idx
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Structure {
        Structure {
            schema_version: SCHEMA_VERSION.to_string(),
            metadata: StructureMetadata::default(),
            styles: vec![],
            paragraphs: vec![ParagraphSpec {
                index: 0,
                style_name: Some("Normal".into()),
                preview_text: "hello".into(),
                is_heading: false,
                heading_level: None,
                page_number: Some(1),
            }],
            headings: vec![],
            fields: vec![],
            tables: vec![],
        }
    }

    #[test]
    fn validates_a_minimal_document() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn rejects_wrong_schema_version() {
        let mut s = minimal();
        s.schema_version = "structure.v2".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_dangling_heading_reference() {
        let mut s = minimal();
        s.headings.push(HeadingSpec {
            text: "Ghost".into(),
            level: 1,
            style_name: Some("Heading 1".into()),
            paragraph_index: 5,
            page_number: None,
            in_table: false,
            table_index: None,
        });
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_oversized_preview() {
        let mut s = minimal();
        s.paragraphs[0].preview_text = "x".repeat(PREVIEW_TEXT_MAX_SCALARS + 1);
        assert!(s.validate().is_err());
    }
}
