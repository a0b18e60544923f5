//! `plan.v1` — the only artifact the language model is allowed to produce.
//!
//! The operation whitelist is a closed sum: one variant per whitelisted
//! operation, matched exhaustively by the executor. No `#[non_exhaustive]`
//! — a new operation kind must be a reviewed change to this enum, not a
//! silent runtime dispatch addition.
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "plan.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchMode {
    Exact,
    Contains,
    Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TocMode {
    All,
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClearScope {
    Document,
    Selection,
    Style,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMatch {
    StartsWith,
    EndsWith,
    Contains,
}

/// The literal authorization token `clear_direct_formatting` must carry.
pub const EXPLICIT_USER_REQUEST: &str = "EXPLICIT_USER_REQUEST";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParagraphSelector {
    pub current_style: Option<String>,
    pub text_contains: Option<String>,
    pub heading_level: Option<u8>,
    pub position: Option<PositionMatch>,
}

/// One atomic operation. The `operation` discriminator selects the variant;
/// unknown discriminators or extra fields fail to deserialize, which is
/// exactly the whitelist-conformance check the gateway needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case", deny_unknown_fields)]
pub enum AtomicOp {
    DeleteSectionByHeading {
        heading_text: String,
        level: u8,
        #[serde(rename = "match")]
        match_mode: MatchMode,
        #[serde(default)]
        case_sensitive: bool,
        occurrence_index: Option<usize>,
    },
    UpdateToc {},
    DeleteToc {
        mode: TocMode,
    },
    SetStyleRule {
        target_style: String,
        font_east_asian: Option<String>,
        font_latin: Option<String>,
        font_size_pt: Option<f64>,
        font_bold: Option<bool>,
        font_italic: Option<bool>,
        font_color_hex: Option<String>,
        line_spacing_mode: Option<crate::schema::structure::LineSpacingMode>,
        line_spacing_value: Option<f64>,
        space_before_pt: Option<f64>,
        space_after_pt: Option<f64>,
        alignment: Option<crate::schema::structure::Alignment>,
    },
    ReassignParagraphsToStyle {
        selector: ParagraphSelector,
        target_style: String,
        #[serde(default)]
        clear_direct_formatting: bool,
    },
    ClearDirectFormatting {
        scope: ClearScope,
        range_spec: Option<String>,
        authorization: String,
    },
}

impl AtomicOp {
    /// The operation name as it appears on the wire, for warnings/audit lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeleteSectionByHeading { .. } => "delete_section_by_heading",
            Self::UpdateToc {} => "update_toc",
            Self::DeleteToc { .. } => "delete_toc",
            Self::SetStyleRule { .. } => "set_style_rule",
            Self::ReassignParagraphsToStyle { .. } => "reassign_paragraphs_to_style",
            Self::ClearDirectFormatting { .. } => "clear_direct_formatting",
        }
    }

    /// Parameter-sanity checks that don't require the document: ranges,
    /// hex color patterns, the literal authorization token.
    pub fn validate_parameters(&self) -> std::result::Result<(), PipelineError> {
        match self {
            Self::DeleteSectionByHeading { level, .. } => {
                if !(1..=9).contains(level) {
                    return Err(PipelineError::InvalidPlan(format!(
                        "delete_section_by_heading: level {} out of [1,9]",
                        level
                    )));
                }
            },
            Self::SetStyleRule {
                font_size_pt,
                font_color_hex,
                line_spacing_value,
                ..
            } => {
                if let Some(size) = font_size_pt
                    && !(6.0..=72.0).contains(size)
                {
                    return Err(PipelineError::InvalidPlan(format!(
                        "set_style_rule: font_size_pt {} out of [6,72]",
                        size
                    )));
                }
                if let Some(hex) = font_color_hex {
                    validate_hex_color(hex)?;
                }
                if let Some(v) = line_spacing_value
                    && !(0.5..=10.0).contains(v)
                {
                    return Err(PipelineError::InvalidPlan(format!(
                        "set_style_rule: line_spacing_value {} out of [0.5,10.0]",
                        v
                    )));
                }
            },
            Self::ReassignParagraphsToStyle { selector, .. } => {
                if let Some(level) = selector.heading_level
                    && !(1..=9).contains(&level)
                {
                    return Err(PipelineError::InvalidPlan(format!(
                        "reassign_paragraphs_to_style: heading_level {} out of [1,9]",
                        level
                    )));
                }
            },
            Self::ClearDirectFormatting { authorization, .. } => {
                if authorization != EXPLICIT_USER_REQUEST {
                    return Err(PipelineError::InvalidPlan(
                        "clear_direct_formatting: missing or invalid authorization token"
                            .to_string(),
                    ));
                }
            },
            Self::UpdateToc {} | Self::DeleteToc { .. } => {},
        }
        Ok(())
    }
}

fn validate_hex_color(hex: &str) -> std::result::Result<(), PipelineError> {
    let ok = hex.len() == 7
        && hex.starts_with('#')
        && hex[1..].chars().all(|c| c.is_ascii_hexdigit());
    if ok {
        Ok(())
    } else {
        Err(PipelineError::InvalidPlan(format!(
            "invalid hex color: {:?}",
            hex
        )))
    }
}

/// Reserved, currently-unpopulated provenance tag on a plan entry. The
/// Planner never sets this and the Executor ignores it for dispatch; it
/// exists so the schema doesn't need to change when comments-as-instructions
/// lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOpSource {
    Anchor,
    Section,
    Global,
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOp {
    #[serde(flatten)]
    pub op: AtomicOp,
    #[serde(default)]
    pub source: Option<PlanOpSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    pub schema_version: String,
    pub ops: Vec<PlanOp>,
}

impl Plan {
    pub fn validate(&self) -> std::result::Result<(), PipelineError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(PipelineError::InvalidPlan(format!(
                "unsupported plan schema_version: {}, expected {}",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        for op in &self.ops {
            op.op.validate_parameters()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_delete_section_op() {
        let json = r#"{"operation":"delete_section_by_heading","heading_text":"摘要","level":1,"match":"EXACT","case_sensitive":true,"occurrence_index":null}"#;
        let op: AtomicOp = serde_json::from_str(json).unwrap();
        assert_eq!(op.name(), "delete_section_by_heading");
    }

    #[test]
    fn rejects_unknown_operation() {
        let json = r#"{"operation":"run_macro","name":"evil"}"#;
        let result: std::result::Result<AtomicOp, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_out_of_range_font_size() {
        let op = AtomicOp::SetStyleRule {
            target_style: "Heading 1".into(),
            font_east_asian: None,
            font_latin: None,
            font_size_pt: Some(100.0),
            font_bold: None,
            font_italic: None,
            font_color_hex: None,
            line_spacing_mode: None,
            line_spacing_value: None,
            space_before_pt: None,
            space_after_pt: None,
            alignment: None,
        };
        assert!(op.validate_parameters().is_err());
    }

    #[test]
    fn requires_explicit_authorization_token() {
        let op = AtomicOp::ClearDirectFormatting {
            scope: ClearScope::Document,
            range_spec: None,
            authorization: "nope".into(),
        };
        assert!(op.validate_parameters().is_err());
    }
}
