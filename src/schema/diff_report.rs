//! `diff.report` — what the Auditor writes after Validation passes,
//! summarizing the delta between the pre-image and post-image structures.
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "diff.report";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleDelta {
    pub name: String,
    pub fields_changed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadingDelta {
    pub text: String,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TocEntryDelta {
    pub text: String,
    pub level: u8,
    pub before_page: Option<u32>,
    pub after_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataDelta {
    pub modified_before: Option<String>,
    pub modified_after: Option<String>,
    pub word_count_before: Option<u32>,
    pub word_count_after: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffReport {
    pub schema_version: String,
    #[serde(default)]
    pub styles_added: Vec<StyleDelta>,
    #[serde(default)]
    pub styles_removed: Vec<StyleDelta>,
    #[serde(default)]
    pub styles_renamed: Vec<(String, String)>,
    #[serde(default)]
    pub headings_added: Vec<HeadingDelta>,
    #[serde(default)]
    pub headings_removed: Vec<HeadingDelta>,
    #[serde(default)]
    pub toc_entries_changed: Vec<TocEntryDelta>,
    #[serde(default)]
    pub metadata: MetadataDelta,
    pub ops_applied: Vec<String>,
}

impl DiffReport {
    pub fn new(ops_applied: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            styles_added: vec![],
            styles_removed: vec![],
            styles_renamed: vec![],
            headings_added: vec![],
            headings_removed: vec![],
            toc_entries_changed: vec![],
            metadata: MetadataDelta::default(),
            ops_applied,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.styles_added.is_empty()
            && self.styles_removed.is_empty()
            && self.styles_renamed.is_empty()
            && self.headings_added.is_empty()
            && self.headings_removed.is_empty()
            && self.toc_entries_changed.is_empty()
    }

    pub fn validate(&self) -> std::result::Result<(), PipelineError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(PipelineError::Audit(format!(
                "unsupported diff report schema_version: {}, expected {}",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_report_is_empty_until_populated() {
        let report = DiffReport::new(vec!["delete_section_by_heading".into()]);
        assert!(report.is_empty());
        assert!(report.validate().is_ok());
    }

    #[test]
    fn rejects_wrong_schema_version() {
        let mut report = DiffReport::new(vec![]);
        report.schema_version = "diff.report.v2".into();
        assert!(report.validate().is_err());
    }

    #[test]
    fn non_empty_when_headings_change() {
        let mut report = DiffReport::new(vec!["delete_section_by_heading".into()]);
        report.headings_removed.push(HeadingDelta {
            text: "Appendix".into(),
            level: 1,
        });
        assert!(!report.is_empty());
    }
}
