//! The execute stage: apply a validated plan's operations one at a time,
//! each through its own handler, against the live `WordAutomation` seam.
//!
//! Every handler returns whether it actually changed anything; a `false`
//! means the operation resolved to a NOOP (already recorded as a warning
//! by the handler) rather than a hard failure. A handler only returns
//! `Err` for genuine faults — a missing part, an unreadable XML stream —
//! which the caller treats as an execution error and the orchestrator
//! rolls back on.
mod clear_formatting;
mod heading;
mod reassign;
mod style_rule;
mod toc;
mod xmlpatch;

use crate::automation::WordAutomation;
use crate::error::{PipelineError, Result};
use crate::localisation::LocalisationTables;
use crate::monitoring::Warning;
use crate::schema::plan::{AtomicOp, Plan};

/// One plan operation's outcome, reported in the diff.report.json.
#[derive(Debug, Clone)]
pub struct OpOutcome {
    pub name: &'static str,
    pub applied: bool,
}

/// Run every operation in `plan` against `automation` in order, accumulating
/// NOOP/fallback warnings into `warnings` and returning the applied/NOOP
/// outcome of each. A handler fault aborts the run immediately — the
/// orchestrator is responsible for rolling back the working copy.
pub fn execute(
    automation: &mut dyn WordAutomation,
    plan: &Plan,
    localisation: &LocalisationTables,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<OpOutcome>> {
    let mut outcomes = Vec::with_capacity(plan.ops.len());
    for plan_op in &plan.ops {
        let name = plan_op.op.name();
        let applied = apply_one(automation, &plan_op.op, localisation, warnings)
            .map_err(|e| PipelineError::Execution(format!("{}: {}", name, e)))?;
        outcomes.push(OpOutcome { name, applied });
    }
    Ok(outcomes)
}

fn apply_one(
    automation: &mut dyn WordAutomation,
    op: &AtomicOp,
    localisation: &LocalisationTables,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    match op {
        AtomicOp::DeleteSectionByHeading {
            heading_text,
            level,
            match_mode,
            case_sensitive,
            occurrence_index,
        } => heading::apply(
            automation,
            heading_text,
            *level,
            *match_mode,
            *case_sensitive,
            *occurrence_index,
            warnings,
        ),
        AtomicOp::UpdateToc {} => toc::update_toc(automation, warnings),
        AtomicOp::DeleteToc { mode } => toc::delete_toc(automation, *mode, warnings),
        AtomicOp::SetStyleRule { .. } => style_rule::apply(automation, op, localisation, warnings),
        AtomicOp::ReassignParagraphsToStyle {
            selector,
            target_style,
            clear_direct_formatting,
        } => reassign::apply(
            automation,
            selector,
            target_style,
            *clear_direct_formatting,
            localisation,
            warnings,
        ),
        AtomicOp::ClearDirectFormatting { scope, range_spec, .. } => {
            clear_formatting::apply(automation, *scope, range_spec.as_deref(), warnings)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::HeadingRef;
    use crate::ooxml::docx::{Field, Paragraph, Style, Table};
    use crate::schema::plan::{MatchMode, PlanOp};

    /// Minimal in-memory `WordAutomation` fake, enough to exercise
    /// `execute`'s dispatch without touching a real package.
    struct FakeAutomation {
        document_xml: String,
    }

    impl WordAutomation for FakeAutomation {
        fn document_text(&self) -> Result<String> {
            Ok(String::new())
        }
        fn paragraphs(&self) -> Result<Vec<Paragraph>> {
            Ok(Vec::new())
        }
        fn paragraph(&self, _index: usize) -> Result<Option<Paragraph>> {
            Ok(None)
        }
        fn headings(&self) -> Result<Vec<HeadingRef>> {
            Ok(Vec::new())
        }
        fn tables(&self) -> Result<Vec<Table>> {
            Ok(Vec::new())
        }
        fn table_layout(&self) -> Result<Vec<crate::automation::TableLayout>> {
            Ok(Vec::new())
        }
        fn fields(&self) -> Result<Vec<Field>> {
            Ok(Vec::new())
        }
        fn styles(&self) -> Result<Vec<Style>> {
            Ok(Vec::new())
        }
        fn style_by_name(&self, _name: &str) -> Result<Option<Style>> {
            Ok(None)
        }
        fn part_xml(&self, uri: &str) -> Result<Option<String>> {
            if uri == "/word/document.xml" {
                Ok(Some(self.document_xml.clone()))
            } else {
                Ok(None)
            }
        }
        fn set_part_xml(&mut self, uri: &str, _content_type: &str, xml: String) -> Result<()> {
            if uri == "/word/document.xml" {
                self.document_xml = xml;
            }
            Ok(())
        }
        fn save(&mut self, _path: &std::path::Path) -> Result<()> {
            Ok(())
        }
        fn metadata(&self) -> crate::common::Metadata {
            Default::default()
        }
        fn part_inventory(&self) -> Result<Vec<crate::automation::PartDescriptor>> {
            Ok(Vec::new())
        }
        fn part_blob(&self, _uri: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    #[test]
    fn update_toc_noop_on_a_document_with_no_field_records_a_warning() {
        let mut automation = FakeAutomation {
            document_xml: "<w:body><w:p/></w:body>".to_string(),
        };
        let plan = Plan {
            schema_version: crate::schema::plan::SCHEMA_VERSION.to_string(),
            ops: vec![PlanOp {
                op: AtomicOp::UpdateToc {},
                source: None,
            }],
        };
        let localisation = LocalisationTables::new(Default::default(), Default::default());
        let mut warnings = Vec::new();
        let outcomes = execute(&mut automation, &plan, &localisation, &mut warnings).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].applied);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn delete_section_by_heading_noop_when_nothing_matches() {
        let mut automation = FakeAutomation {
            document_xml: "<w:body></w:body>".to_string(),
        };
        let plan = Plan {
            schema_version: crate::schema::plan::SCHEMA_VERSION.to_string(),
            ops: vec![PlanOp {
                op: AtomicOp::DeleteSectionByHeading {
                    heading_text: "Nonexistent".to_string(),
                    level: 1,
                    match_mode: MatchMode::Exact,
                    case_sensitive: false,
                    occurrence_index: None,
                },
                source: None,
            }],
        };
        let localisation = LocalisationTables::new(Default::default(), Default::default());
        let mut warnings = Vec::new();
        let outcomes = execute(&mut automation, &plan, &localisation, &mut warnings).unwrap();
        assert!(!outcomes[0].applied);
    }
}
