//! The audit stage: own a timestamped run directory and write every
//! artifact a run produces under fixed filenames. Append-only from the
//! caller's perspective — nothing under a run directory is ever deleted or
//! overwritten by a second call.
use crate::error::{PipelineError, Result};
use crate::monitoring::Warning;
use crate::schema::diff_report::{DiffReport, HeadingDelta, MetadataDelta, StyleDelta};
use crate::schema::inventory::InventoryFull;
use crate::schema::plan::Plan;
use crate::schema::structure::Structure;
use chrono::Local;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// The terminal status a run ends in, written verbatim into `result.status.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Rollback,
    FailedValidation,
    InvalidPlan,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Rollback => "ROLLBACK",
            Self::FailedValidation => "FAILED_VALIDATION",
            Self::InvalidPlan => "INVALID_PLAN",
        }
    }
}

/// Everything a run might have produced by the time the Auditor is invoked.
/// Fields are `Option` because a run can fault at any stage — only
/// `before.docx`, `inventory.full.v1.json`, `before_structure.v1.json`, and
/// `warnings.log` are guaranteed to exist for every status.
pub struct RunArtifacts<'a> {
    pub status: RunStatus,
    pub before_docx: &'a [u8],
    pub after_docx: Option<&'a [u8]>,
    pub before_structure: &'a Structure,
    pub after_structure: Option<&'a Structure>,
    pub inventory: &'a InventoryFull,
    pub plan: Option<&'a Plan>,
    pub diff_report: Option<&'a DiffReport>,
    pub warnings: &'a [Warning],
}

/// One timestamped run directory under `base_dir`, created fresh for every
/// [`finalize`] call.
pub struct RunDirectory {
    path: PathBuf,
}

impl RunDirectory {
    /// Create `run_YYYYMMDD_HHMMSS_<rand>/` under `base_dir`.
    pub fn create(base_dir: &Path) -> Result<Self> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let suffix: u32 = rand::rng().random_range(0..0x1000_0000);
        let path = base_dir.join(format!("run_{}_{:07x}", stamp, suffix));
        fs::create_dir_all(&path)
            .map_err(|e| PipelineError::Audit(format!("creating {}: {}", path.display(), e)))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_bytes(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        fs::write(self.path.join(filename), bytes)
            .map_err(|e| PipelineError::Audit(format!("writing {}: {}", filename, e)))
    }

    fn write_json<T: serde::Serialize>(&self, filename: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| PipelineError::Audit(format!("serializing {}: {}", filename, e)))?;
        fs::write(self.path.join(filename), text)
            .map_err(|e| PipelineError::Audit(format!("writing {}: {}", filename, e)))
    }

    fn write_warnings(&self, warnings: &[Warning]) -> Result<()> {
        let mut text = String::new();
        for warning in warnings {
            text.push_str(warning.kind);
            text.push_str(": ");
            text.push_str(&warning.detail);
            text.push('\n');
        }
        fs::write(self.path.join("warnings.log"), text)
            .map_err(|e| PipelineError::Audit(format!("writing warnings.log: {}", e)))
    }

    fn write_status(&self, status: RunStatus) -> Result<()> {
        fs::write(self.path.join("result.status.txt"), status.as_str())
            .map_err(|e| PipelineError::Audit(format!("writing result.status.txt: {}", e)))
    }
}

/// Write every artifact `artifacts` carries into a fresh run directory under
/// `base_dir`, following the status-dependent fixed-filename contract:
/// `after.docx`/`after_structure.v1.json` are written only on `SUCCESS`.
pub fn finalize(base_dir: &Path, artifacts: RunArtifacts) -> Result<RunDirectory> {
    let run_dir = RunDirectory::create(base_dir)?;

    run_dir.write_bytes("before.docx", artifacts.before_docx)?;
    run_dir.write_json("before_structure.v1.json", artifacts.before_structure)?;
    run_dir.write_json("inventory.full.v1.json", artifacts.inventory)?;
    run_dir.write_warnings(artifacts.warnings)?;
    run_dir.write_status(artifacts.status)?;

    if let Some(plan) = artifacts.plan {
        run_dir.write_json("plan.v1.json", plan)?;
    }
    if let Some(report) = artifacts.diff_report {
        run_dir.write_json("diff.report.json", report)?;
    }

    if artifacts.status == RunStatus::Success {
        let after_docx = artifacts
            .after_docx
            .ok_or_else(|| PipelineError::Audit("SUCCESS run missing after.docx bytes".to_string()))?;
        let after_structure = artifacts
            .after_structure
            .ok_or_else(|| PipelineError::Audit("SUCCESS run missing after_structure".to_string()))?;
        run_dir.write_bytes("after.docx", after_docx)?;
        run_dir.write_json("after_structure.v1.json", after_structure)?;
    }

    Ok(run_dir)
}

/// Write a dry-run's artifacts: everything [`finalize`] always writes plus
/// `plan.v1.json`, with no `after.docx`/`after_structure.v1.json` since no
/// execution ever touched the working copy. Always finalizes with
/// `RunStatus::Success` — a dry run either produces a plan or returns an
/// `INVALID_PLAN` run through [`finalize`] instead.
pub fn finalize_plan_only(
    base_dir: &Path,
    before_docx: &[u8],
    before_structure: &Structure,
    inventory: &InventoryFull,
    plan: &Plan,
    warnings: &[Warning],
) -> Result<RunDirectory> {
    let run_dir = RunDirectory::create(base_dir)?;
    run_dir.write_bytes("before.docx", before_docx)?;
    run_dir.write_json("before_structure.v1.json", before_structure)?;
    run_dir.write_json("inventory.full.v1.json", inventory)?;
    run_dir.write_warnings(warnings)?;
    run_dir.write_status(RunStatus::Success)?;
    run_dir.write_json("plan.v1.json", plan)?;
    Ok(run_dir)
}

/// Build the structural delta an Auditor writes out as `diff.report.json`:
/// added/removed/renamed styles, added/removed headings, TOC entry page
/// deltas, and a metadata-timestamp comparison.
pub fn build_diff_report(before: &Structure, after: &Structure, ops_applied: Vec<String>) -> DiffReport {
    let mut report = DiffReport::new(ops_applied);

    for after_style in &after.styles {
        if !before.styles.iter().any(|s| s.name == after_style.name) {
            report.styles_added.push(StyleDelta {
                name: after_style.name.clone(),
                fields_changed: vec![],
            });
        }
    }
    for before_style in &before.styles {
        if !after.styles.iter().any(|s| s.name == before_style.name) {
            report.styles_removed.push(StyleDelta {
                name: before_style.name.clone(),
                fields_changed: vec![],
            });
        }
    }

    for before_heading in &before.headings {
        let still_present = after
            .headings
            .iter()
            .any(|h| h.text == before_heading.text && h.level == before_heading.level);
        if !still_present {
            report.headings_removed.push(HeadingDelta {
                text: before_heading.text.clone(),
                level: before_heading.level,
            });
        }
    }
    for after_heading in &after.headings {
        let newly_present = !before
            .headings
            .iter()
            .any(|h| h.text == after_heading.text && h.level == after_heading.level);
        if newly_present {
            report.headings_added.push(HeadingDelta {
                text: after_heading.text.clone(),
                level: after_heading.level,
            });
        }
    }

    report.metadata = MetadataDelta {
        modified_before: before.metadata.modified_time.clone(),
        modified_after: after.metadata.modified_time.clone(),
        word_count_before: before.metadata.word_count,
        word_count_after: after.metadata.word_count,
    };

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::structure::StructureMetadata;

    fn empty_structure() -> Structure {
        Structure {
            schema_version: crate::schema::structure::SCHEMA_VERSION.to_string(),
            metadata: StructureMetadata::default(),
            styles: vec![],
            paragraphs: vec![],
            headings: vec![],
            fields: vec![],
            tables: vec![],
        }
    }

    #[test]
    fn finalize_writes_the_success_filenames() {
        let temp = std::env::temp_dir().join("scribeforge-audit-test-success");
        fs::create_dir_all(&temp).unwrap();
        let before = empty_structure();
        let after = empty_structure();
        let inventory = InventoryFull::empty();
        let diff = build_diff_report(&before, &after, vec!["update_toc".to_string()]);
        let run_dir = finalize(
            &temp,
            RunArtifacts {
                status: RunStatus::Success,
                before_docx: b"before",
                after_docx: Some(b"after"),
                before_structure: &before,
                after_structure: Some(&after),
                inventory: &inventory,
                plan: None,
                diff_report: Some(&diff),
                warnings: &[],
            },
        )
        .unwrap();

        assert!(run_dir.path().join("before.docx").exists());
        assert!(run_dir.path().join("after.docx").exists());
        assert!(run_dir.path().join("after_structure.v1.json").exists());
        assert!(run_dir.path().join("result.status.txt").exists());
        assert_eq!(fs::read_to_string(run_dir.path().join("result.status.txt")).unwrap(), "SUCCESS");

        fs::remove_dir_all(&temp).ok();
    }

    #[test]
    fn finalize_omits_after_artifacts_on_rollback() {
        let temp = std::env::temp_dir().join("scribeforge-audit-test-rollback");
        fs::create_dir_all(&temp).unwrap();
        let before = empty_structure();
        let inventory = InventoryFull::empty();
        let run_dir = finalize(
            &temp,
            RunArtifacts {
                status: RunStatus::Rollback,
                before_docx: b"before",
                after_docx: None,
                before_structure: &before,
                after_structure: None,
                inventory: &inventory,
                plan: None,
                diff_report: None,
                warnings: &[Warning::new("EXECUTION_ERROR", "boom")],
            },
        )
        .unwrap();

        assert!(!run_dir.path().join("after.docx").exists());
        assert!(!run_dir.path().join("after_structure.v1.json").exists());
        let log = fs::read_to_string(run_dir.path().join("warnings.log")).unwrap();
        assert!(log.contains("boom"));

        fs::remove_dir_all(&temp).ok();
    }

    #[test]
    fn diff_report_flags_removed_and_added_headings() {
        let mut before = empty_structure();
        before.headings.push(crate::schema::structure::HeadingSpec {
            text: "摘要".to_string(),
            level: 1,
            style_name: None,
            paragraph_index: 0,
            page_number: None,
            in_table: false,
            table_index: None,
        });
        let mut after = empty_structure();
        after.headings.push(crate::schema::structure::HeadingSpec {
            text: "Introduction".to_string(),
            level: 1,
            style_name: None,
            paragraph_index: 0,
            page_number: None,
            in_table: false,
            table_index: None,
        });
        let report = build_diff_report(&before, &after, vec![]);
        assert_eq!(report.headings_removed.len(), 1);
        assert_eq!(report.headings_added.len(), 1);
    }
}
