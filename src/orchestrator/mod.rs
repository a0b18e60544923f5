//! The orchestrator: a synchronous state machine driving one run of
//! Extract → Plan → Execute → Validate → Audit over a single document.
//!
//! `IDLE → EXTRACTING → PLANNING → EXECUTING → VALIDATING → AUDITING →
//! DONE(status)`, with every mid-pipeline stage able to fall back to
//! `DONE(ROLLBACK|FAILED_VALIDATION|INVALID_PLAN)` instead. The input file's
//! byte-level guarantee falls out of how the package is opened, not from an
//! explicit restore step: [`OoxmlAutomation::open`] reads the whole package
//! into memory up front, and every atomic operation mutates that in-memory
//! copy. `docx_path` itself is never reopened for writing — only a `SUCCESS`
//! run calls `save()`, and it writes to a new, derived path, so a failure at
//! any stage leaves the original bytes untouched by construction.
use crate::auditor::{self, RunArtifacts, RunStatus};
use crate::automation::OoxmlAutomation;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::executor;
use crate::extractor;
use crate::localisation::LocalisationTables;
use crate::monitoring::{StageTimer, Warning};
use crate::planner::{self, ModelClient};
use crate::validator;
use std::path::{Path, PathBuf};

/// Outcome of [`process_document`]: the terminal status, where the audit
/// trail landed, the output path on success, and every warning/error
/// accumulated along the way.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub status: RunStatus,
    pub output_path: Option<PathBuf>,
    pub audit_directory: PathBuf,
    pub errors: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Run one whole pipeline pass over `docx_path`: extract, plan against
/// `user_intent` via `client`, execute, validate, and commit or roll back,
/// finalizing an audit directory under `config.audit_dir` regardless of
/// outcome.
pub fn process_document(
    docx_path: &Path,
    user_intent: &str,
    config: &PipelineConfig,
    client: &dyn ModelClient,
    localisation: &LocalisationTables,
) -> Result<ProcessOutcome> {
    let mut warnings: Vec<Warning> = Vec::new();
    let level = config.monitoring_level;

    let before_docx_bytes = std::fs::read(docx_path)
        .map_err(|e| PipelineError::Extraction(format!("reading {}: {}", docx_path.display(), e)))?;

    let mut working_copy = WorkingCopy::open(docx_path)?;

    let extraction = {
        let _timer = StageTimer::start("extract", level);
        extractor::extract(working_copy.automation_mut(), config.revision_strategy, &mut warnings)
    };
    let (structure_before, inventory) = match extraction {
        Ok(pair) => pair,
        Err(e) => return finalize_early(config, RunStatus::Rollback, &before_docx_bytes, None, None, vec![e.to_string()], warnings),
    };

    let plan = {
        let _timer = StageTimer::start("plan", level);
        planner::plan(&structure_before, user_intent, client)
    };
    let plan = match plan {
        Ok(plan) => plan,
        Err(e) => {
            return finalize_early(
                config,
                RunStatus::InvalidPlan,
                &before_docx_bytes,
                Some(&structure_before),
                None,
                vec![e.to_string()],
                warnings,
            );
        },
    };

    let execution = {
        let _timer = StageTimer::start("execute", level);
        executor::execute(working_copy.automation_mut(), &plan, localisation, &mut warnings)
    };
    let ops_applied: Vec<String> = match execution {
        Ok(outcomes) => outcomes
            .into_iter()
            .filter(|o| o.applied)
            .map(|o| o.name.to_string())
            .collect(),
        Err(e) => {
            return finalize_early(
                config,
                RunStatus::Rollback,
                &before_docx_bytes,
                Some(&structure_before),
                Some(&plan),
                vec![e.to_string()],
                warnings,
            );
        },
    };

    let validation = {
        let _timer = StageTimer::start("validate", level);
        validator::validate(&structure_before, working_copy.automation_mut(), &config.validation_rules)
    };
    let validation = match validation {
        Ok(result) => result,
        Err(e) => {
            return finalize_early(
                config,
                RunStatus::Rollback,
                &before_docx_bytes,
                Some(&structure_before),
                Some(&plan),
                vec![e.to_string()],
                warnings,
            );
        },
    };
    warnings.extend(validation.warnings.clone());

    if !validation.is_valid {
        let diff = auditor::build_diff_report(&structure_before, &validation.structure_after, ops_applied);
        return finalize_early(
            config,
            RunStatus::FailedValidation,
            &before_docx_bytes,
            Some(&structure_before),
            Some(&plan),
            validation.failure_messages,
            warnings,
        )
        .map(|mut outcome| {
            outcome.errors = validation_failures_as_errors(&diff, outcome.errors);
            outcome
        });
    }

    let _audit_timer = StageTimer::start("audit", level);

    let output_path = docx_path.with_extension("transformed.docx");
    working_copy.automation_mut().save(&output_path)?;
    let after_docx_bytes = std::fs::read(&output_path)
        .map_err(|e| PipelineError::Audit(format!("reading {}: {}", output_path.display(), e)))?;

    let diff = auditor::build_diff_report(&structure_before, &validation.structure_after, ops_applied);

    let run_dir = auditor::finalize(
        Path::new(&config.audit_dir),
        RunArtifacts {
            status: RunStatus::Success,
            before_docx: &before_docx_bytes,
            after_docx: Some(&after_docx_bytes),
            before_structure: &structure_before,
            after_structure: Some(&validation.structure_after),
            inventory: &inventory,
            plan: Some(&plan),
            diff_report: Some(&diff),
            warnings: &warnings,
        },
    )?;

    Ok(ProcessOutcome {
        status: RunStatus::Success,
        output_path: Some(output_path),
        audit_directory: run_dir.path().to_path_buf(),
        errors: vec![],
        warnings,
    })
}

/// Run only Extractor + Planner: write `plan.v1.json` into a fresh audit
/// directory and stop, never touching the working copy. Used by the
/// `dry-run` command-line surface.
pub fn plan_only(docx_path: &Path, user_intent: &str, config: &PipelineConfig, client: &dyn ModelClient) -> Result<ProcessOutcome> {
    let mut warnings: Vec<Warning> = Vec::new();
    let before_docx_bytes = std::fs::read(docx_path)
        .map_err(|e| PipelineError::Extraction(format!("reading {}: {}", docx_path.display(), e)))?;
    let mut working_copy = WorkingCopy::open(docx_path)?;

    let (structure_before, _inventory) = extractor::extract(working_copy.automation_mut(), config.revision_strategy, &mut warnings)?;

    let plan = match planner::plan(&structure_before, user_intent, client) {
        Ok(plan) => plan,
        Err(e) => {
            return finalize_early(
                config,
                RunStatus::InvalidPlan,
                &before_docx_bytes,
                Some(&structure_before),
                None,
                vec![e.to_string()],
                warnings,
            );
        },
    };

    let inventory = crate::schema::inventory::InventoryFull::empty();
    let run_dir = auditor::finalize_plan_only(
        Path::new(&config.audit_dir),
        &before_docx_bytes,
        &structure_before,
        &inventory,
        &plan,
        &warnings,
    )?;

    Ok(ProcessOutcome {
        status: RunStatus::Success,
        output_path: None,
        audit_directory: run_dir.path().to_path_buf(),
        errors: vec![],
        warnings,
    })
}

/// A failed/rolled-back run still needs a full audit directory; this
/// collects the shared bookkeeping for every non-success exit.
#[allow(clippy::too_many_arguments)]
fn finalize_early(
    config: &PipelineConfig,
    status: RunStatus,
    before_docx_bytes: &[u8],
    structure_before: Option<&crate::schema::structure::Structure>,
    plan: Option<&crate::schema::plan::Plan>,
    errors: Vec<String>,
    warnings: Vec<Warning>,
) -> Result<ProcessOutcome> {
    let fallback_structure = crate::schema::structure::Structure {
        schema_version: crate::schema::structure::SCHEMA_VERSION.to_string(),
        metadata: Default::default(),
        styles: vec![],
        paragraphs: vec![],
        headings: vec![],
        fields: vec![],
        tables: vec![],
    };
    let structure = structure_before.unwrap_or(&fallback_structure);
    let inventory = crate::schema::inventory::InventoryFull::empty();

    let run_dir = auditor::finalize(
        Path::new(&config.audit_dir),
        RunArtifacts {
            status,
            before_docx: before_docx_bytes,
            after_docx: None,
            before_structure: structure,
            after_structure: None,
            inventory: &inventory,
            plan,
            diff_report: None,
            warnings: &warnings,
        },
    )?;

    Ok(ProcessOutcome {
        status,
        output_path: None,
        audit_directory: run_dir.path().to_path_buf(),
        errors,
        warnings,
    })
}

fn validation_failures_as_errors(diff: &crate::schema::diff_report::DiffReport, existing: Vec<String>) -> Vec<String> {
    // The diff report is informational for a failed run; validation
    // failure messages (already in `existing`) remain the primary error
    // surface, so this only exists to keep the diff computed once.
    let _ = diff;
    existing
}

/// Owns the in-memory package opened from `docx_path`, giving callers a
/// `WordAutomation` handle without re-reading the file from disk at every
/// stage boundary.
struct WorkingCopy {
    automation: OoxmlAutomation,
}

impl WorkingCopy {
    fn open(docx_path: &Path) -> Result<Self> {
        Ok(Self {
            automation: OoxmlAutomation::open(docx_path)?,
        })
    }

    fn automation_mut(&mut self) -> &mut dyn crate::automation::WordAutomation {
        &mut self.automation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_early_fills_in_an_empty_structure_when_none_was_extracted() {
        let temp = std::env::temp_dir().join("scribeforge-orchestrator-test-finalize-early");
        std::fs::create_dir_all(&temp).unwrap();
        let mut config = PipelineConfig::default();
        config.audit_dir = temp.to_string_lossy().to_string();

        let outcome = finalize_early(&config, RunStatus::Rollback, b"before", None, None, vec!["boom".to_string()], vec![]).unwrap();
        assert_eq!(outcome.status, RunStatus::Rollback);
        assert!(outcome.output_path.is_none());
        assert_eq!(outcome.errors, vec!["boom".to_string()]);

        std::fs::remove_dir_all(&temp).ok();
    }
}
