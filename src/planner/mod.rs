//! Planner gateway: prompt assembly, the language-model call, and the
//! four-stage validation pipeline (schema, whitelist, parameter sanity,
//! structural coherence) that turns a raw reply into `plan.v1` or
//! `INVALID_PLAN`.
pub mod model_client;
pub mod prompts;

pub use model_client::{HttpModelClient, ModelClient, StubModelClient};

use crate::error::PipelineError;
use crate::schema::plan::{AtomicOp, Plan};
use crate::schema::structure::Structure;

/// Bounded retry count for "reply wasn't valid JSON" before giving up.
const MAX_RETRIES: usize = 3;

/// `plan(structure, user_intent, config) -> plan.v1` or `INVALID_PLAN`.
pub fn plan(
    structure: &Structure,
    user_intent: &str,
    client: &dyn ModelClient,
) -> Result<Plan, PipelineError> {
    let system_prompt = prompts::system_prompt();
    let mut user_prompt = prompts::user_prompt(structure, user_intent);

    let mut last_error = None;
    for attempt in 1..=MAX_RETRIES {
        let reply = client.complete(&system_prompt, &user_prompt)?;
        match validate_reply(&reply, structure) {
            Ok(plan) => return Ok(plan),
            Err(e) => {
                last_error = Some((reply, e));
                user_prompt = format!(
                    "{}\n\n{}",
                    prompts::user_prompt(structure, user_intent),
                    prompts::json_only_reminder(attempt)
                );
            },
        }
    }

    let (last_reply, last_err) = last_error.expect("loop runs at least once");
    Err(PipelineError::InvalidPlan(format!(
        "giving up after {} attempts: {} (last raw reply: {})",
        MAX_RETRIES, last_err, last_reply
    )))
}

/// Runs the reply through the full validation pipeline: strict JSON parse
/// (which, via `serde`'s `deny_unknown_fields` and `AtomicOp`'s tagged
/// dispatch, already enforces schema conformance and whitelist membership),
/// then parameter sanity, then structural coherence.
fn validate_reply(reply: &str, structure: &Structure) -> Result<Plan, PipelineError> {
    let trimmed = strip_code_fences(reply);
    let plan: Plan = serde_json::from_str(trimmed)
        .map_err(|e| PipelineError::InvalidPlan(format!("reply is not valid plan.v1 JSON: {}", e)))?;

    plan.validate()?;
    check_structural_coherence(&plan, structure)?;
    Ok(plan)
}

/// Models sometimes wrap JSON in markdown fences despite instructions;
/// stripping them here keeps the "JSON only" enforcement about content, not
/// formatting accidents.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.strip_suffix("```").unwrap_or(s).trim())
        .unwrap_or(trimmed)
}

/// Structural coherence: referenced style names and heading levels must be
/// syntactically valid. Existence is explicitly NOT required here — an
/// unmatched target becomes a NOOP at execute time, per the gateway's
/// contract; this stage only rejects syntactic nonsense (empty names,
/// levels already caught by parameter sanity, regex patterns that don't
/// compile for `match = REGEX`).
fn check_structural_coherence(plan: &Plan, _structure: &Structure) -> Result<(), PipelineError> {
    for entry in &plan.ops {
        match &entry.op {
            AtomicOp::DeleteSectionByHeading {
                heading_text,
                match_mode,
                ..
            } => {
                if heading_text.trim().is_empty() {
                    return Err(PipelineError::InvalidPlan(
                        "delete_section_by_heading: heading_text is empty".to_string(),
                    ));
                }
                if matches!(match_mode, crate::schema::plan::MatchMode::Regex)
                    && regex::Regex::new(heading_text).is_err()
                {
                    return Err(PipelineError::InvalidPlan(format!(
                        "delete_section_by_heading: {:?} does not compile as a regex",
                        heading_text
                    )));
                }
            },
            AtomicOp::SetStyleRule { target_style, .. } => {
                if target_style.trim().is_empty() {
                    return Err(PipelineError::InvalidPlan(
                        "set_style_rule: target_style is empty".to_string(),
                    ));
                }
            },
            AtomicOp::ReassignParagraphsToStyle { target_style, .. } => {
                if target_style.trim().is_empty() {
                    return Err(PipelineError::InvalidPlan(
                        "reassign_paragraphs_to_style: target_style is empty".to_string(),
                    ));
                }
            },
            AtomicOp::UpdateToc {} | AtomicOp::DeleteToc { .. } | AtomicOp::ClearDirectFormatting { .. } => {},
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::structure::{ParagraphSpec, StructureMetadata};

    fn minimal_structure() -> Structure {
        Structure {
            schema_version: crate::schema::structure::SCHEMA_VERSION.to_string(),
            metadata: StructureMetadata::default(),
            styles: vec![],
            paragraphs: vec![ParagraphSpec {
                index: 0,
                style_name: Some("Heading 1".into()),
                preview_text: "摘要".into(),
                is_heading: true,
                heading_level: Some(1),
                page_number: Some(1),
            }],
            headings: vec![],
            fields: vec![],
            tables: vec![],
        }
    }

    #[test]
    fn accepts_a_well_formed_plan() {
        let reply = r#"{"schema_version":"plan.v1","ops":[{"operation":"update_toc"}]}"#;
        let client = StubModelClient::new(vec![reply.to_string()]);
        let result = plan(&minimal_structure(), "update the toc", &client);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_operation_outside_whitelist_after_exhausting_retries() {
        let reply = r#"{"ops":[{"operation":"run_macro","name":"evil"}]}"#;
        let client = StubModelClient::new(vec![
            reply.to_string(),
            reply.to_string(),
            reply.to_string(),
        ]);
        let result = plan(&minimal_structure(), "do something bad", &client);
        assert!(matches!(result, Err(PipelineError::InvalidPlan(_))));
    }

    #[test]
    fn strips_markdown_code_fences() {
        let reply = "```json\n{\"schema_version\":\"plan.v1\",\"ops\":[]}\n```";
        let client = StubModelClient::new(vec![reply.to_string()]);
        let result = plan(&minimal_structure(), "no-op", &client);
        assert!(result.is_ok());
    }

    #[test]
    fn recovers_after_one_malformed_reply() {
        let client = StubModelClient::new(vec![
            "not json at all".to_string(),
            r#"{"schema_version":"plan.v1","ops":[]}"#.to_string(),
        ]);
        let result = plan(&minimal_structure(), "no-op", &client);
        assert!(result.is_ok());
    }
}
