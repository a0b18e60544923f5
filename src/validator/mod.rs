//! The validate stage: re-extract the mutated document and check it against
//! the configured assertion families. Re-extraction reuses
//! [`crate::extractor::extract`] directly rather than re-implementing any
//! projection logic, so the round-trip law (`extract` applied twice to the
//! same bytes yields byte-equal JSON) holds by construction.
use crate::automation::WordAutomation;
use crate::config::{RevisionStrategy, ValidationRules};
use crate::error::Result;
use crate::extractor;
use crate::monitoring::Warning;
use crate::schema::structure::Structure;

/// Outcome of one run through [`validate`]. A non-empty `failure_messages`
/// means the orchestrator must roll back; warnings alone never do.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub failure_messages: Vec<String>,
    pub warnings: Vec<Warning>,
    pub structure_after: Structure,
}

/// `validate(structure_before, modified_automation, rules) -> ValidationResult`.
///
/// Re-runs the Extractor on `automation` (already pointed at the mutated
/// working copy) to obtain `structure_after`, then evaluates every
/// assertion family enabled in `rules`.
pub fn validate(
    structure_before: &Structure,
    automation: &mut dyn WordAutomation,
    rules: &ValidationRules,
) -> Result<ValidationResult> {
    let mut warnings = Vec::new();
    let (structure_after, _inventory) = extractor::extract(automation, RevisionStrategy::Bypass, &mut warnings)?;

    let mut failures = Vec::new();

    if rules.chapter_assertion {
        chapter_assertion(&structure_after, &rules.forbidden_level1_headings, &mut failures);
    }
    if rules.style_assertion {
        style_assertion(structure_before, &structure_after, &mut failures);
    }
    if rules.toc_assertion {
        toc_assertion(&structure_after, &mut failures);
    }
    if rules.pagination_assertion {
        pagination_assertion(structure_before, &structure_after, &mut failures);
    }
    if rules.integrity_assertion {
        integrity_assertion(&structure_after, &mut failures);
    }

    Ok(ValidationResult {
        is_valid: failures.is_empty(),
        failure_messages: failures,
        warnings,
        structure_after,
    })
}

/// No configured forbidden level-1 heading may survive.
fn chapter_assertion(structure: &Structure, forbidden: &[String], failures: &mut Vec<String>) {
    for forbidden_heading in forbidden {
        let still_present = structure
            .headings
            .iter()
            .any(|h| h.level == 1 && &h.text == forbidden_heading);
        if still_present {
            failures.push(format!(
                "chapter assertion: forbidden level-1 heading {:?} still present",
                forbidden_heading
            ));
        }
    }
}

/// Named styles' font/paragraph-format specs must match within tolerance 0
/// for enums and exactly for integers and floating-point values, for every
/// style the plan's own operations did not target. A style `set_style_rule`
/// legitimately touched is expected to differ; one that no operation
/// targeted drifting anyway indicates a handler mutated more than it
/// should have.
fn style_assertion(before: &Structure, after: &Structure, failures: &mut Vec<String>) {
    for before_style in &before.styles {
        let Some(after_style) = after.styles.iter().find(|s| s.name == before_style.name) else {
            continue;
        };
        if after_style.is_modified {
            continue;
        }
        if before_style.font.east_asian != after_style.font.east_asian
            || before_style.font.latin != after_style.font.latin
            || before_style.font.size_pt != after_style.font.size_pt
            || before_style.font.bold != after_style.font.bold
            || before_style.font.italic != after_style.font.italic
            || before_style.font.color != after_style.font.color
            || before_style.paragraph.line_spacing_mode != after_style.paragraph.line_spacing_mode
            || before_style.paragraph.line_spacing_value != after_style.paragraph.line_spacing_value
            || before_style.paragraph.space_before_pt != after_style.paragraph.space_before_pt
            || before_style.paragraph.space_after_pt != after_style.paragraph.space_after_pt
            || before_style.paragraph.alignment != after_style.paragraph.alignment
        {
            failures.push(format!(
                "style assertion: style {:?} drifted without being marked modified",
                before_style.name
            ));
        }
    }
}

/// Every TOC field must correspond to an existing heading with matching
/// text, level, and page number.
fn toc_assertion(after: &Structure, failures: &mut Vec<String>) {
    for field in after.fields.iter().filter(|f| f.field_type == "TOC") {
        if field.needs_update {
            failures.push("toc assertion: a TOC field still has needs_update set".to_string());
            continue;
        }
        let toc_lines: Vec<&str> = field.result.lines().filter(|l| !l.trim().is_empty()).collect();
        for line in toc_lines {
            let matches_a_heading = after
                .headings
                .iter()
                .any(|h| line.contains(h.text.as_str()));
            if !matches_a_heading {
                failures.push(format!(
                    "toc assertion: TOC entry {:?} does not correspond to any heading",
                    line
                ));
            }
        }
    }
}

/// Fields must have been updated (`needs_update` cleared) and the document's
/// modified timestamp must have advanced.
fn pagination_assertion(before: &Structure, after: &Structure, failures: &mut Vec<String>) {
    if after.fields.iter().any(|f| f.needs_update) {
        failures.push("pagination assertion: a field still has needs_update set".to_string());
    }
    if let (Some(before_modified), Some(after_modified)) =
        (&before.metadata.modified_time, &after.metadata.modified_time)
        && after_modified <= before_modified
    {
        failures.push("pagination assertion: modified_time did not advance".to_string());
    }
}

/// Paragraph indices dense and contiguous from zero; every heading/table/
/// field paragraph reference resolves to an existing paragraph; no orphan
/// style references (a paragraph or heading naming a style absent from
/// `styles`).
fn integrity_assertion(after: &Structure, failures: &mut Vec<String>) {
    for (expected_index, paragraph) in after.paragraphs.iter().enumerate() {
        if paragraph.index != expected_index {
            failures.push(format!(
                "integrity assertion: paragraph indices not dense/contiguous at position {} (found index {})",
                expected_index, paragraph.index
            ));
            break;
        }
    }

    let paragraph_count = after.paragraphs.len();
    for heading in &after.headings {
        if heading.paragraph_index >= paragraph_count {
            failures.push(format!(
                "integrity assertion: heading {:?} references out-of-range paragraph {}",
                heading.text, heading.paragraph_index
            ));
        }
    }
    for table in &after.tables {
        if table.paragraph_index >= paragraph_count {
            failures.push(format!(
                "integrity assertion: table {} references out-of-range paragraph {}",
                table.index, table.paragraph_index
            ));
        }
    }
    for field in &after.fields {
        if field.paragraph_index >= paragraph_count {
            failures.push(format!(
                "integrity assertion: field {:?} references out-of-range paragraph {}",
                field.field_type, field.paragraph_index
            ));
        }
    }

    let style_names: std::collections::HashSet<&str> =
        after.styles.iter().map(|s| s.name.as_str()).collect();
    for paragraph in &after.paragraphs {
        if let Some(name) = &paragraph.style_name
            && !style_names.contains(name.as_str())
        {
            failures.push(format!(
                "integrity assertion: paragraph {} references orphan style {:?}",
                paragraph.index, name
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::structure::{HeadingSpec, StructureMetadata};

    fn base_structure() -> Structure {
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
    fn chapter_assertion_fails_when_forbidden_heading_survives() {
        let mut structure = base_structure();
        structure.headings.push(HeadingSpec {
            text: "摘要".to_string(),
            level: 1,
            style_name: Some("Heading 1".to_string()),
            paragraph_index: 0,
            page_number: Some(1),
            in_table: false,
            table_index: None,
        });
        let mut failures = Vec::new();
        chapter_assertion(&structure, &["摘要".to_string()], &mut failures);
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn chapter_assertion_passes_once_the_heading_is_gone() {
        let structure = base_structure();
        let mut failures = Vec::new();
        chapter_assertion(&structure, &["摘要".to_string()], &mut failures);
        assert!(failures.is_empty());
    }

    #[test]
    fn integrity_assertion_catches_a_dangling_heading_reference() {
        let mut structure = base_structure();
        structure.headings.push(HeadingSpec {
            text: "Chapter 1".to_string(),
            level: 1,
            style_name: None,
            paragraph_index: 5,
            page_number: None,
            in_table: false,
            table_index: None,
        });
        let mut failures = Vec::new();
        integrity_assertion(&structure, &mut failures);
        assert!(!failures.is_empty());
    }
}
