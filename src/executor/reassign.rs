//! `reassign_paragraphs_to_style`: resolve the selector against the
//! already-extracted paragraph stream, then rewrite each matched
//! paragraph's `w:pStyle`, optionally stripping its direct formatting too.
use super::clear_formatting::strip_direct_formatting_in;
use super::xmlpatch::{self, ensure_child_container, upsert_self_closing};
use crate::automation::WordAutomation;
use crate::error::Result;
use crate::localisation::LocalisationTables;
use crate::monitoring::Warning;
use crate::schema::plan::{ParagraphSelector, PositionMatch};

const DOCUMENT_PART: &str = "/word/document.xml";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

pub fn apply(
    automation: &mut dyn WordAutomation,
    selector: &ParagraphSelector,
    target_style: &str,
    clear_direct_formatting: bool,
    localisation: &LocalisationTables,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    let Some(resolved_name) = localisation.resolve_style_name(automation, target_style)? else {
        warnings.push(Warning::new(
            "NOOP",
            format!("reassign_paragraphs_to_style: no style resolves to {:?}", target_style),
        ));
        return Ok(false);
    };
    let Some(style) = automation.style_by_name(&resolved_name)? else {
        warnings.push(Warning::new(
            "NOOP",
            format!("reassign_paragraphs_to_style: style {:?} vanished after resolution", resolved_name),
        ));
        return Ok(false);
    };
    let style_id = style.style_id().to_string();

    let paragraphs = automation.paragraphs()?;
    let mut matched_indexes = Vec::new();
    for (index, para) in paragraphs.iter().enumerate() {
        if selector_matches(selector, para, automation)? {
            matched_indexes.push(index);
        }
    }

    if matched_indexes.is_empty() {
        warnings.push(Warning::new(
            "NOOP",
            "reassign_paragraphs_to_style: selector matched no paragraph",
        ));
        return Ok(false);
    }

    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        warnings.push(Warning::new(
            "NOOP",
            "reassign_paragraphs_to_style: package has no main document part",
        ));
        return Ok(false);
    };

    let mut events = xmlpatch::parse_events(&xml);
    let spans = xmlpatch::paragraph_spans(&events);

    // Walk matched indexes back to front so earlier insertions don't shift
    // the spans of paragraphs still queued for rewriting.
    for &index in matched_indexes.iter().rev() {
        let Some(&span) = spans.get(index) else { continue };
        let mut para_span = span;
        let ppr = ensure_child_container(&mut events, &mut para_span, "pPr");
        upsert_self_closing(&mut events, ppr, "w:pPr", "pStyle", &[("w:val", style_id.clone())]);
        if clear_direct_formatting {
            strip_direct_formatting_in(&mut events, para_span);
        }
    }

    let rewritten = xmlpatch::events_to_string(&events);
    automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, rewritten)?;
    Ok(true)
}

fn selector_matches(
    selector: &ParagraphSelector,
    para: &crate::ooxml::docx::Paragraph,
    automation: &dyn WordAutomation,
) -> Result<bool> {
    if let Some(current_style) = &selector.current_style {
        let style_id = para.style_id()?;
        let matches_by_id = style_id.as_deref() == Some(current_style.as_str());
        let matches_by_name = match &style_id {
            Some(id) => automation
                .styles()?
                .into_iter()
                .any(|s| s.style_id() == id && s.name() == Some(current_style.as_str())),
            None => false,
        };
        if !matches_by_id && !matches_by_name {
            return Ok(false);
        }
    }

    let text = para.text()?;
    if let Some(needle) = &selector.text_contains
        && !text.contains(needle.as_str())
    {
        return Ok(false);
    }

    if let Some(level) = selector.heading_level {
        let outline = para.outline_level()?;
        if outline != Some(level.saturating_sub(1)) {
            return Ok(false);
        }
    }

    if let Some(position) = &selector.position
        && let Some(needle) = &selector.text_contains
    {
        let matched = match position {
            PositionMatch::StartsWith => text.starts_with(needle.as_str()),
            PositionMatch::EndsWith => text.ends_with(needle.as_str()),
            PositionMatch::Contains => text.contains(needle.as_str()),
        };
        if !matched {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::schema::plan::PositionMatch;

    #[test]
    fn position_match_variants_behave_as_named() {
        assert!(selector_matches_text_only("Chapter One", "Chapter", PositionMatch::StartsWith));
        assert!(selector_matches_text_only("Notes: Chapter", "Chapter", PositionMatch::EndsWith));
        assert!(selector_matches_text_only("See Chapter Two", "Chapter", PositionMatch::Contains));
    }

    fn selector_matches_text_only(text: &str, needle: &str, position: PositionMatch) -> bool {
        match position {
            PositionMatch::StartsWith => text.starts_with(needle),
            PositionMatch::EndsWith => text.ends_with(needle),
            PositionMatch::Contains => text.contains(needle),
        }
    }
}
