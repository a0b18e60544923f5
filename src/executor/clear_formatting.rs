//! `clear_direct_formatting`: strip direct `w:rPr`/`w:pPr` property
//! overrides while preserving the `w:pStyle`/`w:rStyle` references
//! themselves, so a paragraph falls back to whatever its assigned style
//! says instead of being reset to bare defaults.
use super::xmlpatch::{self, find_child_span};
use crate::automation::WordAutomation;
use crate::error::Result;
use crate::monitoring::Warning;
use crate::schema::plan::ClearScope;
use quick_xml::events::Event;

const DOCUMENT_PART: &str = "/word/document.xml";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Direct-formatting child elements removed from a `w:rPr`/`w:pPr`
/// container. `pStyle`/`rStyle` are never in this list — clearing direct
/// formatting means falling back to the assigned style, not detaching it.
const RPR_DIRECT_PROPERTIES: &[&str] = &["rFonts", "sz", "b", "bCs", "i", "iCs", "color", "u", "strike"];
const PPR_DIRECT_PROPERTIES: &[&str] = &["spacing", "jc", "ind"];

pub fn apply(
    automation: &mut dyn WordAutomation,
    scope: ClearScope,
    range_spec: Option<&str>,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    match scope {
        ClearScope::Document => apply_to_document(automation, warnings),
        ClearScope::Selection => apply_to_selection(automation, range_spec, warnings),
        ClearScope::Style => apply_to_style(automation, range_spec, warnings),
    }
}

fn apply_to_document(automation: &mut dyn WordAutomation, warnings: &mut Vec<Warning>) -> Result<bool> {
    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        warnings.push(Warning::new("NOOP", "clear_direct_formatting: package has no main document part"));
        return Ok(false);
    };
    let mut events = xmlpatch::parse_events(&xml);
    let spans = xmlpatch::paragraph_spans(&events);
    for &span in spans.iter().rev() {
        strip_direct_formatting_in(&mut events, span);
    }
    let rewritten = xmlpatch::events_to_string(&events);
    automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, rewritten)?;
    Ok(true)
}

/// `range_spec` is `"paragraph:START-END"`, a half-open paragraph-index
/// range (document order), the minimal selection addressing this gateway
/// supports — there is no live cursor/selection to inherit from.
fn apply_to_selection(
    automation: &mut dyn WordAutomation,
    range_spec: Option<&str>,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    let Some((start, end)) = range_spec.and_then(parse_paragraph_range) else {
        warnings.push(Warning::new(
            "NOOP",
            format!("clear_direct_formatting: scope SELECTION needs a paragraph:START-END range_spec, got {:?}", range_spec),
        ));
        return Ok(false);
    };
    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        warnings.push(Warning::new("NOOP", "clear_direct_formatting: package has no main document part"));
        return Ok(false);
    };
    let mut events = xmlpatch::parse_events(&xml);
    let spans = xmlpatch::paragraph_spans(&events);
    let in_range: Vec<(usize, usize)> = spans
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i >= start && *i < end)
        .map(|(_, span)| span)
        .collect();
    if in_range.is_empty() {
        warnings.push(Warning::new(
            "NOOP",
            format!("clear_direct_formatting: range {}-{} matched no paragraph", start, end),
        ));
        return Ok(false);
    }
    for &span in in_range.iter().rev() {
        strip_direct_formatting_in(&mut events, span);
    }
    let rewritten = xmlpatch::events_to_string(&events);
    automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, rewritten)?;
    Ok(true)
}

/// `range_spec` names the style whose paragraphs should be cleared.
fn apply_to_style(
    automation: &mut dyn WordAutomation,
    range_spec: Option<&str>,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    let Some(style_name) = range_spec else {
        warnings.push(Warning::new(
            "NOOP",
            "clear_direct_formatting: scope STYLE needs a style name in range_spec",
        ));
        return Ok(false);
    };
    let Some(style) = automation.style_by_name(style_name)? else {
        warnings.push(Warning::new(
            "NOOP",
            format!("clear_direct_formatting: style {:?} not found", style_name),
        ));
        return Ok(false);
    };
    let style_id = style.style_id().to_string();

    let paragraphs = automation.paragraphs()?;
    let matched: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.style_id().ok().flatten().filter(|id| *id == style_id).map(|_| i))
        .collect();

    if matched.is_empty() {
        warnings.push(Warning::new(
            "NOOP",
            format!("clear_direct_formatting: no paragraph uses style {:?}", style_name),
        ));
        return Ok(false);
    }

    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        warnings.push(Warning::new("NOOP", "clear_direct_formatting: package has no main document part"));
        return Ok(false);
    };
    let mut events = xmlpatch::parse_events(&xml);
    let spans = xmlpatch::paragraph_spans(&events);
    for &index in matched.iter().rev() {
        if let Some(&span) = spans.get(index) {
            strip_direct_formatting_in(&mut events, span);
        }
    }
    let rewritten = xmlpatch::events_to_string(&events);
    automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, rewritten)?;
    Ok(true)
}

fn parse_paragraph_range(spec: &str) -> Option<(usize, usize)> {
    let body = spec.strip_prefix("paragraph:")?;
    let (start, end) = body.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

/// Remove every recognized direct-formatting element from the `w:pPr` and
/// every `w:rPr` found inside `paragraph_span`, leaving `pStyle`/`rStyle`
/// untouched. Shared with `reassign_paragraphs_to_style`'s
/// `clear_direct_formatting` flag.
pub fn strip_direct_formatting_in(events: &mut Vec<Event<'static>>, paragraph_span: (usize, usize)) {
    if let Some(ppr) = find_child_span(events, paragraph_span, "pPr") {
        remove_properties(events, ppr, PPR_DIRECT_PROPERTIES);
    }
    // rPr containers can occur at the paragraph-mark level and once per run;
    // re-scan after each removal since indexes shift.
    loop {
        let Some(rpr) = find_next_rpr(events, paragraph_span) else { break };
        let before = events.len();
        remove_properties(events, rpr, RPR_DIRECT_PROPERTIES);
        if events.len() == before {
            break;
        }
    }
}

fn find_next_rpr(events: &[Event<'static>], paragraph_span: (usize, usize)) -> Option<(usize, usize)> {
    let mut depth = 0i32;
    let mut i = paragraph_span.0 + 1;
    while i < paragraph_span.1 {
        let tag = xmlpatch::tag_name(&events[i]);
        match &events[i] {
            Event::Start(_) => {
                if tag.as_deref() == Some("rPr") {
                    let mut inner = 0i32;
                    let mut j = i;
                    while j < paragraph_span.1 {
                        match &events[j] {
                            Event::Start(_) => inner += 1,
                            Event::End(_) => {
                                inner -= 1;
                                if inner == 0 {
                                    return Some((i, j));
                                }
                            },
                            _ => {},
                        }
                        j += 1;
                    }
                }
                depth += 1;
            },
            Event::Empty(_) if tag.as_deref() == Some("rPr") => return Some((i, i)),
            Event::End(_) => depth -= 1,
            _ => {},
        }
        i += 1;
    }
    let _ = depth;
    None
}

fn remove_properties(events: &mut Vec<Event<'static>>, container: (usize, usize), names: &[&str]) {
    let mut to_remove: Vec<(usize, usize)> = names
        .iter()
        .filter_map(|name| find_child_span(events, container, name))
        .collect();
    to_remove.sort_by(|a, b| b.0.cmp(&a.0));
    for (start, end) in to_remove {
        events.drain(start..=end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_direct_run_properties_but_keeps_rstyle() {
        let xml = r#"<w:p><w:r><w:rPr><w:rStyle w:val="Emphasis"/><w:b/><w:sz w:val="28"/></w:rPr><w:t>hi</w:t></w:r></w:p>"#;
        let mut events = xmlpatch::parse_events(xml);
        strip_direct_formatting_in(&mut events, (0, events.len() - 1));
        let out = xmlpatch::events_to_string(&events);
        assert!(out.contains("rStyle"));
        assert!(!out.contains("w:sz"));
        assert!(!out.contains("<w:b"));
    }

    #[test]
    fn parses_a_paragraph_range_spec() {
        assert_eq!(parse_paragraph_range("paragraph:2-5"), Some((2, 5)));
        assert_eq!(parse_paragraph_range("bogus"), None);
    }
}
