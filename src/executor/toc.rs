//! `update_toc` and `delete_toc`: both work against complex-field markup
//! (`w:fldChar` begin/separate/end, `w:instrText`) rather than the field's
//! rendered result text, since the result is exactly what a TOC update
//! has to discard and regenerate.
use super::xmlpatch::{self, attr_value, with_attr};
use crate::automation::WordAutomation;
use crate::error::Result;
use crate::monitoring::Warning;
use crate::schema::plan::TocMode;
use quick_xml::events::Event;

const DOCUMENT_PART: &str = "/word/document.xml";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// One TOC field's event-index span, `[begin, end]` inclusive, found by
/// scanning for `w:fldChar` begin/end pairs whose enclosed `w:instrText`
/// starts with `TOC` (the standard Word field code for a table of contents).
struct FieldSpan {
    begin: usize,
    end: usize,
}

fn find_toc_spans(events: &[Event<'static>]) -> Vec<FieldSpan> {
    let mut spans = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut is_toc: Vec<bool> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Empty(e) | Event::Start(e) if xmlpatch::tag_name(event).as_deref() == Some("fldChar") => {
                match attr_value(e, b"fldCharType").as_deref() {
                    Some("begin") => {
                        open.push(index);
                        is_toc.push(false);
                    },
                    Some("end") => {
                        if let (Some(begin), Some(toc)) = (open.pop(), is_toc.pop())
                            && toc
                        {
                            spans.push(FieldSpan { begin, end: index });
                        }
                    },
                    _ => {},
                }
            },
            Event::Text(t) => {
                if let Some(flag) = is_toc.last_mut() {
                    let text = t.decode().map(|c| c.into_owned()).unwrap_or_default();
                    if text.trim_start().to_uppercase().starts_with("TOC") {
                        *flag = true;
                    }
                }
            },
            _ => {},
        }
    }
    spans
}

pub fn update_toc(automation: &mut dyn WordAutomation, warnings: &mut Vec<Warning>) -> Result<bool> {
    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        warnings.push(Warning::new("NOOP", "update_toc: package has no main document part"));
        return Ok(false);
    };
    let mut events = xmlpatch::parse_events(&xml);
    let spans = find_toc_spans(&events);

    if spans.is_empty() {
        warnings.push(Warning::new("NOOP", "update_toc: document has no TOC field"));
        return Ok(false);
    }

    // This pipeline has no layout engine to regenerate the rendered TOC
    // entries, so running the op is itself the update; clearing `dirty`
    // (rather than setting it) keeps the field from reading as stale to a
    // later validation pass.
    for span in &spans {
        if let Event::Empty(e) | Event::Start(e) = &events[span.begin] {
            let rewritten = with_attr(e, b"dirty", "false");
            events[span.begin] = match &events[span.begin] {
                Event::Empty(_) => Event::Empty(rewritten),
                _ => Event::Start(rewritten),
            };
        }
    }

    let rewritten_xml = xmlpatch::events_to_string(&events);
    automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, rewritten_xml)?;
    Ok(true)
}

pub fn delete_toc(
    automation: &mut dyn WordAutomation,
    mode: TocMode,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        warnings.push(Warning::new("NOOP", "delete_toc: package has no main document part"));
        return Ok(false);
    };
    let events = xmlpatch::parse_events(&xml);
    let spans = find_toc_spans(&events);

    if spans.is_empty() {
        warnings.push(Warning::new("NOOP", "delete_toc: document has no TOC field"));
        return Ok(false);
    }

    let selected: Vec<&FieldSpan> = match mode {
        TocMode::All => spans.iter().collect(),
        TocMode::First => spans.first().into_iter().collect(),
        TocMode::Last => spans.last().into_iter().collect(),
    };

    let mut out = Vec::with_capacity(events.len());
    for (index, event) in events.into_iter().enumerate() {
        let dropped = selected.iter().any(|s| index >= s.begin && index <= s.end);
        if !dropped {
            out.push(event);
        }
    }

    let rewritten_xml = xmlpatch::events_to_string(&out);
    automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, rewritten_xml)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toc_field() -> &'static str {
        r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText>TOC \o "1-3"</w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>Heading 1, 1</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#
    }

    #[test]
    fn finds_a_single_toc_span() {
        let events = xmlpatch::parse_events(sample_toc_field());
        let spans = find_toc_spans(&events);
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn ignores_non_toc_fields() {
        let xml = r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText>PAGE</w:instrText></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#;
        let events = xmlpatch::parse_events(xml);
        assert!(find_toc_spans(&events).is_empty());
    }
}
