//! Streaming XML surgery primitives shared by the atomic operation
//! handlers. Every handler reads a part's raw XML, rewrites a bounded
//! region of the event stream, and reserializes — the same posture
//! `extractor::revisions` uses for tracked-change folding, generalized
//! to whole-document paragraph ranges and field spans.
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use std::io::Cursor;

/// Parse `xml` into a vector of owned events, dropping the trailing `Eof`.
/// Handlers that need lookahead (field spans, style blocks) work against
/// this vector rather than a live `Reader`.
pub fn parse_events(xml: &str) -> Vec<Event<'static>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);
    let mut events = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(event) => events.push(event.into_owned()),
            Err(_) => break,
        }
    }
    events
}

/// Reserialize a slice of events back into an XML string.
pub fn events_to_string(events: &[Event<'_>]) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for event in events {
        let _ = writer.write_event(event.clone());
    }
    String::from_utf8(writer.into_inner().into_inner()).unwrap_or_default()
}

/// The local (namespace-stripped) tag name of a Start/Empty/End event.
pub fn tag_name(event: &Event) -> Option<String> {
    let name = match event {
        Event::Start(e) | Event::Empty(e) => e.name(),
        Event::End(e) => e.name(),
        _ => return None,
    };
    std::str::from_utf8(name.local_name().as_ref())
        .ok()
        .map(str::to_string)
}

/// Value of an attribute on a Start/Empty tag, matched on local name
/// (so it doesn't matter whether the document uses the `w:` prefix or
/// declares a different one for the same namespace).
pub fn attr_value(e: &BytesStart, local_name: &[u8]) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.key.local_name().as_ref() == local_name {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Rebuild `e` with `local_name="value"` set, replacing any existing
/// attribute of that local name and appending otherwise. Attribute order
/// in the original tag is preserved; the touched attribute is either
/// updated in place or appended at the end.
pub fn with_attr(e: &BytesStart, local_name: &[u8], value: &str) -> BytesStart<'static> {
    let mut new = BytesStart::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    let mut replaced = false;
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == local_name {
            new.push_attribute((
                std::str::from_utf8(attr.key.as_ref()).unwrap_or_default(),
                value,
            ));
            replaced = true;
        } else {
            new.push_attribute(attr);
        }
    }
    if !replaced {
        let qualified = qualify_like(e, local_name);
        new.push_attribute((qualified.as_str(), value));
    }
    new
}

/// Build a qualified attribute name using the same prefix as `e`'s own
/// tag name (so a document using `w:` gets `w:dirty`, matching existing
/// siblings rather than introducing an unprefixed attribute).
fn qualify_like(e: &BytesStart, local_name: &[u8]) -> String {
    let tag = String::from_utf8_lossy(e.name().as_ref());
    let prefix = tag.split(':').next().filter(|_| tag.contains(':'));
    let local = String::from_utf8_lossy(local_name);
    match prefix {
        Some(p) => format!("{}:{}", p, local),
        None => local.into_owned(),
    }
}

/// A self-closing element with `local_name="value"` in the same
/// namespace-prefix style as `like`, used when a handler needs to insert
/// a new child element rather than mutate an existing one.
pub fn new_self_closing(like_tag: &str, local_name: &str, attrs: &[(&str, String)]) -> BytesStart<'static> {
    let prefix = like_tag.split(':').next().filter(|_| like_tag.contains(':'));
    let name = match prefix {
        Some(p) => format!("{}:{}", p, local_name),
        None => local_name.to_string(),
    };
    let mut e = BytesStart::new(name.clone());
    for (key, val) in attrs {
        let qualified = match prefix {
            Some(p) => format!("{}:{}", p, key),
            None => key.to_string(),
        };
        e.push_attribute((qualified.as_str(), val.as_str()));
    }
    e
}

/// Plain text content of an event, if it carries any.
pub fn text_of(event: &Event) -> Option<String> {
    match event {
        Event::Text(t) => t.decode().ok().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Remove the top-level `<w:p>` elements at the given zero-based indexes
/// (by document order of `<w:p>` start/empty events) from `xml`, where
/// `ranges` are half-open `[start, end)` paragraph-index ranges.
pub fn delete_paragraph_ranges(xml: &str, ranges: &[(usize, usize)]) -> String {
    let events = parse_events(xml);
    let mut out = Vec::with_capacity(events.len());
    let mut para_index: i64 = -1;
    let mut dropping = false;

    for event in events {
        let tag = tag_name(&event);
        match (&event, tag.as_deref()) {
            (Event::Start(_), Some("p")) => {
                para_index += 1;
                dropping = in_any_range(para_index, ranges);
                if !dropping {
                    out.push(event);
                }
            },
            (Event::Empty(_), Some("p")) => {
                para_index += 1;
                if !in_any_range(para_index, ranges) {
                    out.push(event);
                }
            },
            (Event::End(_), Some("p")) => {
                if !dropping {
                    out.push(event);
                }
                dropping = false;
            },
            _ => {
                if !dropping {
                    out.push(event);
                }
            },
        }
    }
    events_to_string(&out)
}

/// Event-index `[start, end]` inclusive span of every top-level `<w:p>` in
/// document order. A self-closing `<w:p/>` spans a single index twice.
pub fn paragraph_spans(events: &[Event<'static>]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (index, event) in events.iter().enumerate() {
        let tag = tag_name(event);
        match (event, tag.as_deref()) {
            (Event::Start(_), Some("p")) => start = Some(index),
            (Event::Empty(_), Some("p")) => spans.push((index, index)),
            (Event::End(_), Some("p")) => {
                if let Some(s) = start.take() {
                    spans.push((s, index));
                }
            },
            _ => {},
        }
    }
    spans
}

/// Delete the `<w:tr>` enclosing the paragraph at document-order
/// `paragraph_index`, used when a targeted heading lives in a table cell and
/// a paragraph-range delete would split the table instead. Returns `None`
/// if the index is out of range or no enclosing row exists (the paragraph
/// isn't actually inside a table).
pub fn delete_table_row_for_paragraph(xml: &str, paragraph_index: usize) -> Option<String> {
    let events = parse_events(xml);
    let (target_start, _) = *paragraph_spans(&events).get(paragraph_index)?;

    let mut open: Vec<(String, usize)> = Vec::new();
    for (index, event) in events.iter().enumerate().take(target_start) {
        match event {
            Event::Start(_) => {
                if let Some(name) = tag_name(event) {
                    open.push((name, index));
                }
            },
            Event::End(_) => {
                open.pop();
            },
            _ => {},
        }
    }
    let row_start = open.iter().rev().find(|(name, _)| name == "tr").map(|(_, idx)| *idx)?;

    let mut depth = 0i32;
    let mut row_end = None;
    for (index, event) in events.iter().enumerate().skip(row_start) {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    row_end = Some(index);
                    break;
                }
            },
            _ => {},
        }
    }
    let row_end = row_end?;

    let out: Vec<Event<'static>> = events
        .into_iter()
        .enumerate()
        .filter(|(index, _)| *index < row_start || *index > row_end)
        .map(|(_, event)| event)
        .collect();
    Some(events_to_string(&out))
}

fn in_any_range(index: i64, ranges: &[(usize, usize)]) -> bool {
    ranges
        .iter()
        .any(|(s, e)| index >= *s as i64 && index < *e as i64)
}

/// Find a direct child's `[start, end]` span (or `(i, i)` for a
/// self-closing child) within `parent`, at nesting depth zero relative to
/// `parent`'s own start tag.
pub fn find_child_span(events: &[Event<'static>], parent: (usize, usize), local_name: &str) -> Option<(usize, usize)> {
    let mut depth = 0i32;
    let mut i = parent.0 + 1;
    while i < parent.1 {
        let tag = tag_name(&events[i]);
        match &events[i] {
            Event::Start(_) => {
                if depth == 0 && tag.as_deref() == Some(local_name) {
                    let mut inner = 0i32;
                    let mut j = i;
                    while j < parent.1 {
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
            Event::Empty(_) => {
                if depth == 0 && tag.as_deref() == Some(local_name) {
                    return Some((i, i));
                }
            },
            Event::End(_) => depth -= 1,
            _ => {},
        }
        i += 1;
    }
    None
}

/// Find `local_name`'s span inside `parent`, creating an empty
/// `<local_name></local_name>` right before `parent`'s closing tag if
/// absent. Updates `parent.1` in place to account for the insertion.
pub fn ensure_child_container(
    events: &mut Vec<Event<'static>>,
    parent: &mut (usize, usize),
    local_name: &str,
) -> (usize, usize) {
    if let Some(span) = find_child_span(events, *parent, local_name) {
        return span;
    }
    let parent_tag = match &events[parent.0] {
        Event::Start(e) => String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        _ => format!("w:{}", local_name),
    };
    let prefix = parent_tag.split(':').next().filter(|_| parent_tag.contains(':'));
    let qualified = match prefix {
        Some(p) => format!("{}:{}", p, local_name),
        None => local_name.to_string(),
    };
    let insert_at = parent.1;
    events.insert(insert_at, Event::End(quick_xml::events::BytesEnd::new(qualified.clone())));
    events.insert(insert_at, Event::Start(BytesStart::new(qualified)));
    parent.1 += 2;
    (insert_at, insert_at + 1)
}

/// Upsert a self-closing `local_name` child of `container`: rewrite its
/// attributes in place if present, append a new element just before the
/// container's closing tag otherwise.
pub fn upsert_self_closing(
    events: &mut Vec<Event<'static>>,
    container: (usize, usize),
    like_tag: &str,
    local_name: &str,
    attrs: &[(&str, String)],
) {
    match find_child_span(events, container, local_name) {
        Some((i, j)) if i == j => {
            let mut rewritten = match &events[i] {
                Event::Empty(e) => e.clone(),
                Event::Start(e) => e.clone(),
                _ => return,
            };
            for (key, value) in attrs {
                rewritten = with_attr(&rewritten, key.as_bytes(), value);
            }
            events[i] = Event::Empty(rewritten);
        },
        Some((i, _j)) => {
            if let Event::Start(e) = &events[i] {
                let mut rewritten = e.clone();
                for (key, value) in attrs {
                    rewritten = with_attr(&rewritten, key.as_bytes(), value);
                }
                events[i] = Event::Start(rewritten);
            }
        },
        None => {
            let new_el = new_self_closing(like_tag, local_name, attrs);
            events.insert(container.1, Event::Empty(new_el));
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_the_named_paragraph_range() {
        let xml = "<body><p><t>a</t></p><p><t>b</t></p><p><t>c</t></p></body>";
        let out = delete_paragraph_ranges(xml, &[(1, 2)]);
        assert!(out.contains(">a<"));
        assert!(!out.contains(">b<"));
        assert!(out.contains(">c<"));
    }

    #[test]
    fn with_attr_replaces_an_existing_value() {
        let events = parse_events(r#"<w:fldChar w:fldCharType="begin"/>"#);
        let Event::Empty(e) = &events[0] else { panic!("expected Empty") };
        let rewritten = with_attr(e, b"fldCharType", "separate");
        assert!(events_to_string(&[Event::Empty(rewritten)]).contains(r#"fldCharType="separate""#));
    }

    #[test]
    fn deletes_the_row_enclosing_a_paragraph() {
        let xml = "<w:tbl>\
            <w:tr><w:tc><w:p><w:t>r1c1</w:t></w:p></w:tc><w:tc><w:p><w:t>r1c2</w:t></w:p></w:tc></w:tr>\
            <w:tr><w:tc><w:p><w:t>r2c1</w:t></w:p></w:tc><w:tc><w:p><w:t>r2c2</w:t></w:p></w:tc></w:tr>\
            </w:tbl>";
        // Paragraph index 2 is "r2c1", inside the second row.
        let out = delete_table_row_for_paragraph(xml, 2).unwrap();
        assert!(out.contains("r1c1"));
        assert!(out.contains("r1c2"));
        assert!(!out.contains("r2c1"));
        assert!(!out.contains("r2c2"));
    }

    #[test]
    fn returns_none_when_the_paragraph_is_not_in_a_table() {
        let xml = "<w:body><w:p><w:t>solo</w:t></w:p></w:body>";
        assert!(delete_table_row_for_paragraph(xml, 0).is_none());
    }

    #[test]
    fn with_attr_appends_a_missing_value() {
        let events = parse_events(r#"<w:fldChar w:fldCharType="begin"/>"#);
        let Event::Empty(e) = &events[0] else { panic!("expected Empty") };
        let rewritten = with_attr(e, b"dirty", "true");
        assert!(events_to_string(&[Event::Empty(rewritten)]).contains(r#"w:dirty="true""#));
    }
}
