//! Revision-strategy pre-processing: fold or strip `<w:ins>`/`<w:del>`
//! tracked-change markup in `word/document.xml` before the skeleton walk.
//!
//! This rewrites the XML text directly rather than going through an object
//! model, the same surgical-edit posture the Executor uses, because the
//! only thing that changes is which side of each revision survives.
use crate::config::RevisionStrategy;
use crate::monitoring::Warning;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, BytesEnd, Event};
use std::io::Cursor;

/// Apply `strategy` to `xml`, returning the rewritten document and, for
/// `bypass`, a warning noting that tracked changes were left in place.
pub fn apply_strategy(xml: &str, strategy: RevisionStrategy) -> (String, Option<Warning>) {
    match strategy {
        RevisionStrategy::Bypass => (
            xml.to_string(),
            Some(Warning::new(
                "REVISION_BYPASS",
                "tracked changes left as-is; extraction sees insertion and deletion markup",
            )),
        ),
        RevisionStrategy::Accept => (fold(xml, true), None),
        RevisionStrategy::Reject => (fold(xml, false), None),
    }
}

/// One nested `w:ins`/`w:del` wrapper we are currently inside of.
enum Wrapper {
    /// Unwrap: drop the wrapper tag, keep its content as-is.
    Unwrap,
    /// Unwrap and rewrite child `w:delText`/`w:delInstrText` to `w:t`/`w:instrText`,
    /// restoring deleted text to live document text (the `reject` case).
    UnwrapRestoringDeletedText,
    /// Drop the wrapper tag and everything inside it.
    DropContent,
}

/// `keep_insertions = true` implements `accept` (keep `w:ins` content,
/// drop `w:del`); `false` implements `reject` (the reverse, restoring
/// deleted text). Either way the wrapper element itself never survives —
/// a folded document no longer needs markup to say who changed what.
fn fold(xml: &str, keep_insertions: bool) -> String {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut stack: Vec<Wrapper> = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(event) => {
                let tag = tag_name(&event);
                let dropping = stack
                    .iter()
                    .any(|w| matches!(w, Wrapper::DropContent));

                match (&event, tag.as_deref()) {
                    (Event::Start(_), Some("ins")) => {
                        stack.push(if keep_insertions {
                            Wrapper::Unwrap
                        } else {
                            Wrapper::DropContent
                        });
                    },
                    (Event::Start(_), Some("del")) => {
                        stack.push(if keep_insertions {
                            Wrapper::DropContent
                        } else {
                            Wrapper::UnwrapRestoringDeletedText
                        });
                    },
                    (Event::End(_), Some("ins")) | (Event::End(_), Some("del")) => {
                        stack.pop();
                    },
                    (Event::Empty(_), Some("ins")) | (Event::Empty(_), Some("del")) => {
                        // Self-closing wrapper: no content to carry either way.
                    },
                    _ if dropping => {
                        // inside a DropContent wrapper: emit nothing
                    },
                    _ => {
                        let restoring = matches!(
                            stack.last(),
                            Some(Wrapper::UnwrapRestoringDeletedText)
                        );
                        let rewritten = if restoring { rename_del_text(event) } else { event };
                        let _ = writer.write_event(rewritten);
                    },
                }
            },
            Err(_) => break,
        }
    }

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).unwrap_or_else(|_| xml.to_string())
}

/// `w:delText`/`w:delInstrText` -> `w:t`/`w:instrText`, the renaming a
/// `reject` pass needs so `Paragraph::text()` (which only reads `w:t`)
/// picks the restored text back up.
fn rename_del_text(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(e) if e.local_name().as_ref() == b"delText" => {
            Event::Start(rename(e, b"w:t"))
        },
        Event::End(e) if e.local_name().as_ref() == b"delText" => {
            Event::End(BytesEnd::new("w:t"))
        },
        Event::Start(e) if e.local_name().as_ref() == b"delInstrText" => {
            Event::Start(rename(e, b"w:instrText"))
        },
        Event::End(e) if e.local_name().as_ref() == b"delInstrText" => {
            Event::End(BytesEnd::new("w:instrText"))
        },
        other => other,
    }
}

fn rename(e: BytesStart<'_>, new_name: &[u8]) -> BytesStart<'static> {
    let mut new = BytesStart::new(String::from_utf8_lossy(new_name).into_owned());
    for attr in e.attributes().flatten() {
        new.push_attribute(attr);
    }
    new
}

fn tag_name(event: &Event) -> Option<String> {
    let name = match event {
        Event::Start(e) | Event::Empty(e) => e.name(),
        Event::End(e) => e.name(),
        _ => return None,
    };
    std::str::from_utf8(name.local_name().as_ref())
        .ok()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_keeps_insertions_and_drops_deletions() {
        let xml = r#"<w:p><w:r><w:t>before </w:t></w:r><w:ins w:id="0" w:author="a"><w:r><w:t>new</w:t></w:r></w:ins><w:del w:id="1" w:author="a"><w:r><w:delText>old</w:delText></w:r></w:del></w:p>"#;
        let (out, warning) = apply_strategy(xml, RevisionStrategy::Accept);
        assert!(warning.is_none());
        assert!(out.contains("new"));
        assert!(!out.contains("old"));
        assert!(!out.contains("w:ins"));
        assert!(!out.contains("w:del"));
    }

    #[test]
    fn reject_keeps_deletions_and_drops_insertions() {
        let xml = r#"<w:p><w:ins w:id="0"><w:r><w:t>new</w:t></w:r></w:ins><w:del w:id="1"><w:r><w:delText>old</w:delText></w:r></w:del></w:p>"#;
        let (out, _) = apply_strategy(xml, RevisionStrategy::Reject);
        assert!(!out.contains("new"));
    }

    #[test]
    fn bypass_leaves_markup_and_warns() {
        let xml = r#"<w:p><w:ins w:id="0"><w:r><w:t>new</w:t></w:r></w:ins></w:p>"#;
        let (out, warning) = apply_strategy(xml, RevisionStrategy::Bypass);
        assert_eq!(out, xml);
        assert!(warning.is_some());
    }
}
