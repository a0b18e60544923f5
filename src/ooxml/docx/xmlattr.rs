/// Small streaming-XML attribute readers shared by `paragraph` and `styles`.
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Read a boolean toggle property (`<w:b/>`, `<w:b w:val="0"/>`, etc.) anywhere in `xml`.
pub(crate) fn read_toggle_property(xml: &[u8], tag: &[u8]) -> Result<Option<bool>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == tag {
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"val" {
                            let v = attr.unescape_value().unwrap_or_default();
                            return Ok(Some(!(v == "0" || v == "false")));
                        }
                    }
                    return Ok(Some(true));
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(None)
}

/// Read a named attribute off the first occurrence of `tag` anywhere in `xml`.
pub(crate) fn read_attr(xml: &[u8], tag: &[u8], attr_name: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == tag {
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == attr_name {
                            let v = attr.unescape_value().unwrap_or_default();
                            return Ok(Some(v.into_owned()));
                        }
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(None)
}

/// Extract the raw bytes of the first `<tag>...</tag>` or `<tag/>` element found in `xml`.
pub(crate) fn extract_element(xml: &[u8], tag: &[u8]) -> Result<Option<Vec<u8>>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut capture: Option<Vec<u8>> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == tag && capture.is_none() {
                    let mut bytes = Vec::new();
                    bytes.extend_from_slice(b"<");
                    bytes.extend_from_slice(e.name().as_ref());
                    for attr in e.attributes().flatten() {
                        bytes.push(b' ');
                        bytes.extend_from_slice(attr.key.as_ref());
                        bytes.extend_from_slice(b"=\"");
                        bytes.extend_from_slice(&attr.value);
                        bytes.push(b'"');
                    }
                    bytes.push(b'>');
                    capture = Some(bytes);
                    depth = 1;
                } else if let Some(ref mut bytes) = capture {
                    depth += 1;
                    bytes.push(b'<');
                    bytes.extend_from_slice(e.name().as_ref());
                    for attr in e.attributes().flatten() {
                        bytes.push(b' ');
                        bytes.extend_from_slice(attr.key.as_ref());
                        bytes.extend_from_slice(b"=\"");
                        bytes.extend_from_slice(&attr.value);
                        bytes.push(b'"');
                    }
                    bytes.push(b'>');
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == tag && capture.is_none() {
                    let mut bytes = Vec::new();
                    bytes.extend_from_slice(b"<");
                    bytes.extend_from_slice(e.name().as_ref());
                    for attr in e.attributes().flatten() {
                        bytes.push(b' ');
                        bytes.extend_from_slice(attr.key.as_ref());
                        bytes.extend_from_slice(b"=\"");
                        bytes.extend_from_slice(&attr.value);
                        bytes.push(b'"');
                    }
                    bytes.extend_from_slice(b"/>");
                    return Ok(Some(bytes));
                } else if let Some(ref mut bytes) = capture {
                    bytes.push(b'<');
                    bytes.extend_from_slice(e.name().as_ref());
                    for attr in e.attributes().flatten() {
                        bytes.push(b' ');
                        bytes.extend_from_slice(attr.key.as_ref());
                        bytes.extend_from_slice(b"=\"");
                        bytes.extend_from_slice(&attr.value);
                        bytes.push(b'"');
                    }
                    bytes.extend_from_slice(b"/>");
                }
            },
            Ok(Event::End(e)) => {
                if let Some(ref mut bytes) = capture {
                    bytes.extend_from_slice(b"</");
                    bytes.extend_from_slice(e.name().as_ref());
                    bytes.push(b'>');
                    depth -= 1;
                    if depth == 0 && e.local_name().as_ref() == tag {
                        return Ok(capture.take());
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(None)
}
