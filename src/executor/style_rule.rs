//! `set_style_rule`: locate a named style's definition in `styles.xml` and
//! upsert its `w:rPr`/`w:pPr` child elements. Containers and children are
//! created if missing, updated in place otherwise — the style block itself
//! is never regenerated from scratch, only the touched properties move.
use super::xmlpatch::{self, attr_value, ensure_child_container, upsert_self_closing};
use crate::automation::WordAutomation;
use crate::error::Result;
use crate::localisation::LocalisationTables;
use crate::monitoring::Warning;
use crate::schema::plan::AtomicOp;
use crate::schema::structure::{Alignment, LineSpacingMode};
use quick_xml::events::Event;

const STYLES_PART: &str = "/word/styles.xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

pub fn apply(
    automation: &mut dyn WordAutomation,
    op: &AtomicOp,
    localisation: &LocalisationTables,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    let AtomicOp::SetStyleRule {
        target_style,
        font_east_asian,
        font_latin,
        font_size_pt,
        font_bold,
        font_italic,
        font_color_hex,
        line_spacing_mode,
        line_spacing_value,
        space_before_pt,
        space_after_pt,
        alignment,
    } = op
    else {
        unreachable!("style_rule::apply called with a non-SetStyleRule op")
    };

    let Some(style_id) = resolve_style_id(automation, target_style, localisation)? else {
        warnings.push(Warning::new(
            "NOOP",
            format!("set_style_rule: no style resolves to {:?}", target_style),
        ));
        return Ok(false);
    };

    let Some(xml) = automation.part_xml(STYLES_PART)? else {
        warnings.push(Warning::new("NOOP", "set_style_rule: package has no styles part"));
        return Ok(false);
    };

    let mut events = xmlpatch::parse_events(&xml);
    let Some(mut style_span) = find_style_span(&events, &style_id) else {
        warnings.push(Warning::new(
            "NOOP",
            format!("set_style_rule: style id {:?} not found in styles.xml", style_id),
        ));
        return Ok(false);
    };

    let touches_rpr = font_east_asian.is_some()
        || font_latin.is_some()
        || font_size_pt.is_some()
        || font_bold.is_some()
        || font_italic.is_some()
        || font_color_hex.is_some();
    let touches_ppr = line_spacing_mode.is_some()
        || line_spacing_value.is_some()
        || space_before_pt.is_some()
        || space_after_pt.is_some()
        || alignment.is_some();

    if touches_ppr {
        let ppr_span = ensure_child_container(&mut events, &mut style_span, "pPr");
        apply_ppr(
            &mut events,
            ppr_span,
            *line_spacing_mode,
            *line_spacing_value,
            *space_before_pt,
            *space_after_pt,
            *alignment,
        );
    }
    if touches_rpr {
        let rpr_span = ensure_child_container(&mut events, &mut style_span, "rPr");
        apply_rpr(
            &mut events,
            rpr_span,
            font_east_asian.as_deref(),
            font_latin.as_deref(),
            *font_size_pt,
            *font_bold,
            *font_italic,
            font_color_hex.as_deref(),
        );
    }

    let rewritten = xmlpatch::events_to_string(&events);
    automation.set_part_xml(STYLES_PART, STYLES_CONTENT_TYPE, rewritten)?;
    Ok(true)
}

fn resolve_style_id(
    automation: &dyn WordAutomation,
    target_style: &str,
    localisation: &LocalisationTables,
) -> Result<Option<String>> {
    let Some(resolved_name) = localisation.resolve_style_name(automation, target_style)? else {
        return Ok(None);
    };
    Ok(automation
        .style_by_name(&resolved_name)?
        .map(|s| s.style_id().to_string()))
}

/// Find the `[start, end]` inclusive event-index span of `<w:style
/// w:styleId="...">...</w:style>` for the given id. Matching is by tag
/// name and attribute alone, not by absolute nesting depth, so this works
/// whether or not the caller included the enclosing `<w:styles>` root.
fn find_style_span(events: &[Event<'static>], style_id: &str) -> Option<(usize, usize)> {
    for (index, event) in events.iter().enumerate() {
        let Event::Start(e) = event else { continue };
        if xmlpatch::tag_name(event).as_deref() != Some("style") {
            continue;
        }
        if attr_value(e, b"styleId").as_deref() != Some(style_id) {
            continue;
        }
        let mut depth = 1i32;
        let mut j = index + 1;
        while j < events.len() {
            match &events[j] {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((index, j));
                    }
                },
                _ => {},
            }
            j += 1;
        }
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn apply_rpr(
    events: &mut Vec<Event<'static>>,
    rpr: (usize, usize),
    east_asian: Option<&str>,
    latin: Option<&str>,
    size_pt: Option<f64>,
    bold: Option<bool>,
    italic: Option<bool>,
    color_hex: Option<&str>,
) {
    if east_asian.is_some() || latin.is_some() {
        let mut attrs = Vec::new();
        if let Some(v) = latin {
            attrs.push(("w:ascii", v.to_string()));
        }
        if let Some(v) = east_asian {
            attrs.push(("w:eastAsia", v.to_string()));
        }
        upsert_self_closing(events, rpr, "w:rPr", "rFonts", &attrs);
    }
    if let Some(pt) = size_pt {
        let half_points = (pt * 2.0).round() as i64;
        upsert_self_closing(events, rpr, "w:rPr", "sz", &[("w:val", half_points.to_string())]);
    }
    if let Some(b) = bold {
        upsert_self_closing(events, rpr, "w:rPr", "b", &[("w:val", bool_val(b))]);
    }
    if let Some(i) = italic {
        upsert_self_closing(events, rpr, "w:rPr", "i", &[("w:val", bool_val(i))]);
    }
    if let Some(hex) = color_hex {
        upsert_self_closing(events, rpr, "w:rPr", "color", &[("w:val", hex.trim_start_matches('#').to_string())]);
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_ppr(
    events: &mut Vec<Event<'static>>,
    ppr: (usize, usize),
    line_spacing_mode: Option<LineSpacingMode>,
    line_spacing_value: Option<f64>,
    space_before_pt: Option<f64>,
    space_after_pt: Option<f64>,
    alignment: Option<Alignment>,
) {
    if line_spacing_mode.is_some() || line_spacing_value.is_some() || space_before_pt.is_some() || space_after_pt.is_some() {
        let mut attrs = Vec::new();
        if let (Some(mode), Some(value)) = (line_spacing_mode, line_spacing_value) {
            let (rule, twips) = match mode {
                LineSpacingMode::Single => ("auto", 240),
                LineSpacingMode::Multiple => ("auto", (value * 240.0).round() as i64),
                LineSpacingMode::Exactly => ("atLeast", (value * 20.0).round() as i64),
            };
            attrs.push(("w:lineRule", rule.to_string()));
            attrs.push(("w:line", twips.to_string()));
        }
        if let Some(pt) = space_before_pt {
            attrs.push(("w:before", (pt * 20.0).round().to_string()));
        }
        if let Some(pt) = space_after_pt {
            attrs.push(("w:after", (pt * 20.0).round().to_string()));
        }
        upsert_self_closing(events, ppr, "w:pPr", "spacing", &attrs);
    }
    if let Some(a) = alignment {
        let val = match a {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        };
        upsert_self_closing(events, ppr, "w:pPr", "jc", &[("w:val", val.to_string())]);
    }
}

fn bool_val(v: bool) -> String {
    if v { "1".to_string() } else { "0".to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_and_replaces_an_existing_sz_element() {
        let xml = r#"<w:style w:styleId="Heading1"><w:rPr><w:sz w:val="24"/></w:rPr></w:style>"#;
        let mut events = xmlpatch::parse_events(xml);
        let style_span = find_style_span(&events, "Heading1").unwrap();
        let rpr = xmlpatch::find_child_span(&events, style_span, "rPr").unwrap();
        apply_rpr(&mut events, rpr, None, None, Some(14.0), None, None, None);
        let out = xmlpatch::events_to_string(&events);
        assert!(out.contains(r#"w:val="28""#));
    }

    #[test]
    fn creates_a_missing_rpr_container() {
        let xml = r#"<w:style w:styleId="Normal"></w:style>"#;
        let mut events = xmlpatch::parse_events(xml);
        let mut style_span = find_style_span(&events, "Normal").unwrap();
        let rpr = ensure_child_container(&mut events, &mut style_span, "rPr");
        apply_rpr(&mut events, rpr, None, None, None, Some(true), None, None);
        let out = xmlpatch::events_to_string(&events);
        assert!(out.contains("<w:rPr>"));
        assert!(out.contains("<w:b"));
    }
}
