//! `delete_section_by_heading`: resolve the whitelisted selector against
//! the already-extracted heading list, then delete the paragraph range
//! from the matched heading up to (but not including) the next heading at
//! the same or a shallower level.
use super::xmlpatch;
use crate::automation::{HeadingRef, WordAutomation};
use crate::error::Result;
use crate::monitoring::Warning;
use crate::schema::plan::MatchMode;

const DOCUMENT_PART: &str = "/word/document.xml";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

pub fn apply(
    automation: &mut dyn WordAutomation,
    heading_text: &str,
    level: u8,
    match_mode: MatchMode,
    case_sensitive: bool,
    occurrence_index: Option<usize>,
    warnings: &mut Vec<Warning>,
) -> Result<bool> {
    let headings = automation.headings()?;
    let total_paragraphs = automation.paragraphs()?.len();

    let matches: Vec<&HeadingRef> = headings
        .iter()
        .filter(|h| h.level == level && text_matches(&h.text, heading_text, match_mode, case_sensitive))
        .collect();

    let selected = select_occurrence(matches, occurrence_index);

    if selected.is_empty() {
        warnings.push(Warning::new(
            "NOOP",
            format!(
                "delete_section_by_heading: no heading matched {:?} at level {}",
                heading_text, level
            ),
        ));
        return Ok(false);
    }

    // A heading inside a table cell has its row removed instead of joining
    // the paragraph-range deletion below it, which would otherwise split
    // the table mid-row.
    let mut deletions: Vec<Deletion> = selected
        .iter()
        .map(|heading| {
            let start = heading.paragraph_index;
            if heading.in_table {
                Deletion::Row(start)
            } else {
                let end = headings
                    .iter()
                    .filter(|h| h.paragraph_index > start && h.level <= level)
                    .map(|h| h.paragraph_index)
                    .min()
                    .unwrap_or(total_paragraphs);
                Deletion::Range(start, end)
            }
        })
        .collect();

    // Apply from the last heading to the first: removing content strictly
    // after a not-yet-processed start never shifts that start's index.
    deletions.sort_by_key(|d| std::cmp::Reverse(d.start()));

    let Some(xml) = automation.part_xml(DOCUMENT_PART)? else {
        warnings.push(Warning::new(
            "NOOP",
            "delete_section_by_heading: package has no main document part",
        ));
        return Ok(false);
    };

    let mut current = xml;
    for deletion in &deletions {
        current = match deletion {
            Deletion::Row(start) => match xmlpatch::delete_table_row_for_paragraph(&current, *start) {
                Some(rewritten) => rewritten,
                None => {
                    warnings.push(Warning::new(
                        "NOOP",
                        format!(
                            "delete_section_by_heading: heading at paragraph {} is marked in_table but no enclosing row was found",
                            start
                        ),
                    ));
                    current
                },
            },
            Deletion::Range(start, end) => xmlpatch::delete_paragraph_ranges(&current, &[(*start, *end)]),
        };
    }

    automation.set_part_xml(DOCUMENT_PART, DOCUMENT_CONTENT_TYPE, current)?;
    Ok(true)
}

enum Deletion {
    Row(usize),
    Range(usize, usize),
}

impl Deletion {
    fn start(&self) -> usize {
        match self {
            Deletion::Row(start) | Deletion::Range(start, _) => *start,
        }
    }
}

fn select_occurrence(matches: Vec<&HeadingRef>, occurrence_index: Option<usize>) -> Vec<&HeadingRef> {
    match occurrence_index {
        // 1-based: the N-th matching heading, not the (N+1)-th.
        Some(n) => n.checked_sub(1).and_then(|i| matches.get(i).copied()).into_iter().collect(),
        None => matches,
    }
}

fn text_matches(haystack: &str, needle: &str, mode: MatchMode, case_sensitive: bool) -> bool {
    match mode {
        MatchMode::Regex => regex::Regex::new(needle)
            .map(|re| re.is_match(haystack))
            .unwrap_or(false),
        MatchMode::Exact | MatchMode::Contains => {
            let (h, n) = if case_sensitive {
                (haystack.to_string(), needle.to_string())
            } else {
                (haystack.to_lowercase(), needle.to_lowercase())
            };
            match mode {
                MatchMode::Exact => h == n,
                MatchMode::Contains => h.contains(&n),
                MatchMode::Regex => unreachable!(),
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_case_insensitive_by_default() {
        assert!(text_matches("Introduction", "introduction", MatchMode::Exact, false));
    }

    #[test]
    fn case_sensitive_exact_match_rejects_case_mismatch() {
        assert!(!text_matches("Introduction", "introduction", MatchMode::Exact, true));
    }

    #[test]
    fn contains_match_finds_a_substring() {
        assert!(text_matches("Appendix A: Notes", "Appendix", MatchMode::Contains, true));
    }

    #[test]
    fn regex_match_compiles_and_applies_the_pattern() {
        assert!(text_matches("Chapter 12", r"^Chapter \d+$", MatchMode::Regex, true));
    }

    fn dummy_heading(paragraph_index: usize) -> HeadingRef {
        HeadingRef {
            paragraph_index,
            text: "Appendix".to_string(),
            level: 1,
            in_table: false,
            table_index: None,
        }
    }

    #[test]
    fn occurrence_index_is_1_based_and_selects_the_2nd_match() {
        let first = dummy_heading(3);
        let second = dummy_heading(9);
        let matches = vec![&first, &second];
        let selected = select_occurrence(matches, Some(2));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].paragraph_index, 9);
    }

    #[test]
    fn occurrence_index_zero_selects_nothing() {
        let first = dummy_heading(3);
        let matches = vec![&first];
        assert!(select_occurrence(matches, Some(0)).is_empty());
    }

    #[test]
    fn occurrence_index_out_of_range_selects_nothing() {
        let first = dummy_heading(3);
        let matches = vec![&first];
        assert!(select_occurrence(matches, Some(2)).is_empty());
    }

    #[test]
    fn no_occurrence_index_selects_every_match() {
        let first = dummy_heading(3);
        let second = dummy_heading(9);
        let matches = vec![&first, &second];
        assert_eq!(select_occurrence(matches, None).len(), 2);
    }
}
