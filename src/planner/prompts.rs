//! Prompt assembly: one named builder per piece of the prompt, mirroring a
//! separate-builder-functions style rather than one big format string, so
//! each piece can be tested and versioned independently.
use crate::schema::structure::Structure;

/// Bump this whenever the wording changes meaningfully enough that cached
/// model evaluations should be considered stale.
pub const PROMPT_VERSION: &str = "pipeline-prompt.v1";

pub fn system_prompt() -> String {
    format!(
        "You are a document-editing planner. Output JSON only, matching the \
         plan.v1 schema below. Do not include explanations, markdown fences, \
         or any text outside the JSON object.\n\n\
         plan.v1 schema:\n\
         {{\"schema_version\": \"plan.v1\", \"ops\": [ <operation>, ... ]}}\n\n\
         Each <operation> MUST be one of exactly these six kinds, with exactly \
         these fields (no extra fields, no other \"operation\" values):\n\
         1. delete_section_by_heading: heading_text (string), level (1-9), \
            match (\"EXACT\"|\"CONTAINS\"|\"REGEX\"), case_sensitive (bool), \
            occurrence_index (integer or null)\n\
         2. update_toc: {{}} (no parameters)\n\
         3. delete_toc: mode (\"ALL\"|\"FIRST\"|\"LAST\")\n\
         4. set_style_rule: target_style (string), and any subset of \
            font_east_asian, font_latin, font_size_pt (6-72), font_bold, \
            font_italic, font_color_hex (#RRGGBB), line_spacing_mode \
            (\"SINGLE\"|\"MULTIPLE\"|\"EXACTLY\"), line_spacing_value (0.5-10.0), \
            space_before_pt, space_after_pt, alignment \
            (\"LEFT\"|\"CENTER\"|\"RIGHT\"|\"JUSTIFY\")\n\
         5. reassign_paragraphs_to_style: selector (object with optional \
            current_style, text_contains, heading_level, position), \
            target_style (string), clear_direct_formatting (bool, default false)\n\
         6. clear_direct_formatting: scope (\"DOCUMENT\"|\"SELECTION\"|\"STYLE\"), \
            range_spec (string or null), authorization (must be the literal \
            string \"EXPLICIT_USER_REQUEST\")\n\n\
         Prompt version: {}",
        PROMPT_VERSION
    )
}

/// `structure.v1` goes into the prompt as context; `inventory.full.v1` never
/// does, per the no-OOXML-to-the-model rule.
pub fn user_prompt(structure: &Structure, user_intent: &str) -> String {
    let structure_json =
        serde_json::to_string(structure).unwrap_or_else(|_| "{}".to_string());
    format!(
        "Document structure (structure.v1):\n{}\n\nUser intent:\n{}\n\n\
         Respond with a single plan.v1 JSON object and nothing else.",
        structure_json, user_intent
    )
}

pub fn json_only_reminder(attempt: usize) -> String {
    format!(
        "Your previous reply (attempt {}) was not valid JSON or did not match \
         plan.v1. Reply again with ONLY a JSON object matching plan.v1 — no \
         markdown fences, no commentary.",
        attempt
    )
}
