//! Style-name aliasing and font-fallback discipline, the two tables the
//! Executor consults before mutating a style or resolving a requested font.
//!
//! Both tables are plain data, loaded from JSON or YAML via `serde`; the
//! pipeline's own configuration is the grounding for this (the teacher ships
//! no config format of its own).
mod font_fallback;
mod style_alias;

pub use font_fallback::FontFallbackTable;
pub use style_alias::StyleAliasTable;

use crate::automation::WordAutomation;

/// A warning raised while resolving a style or font name. Pushed onto the
/// run's warnings sink; never turns a run into a failure by itself.
#[derive(Debug, Clone)]
pub struct LocalisationWarning {
    pub message: String,
}

impl LocalisationWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Bundles both tables for the duration of a run; immutable once built.
#[derive(Debug, Clone, Default)]
pub struct LocalisationTables {
    pub style_aliases: StyleAliasTable,
    pub font_fallbacks: FontFallbackTable,
}

impl LocalisationTables {
    pub fn new(style_aliases: StyleAliasTable, font_fallbacks: FontFallbackTable) -> Self {
        Self {
            style_aliases,
            font_fallbacks,
        }
    }

    /// Both tables seeded with their built-in Chinese/English style-name
    /// pairs and CJK font-fallback chains, for callers that have no
    /// document-specific localisation configuration of their own.
    pub fn with_builtin_defaults() -> Self {
        Self::new(StyleAliasTable::with_builtin_defaults(), FontFallbackTable::with_builtin_defaults())
    }

    /// Resolve `requested_name` to an actual style defined in the document:
    /// try the name as given, then its aliases, then a case-insensitive scan
    /// of the document's own style names. Unknown names fall through to
    /// identity per the lookup-order contract.
    pub fn resolve_style_name(
        &self,
        automation: &dyn WordAutomation,
        requested_name: &str,
    ) -> crate::error::Result<Option<String>> {
        if automation.style_by_name(requested_name)?.is_some() {
            return Ok(Some(requested_name.to_string()));
        }
        for candidate in self.style_aliases.aliases_for(requested_name) {
            if automation.style_by_name(candidate)?.is_some() {
                return Ok(Some(candidate.to_string()));
            }
        }
        let lowered = requested_name.to_ascii_lowercase();
        for style in automation.styles()? {
            if let Some(name) = style.name()
                && name.to_ascii_lowercase() == lowered
            {
                return Ok(Some(name.to_string()));
            }
        }
        Ok(None)
    }

    /// Resolve a requested font against the host's available fonts, walking
    /// the fallback chain. `host_fonts` is the set of font family names the
    /// automation layer reports as installed; a production run asks
    /// `WordAutomation` for this, tests pass a fixed set.
    pub fn resolve_font(
        &self,
        requested_font: &str,
        host_fonts: &[String],
        warnings: &mut Vec<LocalisationWarning>,
    ) -> String {
        if host_fonts.iter().any(|f| f.eq_ignore_ascii_case(requested_font)) {
            return requested_font.to_string();
        }
        for candidate in self.font_fallbacks.chain_for(requested_font) {
            if host_fonts.iter().any(|f| f.eq_ignore_ascii_case(candidate)) {
                warnings.push(LocalisationWarning::new(format!(
                    "font {:?} unavailable, falling back to {:?}",
                    requested_font, candidate
                )));
                return candidate.to_string();
            }
        }
        warnings.push(LocalisationWarning::new(format!(
            "font {:?} and its fallback chain are all unavailable, using host default",
            requested_font
        )));
        requested_font.to_string()
    }
}
