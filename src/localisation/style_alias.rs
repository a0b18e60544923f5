use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional mapping between canonical style names and their localised
/// equivalents, e.g. `Heading 1 <-> 标题 1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleAliasTable {
    /// canonical name -> localised aliases
    canonical_to_aliases: HashMap<String, Vec<String>>,
}

impl StyleAliasTable {
    pub fn new(canonical_to_aliases: HashMap<String, Vec<String>>) -> Self {
        Self { canonical_to_aliases }
    }

    /// The built-in Word/WPS Chinese-English pairs shipped as defaults.
    pub fn with_builtin_defaults() -> Self {
        let mut map = HashMap::new();
        map.insert("Heading 1".to_string(), vec!["标题 1".to_string()]);
        map.insert("Heading 2".to_string(), vec!["标题 2".to_string()]);
        map.insert("Heading 3".to_string(), vec!["标题 3".to_string()]);
        map.insert("Normal".to_string(), vec!["正文".to_string()]);
        map.insert("Title".to_string(), vec!["标题".to_string()]);
        map.insert("TOC Heading".to_string(), vec!["目录标题".to_string()]);
        Self::new(map)
    }

    /// All known aliases for `name`, trying it first as a canonical name,
    /// then as an alias of some canonical name (the reverse direction).
    pub fn aliases_for(&self, name: &str) -> Vec<&str> {
        if let Some(aliases) = self.canonical_to_aliases.get(name) {
            return aliases.iter().map(String::as_str).collect();
        }
        for (canonical, aliases) in &self.canonical_to_aliases {
            if aliases.iter().any(|a| a == name) {
                let mut out = vec![canonical.as_str()];
                out.extend(aliases.iter().map(String::as_str).filter(|a| *a != name));
                return out;
            }
        }
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_to_alias() {
        let table = StyleAliasTable::with_builtin_defaults();
        assert_eq!(table.aliases_for("Heading 1"), vec!["标题 1"]);
    }

    #[test]
    fn resolves_alias_back_to_canonical() {
        let table = StyleAliasTable::with_builtin_defaults();
        assert_eq!(table.aliases_for("正文"), vec!["Normal"]);
    }

    #[test]
    fn unknown_name_has_no_aliases() {
        let table = StyleAliasTable::with_builtin_defaults();
        assert!(table.aliases_for("Quote").is_empty());
    }
}
