use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered fallback lists per requested font family, e.g.
/// `楷体 -> [楷体_GB2312, STKaiti]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontFallbackTable {
    chains: HashMap<String, Vec<String>>,
}

impl FontFallbackTable {
    pub fn new(chains: HashMap<String, Vec<String>>) -> Self {
        Self { chains }
    }

    pub fn with_builtin_defaults() -> Self {
        let mut chains = HashMap::new();
        chains.insert(
            "楷体".to_string(),
            vec!["楷体_GB2312".to_string(), "STKaiti".to_string()],
        );
        chains.insert(
            "仿宋".to_string(),
            vec!["仿宋_GB2312".to_string(), "STFangsong".to_string()],
        );
        chains.insert(
            "宋体".to_string(),
            vec!["SimSun".to_string(), "STSong".to_string()],
        );
        chains.insert(
            "黑体".to_string(),
            vec!["SimHei".to_string(), "STHeiti".to_string()],
        );
        Self::new(chains)
    }

    /// The fallback chain for `font`, empty if none is configured.
    pub fn chain_for(&self, font: &str) -> &[String] {
        self.chains.get(font).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_exhausts_in_order() {
        let table = FontFallbackTable::with_builtin_defaults();
        let chain = table.chain_for("楷体");
        assert_eq!(chain, ["楷体_GB2312", "STKaiti"]);
    }

    #[test]
    fn unknown_font_has_empty_chain() {
        let table = FontFallbackTable::with_builtin_defaults();
        assert!(table.chain_for("Comic Sans MS").is_empty());
    }
}
