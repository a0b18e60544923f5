//! `inventory.full.v1` — the loss-closure partner of `structure.v1`.
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SCHEMA_VERSION: &str = "inventory.full.v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaDescriptor {
    pub media_id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub embedded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpaqueReference {
    pub id: String,
    pub part_key: String,
    pub ooxml: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryFull {
    pub schema_version: String,
    #[serde(default)]
    pub ooxml_fragments: HashMap<String, String>,
    #[serde(default)]
    pub media_indexes: HashMap<String, MediaDescriptor>,
    #[serde(default)]
    pub content_controls: Vec<OpaqueReference>,
    #[serde(default)]
    pub formulas: Vec<OpaqueReference>,
    #[serde(default)]
    pub charts: Vec<OpaqueReference>,
}

impl InventoryFull {
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            ooxml_fragments: HashMap::new(),
            media_indexes: HashMap::new(),
            content_controls: vec![],
            formulas: vec![],
            charts: vec![],
        }
    }

    pub fn validate(&self) -> std::result::Result<(), PipelineError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(PipelineError::Extraction(format!(
                "unsupported inventory schema_version: {}, expected {}",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inventory_validates() {
        assert!(InventoryFull::empty().validate().is_ok());
    }
}
