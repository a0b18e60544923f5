//! Layered configuration: defaults, overridden by a JSON or YAML file,
//! overridden by CLI flags. Modeled as one flat `PipelineConfig` struct that
//! round-trips through `serde_saphyr` (the default on-disk YAML format named
//! in the spec) and `serde_json` (for `config show --json`).
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringLevel {
    Basic,
    Detailed,
    Debug,
    Performance,
}

impl Default for MonitoringLevel {
    fn default() -> Self {
        Self::Basic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionStrategy {
    Accept,
    Reject,
    Bypass,
}

impl Default for RevisionStrategy {
    fn default() -> Self {
        Self::Bypass
    }
}

/// Which assertion families the Validator runs. All on by default; a rules
/// file may narrow the set for documents with known-benign deviations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationRules {
    #[serde(default = "default_true")]
    pub chapter_assertion: bool,
    #[serde(default = "default_true")]
    pub style_assertion: bool,
    #[serde(default = "default_true")]
    pub toc_assertion: bool,
    #[serde(default = "default_true")]
    pub pagination_assertion: bool,
    #[serde(default = "default_true")]
    pub integrity_assertion: bool,
    /// Level-1 headings that must not survive a successful run, e.g. 摘要.
    #[serde(default)]
    pub forbidden_level1_headings: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            chapter_assertion: true,
            style_assertion: true,
            toc_assertion: true,
            pagination_assertion: true,
            integrity_assertion: true,
            forbidden_level1_headings: vec![],
        }
    }
}

/// `options` from the library entry point, the one configuration object the
/// Orchestrator threads through every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,
    #[serde(default = "default_execution_time_limit_s")]
    pub execution_time_limit_s: u64,
    #[serde(default = "default_memory_warning_mb")]
    pub memory_warning_mb: u64,
    #[serde(default = "default_memory_critical_mb")]
    pub memory_critical_mb: u64,
    #[serde(default)]
    pub monitoring_level: MonitoringLevel,
    #[serde(default)]
    pub validation_rules: ValidationRules,
    #[serde(default)]
    pub revision_strategy: RevisionStrategy,
    #[serde(default)]
    pub comments_enabled: bool,
    #[serde(default)]
    pub comments_execute_tag_only: bool,
    #[serde(default)]
    pub comments_llm_fallback: bool,
}

fn default_model_id() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f64 {
    0.1
}
fn default_audit_dir() -> String {
    "./audit".to_string()
}
fn default_execution_time_limit_s() -> u64 {
    120
}
fn default_memory_warning_mb() -> u64 {
    512
}
fn default_memory_critical_mb() -> u64 {
    1024
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            temperature: default_temperature(),
            audit_dir: default_audit_dir(),
            execution_time_limit_s: default_execution_time_limit_s(),
            memory_warning_mb: default_memory_warning_mb(),
            memory_critical_mb: default_memory_critical_mb(),
            monitoring_level: MonitoringLevel::default(),
            validation_rules: ValidationRules::default(),
            revision_strategy: RevisionStrategy::default(),
            comments_enabled: false,
            comments_execute_tag_only: true,
            comments_llm_fallback: false,
        }
    }
}

impl PipelineConfig {
    /// Load from a file, dispatching on extension: `.json` for `serde_json`,
    /// anything else for `serde_saphyr`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("reading {}: {}", path.display(), e)))?;
        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&text)
                .map_err(|e| PipelineError::Config(format!("parsing {}: {}", path.display(), e)))
        } else {
            serde_saphyr::from_str(&text)
                .map_err(|e| PipelineError::Config(format!("parsing {}: {}", path.display(), e)))
        }
    }

    pub fn to_yaml(&self) -> Result<String, PipelineError> {
        serde_saphyr::to_string(self)
            .map_err(|e| PipelineError::Config(format!("serializing config to YAML: {}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("serializing config to JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_self_consistent() {
        let config = PipelineConfig::default();
        assert_eq!(config.model_id, "gpt-4o-mini");
        assert!((0.0..=1.0).contains(&config.temperature));
    }

    #[test]
    fn round_trips_through_yaml() {
        let config = PipelineConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed: PipelineConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed.model_id, config.model_id);
        assert_eq!(parsed.audit_dir, config.audit_dir);
    }

    #[test]
    fn rejects_unknown_fields() {
        let yaml = "model_id: gpt-4o-mini\nunknown_field: true\n";
        let result: Result<PipelineConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
