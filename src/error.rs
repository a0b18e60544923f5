//! The stage-level error taxonomy the orchestrator reports to callers.
//!
//! Distinct from [`crate::common::Error`], which is the lower-level error
//! surfaced by the OOXML/OPC layer. Stage code converts into this type at
//! its boundary so the rest of the pipeline deals with one error enum.
use thiserror::Error;

/// One of the six failure kinds a pipeline run can end in.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input document could not be projected into structure/inventory.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The language model's reply failed JSON/schema/whitelist/parameter validation.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// An atomic operation faulted mid-flight.
    #[error("execution error: {0}")]
    Execution(String),

    /// Execution completed but post-run assertions failed.
    #[error("failed validation: {0}")]
    FailedValidation(String),

    /// Configuration or rules file was invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The audit directory could not be written.
    #[error("audit error: {0}")]
    Audit(String),
}

impl PipelineError {
    /// The status token this error resolves to in `result.status.txt`.
    pub fn status_token(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "ROLLBACK",
            Self::InvalidPlan(_) => "INVALID_PLAN",
            Self::Execution(_) => "ROLLBACK",
            Self::FailedValidation(_) => "FAILED_VALIDATION",
            Self::Config(_) => "ROLLBACK",
            Self::Audit(_) => "ROLLBACK",
        }
    }

    /// The process exit code this error maps to, per the CLI's exit-code contract.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Extraction(_) | Self::Execution(_) | Self::Config(_) | Self::Audit(_) => 1,
            Self::FailedValidation(_) => 2,
            Self::InvalidPlan(_) => 4,
        }
    }

    /// The taxonomy kind as a fixed token, used in warnings/log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "EXTRACTION_ERROR",
            Self::InvalidPlan(_) => "INVALID_PLAN",
            Self::Execution(_) => "EXECUTION_ERROR",
            Self::FailedValidation(_) => "FAILED_VALIDATION",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Audit(_) => "AUDIT_ERROR",
        }
    }
}

impl From<crate::common::Error> for PipelineError {
    fn from(err: crate::common::Error) -> Self {
        PipelineError::Extraction(err.to_string())
    }
}

impl From<crate::ooxml::error::OoxmlError> for PipelineError {
    fn from(err: crate::ooxml::error::OoxmlError) -> Self {
        PipelineError::from(crate::common::Error::from(err))
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Audit(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::InvalidPlan(err.to_string())
    }
}

/// Result type used throughout the pipeline stages.
pub type Result<T> = std::result::Result<T, PipelineError>;
