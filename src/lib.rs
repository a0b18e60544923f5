//! `scribeforge` turns a natural-language editing request into a closed,
//! auditable loop over a Microsoft Word document: extract its structure,
//! have a language model plan a sequence of whitelisted atomic operations,
//! execute those operations as surgical XML edits, validate the result
//! against the plan's own invariants, and write an audit trail of every
//! artifact produced along the way.
//!
//! # Layout
//!
//! - [`common`]: format-agnostic error type, document metadata, unit and
//!   color helpers
//! - [`ooxml`]: the Word (.docx) OPC/XML layer the rest of the crate reads
//!   and mutates through
//! - [`schema`]: versioned JSON contracts exchanged between stages
//!   (`structure.v1`, `inventory.full.v1`, `plan.v1`, `diff.report`)
//! - [`automation`]: the `WordAutomation` trait and its native
//!   implementation over `ooxml`
//! - [`localisation`]: style-alias and font-fallback resolution
//! - [`config`]: pipeline configuration, loaded from JSON or YAML
//! - [`extractor`]: DOCX -> structure + inventory
//! - [`planner`]: structure/inventory -> plan, via an LM gateway
//! - [`executor`]: plan -> mutated package, via the atomic operation
//!   whitelist
//! - [`validator`]: mutated package -> pass/fail against plan invariants
//! - [`auditor`]: run artifacts -> a timestamped run directory
//! - [`orchestrator`]: drives the five stages as one state machine
//! - [`monitoring`]: stage timing and structured logging
//! - [`error`]: the stage-level [`PipelineError`](error::PipelineError) taxonomy

pub mod automation;
pub mod auditor;
pub mod common;
pub mod config;
pub mod error;
pub mod executor;
pub mod extractor;
pub mod localisation;
pub mod monitoring;
pub mod ooxml;
pub mod orchestrator;
pub mod planner;
pub mod schema;
pub mod validator;

pub use common::error::{Error, Result};
pub use error::PipelineError;
