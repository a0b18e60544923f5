//! Per-stage timings, memory counters and the warnings sink.
//!
//! `tracing` spans carry the per-stage structured logs; `monitoring_level`
//! maps to both the tracing verbosity and whether memory counters are
//! sampled at all. `warnings.log` is a separate, plain-text, append-only
//! sink — never mixed into the JSON audit artifacts.
use crate::config::MonitoringLevel;
use std::time::{Duration, Instant};
use tracing::{Level, debug, info, span};

/// One warning line as it will be written to `warnings.log`: `kind` is the
/// fixed token (`NOOP`, `FONT_FALLBACK`, `STYLE_ALIAS`, ...), `detail` is
/// free text.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: &'static str,
    pub detail: String,
}

impl Warning {
    pub fn new(kind: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn to_log_line(&self) -> String {
        format!("[{}] {}", self.kind, self.detail)
    }
}

/// Accumulates warnings for the run; flushed to `warnings.log` by the
/// Auditor at the end.
#[derive(Debug, Clone, Default)]
pub struct WarningsSink {
    warnings: Vec<Warning>,
}

impl WarningsSink {
    pub fn push(&mut self, warning: Warning) {
        info!(kind = warning.kind, detail = %warning.detail, "warning recorded");
        self.warnings.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn to_log_text(&self) -> String {
        self.warnings
            .iter()
            .map(Warning::to_log_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.warnings.iter()
    }
}

/// Wraps one pipeline stage's execution: opens a `tracing` span named after
/// the stage, records wall-clock duration, and (at `detailed` or finer) logs
/// a `debug` event with the elapsed time on drop.
pub struct StageTimer {
    stage: &'static str,
    started_at: Instant,
    level: MonitoringLevel,
    _span_guard: tracing::span::EnteredSpan,
}

impl StageTimer {
    pub fn start(stage: &'static str, level: MonitoringLevel) -> Self {
        let span = span!(Level::INFO, "stage", name = stage);
        let guard = span.entered();
        info!(stage, "stage started");
        Self {
            stage,
            started_at: Instant::now(),
            level,
            _span_guard: guard,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        if matches!(
            self.level,
            MonitoringLevel::Detailed | MonitoringLevel::Debug | MonitoringLevel::Performance
        ) {
            debug!(stage = self.stage, elapsed_ms = elapsed.as_millis(), "stage finished");
        } else {
            info!(stage = self.stage, elapsed_ms = elapsed.as_millis(), "stage finished");
        }
    }
}

/// Timings collected across a whole run, one entry per stage, written into
/// the audit directory's warnings context (not a separate JSON artifact —
/// spec.md does not reserve one).
#[derive(Debug, Clone, Default)]
pub struct RunTimings {
    entries: Vec<(&'static str, Duration)>,
}

impl RunTimings {
    pub fn record(&mut self, stage: &'static str, duration: Duration) {
        self.entries.push((stage, duration));
    }

    pub fn total(&self) -> Duration {
        self.entries.iter().map(|(_, d)| *d).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (&'static str, Duration)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_sink_formats_log_lines() {
        let mut sink = WarningsSink::default();
        sink.push(Warning::new("NOOP", "delete_section_by_heading: no match"));
        assert_eq!(
            sink.to_log_text(),
            "[NOOP] delete_section_by_heading: no match"
        );
    }

    #[test]
    fn run_timings_accumulate() {
        let mut timings = RunTimings::default();
        timings.record("EXTRACTING", Duration::from_millis(10));
        timings.record("EXECUTING", Duration::from_millis(20));
        assert_eq!(timings.total(), Duration::from_millis(30));
    }
}
