//! Structured observability hooks for flow lifecycle events.
//!
//! Provides a flow-scoped span guard and emission functions for the events
//! every invocation goes through: start, finish and advisory output.

use tracing::info;

/// RAII guard that enters a flow-scoped tracing span.
///
/// ```ignore
/// let _span = FlowSpan::enter("validateAPI");
/// // tracing calls below carry action = "validateAPI"
/// ```
pub struct FlowSpan {
    _span: tracing::span::EnteredSpan,
}

impl FlowSpan {
    pub fn enter(action: &str) -> Self {
        Self {
            _span: flow_span(action).entered(),
        }
    }
}

/// Span for one flow invocation. Async callers attach it with
/// `tracing::Instrument` instead of entering it.
pub fn flow_span(action: &str) -> tracing::Span {
    tracing::info_span!("valkit.flow", action = %action)
}

/// Emit event: flow started.
pub fn emit_flow_started(action: &str) {
    info!(event = "flow.started", action = %action);
}

/// Emit event: flow finished with duration and success flag.
pub fn emit_flow_finished(action: &str, duration_ms: u64, success: bool) {
    info!(
        event = "flow.finished",
        action = %action,
        duration_ms = duration_ms,
        success = success,
    );
}

/// Emit event: a remediation suggestion was chosen for an error.
pub fn emit_advisory(keyword: Option<&str>, suggestion: &str) {
    info!(
        event = "advisory.emitted",
        keyword = keyword.unwrap_or("<fallback>"),
        suggestion = %suggestion,
    );
}

/// Emit event: a flow failed (warning level).
pub fn emit_flow_error(action: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "flow.error", action = %action, error = %error);
}
