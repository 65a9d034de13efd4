//! Trace context data model.
//!
//! # Responsibilities
//! - Define the (traceId, spanId, traceState) triple shared by both channels
//! - Strict W3C traceparent encoding/decoding
//!
//! # Design Decisions
//! - Identifiers kept as fixed-length lowercase hex strings, never decoded to
//!   integers: linking is pass-through and must not normalize producer values
//! - traceState is opaque; no key=value grammar validation
//! - Context is captured once per producer operation and never mutated

pub mod traceparent;

/// Position within a distributed operation's causal tree.
///
/// `trace_id` is 32 lowercase hex characters, `span_id` is 16. `trace_state`
/// is carried verbatim and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    pub trace_state: String,
}

impl TraceContext {
    /// Create a context with an empty trace state.
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            trace_state: String::new(),
        }
    }

    /// Create a context carrying a trace state.
    pub fn with_state(
        trace_id: impl Into<String>,
        span_id: impl Into<String>,
        trace_state: impl Into<String>,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            trace_state: trace_state.into(),
        }
    }
}
