//! Ambient telemetry collaborator.
//!
//! # Responsibilities
//! - Expose the current operation's trace identifiers
//! - Accept tags on the active telemetry record
//!
//! # Design Decisions
//! - The "current operation" is passed explicitly from the operation entry
//!   point to every function needing it, never read from hidden global state
//! - Identifiers are fixed once the operation starts and never change

use std::sync::Mutex;

use rand::Rng;

use crate::context::TraceContext;

/// The active telemetry operation: the tracing runtime's view of the work in
/// progress on this side of the boundary.
pub trait ActiveOperation: Send + Sync {
    fn trace_id(&self) -> String;
    fn span_id(&self) -> String;
    fn trace_state(&self) -> String;

    /// Attach a tag to the operation's telemetry record. Tags accumulate;
    /// attaching the same tag twice produces two tags.
    fn add_tag(&self, name: &str, value: &str);

    /// Read-only snapshot of the operation's trace context.
    fn context(&self) -> TraceContext {
        TraceContext::with_state(self.trace_id(), self.span_id(), self.trace_state())
    }
}

/// In-process operation with randomly generated identifiers.
///
/// Backs the webhook consumer (one per delivered event) and tests. Tags are
/// recorded so callers can inspect what would reach the telemetry sink.
pub struct LocalOperation {
    trace_id: String,
    span_id: String,
    trace_state: String,
    tags: Mutex<Vec<(String, String)>>,
}

impl LocalOperation {
    /// Start an operation with fresh random identifiers.
    pub fn start() -> Self {
        let mut rng = rand::thread_rng();
        Self::with_ids(
            format!("{:032x}", nonzero_u128(&mut rng)),
            format!("{:016x}", nonzero_u64(&mut rng)),
        )
    }

    /// Start an operation with fixed identifiers.
    pub fn with_ids(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            trace_state: String::new(),
            tags: Mutex::new(Vec::new()),
        }
    }

    /// Set the opaque trace state carried by this operation.
    pub fn with_trace_state(mut self, trace_state: impl Into<String>) -> Self {
        self.trace_state = trace_state.into();
        self
    }

    /// Snapshot of the tags attached so far.
    pub fn tags(&self) -> Vec<(String, String)> {
        self.tags.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ActiveOperation for LocalOperation {
    fn trace_id(&self) -> String {
        self.trace_id.clone()
    }

    fn span_id(&self) -> String {
        self.span_id.clone()
    }

    fn trace_state(&self) -> String {
        self.trace_state.clone()
    }

    fn add_tag(&self, name: &str, value: &str) {
        self.tags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((name.to_string(), value.to_string()));
    }
}

// All-zero identifiers are invalid in the W3C grammar.
fn nonzero_u128(rng: &mut impl Rng) -> u128 {
    loop {
        let v: u128 = rng.gen();
        if v != 0 {
            return v;
        }
    }
}

fn nonzero_u64(rng: &mut impl Rng) -> u64 {
    loop {
        let v: u64 = rng.gen();
        if v != 0 {
            return v;
        }
    }
}
