//! Telemetry link builder.
//!
//! # Responsibilities
//! - Build the serialized link record the tracing backend understands
//! - Attach it as a tag on the consumer's active operation
//!
//! # Design Decisions
//! - `operation_Id` and `id` are the backend's wire contract, fixed and
//!   case-sensitive; serde renames keep the Rust field names idiomatic
//! - Absent context is a no-op: correlation is best-effort, never a hard
//!   dependency of the business operation
//! - Not idempotent: the caller must attach at most once per consumer
//!   operation, or the record carries duplicate links

use serde::Serialize;

use crate::context::TraceContext;
use crate::telemetry::ActiveOperation;

/// Tag key the tracing backend reads links from.
pub const LINKS_TAG: &str = "_MS.links";

/// Causal link to the producer-side operation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TelemetryLink {
    /// The producer's trace identifier.
    #[serde(rename = "operation_Id")]
    pub operation_id: String,
    /// The producer's span identifier.
    pub id: String,
}

impl TelemetryLink {
    pub fn from_context(ctx: &TraceContext) -> Self {
        Self {
            operation_id: ctx.trace_id.clone(),
            id: ctx.span_id.clone(),
        }
    }
}

/// Serialize the single-element link array carried under [`LINKS_TAG`].
pub fn render_links(ctx: &TraceContext) -> String {
    serde_json::to_string(&[TelemetryLink::from_context(ctx)])
        .expect("TelemetryLink serialization is infallible")
}

/// Attach the causal link for `ctx` to the active consumer operation.
///
/// With no context this does nothing at all: no tag, no collaborator call.
pub fn attach_link(ctx: Option<&TraceContext>, op: &dyn ActiveOperation) {
    let Some(ctx) = ctx else {
        return;
    };
    op.add_tag(LINKS_TAG, &render_links(ctx));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LocalOperation;

    #[test]
    fn test_link_wire_format_is_exact() {
        let ctx = TraceContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
        assert_eq!(
            render_links(&ctx),
            r#"[{"operation_Id":"4bf92f3577b34da6a3ce929d0e0e4736","id":"00f067aa0ba902b7"}]"#,
        );
    }

    #[test]
    fn test_attach_link_tags_the_operation() {
        let op = LocalOperation::start();
        let ctx = TraceContext::new("a".repeat(32), "b".repeat(16));
        attach_link(Some(&ctx), &op);

        let tags = op.tags();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].0, LINKS_TAG);
        assert!(tags[0].1.contains(&"a".repeat(32)));
    }

    #[test]
    fn test_soft_miss_attaches_nothing() {
        let op = LocalOperation::start();
        attach_link(None, &op);
        assert!(op.tags().is_empty());
    }

    #[test]
    fn test_double_attach_produces_two_tags() {
        // Documented non-idempotence: callers attach exactly once.
        let op = LocalOperation::start();
        let ctx = TraceContext::new("a".repeat(32), "b".repeat(16));
        attach_link(Some(&ctx), &op);
        attach_link(Some(&ctx), &op);
        assert_eq!(op.tags().len(), 2);
    }
}
