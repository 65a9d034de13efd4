//! Object-metadata channel.
//!
//! The trace context rides as three fixed keys on the uploaded object's
//! metadata set. Keys are case-sensitive and unique within the mapping.

use crate::channel::{Carrier, ExtractError, TraceChannel};
use crate::context::TraceContext;

/// Metadata key holding the trace identifier.
pub const KEY_TRACE_ID: &str = "traceid";
/// Metadata key holding the span identifier.
pub const KEY_SPAN_ID: &str = "spanid";
/// Metadata key holding the opaque trace state.
pub const KEY_TRACE_STATE: &str = "tracestate";

/// Channel A: trace context as object metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataChannel;

impl TraceChannel for MetadataChannel {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn inject(&self, ctx: &TraceContext, carrier: &mut Carrier) {
        carrier.insert(KEY_TRACE_ID.to_string(), ctx.trace_id.clone());
        carrier.insert(KEY_SPAN_ID.to_string(), ctx.span_id.clone());
        carrier.insert(KEY_TRACE_STATE.to_string(), ctx.trace_state.clone());
    }

    /// Both identifier keys must be present; absence of either is a soft
    /// miss, tolerating objects uploaded without instrumentation. Values are
    /// passed through uninterpreted: linking is best-effort, not
    /// safety-critical, so malformed hex is the backend's problem.
    fn extract(&self, carrier: &Carrier) -> Result<Option<TraceContext>, ExtractError> {
        let (Some(trace_id), Some(span_id)) = (carrier.get(KEY_TRACE_ID), carrier.get(KEY_SPAN_ID))
        else {
            return Ok(None);
        };
        let trace_state = carrier.get(KEY_TRACE_STATE).cloned().unwrap_or_default();

        Ok(Some(TraceContext::with_state(
            trace_id.clone(),
            span_id.clone(),
            trace_state,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_round_trip() {
        let ctx = TraceContext::with_state(
            "4bf92f3577b34da6a3ce929d0e0e4736",
            "00f067aa0ba902b7",
            "vendor=opaque",
        );
        let mut carrier = Carrier::new();
        MetadataChannel.inject(&ctx, &mut carrier);

        let decoded = MetadataChannel.extract(&carrier).unwrap().unwrap();
        assert_eq!(decoded, ctx);
    }

    #[test]
    fn test_missing_trace_state_decodes_to_empty() {
        let mut carrier = Carrier::new();
        carrier.insert(KEY_TRACE_ID.into(), "abc123".into());
        carrier.insert(KEY_SPAN_ID.into(), "def456".into());

        let decoded = MetadataChannel.extract(&carrier).unwrap().unwrap();
        assert_eq!(decoded.trace_id, "abc123");
        assert_eq!(decoded.span_id, "def456");
        assert_eq!(decoded.trace_state, "");
    }

    #[test]
    fn test_missing_identifier_key_is_soft_miss() {
        let empty = Carrier::new();
        assert_eq!(MetadataChannel.extract(&empty), Ok(None));

        let mut only_trace = Carrier::new();
        only_trace.insert(KEY_TRACE_ID.into(), "abc".into());
        assert_eq!(MetadataChannel.extract(&only_trace), Ok(None));

        let mut only_span = Carrier::new();
        only_span.insert(KEY_SPAN_ID.into(), "def".into());
        assert_eq!(MetadataChannel.extract(&only_span), Ok(None));
    }

    #[test]
    fn test_malformed_values_pass_through() {
        // No hex validation on this channel.
        let mut carrier = Carrier::new();
        carrier.insert(KEY_TRACE_ID.into(), "not hex at all".into());
        carrier.insert(KEY_SPAN_ID.into(), "???".into());

        let decoded = MetadataChannel.extract(&carrier).unwrap().unwrap();
        assert_eq!(decoded.trace_id, "not hex at all");
        assert_eq!(decoded.span_id, "???");
    }
}
