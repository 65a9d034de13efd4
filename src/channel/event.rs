//! Event-attribute channel.
//!
//! The trace context rides as a single `traceparent` extension attribute on a
//! self-published upload event. This channel only works for self-published
//! events: the storage system's auto-generated events carry no trace
//! extension attributes at all (an upstream limitation, not something this
//! channel can work around).

use crate::channel::{Carrier, ExtractError, TraceChannel};
use crate::context::{traceparent, TraceContext};

/// Extension attribute holding the W3C traceparent string.
pub const ATTR_TRACEPARENT: &str = "traceparent";

/// Flags value injected on the producer side: sampled.
const FLAGS_SAMPLED: u8 = 0x01;

/// Channel B: trace context as a traceparent event attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventAttributeChannel;

impl TraceChannel for EventAttributeChannel {
    fn name(&self) -> &'static str {
        "event"
    }

    /// Invoked by the event publisher's own instrumentation when the event is
    /// sent, never directly by producer code.
    fn inject(&self, ctx: &TraceContext, carrier: &mut Carrier) {
        carrier.insert(
            ATTR_TRACEPARENT.to_string(),
            traceparent::format(ctx, FLAGS_SAMPLED),
        );
    }

    /// An absent attribute is a soft miss. A present attribute must satisfy
    /// the full traceparent grammar; anything else is a malformed-traceparent
    /// error rather than a truncated extraction.
    fn extract(&self, carrier: &Carrier) -> Result<Option<TraceContext>, ExtractError> {
        let Some(raw) = carrier.get(ATTR_TRACEPARENT) else {
            return Ok(None);
        };
        let parsed = traceparent::parse(raw)?;
        Ok(Some(parsed.into_context()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::traceparent::TraceparentError;

    #[test]
    fn test_inject_writes_sampled_traceparent() {
        let ctx = TraceContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
        let mut carrier = Carrier::new();
        EventAttributeChannel.inject(&ctx, &mut carrier);

        assert_eq!(
            carrier.get(ATTR_TRACEPARENT).map(String::as_str),
            Some("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
        );
    }

    #[test]
    fn test_extract_round_trip() {
        let ctx = TraceContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
        let mut carrier = Carrier::new();
        EventAttributeChannel.inject(&ctx, &mut carrier);

        let decoded = EventAttributeChannel.extract(&carrier).unwrap().unwrap();
        assert_eq!(decoded.trace_id, ctx.trace_id);
        assert_eq!(decoded.span_id, ctx.span_id);
        assert_eq!(decoded.trace_state, "");
    }

    #[test]
    fn test_absent_attribute_is_soft_miss() {
        assert_eq!(EventAttributeChannel.extract(&Carrier::new()), Ok(None));
    }

    #[test]
    fn test_malformed_attribute_is_an_error() {
        let mut carrier = Carrier::new();
        carrier.insert(ATTR_TRACEPARENT.into(), "00-short-bad".into());

        assert_eq!(
            EventAttributeChannel.extract(&carrier),
            Err(ExtractError::Malformed(TraceparentError::Length(12))),
        );
    }
}
