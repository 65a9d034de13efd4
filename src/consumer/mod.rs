//! Consumer side: recover the producer's trace context from a channel and
//! link the current operation to it.
//!
//! # Responsibilities
//! - Decode the metadata channel from an object handle
//! - Decode the event-attribute channel from a delivered envelope
//! - Apply the soft-miss / malformed policy and attach the link
//!
//! # Design Decisions
//! - Linking never fails the business operation: soft misses proceed
//!   unlinked, malformed traceparents are logged and counted, then treated
//!   exactly like a soft miss
//! - Storage read errors do propagate; reading metadata is the consumer's own
//!   I/O, not tracing logic
//! - `attach_link` is called at most once per operation (it is not idempotent)

use crate::channel::{Carrier, TraceChannel, ATTR_TRACEPARENT};
use crate::events::EventEnvelope;
use crate::link;
use crate::observability::metrics;
use crate::storage::{ObjectHandle, ObjectStore, StorageError};
use crate::telemetry::ActiveOperation;

/// Origin advertised to the event transport's preflight probe.
pub const TRUSTED_EVENT_ORIGIN: &str = "eventgrid.azure.net";

/// Hook the HTTP transport calls before any payload parsing.
///
/// Returns the trusted event origin to advertise; the transport owns the rest
/// of the preflight contract (status, header name, empty body).
pub fn preflight() -> &'static str {
    TRUSTED_EVENT_ORIGIN
}

/// Process an uploaded object: read its metadata, recover the context if
/// present, and link the active operation. Returns whether a link was made.
pub async fn process_object(
    store: &dyn ObjectStore,
    channel: &dyn TraceChannel,
    handle: &ObjectHandle,
    op: &dyn ActiveOperation,
) -> Result<bool, StorageError> {
    let metadata = store.get_metadata(handle).await?;
    Ok(link_from_carrier(channel, &metadata, op))
}

/// Process a delivered event envelope. Returns whether a link was made.
pub fn process_envelope(
    envelope: &EventEnvelope,
    channel: &dyn TraceChannel,
    op: &dyn ActiveOperation,
) -> bool {
    let mut carrier = Carrier::new();
    if let Some(tp) = &envelope.traceparent {
        carrier.insert(ATTR_TRACEPARENT.to_string(), tp.clone());
    }
    link_from_carrier(channel, &carrier, op)
}

fn link_from_carrier(
    channel: &dyn TraceChannel,
    carrier: &Carrier,
    op: &dyn ActiveOperation,
) -> bool {
    match channel.extract(carrier) {
        Ok(Some(ctx)) => {
            link::attach_link(Some(&ctx), op);
            metrics::record_link_attached(channel.name());
            tracing::debug!(
                channel = channel.name(),
                producer_trace_id = %ctx.trace_id,
                producer_span_id = %ctx.span_id,
                "Linked to producer operation"
            );
            true
        }
        Ok(None) => {
            metrics::record_soft_miss(channel.name());
            tracing::debug!(channel = channel.name(), "No correlation data, proceeding unlinked");
            false
        }
        Err(e) => {
            metrics::record_malformed_traceparent();
            tracing::warn!(
                channel = channel.name(),
                error = %e,
                "Malformed trace attribute, proceeding unlinked"
            );
            false
        }
    }
}
