//! In-memory event publisher for tests and local runs.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::channel::{Carrier, EventAttributeChannel, TraceChannel, ATTR_TRACEPARENT};
use crate::context::TraceContext;
use crate::events::{EventEnvelope, EventPublisher, PublishError, UploadEventRecord};

/// Publisher that delivers envelopes to an in-process receiver.
///
/// Performs the traceparent injection itself, standing in for the real
/// publisher's instrumentation of the publish call.
pub struct MemoryEventPublisher {
    tx: mpsc::UnboundedSender<EventEnvelope>,
    channel: EventAttributeChannel,
}

impl MemoryEventPublisher {
    /// Create a publisher and the receiving end of its delivery stream.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventEnvelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                channel: EventAttributeChannel,
            },
            rx,
        )
    }
}

#[async_trait]
impl EventPublisher for MemoryEventPublisher {
    async fn publish(
        &self,
        ambient: &TraceContext,
        event_type: &str,
        record: UploadEventRecord,
    ) -> Result<(), PublishError> {
        let subject = record.url.path().to_string();
        let mut envelope = EventEnvelope::new(event_type, &subject, record);

        // The instrumentation step: attach the traceparent attribute.
        let mut carrier = Carrier::new();
        self.channel.inject(ambient, &mut carrier);
        envelope.traceparent = carrier.remove(ATTR_TRACEPARENT);

        self.tx
            .send(envelope)
            .map_err(|e| PublishError(e.to_string()))
    }
}
