//! Producer side: capture the ambient trace context at upload time and emit
//! it through the chosen channel.
//!
//! # Responsibilities
//! - Upload then write trace metadata (Channel A)
//! - Self-publish an upload event with simulated correlation fields (Channel B)
//!
//! # Design Decisions
//! - One write per channel, no retry: failures propagate to the caller
//! - The window between upload and metadata write is an accepted
//!   inconsistency; the consumer treats it as a soft miss
//! - Channel B never hand-constructs the traceparent string; the publisher's
//!   instrumentation attaches it

use thiserror::Error;
use url::Url;

use crate::channel::{Carrier, TraceChannel};
use crate::events::{EventPublisher, PublishError, UploadEventRecord, UPLOAD_COMPLETED};
use crate::storage::{ObjectHandle, ObjectStore, StorageError};
use crate::telemetry::ActiveOperation;

/// Channel write failure on the producer side. Surfaced, never swallowed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProducerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Upload an object and attach the operation's trace context as metadata.
///
/// If the metadata write fails the object stays uploaded; the error reaches
/// the caller and the consumer will later see a soft miss.
pub async fn upload_with_trace(
    store: &dyn ObjectStore,
    channel: &dyn TraceChannel,
    op: &dyn ActiveOperation,
    bytes: Vec<u8>,
) -> Result<ObjectHandle, ProducerError> {
    let handle = store.upload(bytes).await?;

    let mut carrier = Carrier::new();
    channel.inject(&op.context(), &mut carrier);
    store.set_metadata(&handle, carrier).await?;

    tracing::debug!(
        object = %handle.key,
        channel = channel.name(),
        trace_id = %op.trace_id(),
        "Trace context written to object metadata"
    );
    Ok(handle)
}

/// Self-publish an upload event for the given object.
///
/// Used only when events are self-published: the storage system's
/// auto-generated events carry no trace extension attribute. The two
/// correlation fields are seeded from the trace/span identifiers so the
/// payload stays self-describing even if the attribute is stripped in
/// transit; the consumer never links from them.
pub async fn publish_upload_event(
    publisher: &dyn EventPublisher,
    op: &dyn ActiveOperation,
    url: Url,
    content_type: &str,
    content_length: u64,
) -> Result<(), ProducerError> {
    let ctx = op.context();
    let record = UploadEventRecord {
        api: "PutBlob".to_string(),
        content_type: content_type.to_string(),
        content_length,
        blob_type: "BlockBlob".to_string(),
        url,
        client_request_id: ctx.trace_id.clone(),
        request_id: ctx.span_id.clone(),
    };

    publisher.publish(&ctx, UPLOAD_COMPLETED, record).await?;

    tracing::debug!(
        trace_id = %ctx.trace_id,
        span_id = %ctx.span_id,
        "Upload event published"
    );
    Ok(())
}
