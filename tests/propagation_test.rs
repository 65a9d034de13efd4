//! End-to-end propagation scenarios across both channels.

use trace_link::channel::{EventAttributeChannel, MetadataChannel};
use trace_link::consumer;
use trace_link::events::MemoryEventPublisher;
use trace_link::link::LINKS_TAG;
use trace_link::producer::{self, ProducerError};
use trace_link::storage::{MemoryObjectStore, ObjectStore};
use trace_link::telemetry::{ActiveOperation, LocalOperation};
use url::Url;

const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
const SPAN_ID: &str = "00f067aa0ba902b7";

#[tokio::test]
async fn test_event_channel_end_to_end() {
    // Producer side: upload, then self-publish the event.
    let store = MemoryObjectStore::new();
    let (publisher, mut deliveries) = MemoryEventPublisher::new();
    let producer_op = LocalOperation::with_ids(TRACE_ID, SPAN_ID);

    producer::upload_with_trace(&store, &MetadataChannel, &producer_op, b"hello world".to_vec())
        .await
        .unwrap();
    producer::publish_upload_event(
        &publisher,
        &producer_op,
        Url::parse("memory:///container/object-1").unwrap(),
        "text/plain",
        11,
    )
    .await
    .unwrap();

    // Transport delivers the envelope; consumer runs under its own operation.
    let envelope = deliveries.recv().await.unwrap();
    assert_eq!(
        envelope.traceparent.as_deref(),
        Some("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
    );

    let consumer_op = LocalOperation::start();
    let linked = consumer::process_envelope(&envelope, &EventAttributeChannel, &consumer_op);

    assert!(linked);
    assert_eq!(
        consumer_op.tags(),
        vec![(
            LINKS_TAG.to_string(),
            format!(r#"[{{"operation_Id":"{}","id":"{}"}}]"#, TRACE_ID, SPAN_ID),
        )],
    );
}

#[tokio::test]
async fn test_metadata_channel_end_to_end() {
    let store = MemoryObjectStore::new();
    let producer_op = LocalOperation::with_ids(TRACE_ID, SPAN_ID).with_trace_state("vendor=x");

    let handle =
        producer::upload_with_trace(&store, &MetadataChannel, &producer_op, b"payload".to_vec())
            .await
            .unwrap();

    let consumer_op = LocalOperation::start();
    let linked = consumer::process_object(&store, &MetadataChannel, &handle, &consumer_op)
        .await
        .unwrap();

    assert!(linked);
    let tags = consumer_op.tags();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].0, LINKS_TAG);
    assert!(tags[0].1.contains(TRACE_ID));
    assert!(tags[0].1.contains(SPAN_ID));
}

#[tokio::test]
async fn test_inconsistency_window_reads_as_soft_miss() {
    // Object uploaded, metadata write never happened.
    let store = MemoryObjectStore::new();
    let handle = store.upload(b"payload".to_vec()).await.unwrap();

    let consumer_op = LocalOperation::start();
    let linked = consumer::process_object(&store, &MetadataChannel, &handle, &consumer_op)
        .await
        .unwrap();

    assert!(!linked);
    assert!(consumer_op.tags().is_empty());
}

#[tokio::test]
async fn test_metadata_write_failure_surfaces_to_producer() {
    let store = MemoryObjectStore::new();
    store.fail_metadata_writes(true);
    let producer_op = LocalOperation::with_ids(TRACE_ID, SPAN_ID);

    let result =
        producer::upload_with_trace(&store, &MetadataChannel, &producer_op, b"payload".to_vec())
            .await;

    assert!(matches!(result, Err(ProducerError::Storage(_))));
    // The upload itself landed; a later consumer read is a soft miss, not an
    // error.
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_stripped_attribute_still_carries_simulated_fields() {
    let (publisher, mut deliveries) = MemoryEventPublisher::new();
    let producer_op = LocalOperation::with_ids(TRACE_ID, SPAN_ID);

    producer::publish_upload_event(
        &publisher,
        &producer_op,
        Url::parse("memory:///container/object-2").unwrap(),
        "application/octet-stream",
        512,
    )
    .await
    .unwrap();

    let mut envelope = deliveries.recv().await.unwrap();
    // Transport strips the extension attribute.
    envelope.traceparent = None;

    // The payload stays self-describing, but the consumer never links from
    // the simulated fields.
    assert_eq!(envelope.data.client_request_id, producer_op.trace_id());
    assert_eq!(envelope.data.request_id, producer_op.span_id());

    let consumer_op = LocalOperation::start();
    assert!(!consumer::process_envelope(
        &envelope,
        &EventAttributeChannel,
        &consumer_op
    ));
    assert!(consumer_op.tags().is_empty());
}
