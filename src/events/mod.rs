//! Upload event model and publisher collaborator.
//!
//! # Responsibilities
//! - Define the self-published upload event payload and its envelope
//! - Narrow interface to the external event publisher
//!
//! # Design Decisions
//! - The traceparent extension attribute is attached by the publisher
//!   implementation itself (its instrumentation), never by producer code
//! - `client_request_id`/`request_id` are simulated correlation fields; the
//!   upstream event source does not trace-correlate them, so the consumer
//!   never reads them for linking

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::context::TraceContext;

mod publisher;

pub use publisher::MemoryEventPublisher;

/// Event type for a self-published upload notification.
pub const UPLOAD_COMPLETED: &str = "upload.completed";

/// Domain payload describing an upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadEventRecord {
    /// Storage API that produced the object.
    pub api: String,
    pub content_type: String,
    pub content_length: u64,
    pub blob_type: String,
    pub url: Url,
    /// Simulated correlation field, seeded with the producer's trace id.
    pub client_request_id: String,
    /// Simulated correlation field, seeded with the producer's span id.
    pub request_id: String,
}

/// Wire envelope for a published event.
///
/// `traceparent` is the extension attribute the event-attribute channel
/// reads; it is optional on the wire because delivery paths may strip it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub id: Uuid,
    pub event_type: String,
    pub subject: String,
    /// Seconds since the Unix epoch at publish time.
    pub event_time: u64,
    pub data: UploadEventRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceparent: Option<String>,
}

impl EventEnvelope {
    /// Build an envelope around a record, without a traceparent attribute.
    pub fn new(event_type: &str, subject: &str, data: UploadEventRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            subject: subject.to_string(),
            event_time: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            data,
            traceparent: None,
        }
    }
}

/// Event publish failure, surfaced to the caller unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("event publish failed: {0}")]
pub struct PublishError(pub String);

/// External event publisher.
///
/// Implementations attach the traceparent extension attribute from `ambient`
/// transparently; callers hand over the raw record and never touch the
/// attribute themselves.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        ambient: &TraceContext,
        event_type: &str,
        record: UploadEventRecord,
    ) -> Result<(), PublishError>;
}
