//! Trace-context propagation across the storage-event boundary.
//!
//! An upload happens in one process; processing happens later in another,
//! triggered by an event about the upload. The event transport carries no
//! trace metadata, so the tracing backend would record two disconnected
//! operations. This crate carries the producer's W3C trace context through
//! one of two side channels and rebuilds the causal link on the consumer:
//!
//! - **metadata**: three fixed keys on the uploaded object's metadata set
//! - **event**: a `traceparent` extension attribute on a self-published event
//!
//! Delivery of the event itself is never guaranteed here; only that a
//! delivered payload can be linked back to the producer operation.

pub mod channel;
pub mod config;
pub mod consumer;
pub mod context;
pub mod events;
pub mod http;
pub mod link;
pub mod observability;
pub mod producer;
pub mod storage;
pub mod telemetry;

pub use config::AppConfig;
pub use context::TraceContext;
pub use http::WebhookServer;
