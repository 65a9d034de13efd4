//! Trace propagation channels.
//!
//! # Responsibilities
//! - Define the inject/extract capability both channels implement
//! - Object-metadata channel (keys on the uploaded object)
//! - Event-attribute channel (traceparent extension attribute)
//!
//! # Design Decisions
//! - One carrier shape for both channels: a string key/value mapping, so the
//!   consumer pipeline is channel-agnostic and selection is pure configuration
//! - Absent correlation data is `Ok(None)` (soft miss), never an error
//! - A present-but-malformed traceparent is an error so callers can log it;
//!   the consumer's policy downgrades it to a soft miss

use std::collections::HashMap;

use thiserror::Error;

use crate::config::ChannelMode;
use crate::context::traceparent::TraceparentError;
use crate::context::TraceContext;

mod event;
mod metadata;

pub use event::{EventAttributeChannel, ATTR_TRACEPARENT};
pub use metadata::{MetadataChannel, KEY_SPAN_ID, KEY_TRACE_ID, KEY_TRACE_STATE};

/// Key/value mapping carried by a channel: an object's metadata set or the
/// extension attributes of an event envelope.
pub type Carrier = HashMap<String, String>;

/// Extraction failure. Missing data is not a failure; see [`TraceChannel::extract`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("malformed traceparent attribute: {0}")]
    Malformed(#[from] TraceparentError),
}

/// A side channel that can carry a trace context across the upload/process
/// boundary.
pub trait TraceChannel: Send + Sync {
    /// Channel name for logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Write the context into the carrier.
    fn inject(&self, ctx: &TraceContext, carrier: &mut Carrier);

    /// Attempt to recover a context from the carrier.
    ///
    /// `Ok(None)` means the carrier holds no correlation data (soft miss);
    /// the consumer operation proceeds unlinked.
    fn extract(&self, carrier: &Carrier) -> Result<Option<TraceContext>, ExtractError>;
}

/// Build the channel selected by configuration.
pub fn from_mode(mode: ChannelMode) -> Box<dyn TraceChannel> {
    match mode {
        ChannelMode::Metadata => Box::new(MetadataChannel),
        ChannelMode::Event => Box::new(EventAttributeChannel),
    }
}
