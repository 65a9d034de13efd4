//! W3C traceparent codec.
//!
//! # Responsibilities
//! - Format a trace context as the 55-character traceparent string
//! - Parse a traceparent string with strict validation before slicing
//!
//! # Design Decisions
//! - Validation rejects wrong length, misplaced separators, and non-hex
//!   identifier bytes instead of extracting truncated or garbage substrings
//! - version and flags are parsed but drive no behavior yet
//! - Lowercase hex only, per the W3C grammar

use thiserror::Error;

use crate::context::TraceContext;

/// Exact length of a version-00 traceparent: 2+1+32+1+16+1+2.
pub const TRACEPARENT_LEN: usize = 55;

/// Byte offsets of the three `-` separators.
const SEPARATOR_OFFSETS: [usize; 3] = [2, 35, 52];

/// Fully decoded traceparent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traceparent {
    pub version: String,
    pub trace_id: String,
    pub span_id: String,
    pub flags: String,
}

impl Traceparent {
    /// Convert into a trace context. traceparent carries no trace state.
    pub fn into_context(self) -> TraceContext {
        TraceContext::new(self.trace_id, self.span_id)
    }
}

/// Validation failure for a traceparent string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TraceparentError {
    #[error("traceparent must be exactly {TRACEPARENT_LEN} characters, got {0}")]
    Length(usize),

    #[error("traceparent must be ASCII")]
    NotAscii,

    #[error("expected '-' separator at offset {0}")]
    Separator(usize),

    #[error("non-hex character in {0} field")]
    NonHex(&'static str),
}

/// Format a trace context as a version-00 traceparent.
pub fn format(ctx: &TraceContext, flags: u8) -> String {
    format!("00-{}-{}-{:02x}", ctx.trace_id, ctx.span_id, flags)
}

/// Parse a traceparent string, validating the full grammar before slicing.
pub fn parse(raw: &str) -> Result<Traceparent, TraceparentError> {
    if raw.len() != TRACEPARENT_LEN {
        return Err(TraceparentError::Length(raw.len()));
    }
    if !raw.is_ascii() {
        return Err(TraceparentError::NotAscii);
    }

    let bytes = raw.as_bytes();
    for offset in SEPARATOR_OFFSETS {
        if bytes[offset] != b'-' {
            return Err(TraceparentError::Separator(offset));
        }
    }

    let version = &raw[0..2];
    let trace_id = &raw[3..35];
    let span_id = &raw[36..52];
    let flags = &raw[53..55];

    for (field, name) in [
        (version, "version"),
        (trace_id, "trace-id"),
        (span_id, "span-id"),
        (flags, "flags"),
    ] {
        if !is_lower_hex(field) {
            return Err(TraceparentError::NonHex(name));
        }
    }

    Ok(Traceparent {
        version: version.to_string(),
        trace_id: trace_id.to_string(),
        span_id: span_id.to_string(),
        flags: flags.to_string(),
    })
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
