//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! producer / consumer / http produce:
//!     → structured log events (tracing crate, initialized in main)
//!     → linking counters (metrics.rs)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod metrics;
