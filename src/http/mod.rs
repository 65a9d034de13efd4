//! HTTP transport for the event-attribute channel.

pub mod server;

pub use server::WebhookServer;
