//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use trace_link::config::{AppConfig, ChannelMode};
use trace_link::WebhookServer;

/// Start a webhook server on an OS-assigned port and return its address.
pub async fn start_webhook_server(mode: ChannelMode) -> SocketAddr {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.channel.mode = mode;
    config.observability.metrics_enabled = false;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let server = WebhookServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// Events endpoint URL for a server started with the default config.
pub fn events_url(addr: SocketAddr) -> String {
    format!("http://{}/events", addr)
}
