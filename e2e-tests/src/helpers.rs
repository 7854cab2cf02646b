// e2e-tests/src/helpers.rs
//
// Shared helper functions for E2E tests: spawning a server on port 0,
// connecting WebSocket clients with retry, and classifying wire frames.
// Tests talk to the server over HTTP and WebSocket only.

use anyhow::{anyhow, Result};
use futures_util::{SinkExt, StreamExt};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use orbitdeck_ops_server::api::{create_router, AppState};
use orbitdeck_ops_server::bootstrap::services;
use orbitdeck_ops_server::config::Config;

/// A running ops-server instance bound to an ephemeral port
pub struct TestApp {
    pub http_port: u16,
    server_handle: Option<JoinHandle<()>>,
}

impl TestApp {
    /// Spawn with test-friendly realtime timings (1s snapshots, 2s restoration)
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_realtime(1, 2).await
    }

    /// Spawn with explicit snapshot interval and restoration delay
    pub async fn spawn_with_realtime(
        snapshot_interval_secs: u64,
        restoration_delay_secs: u64,
    ) -> Result<Self> {
        let mut config = Config::default();
        config.realtime.snapshot_interval_secs = snapshot_interval_secs;
        config.realtime.restoration_delay_secs = restoration_delay_secs;
        config.cors.disable = true;
        config.logging.enabled = false;

        let listener = TcpListener::bind("127.0.0.1:0")?;
        let http_port = listener.local_addr()?.port();

        let registry = services::setup(&config).await?;
        let state = AppState {
            store: registry.store,
            registry: registry.registry,
            hub: registry.hub,
            coordinator: registry.coordinator,
            allowed_origins: vec![],
            cors_disabled: true,
            config: Arc::new(config),
        };
        let app = create_router(state);

        let server_handle = tokio::spawn(async move {
            listener
                .set_nonblocking(true)
                .expect("Failed to set non-blocking");
            let listener = tokio::net::TcpListener::from_std(listener)
                .expect("Failed to convert listener");
            axum::serve(listener, app).await.expect("HTTP server failed");
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(Self {
            http_port,
            server_handle: Some(server_handle),
        })
    }

    pub fn http_base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.http_port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.http_port)
    }

    /// Connect a WebSocket client, retrying while the server comes up
    pub async fn connect_ws(&self) -> Result<WsClient> {
        let url = self.ws_url();
        for _ in 0..10 {
            match connect_async(&url).await {
                Ok((stream, _)) => return Ok(WsClient { stream }),
                Err(e) => {
                    eprintln!("WS connection failed, retrying: {}", e);
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
            }
        }
        Err(anyhow!("Failed to connect to WebSocket at {}", url))
    }

    pub async fn shutdown(mut self) {
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
    }
}

/// One connected WebSocket viewer
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Send a raw JSON text frame to the server
    pub async fn send_json(&mut self, payload: serde_json::Value) -> Result<()> {
        self.stream
            .send(Message::Text(payload.to_string().into()))
            .await?;
        Ok(())
    }

    /// Receive the next text frame as JSON, within a timeout
    pub async fn next_json(&mut self, timeout: Duration) -> Result<serde_json::Value> {
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                frame = self.stream.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            return Ok(serde_json::from_str(&text)?);
                        }
                        Some(Ok(_)) => continue, // ping/pong
                        Some(Err(e)) => return Err(e.into()),
                        None => return Err(anyhow!("WebSocket closed")),
                    }
                }
                _ = &mut deadline => {
                    return Err(anyhow!("Timed out waiting for WebSocket frame"));
                }
            }
        }
    }

    /// Receive the next tagged control message, skipping snapshots
    pub async fn next_control(&mut self, timeout: Duration) -> Result<serde_json::Value> {
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                frame = self.stream.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            let json: serde_json::Value = serde_json::from_str(&text)?;
                            if json.get("type").is_some() {
                                return Ok(json);
                            }
                            // Untagged frame is a snapshot; keep waiting
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(e.into()),
                        None => return Err(anyhow!("WebSocket closed")),
                    }
                }
                _ = &mut deadline => {
                    return Err(anyhow!("Timed out waiting for control message"));
                }
            }
        }
    }

    /// Assert that no control message arrives within the window;
    /// snapshots are allowed through
    pub async fn expect_no_control(&mut self, window: Duration) -> Result<()> {
        match self.next_control(window).await {
            Ok(msg) => Err(anyhow!("Unexpected control message: {}", msg)),
            Err(_) => Ok(()),
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Classify a received frame: true when it is an untagged snapshot
pub fn is_snapshot(json: &serde_json::Value) -> bool {
    json.get("type").is_none()
}
