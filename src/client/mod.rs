//! WebSocket viewer client.
//!
//! Connects to a running sysdash server, decodes the pushed samples, and
//! feeds a [`crate::history::ViewerState`]. The server expects no inbound
//! messages; the client only reads until the stream closes.

use anyhow::{Context, Result};
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::models::MetricSample;

pub struct ViewerClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ViewerClient {
    /// Connect to a sysdash streaming endpoint, e.g.
    /// `ws://127.0.0.1:8000/ws`.
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("failed to connect to {url}"))?;
        debug!("connected to {url}");
        Ok(Self { stream })
    }

    /// Wait for the next pushed sample. Returns `None` once the server
    /// closes the connection.
    pub async fn next_sample(&mut self) -> Result<Option<MetricSample>> {
        while let Some(message) = self.stream.next().await {
            match message.context("websocket stream failed")? {
                Message::Text(text) => {
                    let sample = serde_json::from_str(&text)
                        .context("server pushed an undecodable sample")?;
                    return Ok(Some(sample));
                }
                Message::Close(_) => return Ok(None),
                // Ping/pong handled by tungstenite; anything else is ignored.
                _ => continue,
            }
        }
        Ok(None)
    }
}
