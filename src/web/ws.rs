//! WebSocket streaming endpoint.
//!
//! Each accepted upgrade creates one [`Session`] and spawns one session
//! loop. The handler task drains inbound frames only to notice disconnects;
//! no viewer messages are expected or processed. A close or socket error
//! cancels the loop, which prevents any further push or append for this
//! session within one tick period.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::AppState;
use crate::errors::DeliveryError;
use crate::models::MetricSample;
use crate::session::{run_session_loop, SampleSink, Session};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let session = Session::new(state.config.sampler.progress_step);
    let session_id = session.id();
    info!(session_id = %session_id, "viewer connected");

    let (sender, mut receiver) = socket.split();
    let cancel = CancellationToken::new();
    let period = Duration::from_secs(state.config.sampler.period_secs);

    let loop_task = tokio::spawn(run_session_loop(
        Arc::clone(&state.sampler),
        Arc::clone(&state.sample_log),
        WebSocketSink { sender },
        session,
        period,
        cancel.clone(),
    ));

    tokio::select! {
        _ = wait_for_disconnect(&mut receiver) => cancel.cancel(),
        // The loop cancels itself when a push hits a dead connection.
        _ = cancel.cancelled() => {}
    }
    let _ = loop_task.await;

    info!(session_id = %session_id, "viewer disconnected");
}

/// Block until the viewer closes the connection or the socket breaks.
async fn wait_for_disconnect(receiver: &mut SplitStream<WebSocket>) {
    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Close(_)) | Err(_) => break,
            // Inbound viewer messages are not part of the protocol.
            Ok(_) => {}
        }
    }
}

struct WebSocketSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl SampleSink for WebSocketSink {
    async fn deliver(&mut self, sample: &MetricSample) -> Result<(), DeliveryError> {
        let payload =
            serde_json::to_string(sample).map_err(|e| DeliveryError::send_failed(e.to_string()))?;
        self.sender
            .send(Message::Text(payload))
            .await
            .map_err(|_| DeliveryError::ConnectionClosed)
    }
}
