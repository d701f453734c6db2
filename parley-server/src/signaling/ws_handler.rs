use crate::registry::DisconnectReason;
use crate::signaling::Relay;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use parley_core::ServerSignal;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(relay): State<Relay>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: Relay) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerSignal>();

    let connection_id = relay.attach(tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(signal) = rx.recv().await {
            let json = match serde_json::to_string(&signal) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize signal message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();

        async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        let _ = relay.handle_text(connection_id, text.as_str());
                    }
                    Ok(Message::Binary(_)) => {
                        relay.reject_malformed(connection_id, "binary frames are not supported");
                    }
                    Ok(Message::Close(_)) => return DisconnectReason::Closed,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket error from {}: {}", connection_id, e);
                        return DisconnectReason::Abnormal;
                    }
                }
            }
            DisconnectReason::Abnormal
        }
    });

    let reason = tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            DisconnectReason::Abnormal
        }
        res = (&mut recv_task) => {
            send_task.abort();
            res.unwrap_or(DisconnectReason::Abnormal)
        }
    };

    relay.disconnect(connection_id, reason);
    debug!("WebSocket task finished for {}", connection_id);
}
