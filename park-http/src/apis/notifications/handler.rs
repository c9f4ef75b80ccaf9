use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use park_core::{NotificationHub, ParkingSession};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::http::ServerState;

/// Observer endpoint: every accepted connection receives each committed
/// session update as a JSON text frame
pub async fn observer_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| observe(socket, state.hub.clone()))
}

/// Drive one observer connection until either side ends it.
///
/// Outbound: events delivered by the hub through this observer's channel
/// are serialized onto the socket. Inbound: text frames are parsed as
/// sessions and re-published to the hub; a malformed frame terminates
/// the connection, matching the deregister-on-bad-read contract.
async fn observe(socket: WebSocket, hub: NotificationHub) {
    let (mut sink, mut stream) = socket.split();
    let (sender, mut receiver) = mpsc::unbounded_channel::<ParkingSession>();
    let observer_id = hub.register_observer(sender).await;
    debug!("[{}] observer connected", observer_id);

    let writer_id = observer_id;
    let mut write_task = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("[{}] failed to serialize event: {}", writer_id, e);
                    continue;
                }
            };
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let relay_hub = hub.clone();
    let reader_id = observer_id;
    let mut read_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => {
                    match serde_json::from_str::<ParkingSession>(&text) {
                        Ok(session) => relay_hub.publish(session),
                        Err(e) => {
                            warn!("[{}] malformed observer message: {}", reader_id, e);
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    hub.unregister_observer(&observer_id).await;
    debug!("[{}] observer disconnected", observer_id);
}
