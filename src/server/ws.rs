//! WebSocket transport for the live channel.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use super::protocol::{ClientCommand, ServerMessage};
use super::session::Session;

/// Drive one observer connection until either side closes.
///
/// The observer is registered, greeted with the current snapshot (a
/// reconnecting observer never sees missed intermediate states), then served
/// by two tasks: one draining the session's outbound queue into the socket,
/// one parsing inbound commands. A transport error on either side drops the
/// observer; the server carries on.
pub async fn serve_observer(socket: WebSocket, session: Arc<Session>) {
    let (id, mut outbound) = session.register_observer();
    info!(observer = id, "observer connected");

    let (mut sink, mut stream) = socket.split();

    let greeting = session.reattachment_message().await.encode();
    if sink.send(Message::Text(greeting)).await.is_err() {
        session.deregister_observer(id);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if sink.send(Message::Text(message)).await.is_err() {
                break;
            }
        }
    });

    let recv_session = Arc::clone(&session);
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => recv_session.handle_command(id, command).await,
                    Err(err) => {
                        warn!(observer = id, error = %err, "malformed command");
                        recv_session.send_to(
                            id,
                            &ServerMessage::Error {
                                message: err.to_string(),
                            },
                        );
                    }
                },
                Message::Close(_) => break,
                _ => debug!(observer = id, "non-text frame ignored"),
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    session.deregister_observer(id);
    info!(observer = id, "observer disconnected");
}
