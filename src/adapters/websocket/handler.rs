//! WebSocket upgrade handler for live chat.
//!
//! Handles the HTTP → WebSocket upgrade and the connection lifecycle:
//! 1. Authenticate the caller (bearer header or `?token=`)
//! 2. Verify the caller takes part in the conversation
//! 3. Upgrade and join the conversation room
//! 4. Relay room events out and client frames in until disconnect
//! 5. Leave the room

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::OptionalAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::chat::{
    GetConversationQuery, MarkReadCommand, SendMessageCommand,
};
use crate::domain::chat::ClientFrame;
use crate::domain::foundation::{ConversationId, DomainError, Timestamp, UserId};

use super::messages::ServerFrame;
use super::rooms::ClientId;

/// Direct replies queued for one socket (pongs, errors).
const DIRECT_QUEUE: usize = 32;

#[derive(Debug, Default, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// GET /api/chat/conversations/:id/ws
///
/// Browsers cannot set headers on a WebSocket handshake, so the token may
/// arrive as a query parameter instead.
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    OptionalAuth(header_user): OptionalAuth,
    Path(conversation_id): Path<ConversationId>,
    Query(params): Query<WsParams>,
) -> Result<Response, ApiError> {
    let user = match (header_user, params.token) {
        (Some(user), _) => user,
        (None, Some(token)) => state.services.sessions.validate(&token).await?,
        (None, None) => return Err(ApiError::unauthorized("Authentication required")),
    };

    let conversation = state
        .get_conversation_handler()
        .handle(GetConversationQuery {
            viewer_id: user.id,
            conversation_id,
        })
        .await?;

    let user_id = user.id;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, conversation.id)))
}

async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    user_id: UserId,
    conversation_id: ConversationId,
) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = ClientId::new();

    let mut room_rx = state.rooms.join(&conversation_id, client_id.clone()).await;

    let connected = ServerFrame::Connected {
        conversation_id,
        client_id: client_id.to_string(),
        timestamp: Timestamp::now(),
    };
    if send_json(&mut sender, &connected).await.is_err() {
        state.rooms.leave(&client_id).await;
        return;
    }
    tracing::debug!(%client_id, %conversation_id, %user_id, "Chat socket connected");

    let (direct_tx, mut direct_rx) = mpsc::channel::<ServerFrame>(DIRECT_QUEUE);

    let mut send_task = {
        let client_id = client_id.clone();
        tokio::spawn(async move {
            loop {
                let sent = tokio::select! {
                    event = room_rx.recv() => match event {
                        Ok(event) => send_json(&mut sender, &event).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(%client_id, skipped, "Chat socket lagging, events dropped");
                            Ok(())
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    frame = direct_rx.recv() => match frame {
                        Some(frame) => send_json(&mut sender, &frame).await,
                        None => break,
                    },
                };
                if let Err(e) = sent {
                    tracing::debug!(%client_id, "Send error, closing chat socket: {}", e);
                    break;
                }
            }
        })
    };

    let mut recv_task = {
        let state = state.clone();
        let client_id = client_id.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        let reply = match serde_json::from_str::<ClientFrame>(&text) {
                            Ok(frame) => handle_frame(&state, user_id, conversation_id, frame).await,
                            Err(e) => Some(ServerFrame::error("INVALID_FRAME", e.to_string())),
                        };
                        if let Some(reply) = reply {
                            if direct_tx.send(reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(%client_id, "Received unsupported binary message");
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => {
                        tracing::debug!(%client_id, "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%client_id, "Receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.rooms.leave(&client_id).await;
    tracing::debug!(%client_id, %conversation_id, "Chat socket closed");
}

/// Applies one client frame. Messages and read receipts reach every socket
/// in the room through the broadcaster, so only pongs and errors are
/// returned for the sending socket.
async fn handle_frame(
    state: &AppState,
    user_id: UserId,
    conversation_id: ConversationId,
    frame: ClientFrame,
) -> Option<ServerFrame> {
    let result = match frame {
        ClientFrame::Ping => {
            return Some(ServerFrame::Pong {
                timestamp: Timestamp::now(),
            })
        }
        ClientFrame::Send { body } => state
            .send_message_handler()
            .handle(SendMessageCommand {
                sender_id: user_id,
                conversation_id,
                body,
            })
            .await
            .map(|_| ()),
        ClientFrame::MarkRead => state
            .mark_read_handler()
            .handle(MarkReadCommand {
                reader_id: user_id,
                conversation_id,
            })
            .await
            .map(|_| ()),
    };
    result.err().map(error_frame)
}

fn error_frame(e: DomainError) -> ServerFrame {
    ServerFrame::error(e.code.to_string(), e.message)
}

async fn send_json<T: Serialize>(
    sender: &mut SplitSink<WebSocket, Message>,
    frame: &T,
) -> Result<(), axum::Error> {
    match serde_json::to_string(frame) {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::error!("Chat frame serialization failed: {}", e);
            Ok(())
        }
    }
}
