use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::websocket::chat_ws_handler;

use super::super::state::AppState;
use super::handlers::{
    get_conversation, list_conversations, list_messages, mark_read, send_message,
    start_conversation,
};

/// Routes mounted at `/api/chat`.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            get(list_conversations).post(start_conversation),
        )
        .route("/conversations/:id", get(get_conversation))
        .route(
            "/conversations/:id/messages",
            get(list_messages).post(send_message),
        )
        .route("/conversations/:id/read", post(mark_read))
        .route("/conversations/:id/ws", get(chat_ws_handler))
}
