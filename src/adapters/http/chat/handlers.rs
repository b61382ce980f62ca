//! HTTP handlers for `/api/chat`. All require authentication.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::chat::{
    GetConversationQuery, ListMessagesQuery, MarkReadCommand, SendMessageCommand,
    StartConversationCommand,
};
use crate::domain::foundation::{ConversationId, PageQuery};

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{MarkReadResponse, SendMessageRequest, StartConversationRequest};

/// POST /api/chat/conversations - finds or opens the thread with the owner
pub async fn start_conversation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<StartConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation = state
        .start_conversation_handler()
        .handle(StartConversationCommand {
            buyer_id: user.id,
            property_id: req.property_id,
        })
        .await?;
    Ok(Json(conversation))
}

/// GET /api/chat/conversations - with last message preview and unread count
pub async fn list_conversations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.list_conversations_handler().handle(user.id).await?;
    Ok(Json(summaries))
}

/// GET /api/chat/conversations/:id
pub async fn get_conversation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(conversation_id): Path<ConversationId>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation = state
        .get_conversation_handler()
        .handle(GetConversationQuery {
            viewer_id: user.id,
            conversation_id,
        })
        .await?;
    Ok(Json(conversation))
}

/// GET /api/chat/conversations/:id/messages - newest first
pub async fn list_messages(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(conversation_id): Path<ConversationId>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state
        .list_messages_handler()
        .handle(ListMessagesQuery {
            viewer_id: user.id,
            conversation_id,
            page: page.into(),
        })
        .await?;
    Ok(Json(messages))
}

/// POST /api/chat/conversations/:id/messages
pub async fn send_message(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(conversation_id): Path<ConversationId>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .send_message_handler()
        .handle(SendMessageCommand {
            sender_id: user.id,
            conversation_id,
            body: req.body,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/chat/conversations/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(conversation_id): Path<ConversationId>,
) -> Result<impl IntoResponse, ApiError> {
    let marked = state
        .mark_read_handler()
        .handle(MarkReadCommand {
            reader_id: user.id,
            conversation_id,
        })
        .await?;
    Ok(Json(MarkReadResponse { marked }))
}
