// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Every handler is a thin translation layer over [`ChatService`]: decode the
//! request, call the service, map the outcome or error onto a status code and
//! JSON body. No business logic lives here.
//!
//! [`ChatService`]: shopclerk_chat::ChatService

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use shopclerk_core::{
    ClerkError, Conversation, ConversationStats, ConversationSummary, OrderRecord, StoredMessage,
    types::ProductRow,
};

use crate::server::GatewayState;

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Identifier of the user sending the message.
    pub user_id: String,
    /// Message content text.
    pub message: String,
    /// Optional conversation ID to continue an existing conversation.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Response body for POST /api/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Response text from the pipeline.
    pub response: String,
    /// Kind tag of the reply ("stock_check", "order_status", ...).
    pub response_type: String,
    /// Structured rows backing the reply, when any were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Conversation ID (may be newly created).
    pub conversation_id: String,
}

/// Request body for POST /api/conversations.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Query parameters for conversation listing.
#[derive(Debug, Deserialize)]
pub struct ConversationListQuery {
    #[serde(default = "default_conversation_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

fn default_conversation_limit() -> i64 {
    20
}

/// Query parameters for message and catalog listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

fn default_page_limit() -> i64 {
    50
}

/// Response body for GET /api/conversations/{user_id}.
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
}

/// Response body for GET /api/conversations/{conversation_id}/messages.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub conversation: Conversation,
    pub messages: Vec<StoredMessage>,
}

/// Response body for DELETE /api/conversations/{conversation_id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Response body for GET /api/products.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductRow>,
}

/// Response body for GET /api/orders.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderRecord>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy".
    pub status: String,
    /// Binary version.
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Map a pipeline error onto a status code and JSON body.
///
/// Client mistakes get 4xx with the error text; everything else is logged
/// server-side and answered with an opaque 500.
fn error_response(err: ClerkError) -> Response {
    let (status, message) = match &err {
        ClerkError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        ClerkError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        _ => {
            tracing::error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse { error: message })).into_response()
}

/// POST /api/chat
///
/// Runs one chat turn through the pipeline and returns the composed reply.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    match state
        .service
        .chat(&body.user_id, body.conversation_id.as_deref(), &body.message)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ChatResponse {
                response: outcome.response_text,
                response_type: outcome.kind,
                data: outcome.payload,
                conversation_id: outcome.conversation_id,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/conversations
///
/// Creates a conversation without sending a message.
pub async fn post_conversations(
    State(state): State<GatewayState>,
    Json(body): Json<CreateConversationRequest>,
) -> Response {
    match state
        .service
        .create_conversation(&body.user_id, body.title)
        .await
    {
        Ok(conversation) => (StatusCode::CREATED, Json(conversation)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/conversations/{user_id}
///
/// Lists a user's conversations, most recent activity first, with a preview
/// of each conversation's last message.
pub async fn get_conversations(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
    Query(query): Query<ConversationListQuery>,
) -> Response {
    match state
        .service
        .list_conversations(&user_id, query.limit, query.skip)
        .await
    {
        Ok(conversations) => {
            (StatusCode::OK, Json(ConversationListResponse { conversations })).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// GET /api/conversations/{conversation_id}/messages
///
/// Returns the conversation and a page of its messages in sequence order.
/// 404 when the conversation does not exist.
pub async fn get_messages(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    match state
        .service
        .get_messages(&conversation_id, query.limit, query.skip)
        .await
    {
        Ok((conversation, messages)) => (
            StatusCode::OK,
            Json(MessageListResponse {
                conversation,
                messages,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// DELETE /api/conversations/{conversation_id}
///
/// Deletes a conversation and its messages. 404 when it does not exist.
pub async fn delete_conversation(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
) -> Response {
    match state.service.delete_conversation(&conversation_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(DeleteResponse {
                message: "Conversation deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => error_response(ClerkError::not_found("conversation", conversation_id)),
        Err(err) => error_response(err),
    }
}

/// GET /api/users/{user_id}/statistics
pub async fn get_statistics(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.service.statistics(&user_id).await {
        Ok(stats) => (StatusCode::OK, Json::<ConversationStats>(stats)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/products
///
/// Distinct catalog products with availability counts.
pub async fn get_products(
    State(state): State<GatewayState>,
    Query(query): Query<PageQuery>,
) -> Response {
    match state.service.catalog().list_products(query.limit).await {
        Ok(products) => (StatusCode::OK, Json(ProductListResponse { products })).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/orders
///
/// Most recent orders.
pub async fn get_orders(
    State(state): State<GatewayState>,
    Query(query): Query<PageQuery>,
) -> Response {
    match state.service.catalog().list_orders(query.limit).await {
        Ok(orders) => (StatusCode::OK, Json(OrderListResponse { orders })).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/health
///
/// Probes store connectivity. 200 "healthy" or 503 "unhealthy".
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    match state.service.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                error: None,
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                error: Some(err.to_string()),
            }),
        )
            .into_response(),
    }
}
