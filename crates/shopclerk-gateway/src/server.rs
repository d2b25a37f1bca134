// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shopclerk_chat::ChatService;
use shopclerk_core::ClerkError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The assembled query-resolution pipeline.
    pub service: Arc<ChatService>,
}

/// Gateway server configuration (mirrors GatewayConfig from shopclerk-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub bind_address: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router for the given state.
///
/// Split out of [`start_server`] so tests can drive the router without
/// binding a socket.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::post_chat))
        .route("/api/conversations", post(handlers::post_conversations))
        .route(
            "/api/conversations/{conversation_id}",
            get(handlers::get_conversations).delete(handlers::delete_conversation),
        )
        .route(
            "/api/conversations/{conversation_id}/messages",
            get(handlers::get_messages),
        )
        .route("/api/users/{user_id}/statistics", get(handlers::get_statistics))
        .route("/api/products", get(handlers::get_products))
        .route("/api/orders", get(handlers::get_orders))
        .route("/api/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured address:port and serves until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), ClerkError> {
    let app = router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ClerkError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ClerkError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
