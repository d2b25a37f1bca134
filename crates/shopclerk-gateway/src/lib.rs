// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway exposing the Shopclerk support pipeline as a REST API.
//!
//! The gateway is a thin axum layer over [`shopclerk_chat::ChatService`]:
//! handlers decode requests, call the service, and map outcomes and errors
//! onto JSON bodies and status codes.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, router, start_server};
