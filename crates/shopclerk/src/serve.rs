// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `shopclerk serve` command implementation.
//!
//! Wires the configured pipeline together: SQLite store, intent resolver
//! strategy, optional Groq provider, response composer, and the HTTP gateway.

use std::sync::Arc;

use tracing::info;

use shopclerk_chat::{ChatService, DataOrchestrator, ResponseComposer};
use shopclerk_config::{ClerkConfig, ResolverMode};
use shopclerk_core::{CatalogStore, ChatProvider, ClerkError, ConversationStore};
use shopclerk_gateway::{GatewayState, ServerConfig, start_server};
use shopclerk_groq::GroqProvider;
use shopclerk_intent::{IntentResolver, LlmResolver, RuleResolver};
use shopclerk_storage::SqliteStore;

/// Runs the `shopclerk serve` command.
///
/// Blocks until the gateway server exits.
pub async fn run_serve(config: ClerkConfig) -> Result<(), ClerkError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting shopclerk serve");

    let store = Arc::new(
        SqliteStore::open(&config.storage.database_path, config.storage.wal_mode).await?,
    );
    info!(path = %config.storage.database_path, "storage initialized");

    // A provider is only constructed when something uses it; validation has
    // already confirmed the API key is present in that case.
    let provider: Option<Arc<dyn ChatProvider>> =
        if config.agent.resolver == ResolverMode::Llm || config.agent.use_generation {
            Some(Arc::new(GroqProvider::new(&config.groq)?))
        } else {
            None
        };

    let resolver: Arc<dyn IntentResolver> = match (&config.agent.resolver, &provider) {
        (ResolverMode::Llm, Some(provider)) => {
            info!(model = %config.groq.model, "using delegated intent resolver");
            Arc::new(LlmResolver::new(provider.clone()))
        }
        _ => {
            info!("using rule-based intent resolver");
            Arc::new(RuleResolver::new())
        }
    };

    let composer = match (&provider, config.agent.use_generation) {
        (Some(provider), true) => {
            info!(model = %config.groq.model, "generation stage enabled");
            ResponseComposer::with_generation(provider.clone())
        }
        _ => ResponseComposer::deterministic(),
    };

    let orchestrator = DataOrchestrator::new(store.clone() as Arc<dyn CatalogStore>);
    let service = Arc::new(ChatService::new(
        resolver,
        orchestrator,
        composer,
        store as Arc<dyn ConversationStore>,
        config.agent.context_window_turns,
    ));

    let server_config = ServerConfig {
        bind_address: config.gateway.bind_address.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, GatewayState { service }).await
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shopclerk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
