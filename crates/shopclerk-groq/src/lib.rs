// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq chat-completions integration for the Shopclerk support service.
//!
//! [`GroqClient`] is the low-level HTTP client; [`GroqProvider`] adapts it to
//! the [`ChatProvider`] trait, fixing the prompts and sampling parameters for
//! the two pipeline roles (classification and generation).

pub mod client;
pub mod types;

pub use client::GroqClient;

use async_trait::async_trait;
use shopclerk_config::GroqConfig;
use shopclerk_core::{ChatProvider, ClerkError};

use crate::types::{ApiMessage, ChatRequest};

/// System prompt for the classification call. The model must answer with a
/// JSON object; the intent crate validates that payload before trusting any
/// field of it.
const CLASSIFY_SYSTEM_PROMPT: &str = "You are an e-commerce customer support analyst. Analyze the user's query and determine:
1. What type of information they need (product info, order status, stock levels, categories, etc.)
2. What specific data should be retrieved from the database
3. If the query is unclear, what clarifying questions to ask

Respond in JSON format with these fields:
- \"query_type\": type of query (product_search, stock_check, order_status, category_browse, top_products, unclear)
- \"data_needed\": specific data to retrieve
- \"clarifying_questions\": list of questions if query is unclear
- \"search_terms\": relevant search terms extracted from the query

E-commerce database contains: products, orders, inventory_items, users, distribution_centers";

const CLASSIFY_TEMPERATURE: f64 = 0.1;
const CLASSIFY_MAX_TOKENS: u32 = 500;
const GENERATE_TEMPERATURE: f64 = 0.3;

/// [`ChatProvider`] backed by the Groq chat-completions API.
#[derive(Debug, Clone)]
pub struct GroqProvider {
    client: GroqClient,
    model: String,
    max_tokens: u32,
}

impl GroqProvider {
    /// Build a provider from the Groq config section.
    ///
    /// Fails if no API key is configured; callers that run with the rules
    /// resolver and no generation stage never construct a provider.
    pub fn new(config: &GroqConfig) -> Result<Self, ClerkError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ClerkError::Config("groq.api_key is not set".to_string()))?;
        let client = GroqClient::new(api_key, config.base_url.clone())?;
        Ok(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    async fn classify(&self, query: &str, context: &str) -> Result<String, ClerkError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ApiMessage::system(CLASSIFY_SYSTEM_PROMPT),
                ApiMessage::user(format!("Context: {context}\n\nUser Query: {query}")),
            ],
            temperature: CLASSIFY_TEMPERATURE,
            max_tokens: CLASSIFY_MAX_TOKENS,
        };
        let response = self.client.complete(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| ClerkError::Provider {
                message: "completion response contained no choices".to_string(),
                source: None,
            })
    }

    async fn generate(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, ClerkError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ApiMessage::system(system_instruction),
                ApiMessage::user(user_message),
            ],
            temperature: GENERATE_TEMPERATURE,
            max_tokens: self.max_tokens,
        };
        let response = self.client.complete(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| ClerkError::Provider {
                message: "completion response contained no choices".to_string(),
                source: None,
            })
    }
}
