//! Shared test helpers: a scripted model provider and config builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tripmate::config::{self, TripConfig};
use tripmate::error::TripError;
use tripmate::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use tripmate::types::*;

/// A provider that replays queued responses and records every request.
///
/// Clones share the queue and the request log, so a test can keep one
/// handle while the agent owns another.
#[derive(Clone, Default)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<ProviderResponse, TripError>>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a final text answer.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a step that requests one or more tool calls.
    pub fn queue_tool_calls(&self, calls: &[(&str, &str, serde_json::Value)]) {
        let tool_calls = calls
            .iter()
            .map(|(id, name, args)| AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args.clone(),
            })
            .collect();
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls,
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a tool-call step that also carries some assistant text.
    pub fn queue_tool_call_with_text(&self, text: &str, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_call(id, name, args);
        if let Some(Ok(step)) = self.responses.lock().unwrap().last_mut() {
            step.text = text.to_string();
        }
    }

    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(&[(id, name, args)]);
    }

    pub fn queue_error(&self, err: TripError) {
        self.responses.lock().unwrap().push(Err(err));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, TripError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ProviderResponse {
                text: "Mock response".to_string(),
                usage: Usage::default(),
                tool_calls: vec![],
                finish_reason: Some(FinishReason::Stop),
            });
        }
        responses.remove(0)
    }
}

/// Config with an OpenAI key and every other back-end pointed at `base_url`.
pub fn config_for(base_url: &str) -> TripConfig {
    let mut config = TripConfig::new();
    config.set_api_key(config::OPENAI, "sk-test");
    config.set_api_key(config::OPENWEATHER, "weather-key");
    config.set_amadeus_credentials("amadeus-id", "amadeus-secret");
    for service in [config::OPENAI, config::OPENWEATHER, config::AMADEUS, config::DUCKDUCKGO] {
        config.set_base_url(service, base_url);
    }
    config
}
