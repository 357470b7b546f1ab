//! The travel agent: system prompt, travel tools and the executor.

use tracing::{error, info};

use crate::config::TripConfig;
use crate::error::TripError;
use crate::generation::{generate_text, GenerateOptions};
use crate::provider::{self, ModelProvider};
use crate::tools::{ToolExecutionContext, ToolSet};
use crate::travel::travel_tools;
use crate::types::*;

/// Persona and working instructions sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "\
You are an AI Travel Agent assistant. Your job is to help users plan their trips by:

1. Understanding their travel requirements (destination, dates, budget, preferences)
2. Searching for flights, hotels, and activities
3. Providing weather information and travel recommendations
4. Creating comprehensive travel itineraries

Always be helpful, friendly, and provide detailed information. When users ask for travel \
planning, ask follow-up questions to understand their preferences better.

Use the available tools to search for flights, hotels, weather, and recommendations. \
Provide clear, organized responses with all relevant information.";

/// Reply used when the tool loop runs out of iterations without any text.
pub const ITERATION_LIMIT_REPLY: &str = "Agent stopped due to iteration limit or time limit.";

/// A travel-planning assistant over a chat model and the travel tools.
///
/// The agent holds no conversation state; callers pass the history in.
/// See [`TravelSession`](super::TravelSession) for a stateful wrapper.
pub struct TravelAgent {
    provider: Box<dyn ModelProvider>,
    tools: ToolSet,
    settings: GenerationSettings,
    options: GenerateOptions,
}

impl TravelAgent {
    /// Build the agent from configuration.
    ///
    /// Fails when no OpenAI API key is configured. Missing travel API
    /// credentials only affect the tools that need them.
    pub fn new(config: &TripConfig) -> Result<Self, TripError> {
        let provider = provider::create_provider(config)?;
        Ok(Self::with_provider(provider, travel_tools(config), config))
    }

    /// Build the agent around an existing provider and tool set.
    pub fn with_provider(
        provider: Box<dyn ModelProvider>,
        tools: ToolSet,
        config: &TripConfig,
    ) -> Self {
        info!(
            model = provider.model_id(),
            tools = ?tools.names(),
            "Travel agent ready"
        );
        Self {
            provider,
            tools,
            settings: GenerationSettings::builder()
                .temperature(config.temperature())
                .build(),
            options: GenerateOptions {
                max_iterations: config.max_iterations(),
                ..GenerateOptions::default()
            },
        }
    }

    /// Replace the executor limits (retry policy, iteration bound).
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// Run the executor for `message` on top of `history`.
    pub async fn run(
        &self,
        message: &str,
        history: &[ModelMessage],
        context: ToolExecutionContext,
    ) -> Result<GenerateTextResult, TripError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ModelMessage::system(SYSTEM_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(ModelMessage::user(message));

        let options = GenerateOptions {
            context,
            ..self.options.clone()
        };
        generate_text(
            self.provider.as_ref(),
            messages,
            self.settings.clone(),
            &self.tools,
            &options,
        )
        .await
    }

    /// Answer `message` given the prior `history`.
    ///
    /// Never fails: any error becomes an apology asking the user to rephrase.
    pub async fn chat(&self, message: &str, history: &[ModelMessage]) -> String {
        self.chat_in(message, history, ToolExecutionContext::default())
            .await
    }

    pub(crate) async fn chat_in(
        &self,
        message: &str,
        history: &[ModelMessage],
        context: ToolExecutionContext,
    ) -> String {
        match self.run(message, history, context).await {
            Ok(result) => {
                info!(
                    steps = result.steps.len(),
                    total_tokens = result.usage.total_tokens,
                    finish_reason = ?result.finish_reason,
                    "Chat turn complete"
                );
                if result.finish_reason == Some(FinishReason::Length) && result.text.trim().is_empty() {
                    ITERATION_LIMIT_REPLY.to_string()
                } else {
                    result.text
                }
            }
            Err(e) => {
                error!(error = %e, category = ?e.category(), "Chat turn failed");
                apology(&e)
            }
        }
    }
}

impl std::fmt::Debug for TravelAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelAgent")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("tools", &self.tools)
            .finish()
    }
}

/// The reply shown when a turn fails.
pub fn apology(err: &TripError) -> String {
    format!("I encountered an error: {err}. Please try rephrasing your request.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_openai_key_fails_construction() {
        let err = TravelAgent::new(&TripConfig::new()).unwrap_err();
        assert!(matches!(err, TripError::Configuration(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn agent_registers_the_travel_tools() {
        let mut config = TripConfig::new();
        config.set_api_key(crate::config::OPENAI, "sk-test");
        let agent = TravelAgent::new(&config).unwrap();
        assert_eq!(agent.tools().len(), 4);
        assert_eq!(agent.model_id(), "gpt-3.5-turbo");
    }

    #[test]
    fn apology_wraps_the_error() {
        let text = apology(&TripError::Timeout(120_000));
        assert_eq!(
            text,
            "I encountered an error: Timeout after 120000ms. Please try rephrasing your request."
        );
    }

    #[test]
    fn system_prompt_lists_the_four_duties() {
        for duty in ["1. Understanding", "2. Searching", "3. Providing", "4. Creating"] {
            assert!(SYSTEM_PROMPT.contains(duty));
        }
    }
}
