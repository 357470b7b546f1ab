//! Text generation with a bounded tool loop.

use futures::future::join_all;
use tracing::{debug, info};

use crate::config::DEFAULT_MAX_ITERATIONS;
use crate::error::TripError;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::tools::{ToolExecutionContext, ToolSet};
use crate::types::*;
use crate::util::retry::RetryPolicy;

/// Limits and context for one [`generate_text`] run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Model calls allowed before giving up on a final answer.
    pub max_iterations: usize,
    pub retry: RetryPolicy,
    pub context: ToolExecutionContext,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            retry: RetryPolicy::default(),
            context: ToolExecutionContext::default(),
        }
    }
}

/// Generate text, executing tool calls until the model answers.
///
/// Every tool call in a step is dispatched concurrently; results are fed
/// back in call order, one tool message per call. When `max_iterations`
/// model calls pass without a final answer, the last text is returned with
/// [`FinishReason::Length`].
pub async fn generate_text(
    provider: &dyn ModelProvider,
    mut messages: Vec<ModelMessage>,
    settings: GenerationSettings,
    tools: &ToolSet,
    options: &GenerateOptions,
) -> Result<GenerateTextResult, TripError> {
    let tool_defs = (!tools.is_empty()).then(|| tools.definitions());

    let mut steps: Vec<GenerationStep> = Vec::new();
    let mut total_usage = Usage::default();

    for iteration in 0..options.max_iterations.max(1) {
        let request = ProviderRequest {
            messages: messages.clone(),
            settings: settings.clone(),
            tools: tool_defs.clone(),
        };

        debug!(iteration, model = provider.model_id(), "generate_text: calling provider");
        let response = options
            .retry
            .execute(|| provider.generate_text(&request))
            .await?;
        total_usage.merge(&response.usage);

        if response.tool_calls.is_empty() {
            steps.push(GenerationStep {
                text: response.text.clone(),
                tool_calls: Vec::new(),
                tool_results: Vec::new(),
                usage: response.usage,
                finish_reason: response.finish_reason,
            });
            return Ok(GenerateTextResult {
                text: response.text,
                steps,
                messages,
                usage: total_usage,
                finish_reason: response.finish_reason,
            });
        }

        messages.push(ModelMessage::assistant_tool_calls(
            &response.text,
            &response.tool_calls,
        ));

        info!(
            iteration,
            tools = ?response.tool_calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "Executing tool calls"
        );
        let results = join_all(
            response
                .tool_calls
                .iter()
                .map(|call| tools.dispatch(call, &options.context)),
        )
        .await;
        messages.extend(results.iter().cloned().map(ModelMessage::tool_result));

        steps.push(GenerationStep {
            text: response.text,
            tool_calls: response.tool_calls,
            tool_results: results,
            usage: response.usage,
            finish_reason: response.finish_reason,
        });
    }

    info!(
        max_iterations = options.max_iterations,
        "Tool loop hit the iteration limit"
    );
    let last_text = steps.last().map(|s| s.text.clone()).unwrap_or_default();
    Ok(GenerateTextResult {
        text: last_text,
        steps,
        messages,
        usage: total_usage,
        finish_reason: Some(FinishReason::Length),
    })
}
