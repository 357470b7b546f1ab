//! Name-indexed tool collection and call dispatch.

use std::sync::Arc;

use tracing::{debug, warn};

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::validation::validate_arguments;
use crate::provider::ToolDefinition;
use crate::types::{AgentToolCall, AgentToolResult};

/// An ordered set of tools exposed to the model.
///
/// Registration order is the order definitions are sent to the model.
/// Registering a tool whose name is already taken replaces the earlier one.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions in the shape providers send to the model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    }

    /// Run one model-requested call.
    ///
    /// Never fails: unknown tools, invalid arguments and execution errors
    /// all come back as error results for the model to read.
    pub async fn dispatch(
        &self,
        call: &AgentToolCall,
        ctx: &ToolExecutionContext,
    ) -> AgentToolResult {
        let Some(tool) = self.get(&call.name) else {
            warn!(tool = %call.name, "Tool not found");
            return AgentToolResult::error(&call.id, format!("Tool '{}' not found", call.name));
        };

        let args = ToolArguments::new(call.arguments.clone());
        if let Err(message) = validate_arguments(args.raw(), &tool.parameters().schema) {
            warn!(tool = %call.name, %message, "Rejected tool arguments");
            return AgentToolResult::error(
                &call.id,
                format!("Invalid arguments for {}: {message}", call.name),
            );
        }

        debug!(tool = %call.name, session = ?ctx.session_id, "Dispatching tool call");
        match tool.execute(&args, ctx).await {
            Ok(value) => AgentToolResult::ok(&call.id, value),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                AgentToolResult::error(&call.id, e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
