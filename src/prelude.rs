//! Convenience re-exports for common use.

pub use crate::agent::{Conversation, TravelAgent, TravelSession};
pub use crate::config::TripConfig;
pub use crate::error::{Result, TripError};
pub use crate::generation::{generate_text, GenerateOptions};
pub use crate::provider::ModelProvider;
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments, ToolSet};
pub use crate::types::{
    ContentPart, FinishReason, GenerateTextResult, GenerationSettings, ModelMessage, Role, Usage,
};
