//! Travel agent: system prompt, chat history and sessions.

pub mod agent;
pub mod conversation;
pub mod session;

pub use agent::{apology, TravelAgent, ITERATION_LIMIT_REPLY, SYSTEM_PROMPT};
pub use conversation::Conversation;
pub use session::TravelSession;
