//! A chat session: one agent plus its running history.

use tracing::debug;
use uuid::Uuid;

use super::agent::TravelAgent;
use super::conversation::Conversation;
use crate::tools::ToolExecutionContext;

/// Stateful wrapper that feeds each reply back as history.
#[derive(Debug)]
pub struct TravelSession {
    id: Uuid,
    agent: TravelAgent,
    conversation: Conversation,
}

impl TravelSession {
    pub fn new(agent: TravelAgent) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent,
            conversation: Conversation::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn agent(&self) -> &TravelAgent {
        &self.agent
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Send one user message and record the exchange.
    ///
    /// Failed turns are recorded too, so the model sees its own apology
    /// on the next turn.
    pub async fn send(&mut self, message: &str) -> String {
        let reply = self
            .agent
            .chat_in(
                message,
                self.conversation.messages(),
                ToolExecutionContext::for_session(self.id),
            )
            .await;
        self.conversation.push_exchange(message, reply.clone());
        debug!(session = %self.id, turns = self.conversation.turns(), "Recorded exchange");
        reply
    }

    /// Forget the history; the session id is kept.
    pub fn clear(&mut self) {
        self.conversation.clear();
        debug!(session = %self.id, "Cleared conversation");
    }
}
