use crate::llm::chat::ChatClient;
use crate::llm::LlmError;
use crate::models::chat::{ ChatMessage, Conversation };

use log::{ info, warn };
use std::sync::Arc;
use uuid::Uuid;

/// What happens to the user message when the completion call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the unanswered user message in the conversation.
    #[default]
    KeepUserMessage,
    /// Remove it again, so the failed turn leaves no trace.
    Rollback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Empty or whitespace-only input; nothing was sent.
    Ignored,
    Answered(String),
}

/// One interactive session: a conversation plus the client that answers it.
///
/// Turns take `&mut self`, so a session can never have two completion calls in
/// flight at once.
pub struct ChatSession {
    id: String,
    conversation: Conversation,
    client: Arc<dyn ChatClient>,
    failure_policy: FailurePolicy,
}

impl ChatSession {
    pub fn new(
        client: Arc<dyn ChatClient>,
        system_prompt: impl Into<String>,
        failure_policy: FailurePolicy
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation: Conversation::new(system_prompt),
            client,
            failure_policy,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns `false` (and changes nothing) for blank input.
    pub fn append_user_message(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.conversation.push_user(text);
        true
    }

    pub async fn request_completion(&self) -> Result<String, LlmError> {
        self.client.complete(self.conversation.messages()).await
    }

    pub fn append_assistant_message(&mut self, text: impl Into<String>) {
        self.conversation.push_assistant(text);
    }

    /// Snapshot of the visible turns, system message excluded.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.conversation.turns().to_vec()
    }

    pub async fn submit(&mut self, text: &str) -> Result<TurnOutcome, LlmError> {
        if !self.append_user_message(text) {
            return Ok(TurnOutcome::Ignored);
        }
        self.answer_pending().await.map(TurnOutcome::Answered)
    }

    /// Second half of a turn: asks for a reply to the conversation as it
    /// stands and records it. On failure the failure policy decides what
    /// happens to the unanswered user message.
    pub async fn answer_pending(&mut self) -> Result<String, LlmError> {
        match self.request_completion().await {
            Ok(reply) => {
                self.append_assistant_message(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                if self.failure_policy == FailurePolicy::Rollback {
                    self.conversation.pop_unanswered();
                    info!("Session {}: rolled back unanswered user message", self.id);
                } else {
                    warn!("Session {}: user message left unanswered", self.id);
                }
                Err(e)
            }
        }
    }
}

/// Builds a fresh session for every connection; the client is shared.
#[derive(Clone)]
pub struct SessionFactory {
    client: Arc<dyn ChatClient>,
    system_prompt: String,
    failure_policy: FailurePolicy,
}

impl SessionFactory {
    pub fn new(
        client: Arc<dyn ChatClient>,
        system_prompt: impl Into<String>,
        failure_policy: FailurePolicy
    ) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
            failure_policy,
        }
    }

    pub fn create(&self) -> ChatSession {
        ChatSession::new(Arc::clone(&self.client), self.system_prompt.clone(), self.failure_policy)
    }
}
