//! General chat mode of the hub.
//!
//! Unlike the vault, every request here replays the whole conversation.

use crate::llm_client::{ChatRole, ChatTurn, LlmClient, LlmError};
use async_trait::async_trait;
use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument, warn};

/// System prompt for general chat.
pub const CHAT_SYSTEM_PROMPT: &str =
    "You are a friendly and helpful assistant. Answer clearly and concisely.";

/// Shown when the chat backend fails.
pub const CHAT_FALLBACK_REPLY: &str =
    "Sorry, I could not reach the assistant. Please try again.";

/// A chat-completion backend that accepts full conversation history.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the next assistant message for `history`.
    async fn complete(&self, system_prompt: &str, history: &[ChatTurn])
    -> Result<String, LlmError>;
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
    ) -> Result<String, LlmError> {
        self.generate_with_history(system_prompt, history).await
    }
}

/// A message in the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    turn: ChatTurn,
    fallback: bool,
    replayed: bool,
}

impl ChatMessage {
    /// Who said it.
    pub fn role(&self) -> ChatRole {
        self.turn.role
    }

    /// What was said.
    pub fn content(&self) -> &str {
        &self.turn.content
    }

    /// True for local error notices.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// False for fallback notices and the user messages they answered.
    /// Only replayed messages are sent back to the model.
    pub fn is_replayed(&self) -> bool {
        self.replayed
    }
}

/// Errors from a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum ChatError {
    /// The message was empty or whitespace only.
    #[display("Message must not be empty")]
    EmptyMessage,
    /// The backend failed; a fallback message was logged.
    #[display("{}", _0)]
    #[from]
    Backend(LlmError),
}

/// Multi-turn chat that sends the full history on every request.
#[derive(Debug)]
pub struct ChatSession<C> {
    backend: C,
    system_prompt: String,
    messages: Vec<ChatMessage>,
}

impl<C: ChatCompletion> ChatSession<C> {
    /// Creates a session with the default system prompt.
    #[instrument(skip(backend))]
    pub fn new(backend: C) -> Self {
        Self::with_system_prompt(backend, CHAT_SYSTEM_PROMPT)
    }

    /// Creates a session with a custom system prompt.
    #[instrument(skip(backend, system_prompt))]
    pub fn with_system_prompt(backend: C, system_prompt: impl Into<String>) -> Self {
        info!("Starting chat session");
        Self {
            backend,
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
        }
    }

    /// The backend behind this session.
    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// All messages, including fallback notices.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends `text` with the full history and records the reply.
    #[instrument(skip(self, text), fields(history = self.messages.len()))]
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            warn!("Rejected empty chat message");
            return Err(ChatError::EmptyMessage);
        }

        self.messages.push(ChatMessage {
            turn: ChatTurn::user(text),
            fallback: false,
            replayed: true,
        });

        let history: Vec<ChatTurn> = self
            .messages
            .iter()
            .filter(|m| m.replayed)
            .map(|m| m.turn.clone())
            .collect();

        debug!(turns = history.len(), "Replaying history");
        match self.backend.complete(&self.system_prompt, &history).await {
            Ok(reply) => {
                self.messages.push(ChatMessage {
                    turn: ChatTurn::assistant(reply.clone()),
                    fallback: false,
                    replayed: true,
                });
                Ok(reply)
            }
            Err(e) => {
                warn!(error = %e, "Chat backend failed, appending fallback");
                // Keep replayed history alternating user/assistant.
                if let Some(unanswered) = self.messages.last_mut() {
                    unanswered.replayed = false;
                }
                self.messages.push(ChatMessage {
                    turn: ChatTurn::assistant(CHAT_FALLBACK_REPLY),
                    fallback: true,
                    replayed: false,
                });
                Err(e.into())
            }
        }
    }

    /// Forgets the conversation.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        info!(dropped = self.messages.len(), "Clearing chat history");
        self.messages.clear();
    }
}
