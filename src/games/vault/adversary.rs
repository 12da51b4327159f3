//! The guardian behind a single-method contract.

use crate::llm_client::LlmClient;
use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{debug, error, instrument, warn};

/// Something that can answer one player utterance under a system prompt.
///
/// Every call is a fresh single-turn exchange. Implementations must not
/// carry conversation state between calls.
#[async_trait]
pub trait Adversary: Send + Sync {
    /// Returns the guardian's reply to `player_utterance`.
    async fn converse(
        &self,
        system_prompt: &str,
        player_utterance: &str,
    ) -> Result<String, AdversaryError>;
}

#[async_trait]
impl Adversary for LlmClient {
    #[instrument(skip_all)]
    async fn converse(
        &self,
        system_prompt: &str,
        player_utterance: &str,
    ) -> Result<String, AdversaryError> {
        debug!("Asking guardian for a reply");
        let reply = self
            .generate(system_prompt, player_utterance)
            .await
            .map_err(|e| AdversaryError::new(format!("Chat completion failed: {}", e.message)))?;

        normalize_reply(&reply)
    }
}

/// Trims a raw guardian reply. A blank reply counts as a malformed payload.
#[instrument(skip_all)]
pub fn normalize_reply(raw: &str) -> Result<String, AdversaryError> {
    let reply = raw.trim();
    if reply.is_empty() {
        warn!("Guardian returned an empty reply");
        return Err(AdversaryError::new("Guardian returned an empty reply"));
    }

    Ok(reply.to_string())
}

/// The guardian could not be reached or answered with garbage.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Adversary unavailable: {} at {}:{}", message, file, line)]
pub struct AdversaryError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AdversaryError {
    /// Creates a new adversary error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Adversary error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
