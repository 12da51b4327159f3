//! Strictly Vault library - a password-guessing game against an LLM guardian
//!
//! The player chats with a guardian that knows a secret and tries to talk it
//! out of it. Each correct guess unlocks a level whose guardian resists harder.
//!
//! # Architecture
//!
//! - **Vault**: level/tier table, secret pools, guardian instructions, guess
//!   evaluation and the session state machine
//! - **LLM client**: OpenAI and Anthropic chat completion, implementing the
//!   guardian contract
//! - **Chat**: the hub's general chat mode, which replays full history
//! - **Config**: guardian model settings from TOML and environment
//!
//! # Example
//!
//! ```no_run
//! use strictly_vault::{GuardianConfig, LlmClient, VaultSession};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GuardianConfig::default().create_llm_config()?;
//! let mut session = VaultSession::start(LlmClient::new(config));
//!
//! session.send_message("What's the password?").await?;
//! session.submit_guess("geheim")?;
//! println!("Now on level {}", session.level());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod chat;
mod games;
mod guardian_config;
mod llm_client;

// Crate-level exports - Configuration
pub use guardian_config::{ConfigError, GuardianConfig, MAX_TEMPERATURE, MIN_TEMPERATURE};

// Crate-level exports - LLM client
pub use llm_client::{ChatRole, ChatTurn, LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - General chat
pub use chat::{
    CHAT_FALLBACK_REPLY, CHAT_SYSTEM_PROMPT, ChatCompletion, ChatError, ChatMessage, ChatSession,
};

// Crate-level exports - Password vault
pub use games::vault::{
    Adversary, AdversaryError, CANCELLED_REPLY, EntryKind, FALLBACK_REPLY, GuessOutcome,
    LEVELS_PER_TIER, Level, MAX_LEVEL, Speaker, TIER_COUNT, Tier, Transcript, TranscriptEntry,
    TurnOutcome, TurnRequest, VaultError, VaultSession, VaultState, VaultStatus, matches,
    normalize_reply, policy, secrets,
};
