//! The password vault: an LLM guardian protects a secret per level and the
//! player tries to talk it out of them.
//!
//! - [`secrets`] draws the secret for a level from its tier's pool.
//! - [`policy`] turns a level and secret into guardian instructions.
//! - [`Adversary`] is the guardian contract; [`LlmClient`](crate::LlmClient) implements it.
//! - [`VaultState`] holds the session and its pure transitions.
//! - [`VaultSession`] binds a state to a guardian and a random source.

mod adversary;
mod error;
mod guess;
pub mod policy;
pub mod secrets;
mod session;
mod state;
mod tier;
mod transcript;

pub use adversary::{Adversary, AdversaryError, normalize_reply};
pub use error::VaultError;
pub use guess::matches;
pub use session::{TurnOutcome, VaultSession};
pub use state::{
    CANCELLED_REPLY, FALLBACK_REPLY, GuessOutcome, TurnRequest, VaultState, VaultStatus,
};
pub use tier::{LEVELS_PER_TIER, Level, MAX_LEVEL, TIER_COUNT, Tier};
pub use transcript::{EntryKind, Speaker, Transcript, TranscriptEntry};
