//! Errors raised by the vault engine.

use derive_more::{Display, Error};

/// Reasons a vault operation was rejected.
///
/// None of these end a session, and each leaves the state untouched. A
/// guardian that cannot answer is not a rejection: the turn completes with a
/// fallback entry and the [`AdversaryError`](super::AdversaryError) comes back
/// in [`TurnOutcome::Fallback`](super::TurnOutcome::Fallback).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum VaultError {
    /// The guess was empty or whitespace only.
    #[display("Guess must not be empty")]
    InvalidGuessInput,

    /// The chat message was empty or whitespace only.
    #[display("Message must not be empty")]
    EmptyMessage,

    /// The vault is already open; restart to play again.
    #[display("The vault is already open, restart to play again")]
    InvalidLevelTransition,

    /// A guardian reply is still outstanding for this session.
    #[display("Still waiting for the guardian's reply")]
    TurnInProgress,
}
