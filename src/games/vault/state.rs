//! Vault session state and its transitions.
//!
//! Every transition borrows the current [`VaultState`] and returns the next
//! one. A rejected transition returns an error and the caller keeps the
//! state it already had, so rejections can never half-apply.

use super::adversary::AdversaryError;
use super::error::VaultError;
use super::guess;
use super::policy;
use super::secrets;
use super::tier::{Level, MAX_LEVEL};
use super::transcript::{EntryKind, Transcript, TranscriptEntry};
use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Shown when the guardian call fails.
pub const FALLBACK_REPLY: &str =
    "The guardian is not answering right now. Try again in a moment.";

/// Shown when a guardian call was cancelled before it returned.
pub const CANCELLED_REPLY: &str = "The guardian's reply was cancelled. Ask again.";

/// Lifecycle status of a vault session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VaultStatus {
    /// Guesses and messages are accepted.
    InProgress,
    /// The final secret was guessed. Terminal until restart.
    Won,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessOutcome {
    /// The guess did not match; nothing changed but the transcript.
    Wrong,
    /// The guess matched and the session moved to this level.
    LevelUp(Level),
    /// The final secret was guessed.
    Victory,
}

/// What to send to the guardian for a turn opened by [`VaultState::begin_turn`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TurnRequest {
    system_prompt: String,
    utterance: String,
}

/// Complete state of one password-game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultState {
    level: Level,
    secret: String,
    transcript: Transcript,
    pending_guess: String,
    status: VaultStatus,
    awaiting_reply: bool,
}

impl VaultState {
    /// Creates a fresh session on level 1.
    #[instrument(skip(rng))]
    pub fn start<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let level = Level::FIRST;
        info!(level = %level, "Starting vault session");
        Self {
            level,
            secret: secrets::generate(level, rng),
            transcript: Transcript::new(),
            pending_guess: String::new(),
            status: VaultStatus::InProgress,
            awaiting_reply: false,
        }
    }

    /// Discards everything and starts over on level 1 with a new secret.
    #[instrument(skip(self, rng), fields(level = %self.level))]
    pub fn restart<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        info!("Restarting vault session");
        Self::start(rng)
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The live secret. Front ends must not display it.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Everything said so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current guess-box content.
    pub fn pending_guess(&self) -> &str {
        &self.pending_guess
    }

    /// Session status.
    pub fn status(&self) -> VaultStatus {
        self.status
    }

    /// True while a guardian reply is outstanding.
    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// True once the final secret was guessed.
    pub fn is_won(&self) -> bool {
        self.status == VaultStatus::Won
    }

    /// Replaces the guess-box content.
    #[instrument(skip_all)]
    pub fn with_pending_guess(&self, text: impl Into<String>) -> Self {
        Self {
            pending_guess: text.into(),
            ..self.clone()
        }
    }

    /// Opens a chat turn: records the player's message and returns the
    /// single-turn request for the guardian.
    ///
    /// No earlier transcript is included in the request.
    #[instrument(skip(self, text), fields(level = %self.level))]
    pub fn begin_turn(&self, text: &str) -> Result<(Self, TurnRequest), VaultError> {
        self.ensure_accepting()?;

        let text = text.trim();
        if text.is_empty() {
            warn!("Rejected empty chat message");
            return Err(VaultError::EmptyMessage);
        }

        let mut next = self.clone();
        next.transcript.push(TranscriptEntry::player(text));
        next.awaiting_reply = true;

        let request = TurnRequest {
            system_prompt: policy::instructions_for(self.level, &self.secret),
            utterance: text.to_string(),
        };

        debug!(utterance_length = text.len(), "Opened chat turn");
        Ok((next, request))
    }

    /// Closes the open turn with the guardian's reply, or a fallback entry if
    /// the guardian failed. Level and secret never change here.
    #[instrument(skip(self, reply), fields(level = %self.level))]
    pub fn complete_turn(&self, reply: Result<String, AdversaryError>) -> Self {
        if !self.awaiting_reply {
            warn!("No open turn to complete");
            return self.clone();
        }

        let mut next = self.clone();
        next.awaiting_reply = false;

        match reply {
            Ok(text) => {
                debug!(reply_length = text.len(), "Guardian replied");
                next.transcript
                    .push(TranscriptEntry::notice(EntryKind::Utterance, text));
            }
            Err(e) => {
                warn!(error = %e, "Guardian unavailable, appending fallback");
                next.transcript
                    .push(TranscriptEntry::notice(EntryKind::Fallback, FALLBACK_REPLY));
            }
        }

        next
    }

    /// Closes a turn whose guardian call was dropped before it returned.
    #[instrument(skip(self), fields(level = %self.level))]
    pub fn abandon_turn(&self) -> Self {
        if !self.awaiting_reply {
            return self.clone();
        }

        info!("Abandoning open turn");
        let mut next = self.clone();
        next.awaiting_reply = false;
        next.transcript
            .push(TranscriptEntry::notice(EntryKind::Fallback, CANCELLED_REPLY));
        next
    }

    /// Evaluates a guess and moves the session accordingly.
    ///
    /// The guess box is cleared whenever the guess is evaluated.
    #[instrument(skip(self, text, rng), fields(level = %self.level))]
    pub fn submit_guess<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> Result<(Self, GuessOutcome), VaultError> {
        self.ensure_accepting()?;

        if text.trim().is_empty() {
            warn!("Rejected empty guess");
            return Err(VaultError::InvalidGuessInput);
        }

        let mut next = self.clone();
        next.pending_guess.clear();

        if !guess::matches(text, &self.secret) {
            info!("Wrong guess");
            next.transcript.push(TranscriptEntry::notice(
                EntryKind::WrongGuess,
                format!(
                    "Wrong password. The vault stays locked at level {}.",
                    self.level
                ),
            ));
            return Ok((next, GuessOutcome::Wrong));
        }

        match self.level.next() {
            Some(level) => {
                info!(from = %self.level, to = %level, "Correct guess, level up");
                next.level = level;
                next.secret = secrets::generate_excluding(level, &self.secret, rng);
                next.transcript.push(TranscriptEntry::notice(
                    EntryKind::LevelUp,
                    format!(
                        "Correct! Level {} cleared. Welcome to level {}, the guardian is more careful now.",
                        self.level, level
                    ),
                ));
                Ok((next, GuessOutcome::LevelUp(level)))
            }
            None => {
                info!("Final secret guessed, vault open");
                next.status = VaultStatus::Won;
                next.transcript.push(TranscriptEntry::notice(
                    EntryKind::Victory,
                    format!(
                        "Correct! You cracked all {} levels. The vault is open.",
                        MAX_LEVEL
                    ),
                ));
                Ok((next, GuessOutcome::Victory))
            }
        }
    }

    /// Evaluates the current guess-box content.
    #[instrument(skip(self, rng), fields(level = %self.level))]
    pub fn submit_pending_guess<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Self, GuessOutcome), VaultError> {
        self.submit_guess(&self.pending_guess, rng)
    }

    fn ensure_accepting(&self) -> Result<(), VaultError> {
        if self.status == VaultStatus::Won {
            warn!("Rejected action on a finished vault");
            return Err(VaultError::InvalidLevelTransition);
        }
        if self.awaiting_reply {
            warn!("Rejected action while a reply is outstanding");
            return Err(VaultError::TurnInProgress);
        }
        Ok(())
    }
}
