//! A vault session bound to a guardian and a random source.

use super::adversary::{Adversary, AdversaryError};
use super::error::VaultError;
use super::state::{GuessOutcome, VaultState, VaultStatus};
use super::tier::Level;
use super::transcript::Transcript;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

/// How a chat turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The guardian answered.
    Replied,
    /// The guardian was unavailable and a fallback entry was shown instead.
    Fallback(AdversaryError),
}

/// Owns one [`VaultState`] and commits its transitions.
///
/// Methods take `&mut self`, so one owner can only drive one turn at a time.
#[derive(Debug)]
pub struct VaultSession<A, R = StdRng> {
    state: VaultState,
    adversary: A,
    rng: R,
}

impl<A: Adversary> VaultSession<A, StdRng> {
    /// Starts a session seeded from the operating system.
    #[instrument(skip(adversary))]
    pub fn start(adversary: A) -> Self {
        Self::with_rng(adversary, StdRng::from_entropy())
    }

    /// Starts a session with a reproducible secret sequence.
    #[instrument(skip(adversary))]
    pub fn seeded(adversary: A, seed: u64) -> Self {
        Self::with_rng(adversary, StdRng::seed_from_u64(seed))
    }
}

impl<A: Adversary, R: Rng + Send> VaultSession<A, R> {
    /// Starts a session drawing secrets from `rng`.
    #[instrument(skip_all)]
    pub fn with_rng(adversary: A, mut rng: R) -> Self {
        let state = VaultState::start(&mut rng);
        Self {
            state,
            adversary,
            rng,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &VaultState {
        &self.state
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.state.level()
    }

    /// Everything said so far.
    pub fn transcript(&self) -> &Transcript {
        self.state.transcript()
    }

    /// Session status.
    pub fn status(&self) -> VaultStatus {
        self.state.status()
    }

    /// The guardian behind this session.
    pub fn adversary(&self) -> &A {
        &self.adversary
    }

    /// Starts over on level 1.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.state = self.state.restart(&mut self.rng);
    }

    /// Sends a chat message to the guardian and records its reply.
    ///
    /// Guardian failures are recovered here: a fallback entry is appended and
    /// the failure is returned in [`TurnOutcome::Fallback`]. Only rejected
    /// input is an error.
    #[instrument(skip(self, text), fields(level = %self.state.level()))]
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, VaultError> {
        let (opened, request) = self.state.begin_turn(text)?;
        self.state = opened;

        debug!("Waiting for guardian");
        let reply = self
            .adversary
            .converse(request.system_prompt(), request.utterance())
            .await;

        let outcome = match &reply {
            Ok(_) => TurnOutcome::Replied,
            Err(e) => TurnOutcome::Fallback(e.clone()),
        };
        self.state = self.state.complete_turn(reply);

        info!(?outcome, "Chat turn finished");
        Ok(outcome)
    }

    /// Resolves a turn left open by a cancelled [`VaultSession::send_message`].
    #[instrument(skip(self))]
    pub fn abandon_turn(&mut self) {
        self.state = self.state.abandon_turn();
    }

    /// Evaluates a guess.
    #[instrument(skip(self, text), fields(level = %self.state.level()))]
    pub fn submit_guess(&mut self, text: &str) -> Result<GuessOutcome, VaultError> {
        let (next, outcome) = self.state.submit_guess(text, &mut self.rng)?;
        self.state = next;
        Ok(outcome)
    }

    /// Replaces the guess-box content.
    pub fn set_pending_guess(&mut self, text: impl Into<String>) {
        self.state = self.state.with_pending_guess(text);
    }

    /// Evaluates the guess-box content.
    #[instrument(skip(self), fields(level = %self.state.level()))]
    pub fn submit_pending_guess(&mut self) -> Result<GuessOutcome, VaultError> {
        let (next, outcome) = self.state.submit_pending_guess(&mut self.rng)?;
        self.state = next;
        Ok(outcome)
    }
}
