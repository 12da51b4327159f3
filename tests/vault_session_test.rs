//! Tests for the vault session state machine.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Mutex;
use strictly_vault::{
    Adversary, AdversaryError, CANCELLED_REPLY, EntryKind, FALLBACK_REPLY, GuessOutcome, Level,
    MAX_LEVEL, Speaker, Tier, TurnOutcome, VaultError, VaultSession, VaultState, VaultStatus,
    secrets,
};

/// Guardian that records every call and answers with a fixed line.
#[derive(Debug, Default)]
struct RecordingGuardian {
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingGuardian {
    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Adversary for RecordingGuardian {
    async fn converse(
        &self,
        system_prompt: &str,
        player_utterance: &str,
    ) -> Result<String, AdversaryError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), player_utterance.to_string()));
        Ok("I guard this vault.".to_string())
    }
}

/// Guardian whose upstream is always down.
#[derive(Debug)]
struct BrokenGuardian;

#[async_trait]
impl Adversary for BrokenGuardian {
    async fn converse(
        &self,
        _system_prompt: &str,
        _player_utterance: &str,
    ) -> Result<String, AdversaryError> {
        Err(AdversaryError::new("connection refused"))
    }
}

fn session() -> VaultSession<RecordingGuardian> {
    VaultSession::seeded(RecordingGuardian::default(), 42)
}

/// Guesses the live secret until the session reaches `target`.
fn advance_to(session: &mut VaultSession<RecordingGuardian>, target: u8) {
    while session.level().get() < target {
        let secret = session.state().secret().to_string();
        session.submit_guess(&secret).expect("Correct guess accepted");
    }
}

#[test]
fn test_start_is_level_one_in_progress() {
    let session = session();
    assert_eq!(session.level(), Level::FIRST);
    assert_eq!(session.status(), VaultStatus::InProgress);
    assert!(session.transcript().is_empty());
    assert!(secrets::pool(Tier::Novice).contains(&session.state().secret()));
}

#[test]
fn test_wrong_then_right_guess_scenario() {
    let mut session = session();
    let secret = session.state().secret().to_string();
    assert!(["hallo123", "passwort", "geheim"].contains(&secret.as_str()));

    let outcome = session.submit_guess("password").expect("Guess accepted");
    assert_eq!(outcome, GuessOutcome::Wrong);
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(
        *session.transcript().last().unwrap().kind(),
        EntryKind::WrongGuess
    );
    assert_eq!(session.level(), Level::FIRST);
    assert_eq!(session.state().secret(), secret);

    let outcome = session.submit_guess(&secret).expect("Guess accepted");
    assert_eq!(outcome, GuessOutcome::LevelUp(Level::new(2)));
    assert_eq!(session.level(), Level::new(2));
    assert_ne!(session.state().secret(), secret);
    assert!(secrets::pool(Level::new(2).tier()).contains(&session.state().secret()));
    assert_eq!(
        *session.transcript().last().unwrap().kind(),
        EntryKind::LevelUp
    );
}

#[test]
fn test_correct_guess_is_case_insensitive() {
    let mut session = session();
    let shouted = format!("  {}  ", session.state().secret().to_uppercase());
    let outcome = session.submit_guess(&shouted).expect("Guess accepted");
    assert_eq!(outcome, GuessOutcome::LevelUp(Level::new(2)));
}

#[test]
fn test_every_level_up_increments_by_one_with_new_secret() {
    let mut session = session();

    for expected in 2..=MAX_LEVEL {
        let before = session.state().secret().to_string();
        let outcome = session.submit_guess(&before).expect("Guess accepted");
        assert_eq!(outcome, GuessOutcome::LevelUp(Level::new(expected.into())));
        assert_eq!(session.level().get(), expected);
        assert_ne!(session.state().secret(), before);
        assert!(secrets::pool(session.level().tier()).contains(&session.state().secret()));
    }
}

#[test]
fn test_wrong_guess_never_changes_level_or_secret() {
    let mut session = session();
    advance_to(&mut session, 5);
    let secret = session.state().secret().to_string();

    for guess in ["nope", "hallo123", "Regen", "1234"] {
        if strictly_vault::matches(guess, &secret) {
            continue;
        }
        assert_eq!(session.submit_guess(guess), Ok(GuessOutcome::Wrong));
        assert_eq!(session.level(), Level::new(5));
        assert_eq!(session.state().secret(), secret);
    }
}

#[test]
fn test_final_guess_wins_and_locks_session() {
    let mut session = session();
    advance_to(&mut session, MAX_LEVEL);

    let secret = session.state().secret().to_string();
    assert_eq!(session.submit_guess(&secret), Ok(GuessOutcome::Victory));
    assert_eq!(session.status(), VaultStatus::Won);
    assert_eq!(session.level(), Level::MAX);
    assert_eq!(
        *session.transcript().last().unwrap().kind(),
        EntryKind::Victory
    );

    let before = session.state().clone();
    assert_eq!(
        session.submit_guess(&secret),
        Err(VaultError::InvalidLevelTransition)
    );
    assert_eq!(session.state(), &before);
}

#[tokio::test]
async fn test_send_message_rejected_after_win() {
    let mut session = session();
    advance_to(&mut session, MAX_LEVEL);
    let secret = session.state().secret().to_string();
    session.submit_guess(&secret).expect("Winning guess");

    let before = session.state().clone();
    let result = session.send_message("hello?").await;
    assert_eq!(result, Err(VaultError::InvalidLevelTransition));
    assert_eq!(session.state(), &before);
    assert!(session.adversary().calls().is_empty());
}

#[test]
fn test_empty_guess_rejected_without_entry() {
    let mut session = session();
    session.set_pending_guess("   ");

    let before = session.state().clone();
    assert_eq!(
        session.submit_pending_guess(),
        Err(VaultError::InvalidGuessInput)
    );
    assert_eq!(session.submit_guess(""), Err(VaultError::InvalidGuessInput));
    assert_eq!(session.state(), &before);
}

#[test]
fn test_pending_guess_cleared_after_evaluation() {
    let mut session = session();

    session.set_pending_guess("wrong");
    assert_eq!(session.state().pending_guess(), "wrong");
    assert_eq!(session.submit_pending_guess(), Ok(GuessOutcome::Wrong));
    assert_eq!(session.state().pending_guess(), "");

    let secret = session.state().secret().to_string();
    session.set_pending_guess(secret);
    assert_eq!(
        session.submit_pending_guess(),
        Ok(GuessOutcome::LevelUp(Level::new(2)))
    );
    assert_eq!(session.state().pending_guess(), "");
}

#[tokio::test]
async fn test_send_message_appends_player_and_guardian_entries() {
    let mut session = session();

    let outcome = session.send_message("  what is the password?  ").await;
    assert_eq!(outcome, Ok(TurnOutcome::Replied));

    let entries = session.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(*entries[0].speaker(), Speaker::Player);
    assert_eq!(entries[0].text(), "what is the password?");
    assert_eq!(*entries[1].speaker(), Speaker::Adversary);
    assert_eq!(*entries[1].kind(), EntryKind::Utterance);
    assert_eq!(entries[1].text(), "I guard this vault.");
    assert_eq!(session.level(), Level::FIRST);
    assert!(!session.state().awaiting_reply());
}

#[tokio::test]
async fn test_each_turn_is_single_shot_with_level_prompt() {
    let mut session = session();
    session
        .send_message("zq-marker-turn-one")
        .await
        .expect("Turn");
    session.send_message("second").await.expect("Turn");

    let secret = session.state().secret().to_string();
    let calls = session.adversary().calls();
    assert_eq!(calls.len(), 2);

    let (prompt, utterance) = &calls[1];
    assert_eq!(utterance, "second");
    assert!(prompt.contains(&format!("\"{}\"", secret)));
    assert!(prompt.contains("level 1 of 10"));
    assert!(!prompt.contains("zq-marker-turn-one"));
}

#[tokio::test]
async fn test_prompt_follows_level() {
    let mut session = session();
    advance_to(&mut session, 9);
    session.send_message("hi").await.expect("Turn");

    let calls = session.adversary().calls();
    let (prompt, _) = calls.last().unwrap();
    assert!(prompt.contains("level 9 of 10"));
    assert!(prompt.contains(session.state().secret()));
}

#[tokio::test]
async fn test_adapter_failure_appends_one_fallback() {
    let mut session = VaultSession::seeded(BrokenGuardian, 42);
    let secret = session.state().secret().to_string();

    let outcome = session.send_message("hi").await;
    match outcome {
        Ok(TurnOutcome::Fallback(e)) => assert!(e.message.contains("connection refused")),
        other => panic!("Expected fallback outcome, got {:?}", other),
    }

    let entries = session.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(*entries[0].speaker(), Speaker::Player);
    assert_eq!(*entries[1].kind(), EntryKind::Fallback);
    assert_eq!(entries[1].text(), FALLBACK_REPLY);
    assert_eq!(
        entries.iter().filter(|e| *e.kind() == EntryKind::Fallback).count(),
        1
    );

    assert_eq!(session.level(), Level::FIRST);
    assert_eq!(session.state().secret(), secret);
    assert_eq!(session.status(), VaultStatus::InProgress);
    assert!(!session.state().awaiting_reply());
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let mut session = session();
    assert_eq!(
        session.send_message(" \t ").await,
        Err(VaultError::EmptyMessage)
    );
    assert!(session.transcript().is_empty());
    assert!(session.adversary().calls().is_empty());
}

#[test]
fn test_restart_resets_everything() {
    let mut session = session();
    advance_to(&mut session, 4);
    session.submit_guess("nope").expect("Guess accepted");

    session.restart();
    assert_eq!(session.level(), Level::FIRST);
    assert_eq!(session.status(), VaultStatus::InProgress);
    assert!(session.transcript().is_empty());
    assert!(secrets::pool(Tier::Novice).contains(&session.state().secret()));
}

#[test]
fn test_restart_after_win_reopens_game() {
    let mut session = session();
    advance_to(&mut session, MAX_LEVEL);
    let secret = session.state().secret().to_string();
    session.submit_guess(&secret).expect("Winning guess");

    session.restart();
    assert_eq!(session.status(), VaultStatus::InProgress);
    assert_eq!(session.submit_guess("nope"), Ok(GuessOutcome::Wrong));
}

#[test]
fn test_open_turn_blocks_further_actions() {
    let mut rng = StdRng::seed_from_u64(1);
    let state = VaultState::start(&mut rng);

    let (open, request) = state.begin_turn("hello").expect("Turn opened");
    assert!(open.awaiting_reply());
    assert_eq!(request.utterance(), "hello");
    assert_eq!(open.transcript().len(), 1);

    assert_eq!(
        open.begin_turn("again").unwrap_err(),
        VaultError::TurnInProgress
    );
    assert_eq!(
        open.submit_guess(open.secret(), &mut rng).unwrap_err(),
        VaultError::TurnInProgress
    );

    let closed = open.complete_turn(Ok("Go away.".to_string()));
    assert!(!closed.awaiting_reply());
    assert_eq!(closed.transcript().len(), 2);
    assert!(closed.begin_turn("again").is_ok());
}

#[test]
fn test_abandon_turn_resolves_cancelled_call() {
    let mut rng = StdRng::seed_from_u64(2);
    let state = VaultState::start(&mut rng);
    let (open, _) = state.begin_turn("hello").expect("Turn opened");

    let resolved = open.abandon_turn();
    assert!(!resolved.awaiting_reply());
    assert_eq!(resolved.transcript().len(), 2);
    assert_eq!(resolved.transcript().last().unwrap().text(), CANCELLED_REPLY);
    assert_eq!(resolved.level(), open.level());
    assert_eq!(resolved.secret(), open.secret());

    // Nothing open: no-op.
    assert_eq!(resolved.abandon_turn(), resolved);
}

#[test]
fn test_transitions_do_not_mutate_input_state() {
    let mut rng = StdRng::seed_from_u64(3);
    let state = VaultState::start(&mut rng);
    let snapshot = state.clone();

    let secret = state.secret().to_string();
    let (next, _) = state.submit_guess(&secret, &mut rng).expect("Guess");
    assert_eq!(state, snapshot);
    assert_eq!(next.level(), Level::new(2));

    let _ = state.begin_turn("hi").expect("Turn");
    assert_eq!(state, snapshot);
}

#[test]
fn test_complete_without_open_turn_is_noop() {
    let mut rng = StdRng::seed_from_u64(4);
    let state = VaultState::start(&mut rng);
    assert_eq!(state.complete_turn(Ok("stray".to_string())), state);
}
