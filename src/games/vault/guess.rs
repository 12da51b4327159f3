//! Guess evaluation.

use tracing::instrument;

/// Returns true when `guess` equals `secret`, ignoring case and
/// surrounding whitespace. No partial credit.
#[instrument(skip_all)]
pub fn matches(guess: &str, secret: &str) -> bool {
    guess.trim().to_lowercase() == secret.trim().to_lowercase()
}
