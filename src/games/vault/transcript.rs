//! Append-only transcript of a vault session.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Who an entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Speaker {
    /// The human trying to extract the secret.
    Player,
    /// The guardian, including engine notices shown on its side of the chat.
    Adversary,
}

/// What produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryKind {
    /// A chat message from the player or a guardian reply.
    Utterance,
    /// Shown in place of a guardian reply that never arrived.
    Fallback,
    /// A guess that did not match.
    WrongGuess,
    /// A correct guess below the final level.
    LevelUp,
    /// The final secret was guessed.
    Victory,
}

/// A single immutable transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TranscriptEntry {
    speaker: Speaker,
    kind: EntryKind,
    text: String,
}

impl TranscriptEntry {
    /// Creates an entry.
    pub fn new(speaker: Speaker, kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            speaker,
            kind,
            text: text.into(),
        }
    }

    /// A player chat message.
    pub fn player(text: impl Into<String>) -> Self {
        Self::new(Speaker::Player, EntryKind::Utterance, text)
    }

    /// An engine notice on the guardian's side of the chat.
    pub fn notice(kind: EntryKind, text: impl Into<String>) -> Self {
        Self::new(Speaker::Adversary, kind, text)
    }
}

/// Ordered log of a session. Entries can be appended but never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
