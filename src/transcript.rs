//! Append-only conversation log.
//!
//! Holds every exchange of the session in insertion order, for display
//! only. Entries are never mutated or removed, and the log is never
//! persisted.

use chrono::{DateTime, Local};

/// Who produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    /// Status lines the tool itself adds (load results, failures).
    Notice,
}

impl Speaker {
    /// Short label used when printing the transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "assistant",
            Self::Notice => "notice",
        }
    }
}

/// Identifier of one entry; doubles as its insertion sequence number,
/// which is the only ordering guarantee the log makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// One role-tagged message in the log.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub id: EntryId,
    pub speaker: Speaker,
    pub text: String,
    /// Wall-clock stamp for display; ordering never depends on it.
    pub at: DateTime<Local>,
}

/// The conversation log.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Exchange>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. O(1); cannot fail short of allocation failure.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Exchange {
            id,
            speaker,
            text: text.into(),
            at: Local::now(),
        });
        id
    }

    /// All entries in insertion order. Finite and restartable; appending
    /// requires exclusive access, so an iteration in progress can never
    /// observe a concurrent append.
    pub fn all(&self) -> impl Iterator<Item = &Exchange> {
        self.entries.iter()
    }

    /// Entries from the given index on; lets a display layer print only
    /// what it has not shown yet.
    pub fn from_index(&self, index: usize) -> &[Exchange] {
        &self.entries[index.min(self.entries.len())..]
    }

    pub fn get(&self, id: EntryId) -> Option<&Exchange> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn last(&self) -> Option<&Exchange> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
