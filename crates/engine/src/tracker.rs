//! Collapsed per-entity diff of a session's pending changes.
//!
//! One entry per modified word (keyed by token id) or segment speaker
//! (keyed by segment index), however many edits led there. `original` is
//! always the session-start value; an entry whose current value returns
//! to `original` is dropped, so the tracker holds exactly the net diff
//! a save needs to ship.

use std::collections::HashMap;

/// Net change for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct WordDiff {
    pub original: String,
    pub modified: String,
    /// Position at the time of the last edit, kept for serialization;
    /// identity is the token id, never the position.
    pub segment_index: usize,
    pub word_index: usize,
}

/// Net speaker change for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerDiff {
    pub original: String,
    pub modified: String,
}

#[derive(Debug, Default)]
pub struct ChangeTracker {
    words: HashMap<String, WordDiff>,
    speakers: HashMap<usize, SpeakerDiff>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session-start value for a token, if it has a pending change.
    pub fn original_for(&self, token_id: &str) -> Option<&str> {
        self.words.get(token_id).map(|d| d.original.as_str())
    }

    /// Recompute the entry for a word after a commit or replay.
    pub fn record_word(
        &mut self,
        token_id: &str,
        segment_index: usize,
        word_index: usize,
        original: &str,
        current: &str,
    ) {
        if current == original {
            // Net no-op: the word is back at its session-start value.
            self.words.remove(token_id);
        } else {
            self.words.insert(
                token_id.to_string(),
                WordDiff {
                    original: original.to_string(),
                    modified: current.to_string(),
                    segment_index,
                    word_index,
                },
            );
        }
    }

    /// Recompute the entry for a segment's speaker after a commit or
    /// replay. `original` is the speaker recorded at session creation.
    pub fn record_speaker(&mut self, segment_index: usize, original: &str, current: &str) {
        if current == original {
            self.speakers.remove(&segment_index);
        } else {
            self.speakers.insert(
                segment_index,
                SpeakerDiff {
                    original: original.to_string(),
                    modified: current.to_string(),
                },
            );
        }
    }

    pub fn word_diffs(&self) -> &HashMap<String, WordDiff> {
        &self.words
    }

    pub fn speaker_diffs(&self) -> &HashMap<usize, SpeakerDiff> {
        &self.speakers
    }

    /// Count of distinct changed entities (words + speakers), not the
    /// count of actions that produced them.
    pub fn total_changes(&self) -> usize {
        self.words.len() + self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.speakers.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.speakers.clear();
    }
}
