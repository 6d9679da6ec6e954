//! Scriba ↔ CorpusHub annotation protocol — v1 Frozen Wire Format
//!
//! This crate defines the canonical types for the save / history /
//! revert exchange with the annotation server. The wire format is JSON
//! over HTTPS.
//!
//! # Protocol Version
//!
//! This is **protocol v1** — the wire format is frozen. Changes require:
//! 1. Version bump in PROTOCOL_VERSION
//! 2. Updated golden tests in this crate
//! 3. Backward compatibility handling
//!
//! # Usage
//!
//! ```ignore
//! use scriba_protocol::{SaveRequest, SaveResponse, ChangeRecord};
//!
//! let req = SaveRequest { file, changes, transcript_data };
//! let json = serde_json::to_string(&req)?;
//! ```

use serde::{Deserialize, Serialize};

use scriba_engine::document::Document;

/// Current protocol version. Increment for breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// =============================================================================
// Change records
// =============================================================================

/// Discriminator for change records. Word changes are the unmarked
/// default; speaker changes carry an explicit tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    SpeakerChange,
}

/// One net change as shipped in a save and recorded in a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Token id for word changes; absent for speaker changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    pub segment_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_index: Option<usize>,
    pub old_value: String,
    pub new_value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChangeKind>,
}

impl ChangeRecord {
    pub fn word(
        token_id: &str,
        segment_index: usize,
        word_index: usize,
        old_value: &str,
        new_value: &str,
    ) -> Self {
        Self {
            token_id: Some(token_id.to_string()),
            segment_index,
            word_index: Some(word_index),
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
            kind: None,
        }
    }

    pub fn speaker(segment_index: usize, old_value: &str, new_value: &str) -> Self {
        Self {
            token_id: None,
            segment_index,
            word_index: None,
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
            kind: Some(ChangeKind::SpeakerChange),
        }
    }

    pub fn is_speaker_change(&self) -> bool {
        self.kind == Some(ChangeKind::SpeakerChange)
    }

    /// The change a revert applies: old and new swapped. Applying the
    /// inverse's `new_value` puts the entity back to this record's
    /// `old_value`.
    pub fn inverse(&self) -> ChangeRecord {
        ChangeRecord {
            token_id: self.token_id.clone(),
            segment_index: self.segment_index,
            word_index: self.word_index,
            old_value: self.new_value.clone(),
            new_value: self.old_value.clone(),
            kind: self.kind,
        }
    }
}

// =============================================================================
// Save
// =============================================================================

/// `POST /api/annotate/save` — one change-set plus the full document,
/// sent atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub file: String,
    pub changes: Vec<ChangeRecord>,
    pub transcript_data: Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// History
// =============================================================================

/// Kind of a committed history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A saved change-set.
    Change,
    /// A selective revert of an earlier entry.
    Undo,
}

/// One committed change-set in the server's append-only log. Immutable
/// once appended; a revert appends a new `Undo` entry referencing this
/// one, it never edits or removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub index: usize,
    /// ISO 8601, server clock.
    pub timestamp: String,
    pub user: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub changes: Vec<ChangeRecord>,
    /// For `Undo` entries: the index of the entry this one reverses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversed_index: Option<usize>,
}

impl HistoryEntry {
    /// The change list a revert of this entry applies, pairwise inverses
    /// of `changes`.
    pub fn inverse_changes(&self) -> Vec<ChangeRecord> {
        self.changes.iter().map(ChangeRecord::inverse).collect()
    }
}

/// `GET /api/annotate/history?country=..&filename=..`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

// =============================================================================
// Revert
// =============================================================================

/// `POST /api/annotate/revert` — selective revert of the entry at
/// `undo_index`, applied by the server against the current canonical
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevertRequest {
    pub file: String,
    pub undo_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevertResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
