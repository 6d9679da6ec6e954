//! Edit actions recorded by a correction session.

use chrono::{DateTime, Utc};

/// A committed edit, as pushed onto the undo/redo stacks.
///
/// Word and speaker changes differ only in which fields they carry and
/// how they are applied, so they are one tagged union dispatched by
/// pattern match rather than a trait hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    WordChange {
        token_id: String,
        segment_index: usize,
        word_index: usize,
        /// Displayed value when this edit opened.
        old_value: String,
        new_value: String,
        /// Session-start value for the token. Survives re-edits, so a
        /// redo after the tracker entry collapsed can still resolve it.
        original_value: String,
        timestamp: DateTime<Utc>,
    },
    SpeakerChange {
        segment_index: usize,
        old_value: String,
        new_value: String,
        timestamp: DateTime<Utc>,
    },
}

impl EditAction {
    /// The value an undo restores.
    pub fn old_value(&self) -> &str {
        match self {
            EditAction::WordChange { old_value, .. } => old_value,
            EditAction::SpeakerChange { old_value, .. } => old_value,
        }
    }

    /// The value a redo restores.
    pub fn new_value(&self) -> &str {
        match self {
            EditAction::WordChange { new_value, .. } => new_value,
            EditAction::SpeakerChange { new_value, .. } => new_value,
        }
    }

    pub fn segment_index(&self) -> usize {
        match self {
            EditAction::WordChange { segment_index, .. } => *segment_index,
            EditAction::SpeakerChange { segment_index, .. } => *segment_index,
        }
    }

    pub fn is_speaker_change(&self) -> bool {
        matches!(self, EditAction::SpeakerChange { .. })
    }
}
