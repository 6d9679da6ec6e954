//! Editor session: the working copy of a transcript plus all mutable
//! correction state (open edit, action log, change tracker).
//!
//! One session per loaded transcript. The presentation layer owns a
//! single `EditorSession` value and drives it through the operations
//! here; the session never touches the network or the filesystem.

use crate::action::EditAction;
use crate::document::Document;
use crate::history::ActionLog;
use crate::tracker::ChangeTracker;
use chrono::Utc;

/// The single currently-open edit, if any. Opening a new edit implicitly
/// cancels the previous one.
#[derive(Debug, Clone, PartialEq)]
enum OpenEdit {
    Word {
        segment_index: usize,
        word_index: usize,
        original_value: String,
    },
    Speaker {
        segment_index: usize,
        original_value: String,
    },
}

/// Error type for session operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Commit rejected: the new value is empty. The field reverts to the
    /// value it had when the edit opened; nothing is recorded.
    EmptyValue,
    /// finish/confirm/cancel called with no edit open.
    NoOpenEdit,
    /// The addressed word does not exist.
    WordMissing { segment_index: usize, word_index: usize },
    /// The addressed segment does not exist.
    SegmentMissing { segment_index: usize },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::EmptyValue => write!(f, "Empty value rejected"),
            SessionError::NoOpenEdit => write!(f, "No edit is open"),
            SessionError::WordMissing { segment_index, word_index } => {
                write!(f, "No word at segment {} position {}", segment_index, word_index)
            }
            SessionError::SegmentMissing { segment_index } => {
                write!(f, "No segment {}", segment_index)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Outcome of a successful finish/confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value changed; an action was recorded.
    Committed,
    /// The value equals what the edit opened with; nothing recorded.
    Unchanged,
}

/// What an undo/redo put on screen: the target and the value it now
/// shows. `word_index` is None for speaker changes.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEdit {
    pub segment_index: usize,
    pub word_index: Option<usize>,
    pub value: String,
}

enum Replay {
    Undo,
    Redo,
}

pub struct EditorSession {
    document: Document,
    /// Speaker per segment at session creation; the `original` side of
    /// every speaker diff.
    baseline_speakers: Vec<String>,
    open_edit: Option<OpenEdit>,
    log: ActionLog,
    tracker: ChangeTracker,
}

impl EditorSession {
    pub fn new(document: Document) -> Self {
        let baseline_speakers = document.speaker_assignments();
        Self {
            document,
            baseline_speakers,
            open_edit: None,
            log: ActionLog::new(),
            tracker: ChangeTracker::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn total_changes(&self) -> usize {
        self.tracker.total_changes()
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    pub fn has_open_edit(&self) -> bool {
        self.open_edit.is_some()
    }

    // =========================================================================
    // Edit buffer
    // =========================================================================

    /// Open a word edit. Any edit already open is implicitly cancelled.
    /// Returns the current value, which becomes this edit's original.
    pub fn start_edit(
        &mut self,
        segment_index: usize,
        word_index: usize,
    ) -> Result<String, SessionError> {
        self.open_edit = None;

        let word = self
            .document
            .word(segment_index, word_index)
            .ok_or(SessionError::WordMissing { segment_index, word_index })?;
        let original_value = word.text.clone();
        self.open_edit = Some(OpenEdit::Word {
            segment_index,
            word_index,
            original_value: original_value.clone(),
        });
        Ok(original_value)
    }

    /// Open a speaker selection for a segment. Any edit already open is
    /// implicitly cancelled. Returns the current speaker id.
    pub fn open_speaker_selection(
        &mut self,
        segment_index: usize,
    ) -> Result<String, SessionError> {
        self.open_edit = None;

        let original_value = self
            .document
            .speaker_id(segment_index)
            .ok_or(SessionError::SegmentMissing { segment_index })?
            .to_string();
        self.open_edit = Some(OpenEdit::Speaker {
            segment_index,
            original_value: original_value.clone(),
        });
        Ok(original_value)
    }

    /// Commit the open edit with a new value (word text, or speaker id
    /// for a speaker selection).
    ///
    /// Empty values are rejected: the edit closes, the field reverts, no
    /// action is recorded. A value equal to the edit's original closes
    /// the edit without recording anything.
    pub fn finish_edit(&mut self, new_value: &str) -> Result<EditOutcome, SessionError> {
        let open = self.open_edit.take().ok_or(SessionError::NoOpenEdit)?;

        if new_value.trim().is_empty() {
            return Err(SessionError::EmptyValue);
        }

        match open {
            OpenEdit::Word { segment_index, word_index, original_value } => {
                if new_value == original_value {
                    return Ok(EditOutcome::Unchanged);
                }

                let token_id = self
                    .document
                    .word(segment_index, word_index)
                    .map(|w| w.token_id.clone())
                    .ok_or(SessionError::WordMissing { segment_index, word_index })?;

                // The tracker's original survives re-edits; fall back to
                // this edit's original for a first-time change.
                let very_original = self
                    .tracker
                    .original_for(&token_id)
                    .unwrap_or(&original_value)
                    .to_string();

                self.document
                    .set_word_text(segment_index, word_index, &token_id, new_value);
                self.log.commit(EditAction::WordChange {
                    token_id: token_id.clone(),
                    segment_index,
                    word_index,
                    old_value: original_value,
                    new_value: new_value.to_string(),
                    original_value: very_original.clone(),
                    timestamp: Utc::now(),
                });
                self.tracker.record_word(
                    &token_id,
                    segment_index,
                    word_index,
                    &very_original,
                    new_value,
                );
                Ok(EditOutcome::Committed)
            }
            OpenEdit::Speaker { segment_index, original_value } => {
                if new_value == original_value {
                    return Ok(EditOutcome::Unchanged);
                }

                if !self.document.set_speaker(segment_index, new_value) {
                    return Err(SessionError::SegmentMissing { segment_index });
                }
                self.log.commit(EditAction::SpeakerChange {
                    segment_index,
                    old_value: original_value,
                    new_value: new_value.to_string(),
                    timestamp: Utc::now(),
                });
                let baseline = self.speaker_baseline(segment_index);
                self.tracker.record_speaker(segment_index, &baseline, new_value);
                Ok(EditOutcome::Committed)
            }
        }
    }

    /// Confirm a speaker selection. Alias for `finish_edit` — the flows
    /// are identical once an edit is open.
    pub fn confirm_speaker(&mut self, new_spkid: &str) -> Result<EditOutcome, SessionError> {
        self.finish_edit(new_spkid)
    }

    /// Close the open edit without committing. Returns the value the
    /// display should revert to, or None if no edit was open.
    pub fn cancel_edit(&mut self) -> Option<String> {
        match self.open_edit.take()? {
            OpenEdit::Word { original_value, .. } => Some(original_value),
            OpenEdit::Speaker { original_value, .. } => Some(original_value),
        }
    }

    // =========================================================================
    // Undo / Redo
    // =========================================================================

    /// Reverse the most recent committed action. No-op on an empty stack.
    /// An open edit does not survive: it is cancelled first (it was never
    /// committed, so nothing is lost).
    pub fn undo(&mut self) -> Option<AppliedEdit> {
        self.open_edit = None;
        let action = self.log.undo()?;
        Some(self.replay(&action, Replay::Undo))
    }

    /// Re-apply the most recently undone action. No-op if nothing has
    /// been undone since the last commit.
    pub fn redo(&mut self) -> Option<AppliedEdit> {
        self.open_edit = None;
        let action = self.log.redo()?;
        Some(self.replay(&action, Replay::Redo))
    }

    /// Apply one side of an action to the document and tracker, exactly
    /// as a fresh commit would. A target that no longer matches (word
    /// moved, segment gone) is reported and skipped; the stacks have
    /// already moved, so the rest of the session stays consistent.
    fn replay(&mut self, action: &EditAction, direction: Replay) -> AppliedEdit {
        match action {
            EditAction::WordChange {
                token_id,
                segment_index,
                word_index,
                old_value,
                new_value,
                original_value,
                ..
            } => {
                let value = match direction {
                    Replay::Undo => old_value,
                    Replay::Redo => new_value,
                };
                if self
                    .document
                    .set_word_text(*segment_index, *word_index, token_id, value)
                {
                    self.tracker.record_word(
                        token_id,
                        *segment_index,
                        *word_index,
                        original_value,
                        value,
                    );
                } else {
                    eprintln!(
                        "scriba: token {} is no longer at segment {} word {}; skipping this update",
                        token_id, segment_index, word_index
                    );
                }
                AppliedEdit {
                    segment_index: *segment_index,
                    word_index: Some(*word_index),
                    value: value.clone(),
                }
            }
            EditAction::SpeakerChange { segment_index, old_value, new_value, .. } => {
                let value = match direction {
                    Replay::Undo => old_value,
                    Replay::Redo => new_value,
                };
                if self.document.set_speaker(*segment_index, value) {
                    let baseline = self.speaker_baseline(*segment_index);
                    self.tracker.record_speaker(*segment_index, &baseline, value);
                } else {
                    eprintln!(
                        "scriba: segment {} no longer exists; skipping this update",
                        segment_index
                    );
                }
                AppliedEdit {
                    segment_index: *segment_index,
                    word_index: None,
                    value: value.clone(),
                }
            }
        }
    }

    // =========================================================================
    // Save / discard boundary
    // =========================================================================

    /// Reset session state after a successful save. The just-saved values
    /// become the new baseline: the tracker empties, both stacks clear,
    /// and current speaker assignments become the speaker originals.
    pub fn mark_saved(&mut self) {
        self.open_edit = None;
        self.log.clear();
        self.tracker.clear();
        self.baseline_speakers = self.document.speaker_assignments();
    }

    /// Throw away every pending change: restore all tracked entities to
    /// their session-start values and clear the log and tracker.
    ///
    /// Destructive and locally irreversible — callers confirm with the
    /// user before invoking this.
    pub fn discard(&mut self) {
        self.open_edit = None;

        let word_diffs: Vec<(String, crate::tracker::WordDiff)> = self
            .tracker
            .word_diffs()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (token_id, diff) in word_diffs {
            if !self.document.set_word_text(
                diff.segment_index,
                diff.word_index,
                &token_id,
                &diff.original,
            ) {
                // Recorded position went stale; fall back to identity.
                match self.document.find_token(&token_id) {
                    Some((si, wi)) => {
                        self.document.set_word_text(si, wi, &token_id, &diff.original);
                    }
                    None => {
                        eprintln!("scriba: token {} not found; cannot restore it", token_id);
                    }
                }
            }
        }

        let speaker_diffs: Vec<(usize, String)> = self
            .tracker
            .speaker_diffs()
            .iter()
            .map(|(k, v)| (*k, v.original.clone()))
            .collect();
        for (segment_index, original) in speaker_diffs {
            self.document.set_speaker(segment_index, &original);
        }

        self.log.clear();
        self.tracker.clear();
    }

    fn speaker_baseline(&self, segment_index: usize) -> String {
        self.baseline_speakers
            .get(segment_index)
            .cloned()
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}
