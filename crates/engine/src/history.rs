//! Bounded undo/redo log of committed edit actions.

use crate::action::EditAction;

/// Maximum entries kept on each stack. The oldest undo entry is evicted
/// when a fresh commit would exceed it, so very old edits stop being
/// locally reversible (they remain in the tracker and the server log).
pub const MAX_ENTRIES: usize = 10;

pub struct ActionLog {
    undo_stack: Vec<EditAction>,
    redo_stack: Vec<EditAction>,
    max_entries: usize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: MAX_ENTRIES,
        }
    }

    /// Record a committed action. Any redoable future is invalidated.
    pub fn commit(&mut self, action: EditAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the most recent action for undo; it moves to the redo stack.
    pub fn undo(&mut self) -> Option<EditAction> {
        let action = self.undo_stack.pop()?;
        self.redo_stack.push(action.clone());
        if self.redo_stack.len() > self.max_entries {
            self.redo_stack.remove(0);
        }
        Some(action)
    }

    /// Pop the most recently undone action for redo; it moves back onto
    /// the undo stack.
    pub fn redo(&mut self) -> Option<EditAction> {
        let action = self.redo_stack.pop()?;
        self.undo_stack.push(action.clone());
        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn word_action(token: &str, old: &str, new: &str) -> EditAction {
        EditAction::WordChange {
            token_id: token.to_string(),
            segment_index: 0,
            word_index: 0,
            old_value: old.to_string(),
            new_value: new.to_string(),
            original_value: old.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_empty_log_is_noop() {
        let mut log = ActionLog::new();
        assert!(log.undo().is_none());
        assert!(log.redo().is_none());
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn test_undo_moves_to_redo_stack() {
        let mut log = ActionLog::new();
        log.commit(word_action("t1", "a", "b"));
        let undone = log.undo().unwrap();
        assert_eq!(undone.old_value(), "a");
        assert!(!log.can_undo());
        assert!(log.can_redo());

        let redone = log.redo().unwrap();
        assert_eq!(redone.new_value(), "b");
        assert!(log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut log = ActionLog::new();
        log.commit(word_action("t1", "a", "b"));
        log.undo().unwrap();
        assert!(log.can_redo());

        log.commit(word_action("t2", "x", "y"));
        assert!(!log.can_redo());
        assert!(log.redo().is_none());
    }

    #[test]
    fn test_eleventh_commit_evicts_oldest() {
        let mut log = ActionLog::new();
        for i in 0..11 {
            log.commit(word_action(&format!("t{}", i), "old", "new"));
        }
        assert_eq!(log.undo_depth(), MAX_ENTRIES);

        // Only 10 undos succeed; the very first commit was evicted.
        let mut undone = Vec::new();
        while let Some(action) = log.undo() {
            if let EditAction::WordChange { token_id, .. } = action {
                undone.push(token_id);
            }
        }
        assert_eq!(undone.len(), 10);
        assert_eq!(undone.last().map(String::as_str), Some("t1"));
        assert!(!undone.iter().any(|t| t == "t0"));
    }

    #[test]
    fn test_redo_stack_is_capped() {
        let mut log = ActionLog::new();
        for i in 0..MAX_ENTRIES {
            log.commit(word_action(&format!("t{}", i), "old", "new"));
        }
        while log.undo().is_some() {}
        assert_eq!(log.redo_depth(), MAX_ENTRIES);
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut log = ActionLog::new();
        log.commit(word_action("t1", "a", "b"));
        log.commit(word_action("t2", "c", "d"));
        log.undo().unwrap();
        log.clear();
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }
}
