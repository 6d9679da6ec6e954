//! Reference model of the CorpusHub history log.
//!
//! The server owns the real implementation; this model pins the
//! semantics the client relies on: the log is append-only, one entry per
//! committed change-set, and a selective revert applies the recorded old
//! values to the *current* canonical document — last recorded value
//! wins, with no detection of intervening edits to the same entity.

use scriba_engine::document::{Document, Segment, Speaker, Word};
use scriba_protocol::{ChangeRecord, EntryKind, HistoryEntry};

struct HistoryLog {
    document: Document,
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    fn new(document: Document) -> Self {
        Self { document, entries: Vec::new() }
    }

    /// One successful save: apply the change-set and append an entry.
    fn commit(&mut self, user: &str, changes: Vec<ChangeRecord>) -> usize {
        for record in &changes {
            self.apply(record);
        }
        let index = self.entries.len();
        self.entries.push(HistoryEntry {
            index,
            timestamp: format!("2025-11-03T10:0{}:00Z", index),
            user: user.to_string(),
            kind: EntryKind::Change,
            changes,
            reversed_index: None,
        });
        index
    }

    /// Selective revert of entry `index`: apply the pairwise inverses of
    /// its changes to the current document and append an `undo` entry.
    /// The reverted entry itself is never touched.
    fn revert(&mut self, user: &str, index: usize) -> Result<usize, String> {
        let entry = self
            .entries
            .get(index)
            .cloned()
            .ok_or_else(|| format!("no entry {}", index))?;
        let inverses = entry.inverse_changes();
        for record in &inverses {
            self.apply(record);
        }
        let new_index = self.entries.len();
        self.entries.push(HistoryEntry {
            index: new_index,
            timestamp: format!("2025-11-03T10:0{}:00Z", new_index),
            user: user.to_string(),
            kind: EntryKind::Undo,
            changes: inverses,
            reversed_index: Some(index),
        });
        Ok(new_index)
    }

    /// Applying a record means setting the entity to `new_value`,
    /// located by identity (token id) or segment index.
    fn apply(&mut self, record: &ChangeRecord) {
        if record.is_speaker_change() {
            self.document.set_speaker(record.segment_index, &record.new_value);
        } else if let Some(token_id) = &record.token_id {
            if let Some((si, wi)) = self.document.find_token(token_id) {
                self.document.set_word_text(si, wi, token_id, &record.new_value);
            }
        }
    }
}

fn fixture() -> Document {
    let words = ["el", "niño", "vio", "el", "perro", "el"];
    Document {
        segments: vec![Segment {
            speaker_id: "spk1".into(),
            words: words
                .iter()
                .enumerate()
                .map(|(i, text)| Word {
                    token_id: format!("t{}", i),
                    text: text.to_string(),
                    lemma: text.to_string(),
                    pos: String::new(),
                    morph: String::new(),
                    start: i as f64,
                    end: i as f64 + 0.4,
                })
                .collect(),
        }],
        speakers: vec![
            Speaker { spkid: "spk1".into(), name: "Juan".into() },
            Speaker { spkid: "spk2".into(), name: "María".into() },
        ],
    }
}

#[test]
fn test_revert_appends_pairwise_inverses_and_keeps_original_entry() {
    let mut log = HistoryLog::new(fixture());
    let k = log.commit(
        "alice",
        vec![
            ChangeRecord::word("t0", 0, 0, "el", "un"),
            ChangeRecord::speaker(0, "spk1", "spk2"),
        ],
    );
    let entry_k_before = log.entries[k].clone();

    let new_index = log.revert("bob", k).unwrap();
    let undo_entry = &log.entries[new_index];

    assert_eq!(undo_entry.kind, EntryKind::Undo);
    assert_eq!(undo_entry.reversed_index, Some(k));
    assert_eq!(undo_entry.changes.len(), entry_k_before.changes.len());
    for (orig, inv) in entry_k_before.changes.iter().zip(&undo_entry.changes) {
        assert_eq!(inv.old_value, orig.new_value);
        assert_eq!(inv.new_value, orig.old_value);
    }

    // Entry #k is immutable: unchanged after the revert.
    assert_eq!(log.entries[k], entry_k_before);
    // And the document is back where it started.
    assert_eq!(log.document.word_text(0, 0), Some("el"));
    assert_eq!(log.document.speaker_id(0), Some("spk1"));
}

#[test]
fn test_revert_overwrites_later_edit_to_same_word() {
    let mut log = HistoryLog::new(fixture());

    // Entries #0 and #1: unrelated noise so the indices line up.
    log.commit("alice", vec![ChangeRecord::word("t1", 0, 1, "niño", "niña")]);
    log.commit("alice", vec![ChangeRecord::word("t2", 0, 2, "vio", "veía")]);

    // Entry #2 changes word t3 "el" -> "la".
    let k = log.commit("alice", vec![ChangeRecord::word("t3", 0, 3, "el", "la")]);
    assert_eq!(k, 2);

    // Entry #3 and entry #4: more unrelated edits.
    log.commit("bob", vec![ChangeRecord::speaker(0, "spk1", "spk2")]);
    log.commit("bob", vec![ChangeRecord::word("t4", 0, 4, "perro", "gato")]);

    // Entry #5: a later, independent edit to the same word, saved.
    let later = log.commit("bob", vec![ChangeRecord::word("t3", 0, 3, "la", "lo")]);
    assert_eq!(later, 5);
    assert_eq!(log.document.word_text(0, 3), Some("lo"));

    // Reverting #2 applies its recorded old value "el" to the current
    // document, silently discarding entry #5's "lo".
    let new_index = log.revert("alice", 2).unwrap();
    assert_eq!(new_index, 6);
    assert_eq!(log.document.word_text(0, 3), Some("el"));

    let undo_entry = &log.entries[6];
    assert_eq!(undo_entry.kind, EntryKind::Undo);
    assert_eq!(undo_entry.reversed_index, Some(2));

    // Nothing was removed or edited: the full audit trail remains.
    assert_eq!(log.entries.len(), 7);
    assert_eq!(log.entries[5].changes[0].new_value, "lo");
}

#[test]
fn test_revert_of_an_undo_entry_reapplies_the_change() {
    let mut log = HistoryLog::new(fixture());
    let k = log.commit("alice", vec![ChangeRecord::word("t0", 0, 0, "el", "un")]);
    let u = log.revert("alice", k).unwrap();
    assert_eq!(log.document.word_text(0, 0), Some("el"));

    // Undo entries are ordinary entries; reverting one re-applies the
    // original change.
    log.revert("alice", u).unwrap();
    assert_eq!(log.document.word_text(0, 0), Some("un"));
}

#[test]
fn test_revert_unknown_index_fails_without_mutation() {
    let mut log = HistoryLog::new(fixture());
    log.commit("alice", vec![ChangeRecord::word("t0", 0, 0, "el", "un")]);
    let before = log.document.clone();
    let entries_before = log.entries.len();

    assert!(log.revert("alice", 17).is_err());
    assert_eq!(log.document, before);
    assert_eq!(log.entries.len(), entries_before);
}
