//! Test harness for editor sessions.
//!
//! Provides a small fixture transcript and `SessionHarness`, a wrapper
//! that drives the open/commit cycle in one call so tests read as edit
//! scripts. Test-only; the public API stays the explicit two-step flow.

use crate::document::{Document, Segment, Speaker, Word};
use crate::session::{EditOutcome, EditorSession};

fn word(token_id: &str, text: &str, start: f64) -> Word {
    Word {
        token_id: token_id.to_string(),
        text: text.to_string(),
        lemma: text.to_string(),
        pos: String::new(),
        morph: String::new(),
        start,
        end: start + 0.4,
    }
}

/// Three segments, four words each, two speakers. Token ids t0..t11 in
/// reading order.
pub fn sample_document() -> Document {
    let texts = [
        ("spk1", ["la", "señora", "dijo", "que"]),
        ("spk2", ["mi", "casa", "es", "blanca"]),
        ("spk2", ["el", "perro", "está", "fuera"]),
    ];
    let segments = texts
        .iter()
        .enumerate()
        .map(|(si, (speaker, words))| Segment {
            speaker_id: speaker.to_string(),
            words: words
                .iter()
                .enumerate()
                .map(|(wi, text)| {
                    let n = si * 4 + wi;
                    word(&format!("t{}", n), text, n as f64 * 0.5)
                })
                .collect(),
        })
        .collect();

    Document {
        segments,
        speakers: vec![
            Speaker { spkid: "spk1".into(), name: "Juan".into() },
            Speaker { spkid: "spk2".into(), name: "María".into() },
        ],
    }
}

pub struct SessionHarness {
    pub session: EditorSession,
}

impl SessionHarness {
    pub fn new() -> Self {
        Self { session: EditorSession::new(sample_document()) }
    }

    /// Open, type, commit. Panics on rejection — harness edits are meant
    /// to succeed.
    pub fn edit(&mut self, segment_index: usize, word_index: usize, new_value: &str) -> EditOutcome {
        self.session.start_edit(segment_index, word_index).unwrap();
        self.session.finish_edit(new_value).unwrap()
    }

    /// Open and confirm a speaker selection.
    pub fn speaker(&mut self, segment_index: usize, new_spkid: &str) -> EditOutcome {
        self.session.open_speaker_selection(segment_index).unwrap();
        self.session.confirm_speaker(new_spkid).unwrap()
    }
}
