//! Transcript document model.
//!
//! A document is an ordered list of segments; each segment carries a
//! speaker reference and an ordered run of words. Every word has a stable
//! token id assigned at transcription time. The token id is the only safe
//! correlation key between session state, the change tracker, and server
//! history entries — word indices can shift independently of identity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single word occurrence in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Stable, unique, immutable identity for this occurrence.
    pub token_id: String,
    /// Surface form as displayed and corrected.
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub morph: String,
    /// Audio offset of the word start, in seconds.
    #[serde(default)]
    pub start: f64,
    /// Audio offset of the word end, in seconds.
    #[serde(default)]
    pub end: f64,
}

/// A speech turn: one speaker, an ordered run of words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "speaker")]
    pub speaker_id: String,
    pub words: Vec<Word>,
}

/// A speaker known to the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub spkid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
}

impl Document {
    pub fn word(&self, segment_index: usize, word_index: usize) -> Option<&Word> {
        self.segments.get(segment_index)?.words.get(word_index)
    }

    pub fn word_text(&self, segment_index: usize, word_index: usize) -> Option<&str> {
        self.word(segment_index, word_index).map(|w| w.text.as_str())
    }

    /// Set a word's text, verifying identity first.
    ///
    /// Returns false (document untouched) when the target position does
    /// not exist or the word there no longer carries `token_id`.
    pub fn set_word_text(
        &mut self,
        segment_index: usize,
        word_index: usize,
        token_id: &str,
        text: &str,
    ) -> bool {
        let Some(word) = self
            .segments
            .get_mut(segment_index)
            .and_then(|s| s.words.get_mut(word_index))
        else {
            return false;
        };
        if word.token_id != token_id {
            return false;
        }
        word.text = text.to_string();
        true
    }

    pub fn speaker_id(&self, segment_index: usize) -> Option<&str> {
        self.segments.get(segment_index).map(|s| s.speaker_id.as_str())
    }

    /// Set a segment's speaker. Returns false if the segment does not exist.
    pub fn set_speaker(&mut self, segment_index: usize, spkid: &str) -> bool {
        match self.segments.get_mut(segment_index) {
            Some(segment) => {
                segment.speaker_id = spkid.to_string();
                true
            }
            None => false,
        }
    }

    /// Display name for a speaker id, if it is in the speaker list.
    pub fn speaker_name(&self, spkid: &str) -> Option<&str> {
        self.speakers
            .iter()
            .find(|s| s.spkid == spkid)
            .map(|s| s.name.as_str())
    }

    /// Locate a token by id. Linear scan; documents are segment-sized,
    /// not corpus-sized, so this is fine for replay fallbacks.
    pub fn find_token(&self, token_id: &str) -> Option<(usize, usize)> {
        for (si, segment) in self.segments.iter().enumerate() {
            for (wi, word) in segment.words.iter().enumerate() {
                if word.token_id == token_id {
                    return Some((si, wi));
                }
            }
        }
        None
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }

    /// Current speaker per segment, in segment order.
    pub fn speaker_assignments(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.speaker_id.clone()).collect()
    }

    /// Sanity check: every token id appears exactly once.
    pub fn token_ids_unique(&self) -> bool {
        let mut seen: HashMap<&str, ()> = HashMap::new();
        for segment in &self.segments {
            for word in &segment.words {
                if seen.insert(word.token_id.as_str(), ()).is_some() {
                    return false;
                }
            }
        }
        true
    }
}
