// Transcript JSON load/store
//
// The on-disk format is the server's document format: segments with a
// "speaker" field and word lists carrying token ids and timings.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use scriba_engine::document::Document;

/// Load a transcript document from a JSON file.
pub fn load_document(path: &Path) -> Result<Document, String> {
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Write a transcript document as pretty-printed JSON.
pub fn save_document(doc: &Document, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, doc).map_err(|e| e.to_string())
}
