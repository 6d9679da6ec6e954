//! Interactive correction session — the editor front-end.
//!
//! The GUI contract (Enter commits, Escape cancels, Ctrl+Z/Ctrl+Y step
//! history) maps onto line commands here; the engine does all the state
//! work. One session per invocation, one transcript per session.

use std::io::{self, BufRead, Write};
use std::path::Path;

use scriba_config::Settings;
use scriba_engine::session::EditorSession;
use scriba_hub_client::HubClient;
use scriba_protocol::{ChangeRecord, SaveRequest};

use crate::hub::{hub_error, io_error};
use crate::CliError;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Edit { segment: usize, word: usize, value: String },
    Speaker { segment: usize, spkid: String },
    Undo,
    Redo,
    Changes,
    Save,
    Discard,
    Help,
    Quit,
}

/// Parse one session command line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".into());
    };

    match verb {
        "show" => Ok(Command::Show),
        "undo" => Ok(Command::Undo),
        "redo" => Ok(Command::Redo),
        "changes" => Ok(Command::Changes),
        "save" => Ok(Command::Save),
        "discard" => Ok(Command::Discard),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "edit" => {
            let segment = parse_index(parts.next(), "SEG")?;
            let word = parse_index(parts.next(), "WORD")?;
            let value: Vec<&str> = parts.collect();
            if value.is_empty() {
                return Err("usage: edit SEG WORD VALUE".into());
            }
            Ok(Command::Edit { segment, word, value: value.join(" ") })
        }
        "speaker" => {
            let segment = parse_index(parts.next(), "SEG")?;
            let spkid = parts
                .next()
                .ok_or_else(|| "usage: speaker SEG SPKID".to_string())?;
            Ok(Command::Speaker { segment, spkid: spkid.to_string() })
        }
        other => Err(format!("unknown command: {}", other)),
    }
}

fn parse_index(token: Option<&str>, name: &str) -> Result<usize, String> {
    let token = token.ok_or_else(|| format!("missing {}", name))?;
    token
        .parse()
        .map_err(|_| format!("{} must be a number, got '{}'", name, token))
}

/// Flatten the tracker into the wire change list plus the full document.
/// Word changes sorted by position, speaker changes after them, so the
/// request body is deterministic.
pub fn build_save_request(session: &EditorSession, file: &str) -> SaveRequest {
    let tracker = session.tracker();

    let mut changes: Vec<ChangeRecord> = tracker
        .word_diffs()
        .iter()
        .map(|(token_id, diff)| {
            ChangeRecord::word(
                token_id,
                diff.segment_index,
                diff.word_index,
                &diff.original,
                &diff.modified,
            )
        })
        .collect();
    changes.sort_by_key(|c| (c.segment_index, c.word_index));

    let mut speaker_changes: Vec<ChangeRecord> = tracker
        .speaker_diffs()
        .iter()
        .map(|(segment_index, diff)| {
            ChangeRecord::speaker(*segment_index, &diff.original, &diff.modified)
        })
        .collect();
    speaker_changes.sort_by_key(|c| c.segment_index);
    changes.extend(speaker_changes);

    SaveRequest {
        file: file.to_string(),
        changes,
        transcript_data: session.document().clone(),
    }
}

pub fn cmd_edit(file: &Path) -> Result<(), CliError> {
    let settings = Settings::load();
    let document = scriba_io::json::load_document(file).map_err(io_error)?;
    let mut session = EditorSession::new(document);
    let file_key = file.to_string_lossy().to_string();

    println!(
        "Loaded {} — {} segment(s), {} word(s). Type 'help' for commands.",
        file.display(),
        session.document().segments.len(),
        session.document().word_count()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("scriba> ");
        io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            break; // EOF ends the session
        };
        let line = line.map_err(|e| io_error(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };

        match command {
            Command::Show => print_transcript(&session),
            Command::Edit { segment, word, value } => {
                match session
                    .start_edit(segment, word)
                    .and_then(|_| session.finish_edit(&value))
                {
                    Ok(_) => println!(
                        "seg {} w{} = \"{}\"",
                        segment,
                        word,
                        session.document().word_text(segment, word).unwrap_or("")
                    ),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Command::Speaker { segment, spkid } => {
                match session
                    .open_speaker_selection(segment)
                    .and_then(|_| session.confirm_speaker(&spkid))
                {
                    Ok(_) => println!("seg {} speaker = {}", segment, spkid),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Command::Undo => match session.undo() {
                Some(applied) => println!(
                    "undo: seg {} {} = \"{}\"",
                    applied.segment_index,
                    applied
                        .word_index
                        .map(|w| format!("w{}", w))
                        .unwrap_or_else(|| "speaker".into()),
                    applied.value
                ),
                None => println!("Nothing to undo"),
            },
            Command::Redo => match session.redo() {
                Some(applied) => println!(
                    "redo: seg {} {} = \"{}\"",
                    applied.segment_index,
                    applied
                        .word_index
                        .map(|w| format!("w{}", w))
                        .unwrap_or_else(|| "speaker".into()),
                    applied.value
                ),
                None => println!("Nothing to redo"),
            },
            Command::Changes => print_changes(&session),
            Command::Save => save_session(&mut session, &file_key, file),
            Command::Discard => {
                if session.total_changes() == 0 {
                    println!("No pending changes");
                    continue;
                }
                let ok = !settings.confirm_destructive
                    || confirm(
                        &format!(
                            "Discard {} pending change(s)? This cannot be undone locally. [y/N] ",
                            session.total_changes()
                        ),
                        &mut lines,
                    );
                if ok {
                    session.discard();
                    println!("Discarded; transcript restored");
                } else {
                    println!("Cancelled");
                }
            }
            Command::Help => print_help(),
            Command::Quit => {
                if session.total_changes() > 0 {
                    let ok = confirm(
                        &format!(
                            "Quit with {} unsaved change(s)? [y/N] ",
                            session.total_changes()
                        ),
                        &mut lines,
                    );
                    if !ok {
                        continue;
                    }
                }
                break;
            }
        }
    }

    Ok(())
}

/// Send the pending change-set. On failure everything stays pending;
/// the user can fix the problem and save again.
fn save_session(session: &mut EditorSession, file_key: &str, path: &Path) {
    if session.total_changes() == 0 {
        println!("No changes to save");
        return;
    }

    let client = match HubClient::from_saved_auth() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("save failed: {}", hub_error(e).message);
            return;
        }
    };

    let request = build_save_request(session, file_key);
    let count = request.changes.len();
    match client.save_transcript(&request) {
        Ok(()) => {
            session.mark_saved();
            if let Err(e) = scriba_io::json::save_document(session.document(), path) {
                eprintln!("saved to server, but writing local copy failed: {}", e);
            }
            println!("Saved {} change(s)", count);
        }
        Err(e) => {
            // Pending state is untouched; save again to retry.
            eprintln!("save failed: {}", hub_error(e).message);
        }
    }
}

fn confirm(prompt: &str, lines: &mut impl Iterator<Item = io::Result<String>>) -> bool {
    print!("{}", prompt);
    io::stdout().flush().ok();
    matches!(
        lines.next(),
        Some(Ok(answer)) if answer.trim().eq_ignore_ascii_case("y")
    )
}

fn print_transcript(session: &EditorSession) {
    let doc = session.document();
    for (si, segment) in doc.segments.iter().enumerate() {
        let name = doc
            .speaker_name(&segment.speaker_id)
            .unwrap_or(&segment.speaker_id);
        let words: Vec<String> = segment
            .words
            .iter()
            .enumerate()
            .map(|(wi, w)| format!("{}:{}", wi, w.text))
            .collect();
        println!("seg {} [{}] {}", si, name, words.join(" "));
    }
}

fn print_changes(session: &EditorSession) {
    let tracker = session.tracker();
    if tracker.is_empty() {
        println!("No pending changes");
        return;
    }

    let mut words: Vec<_> = tracker.word_diffs().iter().collect();
    words.sort_by_key(|(_, d)| (d.segment_index, d.word_index));
    for (token_id, diff) in words {
        println!(
            "seg {} w{} ({}): \"{}\" -> \"{}\"",
            diff.segment_index, diff.word_index, token_id, diff.original, diff.modified
        );
    }

    let mut speakers: Vec<_> = tracker.speaker_diffs().iter().collect();
    speakers.sort_by_key(|(si, _)| **si);
    for (segment_index, diff) in speakers {
        println!(
            "seg {} speaker: \"{}\" -> \"{}\"",
            segment_index, diff.original, diff.modified
        );
    }
    println!("{} pending change(s)", tracker.total_changes());
}

fn print_help() {
    println!("show                      print the transcript with positions");
    println!("edit SEG WORD VALUE       correct a word");
    println!("speaker SEG SPKID         reassign a segment's speaker");
    println!("undo / redo               step through the last 10 edits");
    println!("changes                   list pending net changes");
    println!("save                      send pending changes to the server");
    println!("discard                   drop all pending changes");
    println!("quit                      end the session");
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriba_engine::document::{Document, Segment, Speaker, Word};

    fn word(token_id: &str, text: &str) -> Word {
        Word {
            token_id: token_id.into(),
            text: text.into(),
            lemma: text.into(),
            pos: String::new(),
            morph: String::new(),
            start: 0.0,
            end: 0.5,
        }
    }

    fn session_with_edits() -> EditorSession {
        let doc = Document {
            segments: vec![
                Segment {
                    speaker_id: "spk1".into(),
                    words: vec![word("t0", "el"), word("t1", "perro")],
                },
                Segment {
                    speaker_id: "spk2".into(),
                    words: vec![word("t2", "la"), word("t3", "casa")],
                },
            ],
            speakers: vec![
                Speaker { spkid: "spk1".into(), name: "Juan".into() },
                Speaker { spkid: "spk2".into(), name: "María".into() },
            ],
        };
        let mut session = EditorSession::new(doc);
        session.start_edit(1, 1).unwrap();
        session.finish_edit("casas").unwrap();
        session.start_edit(0, 0).unwrap();
        session.finish_edit("un").unwrap();
        session.open_speaker_selection(0).unwrap();
        session.confirm_speaker("spk2").unwrap();
        session
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("undo").unwrap(), Command::Undo);
        assert_eq!(parse_command("  redo  ").unwrap(), Command::Redo);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
        assert!(parse_command("").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_parse_edit_joins_multiword_values() {
        assert_eq!(
            parse_command("edit 1 5 de la").unwrap(),
            Command::Edit { segment: 1, word: 5, value: "de la".into() }
        );
        assert!(parse_command("edit 1 5").is_err());
        assert!(parse_command("edit one 5 x").is_err());
    }

    #[test]
    fn test_parse_speaker() {
        assert_eq!(
            parse_command("speaker 2 spk1").unwrap(),
            Command::Speaker { segment: 2, spkid: "spk1".into() }
        );
        assert!(parse_command("speaker 2").is_err());
    }

    #[test]
    fn test_build_save_request_shape() {
        let session = session_with_edits();
        let request = build_save_request(&session, "es/interview.json");

        assert_eq!(request.file, "es/interview.json");
        assert_eq!(request.changes.len(), 3);

        // Word changes first, in position order; speaker changes after.
        assert_eq!(request.changes[0].token_id.as_deref(), Some("t0"));
        assert_eq!(request.changes[0].old_value, "el");
        assert_eq!(request.changes[0].new_value, "un");
        assert_eq!(request.changes[1].token_id.as_deref(), Some("t3"));
        assert!(request.changes[2].is_speaker_change());
        assert_eq!(request.changes[2].segment_index, 0);

        // The full current document rides along.
        assert_eq!(request.transcript_data.word_text(1, 1), Some("casas"));
        assert_eq!(request.transcript_data.speaker_id(0), Some("spk2"));
    }
}
