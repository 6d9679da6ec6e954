//! History panel: list a transcript's committed change-sets and drive
//! selective reverts.
//!
//! The server's log is append-only; a revert never rewrites it. It
//! applies the chosen entry's recorded old values to the CURRENT
//! canonical document and appends a new `undo` entry, so reverting an
//! old entry silently overwrites any later edits to the same words.
//! `cmd_revert` previews exactly what will be applied before asking.

use std::io::{self, BufRead, Write};
use std::path::Path;

use scriba_config::Settings;
use scriba_hub_client::HubClient;
use scriba_protocol::{ChangeRecord, EntryKind, HistoryEntry};

use crate::hub::{hub_error, io_error};
use crate::CliError;

pub fn cmd_history(file: &Path, country: Option<String>) -> Result<(), CliError> {
    let settings = Settings::load();
    let (country, filename) = resolve_history_key(file, country, &settings)?;
    let client = HubClient::from_saved_auth().map_err(hub_error)?;
    let history = client.list_history(&country, &filename).map_err(hub_error)?;

    if history.is_empty() {
        println!("No history for {} ({})", filename, country);
        return Ok(());
    }

    for entry in &history {
        print!("{}", render_entry(entry));
    }
    println!("{} entr{}", history.len(), if history.len() == 1 { "y" } else { "ies" });
    Ok(())
}

pub fn cmd_revert(file: &Path, index: usize, yes: bool) -> Result<(), CliError> {
    let settings = Settings::load();
    let (country, filename) = resolve_history_key(file, None, &settings)?;
    let file_key = file.to_string_lossy().to_string();
    let client = HubClient::from_saved_auth().map_err(hub_error)?;

    // Preview: show what the server will apply to the current document.
    let history = client.list_history(&country, &filename).map_err(hub_error)?;
    let Some(entry) = history.iter().find(|e| e.index == index) else {
        return Err(CliError::usage(format!(
            "no history entry #{} for {} (history has {} entries)",
            index,
            filename,
            history.len()
        )));
    };

    println!(
        "Reverting #{} ({} by {} at {}):",
        entry.index,
        kind_label(entry.kind),
        entry.user,
        entry.timestamp
    );
    for change in entry.inverse_changes() {
        print!("  will apply {}", render_change(&change));
    }
    println!("Later edits to the same words will be overwritten.");

    if !yes && settings.confirm_destructive {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        print!("Revert change-set #{}? [y/N] ", index);
        io::stdout().flush().ok();
        let confirmed = matches!(
            lines.next(),
            Some(Ok(answer)) if answer.trim().eq_ignore_ascii_case("y")
        );
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    client.revert(&file_key, index).map_err(hub_error)?;

    // The canonical document changed server-side; replace the local copy
    // rather than merging.
    let document = client.fetch_transcript(&file_key).map_err(hub_error)?;
    scriba_io::json::save_document(&document, file).map_err(io_error)?;
    println!("Reverted #{}; local copy reloaded from the server", index);
    Ok(())
}

/// History lookups are keyed by (country, filename): the country from
/// the flag or settings, the filename from the path's final component.
fn resolve_history_key(
    file: &Path,
    country: Option<String>,
    settings: &Settings,
) -> Result<(String, String), CliError> {
    let country = match country {
        Some(c) if !c.is_empty() => c,
        _ => {
            if settings.country.is_empty() {
                return Err(CliError {
                    code: crate::exit_codes::EXIT_USAGE,
                    message: "No corpus country configured".into(),
                    hint: Some("pass --country or set it in settings.json".into()),
                });
            }
            settings.country.clone()
        }
    };

    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| CliError::usage(format!("{}: not a file path", file.display())))?;

    Ok((country, filename))
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Change => "change",
        EntryKind::Undo => "undo",
    }
}

fn render_change(change: &ChangeRecord) -> String {
    if change.is_speaker_change() {
        format!(
            "seg {} speaker: \"{}\" -> \"{}\"\n",
            change.segment_index, change.old_value, change.new_value
        )
    } else {
        let position = match change.word_index {
            Some(wi) => format!("w{}", wi),
            None => "w?".to_string(),
        };
        format!(
            "seg {} {}: \"{}\" -> \"{}\"\n",
            change.segment_index, position, change.old_value, change.new_value
        )
    }
}

fn render_entry(entry: &HistoryEntry) -> String {
    let mut out = format!(
        "#{}  {}  {}  {}",
        entry.index,
        entry.timestamp,
        entry.user,
        kind_label(entry.kind)
    );
    if let Some(reversed) = entry.reversed_index {
        out.push_str(&format!(" (reverts #{})", reversed));
    }
    out.push('\n');
    for change in &entry.changes {
        out.push_str("  ");
        out.push_str(&render_change(change));
    }
    out
}
