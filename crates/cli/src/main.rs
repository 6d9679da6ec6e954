// Scriba CLI - transcript correction sessions, history, selective revert

mod exit_codes;
mod hub;
mod panel;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

/// A command failure carrying its shell exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Parser)]
#[command(name = "scriba")]
#[command(about = "Correct machine transcripts against a CorpusHub server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an API token for the CorpusHub server
    Login {
        /// API token (falls back to SCRIBA_API_TOKEN)
        #[arg(long, env = "SCRIBA_API_TOKEN")]
        token: Option<String>,

        /// API base URL
        #[arg(long, default_value = "https://corpus.scriba.app")]
        api_base: String,
    },

    /// Open an interactive correction session on a transcript
    #[command(after_help = "\
Session commands (one per line on stdin):
  show                      print the transcript with positions
  edit SEG WORD VALUE       correct a word (Enter commits, empty cancels)
  speaker SEG SPKID         reassign a segment's speaker
  undo / redo               step through the last 10 edits
  changes                   list pending net changes
  save                      send pending changes to the server
  discard                   drop all pending changes (asks first)
  quit")]
    Edit {
        /// Transcript JSON file
        file: PathBuf,
    },

    /// List the committed change history for a transcript
    History {
        /// Transcript JSON file
        file: PathBuf,

        /// Corpus country code (defaults to settings)
        #[arg(long)]
        country: Option<String>,
    },

    /// Revert one past change-set by history index
    #[command(after_help = "\
The server applies the recorded old values to the CURRENT canonical
document and appends a new history entry; later edits to the same words
are overwritten without warning. On success the local file is replaced
with the reloaded canonical transcript.")]
    Revert {
        /// Transcript JSON file
        file: PathBuf,

        /// History index to revert
        index: usize,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login { token, api_base } => hub::cmd_login(token, api_base),
        Commands::Edit { file } => session::cmd_edit(&file),
        Commands::History { file, country } => panel::cmd_history(&file, country),
        Commands::Revert { file, index, yes } => panel::cmd_revert(&file, index, yes),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(e.code)
        }
    }
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: message.into(), hint: None }
    }
}
