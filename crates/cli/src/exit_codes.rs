//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3       | Universal        | File I/O error                           |
//! | 10-19   | hub              | CorpusHub client codes                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-3)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// File I/O error - transcript could not be read or written.
pub const EXIT_IO: u8 = 3;

// =============================================================================
// Hub (10-19)
// =============================================================================

/// Not logged in, or the stored token was rejected.
pub const EXIT_HUB_NOT_AUTH: u8 = 10;

/// Could not reach the CorpusHub server.
pub const EXIT_HUB_NETWORK: u8 = 11;

/// The server answered but refused the operation.
pub const EXIT_HUB_REJECTED: u8 = 12;
