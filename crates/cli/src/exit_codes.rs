//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | Success (warnings about skipped files do not change this)   |
//! | 1    | General error (unspecified)                                 |
//! | 2    | Usage / validation error, rejected before any file is read  |
//! | 3    | I/O error (cannot read input, cannot write output)          |
//! | 4    | Required column not found                                   |
//! | 5    | No usable input: every file failed format/encoding checks   |
//! | 6    | Report store error                                          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `recon_exit_code` or the relevant command

use uidmatch_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, too few files, empty column list,
/// unsupported merge mode, malformed config.
pub const EXIT_USAGE: u8 = 2;

/// Input could not be read or output could not be written.
pub const EXIT_IO: u8 = 3;

/// Required column absent (violations).
pub const EXIT_COLUMN_NOT_FOUND: u8 = 4;

/// Every submitted file was skipped.
pub const EXIT_NO_USABLE_INPUT: u8 = 5;

/// Report history database failed.
pub const EXIT_STORE: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Validation(_) | ReconError::UnsupportedMergeMode(_) | ReconError::Config(_) => {
            EXIT_USAGE
        }
        ReconError::ColumnNotFound { .. } => EXIT_COLUMN_NOT_FOUND,
        ReconError::NoUsableFiles { .. } => EXIT_NO_USABLE_INPUT,
        ReconError::Read(read) => match read.kind() {
            "io" | "write" => EXIT_IO,
            _ => EXIT_NO_USABLE_INPUT,
        },
    }
}
