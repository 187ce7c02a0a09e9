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
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-4     | Universal        | I/O and configuration errors             |
//! | 60-64   | join / load      | Reconciliation and store failures        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant error mapping below

use tedlink_io::StoreError;
use tedlink_recon::ReconError;

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

// 1 is unused. 2 (usage error) is emitted by clap before any command runs.

/// Cannot read an input file or write an output file.
pub const EXIT_IO: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 4;

// =============================================================================
// Join / load (60-64)
// =============================================================================

/// A source record has no value for its designated key field.
pub const EXIT_MISSING_KEY_FIELD: u8 = 60;

/// The destination relation already exists (rerun with --replace).
pub const EXIT_SCHEMA_CONFLICT: u8 = 61;

/// A data row's width differs from the header, or the header is unusable.
pub const EXIT_MALFORMED_RECORD: u8 = 62;

/// A match script statement failed.
pub const EXIT_SCRIPT_FAILED: u8 = 63;

/// Any other store failure (SQLite error, unreadable stream).
pub const EXIT_STORE: u8 = 64;

// =============================================================================
// Error mapping
// =============================================================================

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::MissingKeyField { .. } => EXIT_MISSING_KEY_FIELD,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::Csv { .. } => EXIT_IO,
    }
}

/// Map a StoreError to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::SchemaConflict { .. } => EXIT_SCHEMA_CONFLICT,
        StoreError::MalformedRecord { .. }
        | StoreError::InvalidColumnName { .. }
        | StoreError::EmptyStream => EXIT_MALFORMED_RECORD,
        StoreError::ScriptExecution { .. } => EXIT_SCRIPT_FAILED,
        StoreError::Config(_) => EXIT_CONFIG,
        StoreError::Io(_) => EXIT_IO,
        StoreError::UnknownRelation(_) | StoreError::Sqlite(_) | StoreError::Csv(_) => EXIT_STORE,
    }
}
