//! Migration data model
//!
//! - [`Migration`]: one versioned SQL change discovered on disk
//! - [`AppliedMigration`]: one row read back from the ledger
//! - [`SkippedEntry`]: a directory entry the reader ignored, and why

use chrono::NaiveDateTime;
use std::fmt;

/// Filename suffix marking a forward migration
pub const UP_SUFFIX: &str = ".up.sql";

/// Separator between the version prefix and the rest of the filename
pub const VERSION_SEPARATOR: char = '_';

/// A single forward-only schema change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Leading numeric token of the filename
    pub version: i64,
    /// Filename with [`UP_SUFFIX`] stripped
    pub name: String,
    /// Raw file contents, executed verbatim
    pub sql: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            sql: sql.into(),
        }
    }
}

/// A migration recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    /// `None` when the row was inserted without a timestamp
    pub applied_at: Option<NaiveDateTime>,
}

/// Why a directory entry was not treated as a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    UnrecognizedSuffix,
    NonUtf8Name,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Directory => write!(f, "is a directory"),
            SkipReason::UnrecognizedSuffix => write!(f, "does not end with {}", UP_SUFFIX),
            SkipReason::NonUtf8Name => write!(f, "name is not valid UTF-8"),
        }
    }
}

/// A directory entry ignored during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Everything the reader found in a migrations directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceScan {
    /// Qualifying migrations, sorted by version
    pub migrations: Vec<Migration>,
    /// Entries that were ignored
    pub skipped: Vec<SkippedEntry>,
}
