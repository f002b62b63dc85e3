//! Migration source reader
//!
//! Scans a directory (non-recursively) for `<version>_<anything>.up.sql`
//! files and turns them into [`Migration`] records sorted by version.
//!
//! Entries that are not migrations are returned in [`SourceScan::skipped`]
//! rather than logged here; the caller decides how to report them.

use crate::errors::{MigratorError, Result};
use crate::model::{
    Migration, SkipReason, SkippedEntry, SourceScan, UP_SUFFIX, VERSION_SEPARATOR,
};
use std::path::Path;

/// Check that `dir` exists and is a directory
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(MigratorError::PathNotFound {
            path: dir.to_path_buf(),
        })
    }
}

/// Parse the version prefix of a migration filename
///
/// The version is everything before the first `_`. A file without a
/// separator, or with a non-numeric prefix, is rejected.
pub fn parse_version(file_name: &str) -> Result<i64> {
    let prefix = file_name
        .split(VERSION_SEPARATOR)
        .next()
        .unwrap_or_default();

    prefix
        .parse::<i64>()
        .map_err(|e| MigratorError::InvalidMigrationName {
            file_name: file_name.to_string(),
            reason: format!("version prefix {:?} is not an integer ({})", prefix, e),
        })
}

/// Read every qualifying migration in `dir`
///
/// Fails on the first unparsable version prefix or unreadable file; nothing
/// read so far is returned in that case.
pub fn read_migrations(dir: &Path) -> Result<SourceScan> {
    ensure_dir(dir)?;

    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MigratorError::PathNotFound {
            path: dir.to_path_buf(),
        },
        _ => MigratorError::FileReadError {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let mut scan = SourceScan::default();

    for entry in entries {
        let entry = entry.map_err(|e| MigratorError::FileReadError {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let path = entry.path();

        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            scan.skipped.push(SkippedEntry {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                reason: SkipReason::NonUtf8Name,
            });
            continue;
        };

        let is_dir = entry
            .file_type()
            .map(|t| t.is_dir())
            .map_err(|e| MigratorError::FileReadError {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if is_dir {
            scan.skipped.push(SkippedEntry {
                file_name,
                reason: SkipReason::Directory,
            });
            continue;
        }

        let Some(name) = file_name.strip_suffix(UP_SUFFIX) else {
            scan.skipped.push(SkippedEntry {
                file_name,
                reason: SkipReason::UnrecognizedSuffix,
            });
            continue;
        };

        let version = parse_version(&file_name)?;

        let sql = std::fs::read_to_string(&path).map_err(|e| MigratorError::FileReadError {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(version, migration = name, "discovered migration");

        scan.migrations.push(Migration::new(version, name, sql));
    }

    // Directory enumeration order is platform-defined
    scan.migrations
        .sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.name.cmp(&b.name)));
    scan.skipped.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(scan)
}
