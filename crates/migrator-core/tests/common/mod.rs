//! Shared helpers for migrator-core integration tests

#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;

/// Create an empty migrations directory
pub fn migrations_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a file into `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("Failed to write migration file");
}
