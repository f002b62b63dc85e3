//! CLI subcommands

use clap::Args;
use migrator_store::{LedgerConfig, DEFAULT_LEDGER_TABLE};
use std::path::PathBuf;

pub mod status;
pub mod up;

/// Database, migrations directory and ledger location shared by every command
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// SQLite database file, or `:memory:`
    #[arg(long, env = "MIGRATOR_DATABASE")]
    pub database: String,

    /// Directory holding `<version>_<name>.up.sql` files
    #[arg(long, env = "MIGRATOR_DIR")]
    pub dir: PathBuf,

    /// Dedicated schema for the ledger table (attached database)
    #[arg(long, env = "MIGRATOR_SCHEMA")]
    pub schema: Option<String>,

    /// Ledger table name
    #[arg(long, env = "MIGRATOR_TABLE", default_value = DEFAULT_LEDGER_TABLE)]
    pub table: String,
}

impl TargetArgs {
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            schema: self.schema.clone(),
            table: self.table.clone(),
        }
    }
}
