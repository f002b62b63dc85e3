//! Migrator CLI
//!
//! Command-line interface for applying forward-only SQL migrations

use clap::{Parser, Subcommand};
use migrator_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "migrator")]
#[command(about = "Migrator - forward-only SQL migrations", long_about = None)]
struct Cli {
    /// Log output format (pretty or json)
    #[arg(long, global = true, env = "MIGRATOR_LOG_FORMAT", default_value = "pretty")]
    log_format: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply every pending migration
    Up(commands::up::UpArgs),
    /// Show applied, pending and orphaned migrations without applying anything
    Status(commands::status::StatusArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init(cli.log_format);

    let result = match cli.command {
        Commands::Up(args) => commands::up::execute(args),
        Commands::Status(args) => commands::status::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
