//! Report migration status without applying anything

use super::TargetArgs;
use clap::Args;
use migrator_store::{db, migration_status, Ledger};

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = Ledger::new(args.target.ledger_config())?;
    let conn = db::connect(&args.target.database)?;
    db::configure(&conn)?;

    let status = migration_status(&conn, &args.target.dir, &ledger)?;

    println!("Ledger: {}", ledger.qualified_table());
    for applied in &status.applied {
        match applied.applied_at {
            Some(at) => println!("  applied  {:>6}  {}  ({})", applied.version, applied.name, at),
            None => println!("  applied  {:>6}  {}", applied.version, applied.name),
        }
    }
    for pending in &status.pending {
        println!("  pending  {:>6}  {}", pending.version, pending.name);
    }
    for version in &status.orphaned {
        println!("  orphaned {:>6}  (no file on disk)", version);
    }
    for skipped in &status.skipped {
        println!("  skipped          {} ({})", skipped.file_name, skipped.reason);
    }

    if status.is_up_to_date() {
        println!("Up to date");
    } else {
        println!("{} pending", status.pending.len());
    }

    Ok(())
}
