//! Apply pending migrations

use super::TargetArgs;
use clap::Args;
use migrator_store::migrate_db;

#[derive(Debug, Args)]
pub struct UpArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: UpArgs) -> Result<(), Box<dyn std::error::Error>> {
    let applied = migrate_db(
        &args.target.database,
        &args.target.dir,
        &args.target.ledger_config(),
    )?;

    match applied {
        0 => println!("Database is up to date"),
        1 => println!("Applied 1 migration"),
        n => println!("Applied {} migrations", n),
    }

    Ok(())
}
