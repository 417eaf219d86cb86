// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ledgerlite::clock::{Clock, FixedClock, SystemClock};
use ledgerlite::config::Config;
use ledgerlite::db::SqliteStore;
use ledgerlite::ledger::Ledger;
use ledgerlite::{cli, commands, rollover};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let config = Config::from_matches(&matches)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let clock: Box<dyn Clock> = match config.today {
        Some(d) => Box::new(FixedClock(d)),
        None => Box::new(SystemClock),
    };
    let today = clock.today();

    let mut store = SqliteStore::open(&config.db_path)?;
    let mut ledger = Ledger::load(&store)?;
    rollover::check(&mut ledger, today);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Data file ready at {}", config.db_path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, today, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut ledger, sub)?,
        Some(("reminder", sub)) => commands::reminders::handle(&mut ledger, today, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&mut ledger, sub)?,
        Some(("payday", sub)) => commands::payday::handle(&mut ledger, today, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ledger, today, sub)?,
        Some(("rollover", sub)) => commands::rollover::handle(&mut ledger, today, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    ledger.save(&mut store)?;
    Ok(())
}
