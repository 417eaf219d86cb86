// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::days_remaining;
use crate::ledger::Ledger;
use crate::utils::parse_date;
use anyhow::{bail, Result};
use chrono::NaiveDate;

pub fn handle(ledger: &mut Ledger, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            if date <= today {
                bail!("Payday must be in the future (today is {})", today);
            }
            ledger.set_payday(date);
            println!("Next payday set to {}", date);
        }
        Some(("show", _)) => match ledger.next_payday() {
            Some(d) if d > today => {
                println!("Next payday: {} ({} days left)", d, days_remaining(today, d))
            }
            Some(d) => println!("Stored payday {} has passed; set a new one", d),
            None => println!("No payday set"),
        },
        Some(("clear", _)) => {
            if ledger.clear_payday() {
                println!("Payday cleared");
            }
        }
        _ => {}
    }
    Ok(())
}
