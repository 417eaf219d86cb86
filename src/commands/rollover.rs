// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::rollover;
use crate::utils::fmt_money;
use anyhow::Result;
use chrono::NaiveDate;

pub fn handle(ledger: &mut Ledger, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("run", _)) = m.subcommand() {
        // The startup check has already moved the marker, so this always forces.
        let created = rollover::force(ledger, today);
        if created.is_empty() {
            println!("Fixed entries are up to date for {}", today.format("%Y-%m"));
        }
        for t in created {
            println!(
                "Added {} {} '{}' on {}",
                fmt_money(&t.amount),
                t.kind,
                t.description,
                t.occurs_on
            );
        }
    }
    Ok(())
}
