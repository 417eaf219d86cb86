// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{resolve_id, short_id};
use crate::ledger::Ledger;
use crate::models::Reminder;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;

pub fn handle(ledger: &mut Ledger, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let r = ledger.add_reminder(sub.get_one::<String>("text").unwrap(), today)?;
            println!("Added reminder {} '{}'", short_id(&r.id), r.text);
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("done", sub)) => set_completed(ledger, sub, true)?,
        Some(("reopen", sub)) => set_completed(ledger, sub, false)?,
        Some(("rm", sub)) => {
            match find(ledger, sub)? {
                Some(r) if ledger.remove_reminder(r.id) => println!("Removed '{}'", r.text),
                _ => println!("No matching reminder"),
            }
        }
        _ => {}
    }
    Ok(())
}

fn find(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Option<Reminder>> {
    let needle = sub.get_one::<String>("id").unwrap();
    let id = resolve_id(ledger.reminders().iter().map(|r| r.id), needle)?;
    Ok(id.and_then(|id| ledger.reminders().iter().find(|r| r.id == id).cloned()))
}

fn set_completed(ledger: &mut Ledger, sub: &clap::ArgMatches, completed: bool) -> Result<()> {
    let Some(r) = find(ledger, sub)? else {
        println!("No matching reminder");
        return Ok(());
    };
    if ledger.set_reminder_completed(r.id, completed) {
        let verb = if completed { "Completed" } else { "Reopened" };
        println!("{} '{}'", verb, r.text);
    }
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let completed = sub.get_flag("completed");
    let data: Vec<&Reminder> = ledger
        .reminders()
        .iter()
        .filter(|r| r.completed == completed)
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| vec![short_id(&r.id), r.created_on.to_string(), r.text.clone()])
            .collect();
        println!("{}", pretty_table(&["Id", "Created", "Reminder"], rows));
    }
    Ok(())
}
