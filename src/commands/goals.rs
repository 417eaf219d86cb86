// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{resolve_id, short_id};
use crate::ledger::Ledger;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let desc = sub.get_one::<String>("desc").unwrap();
            let target = parse_amount(sub.get_one::<String>("target").unwrap())?;
            let current = parse_amount(sub.get_one::<String>("current").unwrap())?;
            let by = parse_date(sub.get_one::<String>("by").unwrap())?;
            let g = ledger.add_goal(desc, target, current, by)?;
            println!(
                "Added goal {} '{}' ({} by {})",
                short_id(&g.id),
                g.description,
                fmt_money(&g.target_amount),
                g.target_date
            );
        }
        Some(("contribute", sub)) => {
            let needle = sub.get_one::<String>("id").unwrap();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let id = resolve_id(ledger.goals().iter().map(|g| g.id), needle)?
                .with_context(|| format!("Goal '{}' not found", needle))?;
            let g = ledger.contribute_to_goal(id, amount)?;
            println!(
                "'{}' now at {} of {} ({}%)",
                g.description,
                fmt_money(&g.current_amount),
                fmt_money(&g.target_amount),
                percent(g.progress())
            );
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rm", sub)) => {
            let needle = sub.get_one::<String>("id").unwrap();
            match resolve_id(ledger.goals().iter().map(|g| g.id), needle)? {
                Some(id) if ledger.remove_goal(id) => println!("Removed goal {}", short_id(&id)),
                _ => println!("No matching goal"),
            }
        }
        _ => {}
    }
    Ok(())
}

fn percent(progress: Decimal) -> String {
    (progress * Decimal::ONE_HUNDRED).round_dp(0).to_string()
}

#[derive(Serialize)]
pub struct GoalRow {
    pub id: String,
    pub description: String,
    pub current: String,
    pub target: String,
    pub progress: Decimal,
    pub target_date: String,
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<GoalRow> = ledger
        .goals()
        .iter()
        .map(|g| GoalRow {
            id: short_id(&g.id),
            description: g.description.clone(),
            current: fmt_money(&g.current_amount),
            target: fmt_money(&g.target_amount),
            progress: g.progress(),
            target_date: g.target_date.to_string(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|g| {
                vec![
                    g.id.clone(),
                    g.description.clone(),
                    g.current.clone(),
                    g.target.clone(),
                    format!("{}%", percent(g.progress)),
                    g.target_date.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Goal", "Saved", "Target", "Progress", "By"], rows)
        );
    }
    Ok(())
}
