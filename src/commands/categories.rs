// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::CategoryAffinity;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: CategoryAffinity = sub.get_one::<String>("kind").unwrap().parse()?;
            let color = sub.get_one::<String>("color").cloned();
            let cat = ledger.add_category(name, kind, color)?;
            println!("Added category '{}' ({})", cat.name, cat.kind);
        }
        Some(("list", sub)) => {
            let mut cats: Vec<_> = ledger.categories().to_vec();
            cats.sort_by_key(|c| c.name.to_lowercase());
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.name, c.kind.to_string(), c.color.unwrap_or_default()])
                    .collect();
                println!("{}", pretty_table(&["Category", "Kind", "Color"], data));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            if ledger.remove_category(name) {
                println!("Removed category '{}'", name);
            } else {
                println!("No category '{}'", name);
            }
        }
        _ => {}
    }
    Ok(())
}
