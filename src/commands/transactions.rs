// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{self, Period};
use crate::commands::{resolve_id, short_id};
use crate::ledger::{Ledger, TransactionQuery};
use crate::models::{Kind, Recurrence, Transaction, TransactionDraft};
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(ledger: &mut Ledger, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, today, sub)?,
        Some(("list", sub)) => list(ledger, today, sub)?,
        Some(("overdue", sub)) => overdue(ledger, today, sub)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        Some(("settle", sub)) => settle(ledger, today, sub)?,
        Some(("reopen", sub)) => reopen(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

/// Builds the draft and recurrence from `tx add` arguments.
pub fn draft_from_args(
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<(TransactionDraft, Recurrence)> {
    let description = sub.get_one::<String>("desc").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let kind: Kind = sub.get_one::<String>("kind").unwrap().parse()?;
    let occurs_on = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    let due_on = sub
        .get_one::<String>("due")
        .map(|d| parse_date(d))
        .transpose()?;
    let recurrence = Recurrence::from_flags(
        sub.get_one::<u32>("installments").copied(),
        sub.get_flag("fixed"),
    )?;

    let draft = TransactionDraft {
        description: description.to_string(),
        kind,
        amount,
        occurs_on,
        due_on,
        category: sub.get_one::<String>("category").cloned(),
        settled_on: sub.get_flag("settled").then_some(today),
    };
    Ok((draft, recurrence))
}

fn add(ledger: &mut Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let (draft, recurrence) = draft_from_args(sub, today)?;
    let records = ledger.add_transaction(draft, recurrence)?;
    let first = &records[0];
    match recurrence {
        Recurrence::Installment { total } => println!(
            "Recorded {} x {} {} '{}' from {} (series {})",
            total,
            fmt_money(&first.amount),
            first.kind,
            first.description,
            first.occurs_on,
            short_id(&first.series_id)
        ),
        Recurrence::FixedMonthly => println!(
            "Recorded fixed monthly {} {} '{}' starting {} (series {})",
            fmt_money(&first.amount),
            first.kind,
            first.description,
            first.occurs_on,
            short_id(&first.series_id)
        ),
        Recurrence::None => println!(
            "Recorded {} {} '{}' on {} (id {})",
            fmt_money(&first.amount),
            first.kind,
            first.description,
            first.occurs_on,
            short_id(&first.id)
        ),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub recurrence: String,
    pub due: String,
    pub status: String,
}

impl TransactionRow {
    fn from_record(t: &Transaction, today: NaiveDate) -> Self {
        let recurrence = match t.recurrence {
            Recurrence::Installment { total } => format!("{}/{}", t.occurrence_index, total),
            other => other.to_string(),
        };
        let status = if t.settled {
            "settled"
        } else if t.is_overdue(today) {
            "overdue"
        } else {
            "open"
        };
        Self {
            id: short_id(&t.id),
            date: t.occurs_on.to_string(),
            description: t.description.clone(),
            kind: t.kind.to_string(),
            amount: fmt_money(&t.amount),
            category: t.category.clone().unwrap_or_default(),
            recurrence,
            due: t.due_on.map(|d| d.to_string()).unwrap_or_default(),
            status: status.to_string(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.clone(),
            self.description.clone(),
            self.kind.clone(),
            self.amount.clone(),
            self.category.clone(),
            self.recurrence.clone(),
            self.due.clone(),
            self.status.clone(),
        ]
    }
}

const HEADERS: [&str; 9] = [
    "Id", "Date", "Description", "Kind", "Amount", "Category", "Repeat", "Due", "Status",
];

pub fn query_rows(
    ledger: &Ledger,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let period: Period = sub.get_one::<String>("period").unwrap().parse()?;
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| k.parse::<Kind>())
        .transpose()?;
    let settled = if sub.get_flag("open") {
        Some(false)
    } else if sub.get_flag("settled") {
        Some(true)
    } else {
        None
    };
    let q = TransactionQuery {
        period,
        kind,
        category: sub.get_one::<String>("category").cloned(),
        settled,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    Ok(ledger
        .query(&q, today)
        .into_iter()
        .map(|t| TransactionRow::from_record(t, today))
        .collect())
}

fn list(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(ledger, today, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data.iter().map(TransactionRow::cells).collect();
        println!("{}", pretty_table(&HEADERS, rows));
    }
    Ok(())
}

fn overdue(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let mut late = budget::overdue(ledger.transactions(), today);
    late.sort_by_key(|t| t.due_on);
    let data: Vec<TransactionRow> = late
        .into_iter()
        .map(|t| TransactionRow::from_record(t, today))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        if data.is_empty() {
            println!("Nothing overdue");
        } else {
            let rows = data.iter().map(TransactionRow::cells).collect();
            println!("{}", pretty_table(&HEADERS, rows));
        }
    }
    Ok(())
}

fn find(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Option<Transaction>> {
    let needle = sub.get_one::<String>("id").unwrap();
    let id = resolve_id(ledger.transactions().iter().map(|t| t.id), needle)?;
    Ok(id.and_then(|id| ledger.transaction(id).ok().cloned()))
}

fn rm(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let Some(t) = find(ledger, sub)? else {
        println!("No matching transaction; nothing removed");
        return Ok(());
    };
    if sub.get_flag("series") {
        let n = ledger.remove_series(t.series_id);
        println!("Removed {} record(s) of series {}", n, short_id(&t.series_id));
    } else {
        ledger.remove_transaction(t.id);
        println!("Removed '{}' on {}", t.description, t.occurs_on);
    }
    Ok(())
}

fn settle(ledger: &mut Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let on = match sub.get_one::<String>("on") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    match find(ledger, sub)? {
        Some(t) if ledger.settle(t.id, on) => println!("Settled '{}' on {}", t.description, on),
        Some(t) => println!("'{}' was already settled", t.description),
        None => println!("No matching transaction"),
    }
    Ok(())
}

fn reopen(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    match find(ledger, sub)? {
        Some(t) if ledger.unsettle(t.id) => println!("Reopened '{}'", t.description),
        Some(t) => println!("'{}' was not settled", t.description),
        None => println!("No matching transaction"),
    }
    Ok(())
}
