// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{self, Period, Totals};
use crate::ledger::Ledger;
use crate::models::{Kind, Transaction};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(ledger: &Ledger, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("totals", sub)) => totals(ledger, today, sub)?,
        Some(("by-category", sub)) => by_category(ledger, today, sub)?,
        Some(("allowance", sub)) => allowance(ledger, today, sub)?,
        Some(("cashflow", sub)) => cashflow(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn in_period<'a>(
    ledger: &'a Ledger,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<Vec<&'a Transaction>> {
    let period: Period = sub.get_one::<String>("period").unwrap().parse()?;
    Ok(budget::period_filter(ledger.transactions(), period, today))
}

pub fn compute_totals(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<Totals> {
    let records = in_period(ledger, today, sub)?;
    Ok(if sub.get_flag("settled-only") {
        budget::settled_totals(records)
    } else {
        budget::totals(records)
    })
}

fn totals(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let t = compute_totals(ledger, today, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let rows = vec![vec![
            fmt_money(&t.income),
            fmt_money(&t.expenses),
            fmt_money(&t.balance),
        ]];
        println!("{}", pretty_table(&["Income", "Expenses", "Balance"], rows));
    }
    Ok(())
}

/// Category totals, largest first.
pub fn category_rows(
    ledger: &Ledger,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<Vec<(String, Decimal)>> {
    let kind: Kind = sub.get_one::<String>("kind").unwrap().parse()?;
    let records = in_period(ledger, today, sub)?;
    let mut items: Vec<_> = budget::by_category(records, kind).into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(items)
}

fn by_category(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let items = category_rows(ledger, today, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        let data = items
            .into_iter()
            .map(|(cat, amt)| vec![cat, fmt_money(&amt)])
            .collect();
        println!("{}", pretty_table(&["Category", "Amount"], data));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Allowance {
    pub payday: NaiveDate,
    pub days_remaining: i64,
    pub balance: Decimal,
    pub per_day: Decimal,
}

pub fn compute_allowance(
    ledger: &Ledger,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<Allowance> {
    let payday = match sub.get_one::<String>("payday") {
        Some(d) => parse_date(d)?,
        None => ledger
            .next_payday()
            .context("No payday set; pass --payday or run `payday set`")?,
    };
    let settled_only = sub.get_flag("settled-only");
    let records: Vec<&Transaction> = ledger
        .transactions()
        .iter()
        .filter(|t| !settled_only || t.settled)
        .collect();
    let per_day = budget::daily_allowance(records.iter().copied(), today, payday)?;
    Ok(Allowance {
        payday,
        days_remaining: budget::days_remaining(today, payday),
        balance: budget::totals(records).balance,
        per_day: per_day.round_dp(2),
    })
}

fn allowance(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let a = compute_allowance(ledger, today, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &a)? {
        println!(
            "Next payday {} • {} days left • balance {} • safe to spend {} per day",
            a.payday,
            a.days_remaining,
            fmt_money(&a.balance),
            fmt_money(&a.per_day)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CashflowRow {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// Per-month totals, newest month first, at most `--months` rows.
pub fn cashflow_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Vec<CashflowRow> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    budget::monthly_cashflow(ledger.transactions())
        .into_iter()
        .rev()
        .take(months)
        .map(|(m, t)| CashflowRow {
            month: m.to_string(),
            income: t.income,
            expenses: t.expenses,
            net: t.balance,
        })
        .collect()
}

fn cashflow(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let rows = cashflow_rows(ledger, sub);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    fmt_money(&r.income),
                    fmt_money(&r.expenses),
                    fmt_money(&r.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expenses", "Net"], data)
        );
    }
    Ok(())
}
