// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side aggregation over a ledger snapshot. Nothing here mutates.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Kind, Transaction, YearMonth};
use crate::utils::add_months;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Longest window `last-N-months` accepts (one hundred years).
pub const MAX_PERIOD_MONTHS: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

impl Totals {
    fn add(&mut self, t: &Transaction) {
        match t.kind {
            Kind::Income => self.income += t.amount,
            Kind::Expense => self.expenses += t.amount,
        }
        self.balance = self.income - self.expenses;
    }
}

/// Totals over every record, settled or not.
pub fn totals<'a>(records: impl IntoIterator<Item = &'a Transaction>) -> Totals {
    let mut out = Totals::default();
    for t in records {
        out.add(t);
    }
    out
}

pub fn settled_totals<'a>(records: impl IntoIterator<Item = &'a Transaction>) -> Totals {
    totals(records.into_iter().filter(|t| t.settled))
}

/// Sums magnitudes of `kind` records per category name.
pub fn by_category<'a>(
    records: impl IntoIterator<Item = &'a Transaction>,
    kind: Kind,
) -> HashMap<String, Decimal> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for t in records.into_iter().filter(|t| t.kind == kind) {
        let name = t.category.clone().unwrap_or_else(|| UNCATEGORIZED.to_string());
        *agg.entry(name).or_insert(Decimal::ZERO) += t.amount;
    }
    agg
}

/// Whole days from `today` to `payday`, rounded up, floored at 1.
pub fn days_remaining(today: NaiveDate, payday: NaiveDate) -> i64 {
    (payday - today).num_days().max(1)
}

/// Balance spread evenly over the days left until `payday`.
pub fn daily_allowance<'a>(
    records: impl IntoIterator<Item = &'a Transaction>,
    today: NaiveDate,
    payday: NaiveDate,
) -> LedgerResult<Decimal> {
    if payday <= today {
        return Err(LedgerError::Validation("payday must be in the future".into()));
    }
    Ok(allowance(totals(records).balance, days_remaining(today, payday)))
}

pub fn allowance(balance: Decimal, days: i64) -> Decimal {
    balance / Decimal::from(days.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    CurrentMonth,
    LastMonth,
    LastNMonths(u32),
}

impl Period {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::All => true,
            Period::CurrentMonth => YearMonth::of(today).contains(date),
            Period::LastMonth => {
                add_months(today, -1).is_ok_and(|d| YearMonth::of(d).contains(date))
            }
            Period::LastNMonths(n) => {
                let start = i32::try_from(*n)
                    .map_err(|_| LedgerError::Validation(format!("{} months is out of range", n)))
                    .and_then(|n| add_months(today, -n))
                    // a window reaching past the earliest date covers everything
                    .unwrap_or(NaiveDate::MIN);
                date >= start && date <= today
            }
        }
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "all" => return Ok(Period::All),
            "current-month" | "month" => return Ok(Period::CurrentMonth),
            "last-month" => return Ok(Period::LastMonth),
            _ => {}
        }
        s.strip_prefix("last-")
            .and_then(|rest| rest.strip_suffix("-months"))
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid period '{}', expected all, current-month, last-month or last-N-months",
                    s
                ))
            })
            .and_then(|n| {
                if n > MAX_PERIOD_MONTHS {
                    return Err(LedgerError::Validation(format!(
                        "Period of {} months exceeds the limit of {}",
                        n, MAX_PERIOD_MONTHS
                    )));
                }
                Ok(Period::LastNMonths(n))
            })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::All => write!(f, "all"),
            Period::CurrentMonth => write!(f, "current-month"),
            Period::LastMonth => write!(f, "last-month"),
            Period::LastNMonths(n) => write!(f, "last-{}-months", n),
        }
    }
}

pub fn period_filter<'a>(
    records: impl IntoIterator<Item = &'a Transaction>,
    period: Period,
    today: NaiveDate,
) -> Vec<&'a Transaction> {
    records
        .into_iter()
        .filter(|t| period.contains(t.occurs_on, today))
        .collect()
}

pub fn overdue<'a>(
    records: impl IntoIterator<Item = &'a Transaction>,
    today: NaiveDate,
) -> Vec<&'a Transaction> {
    records.into_iter().filter(|t| t.is_overdue(today)).collect()
}

/// Income and expenses per calendar month, oldest first.
pub fn monthly_cashflow<'a>(
    records: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<YearMonth, Totals> {
    let mut map: BTreeMap<YearMonth, Totals> = BTreeMap::new();
    for t in records {
        map.entry(t.month()).or_default().add(t);
    }
    map
}
