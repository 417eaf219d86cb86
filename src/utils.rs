// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{check_amount, YearMonth};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(YearMonth::of(d))
}

/// Parses a non-negative monetary amount. A single decimal comma is accepted
/// in place of the point ("12,50").
pub fn parse_amount(s: &str) -> Result<Decimal, LedgerError> {
    let trimmed = s.trim();
    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replacen(',', ".", 1)
    };
    let d = normalized
        .parse::<Decimal>()
        .map_err(|_| LedgerError::Validation(format!("Invalid amount '{}'", s)))?;
    check_amount("Amount", d)?;
    Ok(d)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn month_end(month: YearMonth) -> Result<NaiveDate, LedgerError> {
    let invalid = || LedgerError::Validation(format!("Invalid month '{}'", month));
    match month.month {
        1..=11 => {}
        12 => return NaiveDate::from_ymd_opt(month.year, 12, 31).ok_or_else(invalid),
        _ => return Err(invalid()),
    }
    NaiveDate::from_ymd_opt(month.year, month.month + 1, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .ok_or_else(invalid)
}

/// Shifts `date` by `months` calendar months, clamping the day to the last
/// valid day of the target month (Jan 31 + 1 month = Feb 28/29). Fails when
/// the result falls outside chrono's date range.
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, LedgerError> {
    let out_of_range =
        || LedgerError::Validation(format!("{} shifted by {} months is out of range", date, months));
    let zero_based = (date.year() * 12 + date.month0() as i32)
        .checked_add(months)
        .ok_or_else(out_of_range)?;
    let target = YearMonth {
        year: zero_based.div_euclid(12),
        month: zero_based.rem_euclid(12) as u32 + 1,
    };
    on_day(target, date.day()).map_err(|_| out_of_range())
}

/// The given day of `month`, clamped to the month's length.
pub fn on_day(month: YearMonth, day: u32) -> Result<NaiveDate, LedgerError> {
    let last = month_end(month)?.day();
    NaiveDate::from_ymd_opt(month.year, month.month, day.clamp(1, last))
        .ok_or_else(|| LedgerError::Validation(format!("Invalid month '{}'", month)))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
