// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerlite::budget::{self, Period, Totals, MAX_PERIOD_MONTHS, UNCATEGORIZED};
use ledgerlite::error::LedgerError;
use ledgerlite::ledger::Ledger;
use ledgerlite::models::{CategoryAffinity, Kind, Recurrence, Transaction, TransactionDraft, YearMonth};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn add(ledger: &mut Ledger, kind: Kind, amount: &str, on: NaiveDate, category: Option<&str>) {
    let mut draft = TransactionDraft::new("entry", kind, dec(amount), on);
    draft.category = category.map(String::from);
    ledger.add_transaction(draft, Recurrence::None).unwrap();
}

fn simple_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    add(&mut ledger, Kind::Income, "1000", d(2025, 8, 1), None);
    add(&mut ledger, Kind::Expense, "300", d(2025, 8, 2), None);
    add(&mut ledger, Kind::Expense, "200", d(2025, 8, 3), None);
    ledger
}

#[test]
fn totals_sum_by_kind() {
    let ledger = simple_ledger();
    assert_eq!(
        budget::totals(ledger.transactions()),
        Totals {
            income: dec("1000"),
            expenses: dec("500"),
            balance: dec("500"),
        }
    );
}

#[test]
fn settled_totals_skip_open_records() {
    let mut ledger = simple_ledger();
    let income_id = ledger.transactions()[0].id;
    let rent_id = ledger.transactions()[1].id;
    ledger.settle(income_id, d(2025, 8, 5));
    ledger.settle(rent_id, d(2025, 8, 5));

    let all = budget::totals(ledger.transactions());
    let settled = budget::settled_totals(ledger.transactions());
    assert_eq!(all.balance, dec("500"));
    assert_eq!(settled.income, dec("1000"));
    assert_eq!(settled.expenses, dec("300"));
    assert_eq!(settled.balance, dec("700"));
}

#[test]
fn by_category_groups_and_falls_back_to_uncategorized() {
    let mut ledger = Ledger::new();
    ledger
        .add_category("Food", CategoryAffinity::Expense, None)
        .unwrap();
    add(&mut ledger, Kind::Expense, "120", d(2025, 8, 1), Some("Food"));
    add(&mut ledger, Kind::Expense, "80", d(2025, 8, 2), Some("food"));
    add(&mut ledger, Kind::Expense, "50", d(2025, 8, 3), None);
    add(&mut ledger, Kind::Income, "999", d(2025, 8, 3), None);

    let out = budget::by_category(ledger.transactions(), Kind::Expense);
    assert_eq!(out.len(), 2);
    assert_eq!(out["Food"], dec("200"));
    assert_eq!(out[UNCATEGORIZED], dec("50"));
}

#[test]
fn daily_allowance_divides_balance_by_days_left() {
    let ledger = simple_ledger();
    let per_day = budget::daily_allowance(ledger.transactions(), d(2025, 8, 10), d(2025, 8, 20)).unwrap();
    assert_eq!(per_day, dec("50"));
}

#[test]
fn daily_allowance_rejects_today_or_past_payday() {
    let ledger = simple_ledger();
    for payday in [d(2025, 8, 10), d(2025, 8, 1)] {
        let err = budget::daily_allowance(ledger.transactions(), d(2025, 8, 10), payday).unwrap_err();
        assert_eq!(err, LedgerError::Validation("payday must be in the future".into()));
    }
}

#[test]
fn allowance_floor_avoids_zero_divisor() {
    assert_eq!(budget::days_remaining(d(2025, 8, 10), d(2025, 8, 10)), 1);
    assert_eq!(budget::days_remaining(d(2025, 8, 10), d(2025, 8, 1)), 1);
    assert_eq!(budget::allowance(dec("90"), 0), dec("90"));
    assert_eq!(budget::allowance(dec("90"), 3), dec("30"));
}

#[test]
fn period_windows() {
    let mut ledger = Ledger::new();
    add(&mut ledger, Kind::Expense, "1", d(2025, 8, 31), None);
    add(&mut ledger, Kind::Expense, "2", d(2025, 9, 1), None);
    add(&mut ledger, Kind::Expense, "3", d(2025, 9, 15), None);
    add(&mut ledger, Kind::Expense, "4", d(2025, 6, 14), None);
    add(&mut ledger, Kind::Expense, "5", d(2025, 6, 15), None);
    let today = d(2025, 9, 15);

    let amounts = |p: Period| -> Vec<Decimal> {
        let mut v: Vec<Decimal> = budget::period_filter(ledger.transactions(), p, today)
            .into_iter()
            .map(|t| t.amount)
            .collect();
        v.sort();
        v
    };
    assert_eq!(amounts(Period::All).len(), 5);
    assert_eq!(amounts(Period::CurrentMonth), vec![dec("2"), dec("3")]);
    assert_eq!(amounts(Period::LastMonth), vec![dec("1")]);
    assert_eq!(amounts(Period::LastNMonths(3)), vec![dec("1"), dec("2"), dec("3"), dec("5")]);
}

#[test]
fn last_month_wraps_year() {
    let t = |on| Transaction {
        occurs_on: on,
        ..simple_ledger().transactions()[0].clone()
    };
    let records = [t(d(2025, 12, 31)), t(d(2026, 1, 2))];
    let out = budget::period_filter(&records, Period::LastMonth, d(2026, 1, 20));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].occurs_on, d(2025, 12, 31));
}

#[test]
fn period_parses_from_text() {
    assert_eq!("all".parse::<Period>().unwrap(), Period::All);
    assert_eq!("current-month".parse::<Period>().unwrap(), Period::CurrentMonth);
    assert_eq!("last-month".parse::<Period>().unwrap(), Period::LastMonth);
    assert_eq!("last-6-months".parse::<Period>().unwrap(), Period::LastNMonths(6));
    assert!("fortnight".parse::<Period>().is_err());
}

#[test]
fn oversized_month_windows_are_rejected() {
    let at_cap = format!("last-{}-months", MAX_PERIOD_MONTHS);
    assert_eq!(at_cap.parse::<Period>().unwrap(), Period::LastNMonths(MAX_PERIOD_MONTHS));
    for text in ["last-1201-months", "last-2147483648-months", "last-4294967295-months"] {
        assert!(matches!(text.parse::<Period>(), Err(LedgerError::Validation(_))), "{}", text);
    }
}

#[test]
fn huge_month_window_covers_everything_up_to_today() {
    let ledger = simple_ledger();
    let today = d(2025, 8, 2);
    let out = budget::period_filter(ledger.transactions(), Period::LastNMonths(u32::MAX), today);
    assert_eq!(out.len(), 2);
    assert!(Period::LastNMonths(u32::MAX).contains(NaiveDate::MIN, today));
}

#[test]
fn overdue_means_open_and_past_due() {
    let mut ledger = Ledger::new();
    let bill = TransactionDraft::new("Power", Kind::Expense, dec("80"), d(2025, 8, 1)).due_on(d(2025, 8, 10));
    let paid = bill.clone().settled_on(d(2025, 8, 5));
    let later = TransactionDraft::new("Water", Kind::Expense, dec("20"), d(2025, 8, 1)).due_on(d(2025, 8, 30));
    ledger.add_transaction(bill, Recurrence::None).unwrap();
    ledger.add_transaction(paid, Recurrence::None).unwrap();
    ledger.add_transaction(later, Recurrence::None).unwrap();

    let late = budget::overdue(ledger.transactions(), d(2025, 8, 11));
    assert_eq!(late.len(), 1);
    assert_eq!(late[0].description, "Power");
    assert!(budget::overdue(ledger.transactions(), d(2025, 8, 10)).is_empty());
}

#[test]
fn monthly_cashflow_groups_by_month() {
    let mut ledger = simple_ledger();
    add(&mut ledger, Kind::Expense, "40", d(2025, 9, 3), None);
    let map = budget::monthly_cashflow(ledger.transactions());
    let aug = map[&YearMonth { year: 2025, month: 8 }];
    let sep = map[&YearMonth { year: 2025, month: 9 }];
    assert_eq!(aug.balance, dec("500"));
    assert_eq!(sep.expenses, dec("40"));
    assert_eq!(sep.balance, dec("-40"));
}
