// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerlite::cli;
use ledgerlite::commands::{self, reports, transactions};
use ledgerlite::ledger::Ledger;
use ledgerlite::models::{Kind, Recurrence, YearMonth, MAX_INSTALLMENTS};
use ledgerlite::rollover;
use serde_json::json;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn run(ledger: &mut Ledger, today: NaiveDate, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().try_get_matches_from(args)?;
    match matches.subcommand() {
        Some(("tx", sub)) => transactions::handle(ledger, today, sub),
        Some(("category", sub)) => commands::categories::handle(ledger, sub),
        Some(("payday", sub)) => commands::payday::handle(ledger, today, sub),
        Some(("goal", sub)) => commands::goals::handle(ledger, sub),
        Some(("rollover", sub)) => commands::rollover::handle(ledger, today, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|s| s.0)),
    }
}

fn sub_matches(args: &[&str], outer: &str, inner: &str) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    let (name, outer_m) = matches.subcommand().unwrap();
    assert_eq!(name, outer);
    let (name, inner_m) = outer_m.subcommand().unwrap();
    assert_eq!(name, inner);
    inner_m.clone()
}

#[test]
fn tx_add_accepts_decimal_comma_and_installments() {
    let m = sub_matches(
        &[
            "ledgerlite", "tx", "add", "--desc", "Sofa", "--amount", "249,90",
            "--installments", "3", "--date", "2025-01-31",
        ],
        "tx",
        "add",
    );
    let (draft, recurrence) = transactions::draft_from_args(&m, d(2025, 2, 1)).unwrap();
    assert_eq!(draft.amount, "249.90".parse::<Decimal>().unwrap());
    assert_eq!(draft.kind, Kind::Expense);
    assert_eq!(recurrence, Recurrence::Installment { total: 3 });
}

#[test]
fn tx_add_caps_installments() {
    let mut ledger = Ledger::new();
    let too_many = (MAX_INSTALLMENTS + 1).to_string();
    for n in ["1", too_many.as_str(), "4294967295"] {
        let res = run(
            &mut ledger,
            d(2025, 2, 1),
            &["ledgerlite", "tx", "add", "--desc", "TV", "--amount", "10", "--installments", n],
        );
        assert!(res.is_err(), "{} installments accepted", n);
    }
    assert!(ledger.transactions().is_empty());
}

#[test]
fn tx_add_settled_records_the_day_of_entry() {
    let mut ledger = Ledger::new();
    let today = d(2025, 2, 1);
    run(
        &mut ledger,
        today,
        &["ledgerlite", "tx", "add", "--desc", "Deposit", "--amount", "50", "--date", "2025-04-10", "--settled"],
    )
    .unwrap();
    let t = &ledger.transactions()[0];
    assert_eq!(t.occurs_on, d(2025, 4, 10));
    assert!(t.settled);
    assert_eq!(t.settled_on, Some(today));
}

#[test]
fn tx_add_rejects_fixed_with_installments() {
    let mut ledger = Ledger::new();
    let res = run(
        &mut ledger,
        d(2025, 2, 1),
        &["ledgerlite", "tx", "add", "--desc", "Gym", "--amount", "40", "--fixed", "--installments", "2"],
    );
    assert!(res.is_err());
    assert!(ledger.transactions().is_empty());
}

#[test]
fn tx_add_rejects_bad_amounts() {
    let mut ledger = Ledger::new();
    for amount in ["abc", "-5", "79228162514264337593543950335"] {
        let res = run(
            &mut ledger,
            d(2025, 2, 1),
            &["ledgerlite", "tx", "add", "--desc", "Lunch", "--amount", amount],
        );
        assert!(res.is_err(), "{} accepted", amount);
    }
    assert!(ledger.transactions().is_empty());
}

#[test]
fn tx_list_respects_limit_and_period() {
    let mut ledger = Ledger::new();
    let today = d(2025, 3, 20);
    for date in ["2025-01-10", "2025-03-01", "2025-03-05", "2025-03-09"] {
        run(
            &mut ledger,
            today,
            &["ledgerlite", "tx", "add", "--desc", "Coffee", "--amount", "3.5", "--date", date],
        )
        .unwrap();
    }
    let m = sub_matches(
        &["ledgerlite", "tx", "list", "--period", "current-month", "--limit", "2"],
        "tx",
        "list",
    );
    let rows = transactions::query_rows(&ledger, today, &m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-03-09");
    assert_eq!(rows[0].amount, "3.50");
    assert_eq!(rows[0].status, "open");
}

#[test]
fn tx_rm_series_by_id_prefix() {
    let mut ledger = Ledger::new();
    let today = d(2025, 3, 20);
    run(
        &mut ledger,
        today,
        &["ledgerlite", "tx", "add", "--desc", "Fridge", "--amount", "100", "--installments", "4"],
    )
    .unwrap();
    let prefix = ledger.transactions()[2].id.simple().to_string()[..10].to_string();
    run(&mut ledger, today, &["ledgerlite", "tx", "rm", "--id", &prefix, "--series"]).unwrap();
    assert!(ledger.transactions().is_empty());
    // unknown id is a no-op, not an error
    run(&mut ledger, today, &["ledgerlite", "tx", "rm", "--id", "ffffffff"]).unwrap();
}

#[test]
fn report_totals_and_allowance() {
    let mut ledger = Ledger::new();
    let today = d(2025, 3, 20);
    run(&mut ledger, today, &["ledgerlite", "category", "add", "--name", "Food", "--kind", "expense"]).unwrap();
    run(&mut ledger, today, &["ledgerlite", "tx", "add", "--desc", "Pay", "--kind", "income", "--amount", "1000", "--settled"]).unwrap();
    run(&mut ledger, today, &["ledgerlite", "tx", "add", "--desc", "Market", "--amount", "300", "--category", "food"]).unwrap();
    run(&mut ledger, today, &["ledgerlite", "payday", "set", "--date", "2025-03-30"]).unwrap();

    let m = sub_matches(&["ledgerlite", "report", "totals", "--settled-only"], "report", "totals");
    let t = reports::compute_totals(&ledger, today, &m).unwrap();
    assert_eq!(t.balance, Decimal::from(1000));

    let m = sub_matches(&["ledgerlite", "report", "by-category"], "report", "by-category");
    let rows = reports::category_rows(&ledger, today, &m).unwrap();
    assert_eq!(rows, vec![("Food".to_string(), Decimal::from(300))]);

    let m = sub_matches(&["ledgerlite", "report", "allowance"], "report", "allowance");
    let a = reports::compute_allowance(&ledger, today, &m).unwrap();
    assert_eq!(a.days_remaining, 10);
    assert_eq!(a.per_day, Decimal::from(70));

    let m = sub_matches(
        &["ledgerlite", "report", "allowance", "--payday", "2025-03-20"],
        "report",
        "allowance",
    );
    assert!(reports::compute_allowance(&ledger, today, &m).is_err());
}

#[test]
fn report_cashflow_rows_are_named() {
    let mut ledger = Ledger::new();
    let today = d(2025, 3, 20);
    run(&mut ledger, today, &["ledgerlite", "tx", "add", "--desc", "Pay", "--kind", "income", "--amount", "1000", "--date", "2025-02-01"]).unwrap();
    run(&mut ledger, today, &["ledgerlite", "tx", "add", "--desc", "Rent", "--amount", "400", "--date", "2025-03-02"]).unwrap();

    let m = sub_matches(&["ledgerlite", "report", "cashflow", "--months", "1"], "report", "cashflow");
    let rows = reports::cashflow_rows(&ledger, &m);
    assert_eq!(
        serde_json::to_value(&rows).unwrap(),
        json!([{ "month": "2025-03", "income": "0", "expenses": "400", "net": "-400" }])
    );
}

#[test]
fn rollover_run_materializes_after_the_startup_check() {
    let mut ledger = Ledger::new();
    let today = d(2025, 3, 20);
    assert!(rollover::check(&mut ledger, today).is_empty());
    assert_eq!(ledger.last_rollover_check(), Some(YearMonth { year: 2025, month: 3 }));

    run(&mut ledger, today, &["ledgerlite", "tx", "add", "--desc", "Rent", "--amount", "900", "--date", "2025-02-05", "--fixed"]).unwrap();
    assert_eq!(ledger.transactions().len(), 1);

    run(&mut ledger, today, &["ledgerlite", "rollover", "run"]).unwrap();
    assert_eq!(ledger.transactions().len(), 2);
    assert!(ledger.transactions().iter().any(|t| t.occurs_on == d(2025, 3, 5)));

    run(&mut ledger, today, &["ledgerlite", "rollover", "run"]).unwrap();
    assert_eq!(ledger.transactions().len(), 2);
}

#[test]
fn payday_set_rejects_past_dates() {
    let mut ledger = Ledger::new();
    let res = run(&mut ledger, d(2025, 3, 20), &["ledgerlite", "payday", "set", "--date", "2025-03-01"]);
    assert!(res.is_err());
    assert_eq!(ledger.next_payday(), None);
}

#[test]
fn goal_contribute_unknown_id_fails() {
    let mut ledger = Ledger::new();
    let res = run(
        &mut ledger,
        d(2025, 3, 20),
        &["ledgerlite", "goal", "contribute", "--id", "abc", "--amount", "10"],
    );
    assert!(res.is_err());
}

#[test]
fn resolve_id_detects_ambiguity() {
    let a = uuid::Uuid::parse_str("aaaa0000-0000-0000-0000-000000000001").unwrap();
    let b = uuid::Uuid::parse_str("aaaa0000-0000-0000-0000-000000000002").unwrap();
    assert!(commands::resolve_id([a, b], "aaaa").is_err());
    assert_eq!(commands::resolve_id([a, b], "AAAA0000-0000-0000-0000-000000000002").unwrap(), Some(b));
    assert_eq!(commands::resolve_id([a, b], "bbbb").unwrap(), None);
}
