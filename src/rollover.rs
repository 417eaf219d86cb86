// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ledger::Ledger;
use crate::models::{Transaction, YearMonth};
use crate::utils::{add_months, on_day};

/// Materializes this month's occurrence of every fixed template that does not
/// have one yet. Only ever adds; a second call with the same inputs in the same
/// month returns nothing.
///
/// Templates whose first occurrence lies after `today`'s month are not
/// backfilled.
pub fn rollover(
    today: NaiveDate,
    templates: &[Transaction],
    existing: &[Transaction],
) -> Vec<Transaction> {
    let current = YearMonth::of(today);
    let mut created = Vec::new();
    for t in templates {
        let start = t.month();
        if start > current {
            continue;
        }
        let present = existing
            .iter()
            .chain(created.iter())
            .any(|r: &Transaction| r.series_id == t.series_id && current.contains(r.occurs_on));
        if present {
            continue;
        }
        let offset = start.months_until(current);
        let dates = on_day(current, t.occurs_on.day()).and_then(|occurs_on| {
            let due_on = t.due_on.map(|d| add_months(d, offset)).transpose()?;
            Ok((occurs_on, due_on))
        });
        let (occurs_on, due_on) = match dates {
            Ok(dates) => dates,
            Err(e) => {
                warn!(series = %t.series_id, error = %e, "skipping fixed template");
                continue;
            }
        };
        created.push(Transaction {
            id: Uuid::new_v4(),
            series_id: t.series_id,
            description: t.description.clone(),
            kind: t.kind,
            amount: t.amount,
            occurs_on,
            due_on,
            category: t.category.clone(),
            recurrence: t.recurrence,
            occurrence_index: 1,
            settled: false,
            settled_on: None,
        });
    }
    created
}

/// Whether the stored marker says this month has not been checked yet.
pub fn is_due(marker: Option<YearMonth>, today: NaiveDate) -> bool {
    marker != Some(YearMonth::of(today))
}

/// Marker-gated rollover over the ledger: runs only when the last check was in
/// a different month, appends what was materialized and moves the marker.
pub fn check(ledger: &mut Ledger, today: NaiveDate) -> Vec<Transaction> {
    if !is_due(ledger.last_rollover_check(), today) {
        debug!(month = %YearMonth::of(today), "rollover already checked this month");
        return Vec::new();
    }
    force(ledger, today)
}

/// Same as [`check`] without consulting the marker.
pub fn force(ledger: &mut Ledger, today: NaiveDate) -> Vec<Transaction> {
    let created = rollover(today, ledger.templates(), ledger.transactions());
    for r in &created {
        info!(series = %r.series_id, date = %r.occurs_on, "materialized fixed transaction");
    }
    ledger.append_materialized(created.clone());
    ledger.set_last_rollover_check(YearMonth::of(today));
    created
}
