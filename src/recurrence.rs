// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns a freshly submitted draft into the records it stands for.
//!
//! Installments replicate the full amount on every record; they are not a
//! division of the draft's amount. A fixed monthly draft yields a single
//! record which the ledger also keeps as the series template for rollover.
//!
//! Only the first record of a series can be settled at creation, and it keeps
//! the draft's `settled_on` day rather than its occurrence date.

use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Recurrence, Transaction, TransactionDraft};
use crate::utils::add_months;

pub fn expand(origin: &TransactionDraft, recurrence: Recurrence) -> LedgerResult<Vec<Transaction>> {
    origin.validate()?;
    recurrence.validate()?;

    let series_id = Uuid::new_v4();
    let total = recurrence.total();
    (1..=total)
        .map(|index| {
            let offset = month_offset(index)?;
            let settled_on = origin.settled_on.filter(|_| index == 1);
            Ok(Transaction {
                id: Uuid::new_v4(),
                series_id,
                description: origin.description.trim().to_string(),
                kind: origin.kind,
                amount: origin.amount,
                occurs_on: add_months(origin.occurs_on, offset)?,
                due_on: origin.due_on.map(|d| add_months(d, offset)).transpose()?,
                category: origin.category.clone(),
                recurrence,
                occurrence_index: index,
                settled: settled_on.is_some(),
                settled_on,
            })
        })
        .collect()
}

fn month_offset(index: u32) -> LedgerResult<i32> {
    i32::try_from(index - 1)
        .map_err(|_| LedgerError::Validation(format!("Occurrence {} is out of range", index)))
}
