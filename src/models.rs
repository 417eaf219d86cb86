// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// Largest magnitude accepted for a single amount (one trillion). Keeps every
/// sum the budget layer computes far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Upper bound on the number of installments in one series (fifty years).
pub const MAX_INSTALLMENTS: u32 = 600;

/// Rejects negative amounts and amounts above [`MAX_AMOUNT`].
pub fn check_amount(what: &str, amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "{} must not be negative, got {}",
            what, amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::Validation(format!(
            "{} must not exceed {}, got {}",
            what, MAX_AMOUNT, amount
        )));
    }
    Ok(())
}

/// Direction of a transaction. Amounts are always stored as magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    /// Sign applied to a magnitude when computing a balance.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Kind::Income => amount,
            Kind::Expense => -amount,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Income => write!(f, "income"),
            Kind::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(Kind::Income),
            "expense" | "out" => Ok(Kind::Expense),
            other => Err(LedgerError::Validation(format!(
                "Invalid kind '{}', expected income or expense",
                other
            ))),
        }
    }
}

/// How a transaction repeats. A single tagged value, so a record can never be
/// both an installment and a fixed monthly entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Recurrence {
    #[default]
    None,
    FixedMonthly,
    Installment { total: u32 },
}

impl Recurrence {
    /// Build a recurrence from the two independent user-facing switches.
    pub fn from_flags(installments: Option<u32>, fixed: bool) -> Result<Self, LedgerError> {
        match (installments, fixed) {
            (Some(_), true) => Err(LedgerError::Validation(
                "A transaction cannot be both fixed monthly and split into installments".into(),
            )),
            (Some(total), false) => {
                let r = Recurrence::Installment { total };
                r.validate()?;
                Ok(r)
            }
            (None, true) => Ok(Recurrence::FixedMonthly),
            (None, false) => Ok(Recurrence::None),
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Recurrence::Installment { total } = self {
            if !(2..=MAX_INSTALLMENTS).contains(total) {
                return Err(LedgerError::Validation(format!(
                    "Installment total must be between 2 and {}, got {}",
                    MAX_INSTALLMENTS, total
                )));
            }
        }
        Ok(())
    }

    /// Number of records in a series of this shape.
    pub fn total(&self) -> u32 {
        match self {
            Recurrence::Installment { total } => *total,
            _ => 1,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::None => write!(f, "-"),
            Recurrence::FixedMonthly => write!(f, "fixed"),
            Recurrence::Installment { total } => write!(f, "{}x", total),
        }
    }
}

/// User input for a new transaction, before ids and series are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub description: String,
    pub kind: Kind,
    pub amount: Decimal,
    pub occurs_on: NaiveDate,
    pub due_on: Option<NaiveDate>,
    pub category: Option<String>,
    /// Day the first record was paid or received, when it already was.
    pub settled_on: Option<NaiveDate>,
}

impl TransactionDraft {
    pub fn new(
        description: impl Into<String>,
        kind: Kind,
        amount: Decimal,
        occurs_on: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            kind,
            amount,
            occurs_on,
            due_on: None,
            category: None,
            settled_on: None,
        }
    }

    pub fn due_on(mut self, due: NaiveDate) -> Self {
        self.due_on = Some(due);
        self
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn settled_on(mut self, on: NaiveDate) -> Self {
        self.settled_on = Some(on);
        self
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::Validation("Description is required".into()));
        }
        check_amount("Amount", self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub series_id: Uuid,
    pub description: String,
    pub kind: Kind,
    pub amount: Decimal,
    pub occurs_on: NaiveDate,
    pub due_on: Option<NaiveDate>,
    pub category: Option<String>,
    pub recurrence: Recurrence,
    pub occurrence_index: u32,
    pub settled: bool,
    pub settled_on: Option<NaiveDate>,
}

impl Transaction {
    /// Amount with the sign implied by `kind`.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.occurs_on)
    }

    /// Unsettled with a due date strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.settled && self.due_on.is_some_and(|due| due < today)
    }

    /// Checks the invariants every stored record must satisfy.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.amount < Decimal::ZERO || self.amount > MAX_AMOUNT {
            return Err(format!("transaction {} has amount out of range", self.id));
        }
        self.recurrence
            .validate()
            .map_err(|e| format!("transaction {}: {}", self.id, e))?;
        let total = self.recurrence.total();
        if self.occurrence_index < 1 || self.occurrence_index > total {
            return Err(format!(
                "transaction {} has occurrence {} outside 1..={}",
                self.id, self.occurrence_index, total
            ));
        }
        if self.settled_on.is_some() && !self.settled {
            return Err(format!("transaction {} has settled_on but is open", self.id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryAffinity {
    Income,
    Expense,
    #[default]
    Both,
}

impl CategoryAffinity {
    pub fn accepts(self, kind: Kind) -> bool {
        match self {
            CategoryAffinity::Both => true,
            CategoryAffinity::Income => kind == Kind::Income,
            CategoryAffinity::Expense => kind == Kind::Expense,
        }
    }
}

impl FromStr for CategoryAffinity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryAffinity::Income),
            "expense" => Ok(CategoryAffinity::Expense),
            "both" => Ok(CategoryAffinity::Both),
            other => Err(LedgerError::Validation(format!(
                "Invalid category kind '{}', expected income, expense or both",
                other
            ))),
        }
    }
}

impl fmt::Display for CategoryAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CategoryAffinity::Income => "income",
            CategoryAffinity::Expense => "expense",
            CategoryAffinity::Both => "both",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub kind: CategoryAffinity,
    pub color: Option<String>, // display hint only
}

impl Category {
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub description: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: NaiveDate,
}

impl Goal {
    /// `current / target`, clamped to [0, 1].
    pub fn progress(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ONE;
        }
        (self.current_amount / self.target_amount).clamp(Decimal::ZERO, Decimal::ONE)
    }
}

/// A calendar month. Ordering is numeric on (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }

    /// Months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(&self, other: YearMonth) -> i32 {
        (other.year - self.year) * 12 + other.month as i32 - self.month as i32
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
