// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The authoritative in-memory snapshot of every collection, and its
//! load/save boundary with a [`KeyValueStore`].

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::budget::Period;
use crate::db::KeyValueStore;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    check_amount, Category, CategoryAffinity, Goal, Kind, Recurrence, Reminder, Transaction,
    TransactionDraft, YearMonth, MAX_AMOUNT,
};
use crate::recurrence;

pub mod keys {
    pub const TRANSACTIONS: &str = "transactions";
    pub const TEMPLATES: &str = "templates";
    pub const CATEGORIES: &str = "categories";
    pub const REMINDERS: &str = "reminders";
    pub const GOALS: &str = "goals";
    pub const LAST_ROLLOVER_CHECK: &str = "last_rollover_check";
    pub const NEXT_PAYDAY: &str = "next_payday";
}

/// Filter for [`Ledger::query`]. Every unset field matches everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub period: Period,
    pub kind: Option<Kind>,
    pub category: Option<String>,
    pub settled: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    templates: Vec<Transaction>,
    categories: Vec<Category>,
    reminders: Vec<Reminder>,
    goals: Vec<Goal>,
    last_rollover_check: Option<YearMonth>,
    next_payday: Option<NaiveDate>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every collection. A key that is missing, unparsable or fails its
    /// shape check comes back as its default; only store I/O errors propagate.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        Ok(Self {
            transactions: load_key(store, keys::TRANSACTIONS, check_records)?,
            templates: load_key(store, keys::TEMPLATES, check_templates)?,
            categories: load_key(store, keys::CATEGORIES, check_categories)?,
            reminders: load_key(store, keys::REMINDERS, |_: &Vec<Reminder>| Ok(()))?,
            goals: load_key(store, keys::GOALS, check_goals)?,
            last_rollover_check: load_key(store, keys::LAST_ROLLOVER_CHECK, check_marker)?,
            next_payday: load_key(store, keys::NEXT_PAYDAY, |_: &Option<NaiveDate>| Ok(()))?,
        })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_key(store, keys::TRANSACTIONS, &self.transactions)?;
        save_key(store, keys::TEMPLATES, &self.templates)?;
        save_key(store, keys::CATEGORIES, &self.categories)?;
        save_key(store, keys::REMINDERS, &self.reminders)?;
        save_key(store, keys::GOALS, &self.goals)?;
        match self.last_rollover_check {
            Some(m) => save_key(store, keys::LAST_ROLLOVER_CHECK, &m)?,
            None => store.remove(keys::LAST_ROLLOVER_CHECK)?,
        }
        match self.next_payday {
            Some(d) => save_key(store, keys::NEXT_PAYDAY, &d)?,
            None => store.remove(keys::NEXT_PAYDAY)?,
        }
        Ok(())
    }

    // --- transactions ---

    /// Validates the draft, expands it into its series and stores every
    /// record. Fixed monthly drafts also register the series template.
    /// Returns the inserted records; on error nothing is applied.
    pub fn add_transaction(
        &mut self,
        mut draft: TransactionDraft,
        recurrence: Recurrence,
    ) -> LedgerResult<Vec<Transaction>> {
        draft.category = match draft.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(self.resolve_category(name, draft.kind)?),
        };
        let records = recurrence::expand(&draft, recurrence)?;
        if recurrence == Recurrence::FixedMonthly {
            self.templates.extend(records.iter().cloned());
        }
        info!(
            series = %records[0].series_id,
            count = records.len(),
            kind = %draft.kind,
            amount = %draft.amount,
            "added transaction"
        );
        self.transactions.extend(records.iter().cloned());
        Ok(records)
    }

    fn resolve_category(&self, name: &str, kind: Kind) -> LedgerResult<String> {
        let cat = self
            .category(name)
            .ok_or_else(|| LedgerError::Validation(format!("Unknown category '{}'", name)))?;
        if !cat.kind.accepts(kind) {
            return Err(LedgerError::Validation(format!(
                "Category '{}' is for {} only",
                cat.name, cat.kind
            )));
        }
        Ok(cat.name.clone())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn templates(&self) -> &[Transaction] {
        &self.templates
    }

    pub fn transaction(&self, id: Uuid) -> LedgerResult<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {}", id)))
    }

    /// Newest first, matching `q`.
    pub fn query(&self, q: &TransactionQuery, today: NaiveDate) -> Vec<&Transaction> {
        let mut out: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| q.period.contains(t.occurs_on, today))
            .filter(|t| q.kind.is_none_or(|k| t.kind == k))
            .filter(|t| q.settled.is_none_or(|s| t.settled == s))
            .filter(|t| match &q.category {
                None => true,
                Some(c) => t
                    .category
                    .as_deref()
                    .is_some_and(|tc| tc.to_lowercase() == c.trim().to_lowercase()),
            })
            .collect();
        out.sort_by(|a, b| {
            b.occurs_on
                .cmp(&a.occurs_on)
                .then(a.occurrence_index.cmp(&b.occurrence_index))
        });
        if let Some(limit) = q.limit {
            out.truncate(limit);
        }
        out
    }

    /// Removes one record. Missing ids are a no-op and return `false`.
    pub fn remove_transaction(&mut self, id: Uuid) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        let removed = self.transactions.len() != before;
        if removed {
            info!(%id, "removed transaction");
        } else {
            debug!(%id, "remove: no such transaction");
        }
        removed
    }

    /// Removes every record of a series along with its fixed template.
    /// Returns how many records were dropped.
    pub fn remove_series(&mut self, series_id: Uuid) -> usize {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.series_id != series_id);
        self.templates.retain(|t| t.series_id != series_id);
        let removed = before - self.transactions.len();
        if removed > 0 {
            info!(series = %series_id, removed, "removed series");
        } else {
            debug!(series = %series_id, "remove: no such series");
        }
        removed
    }

    pub fn settle(&mut self, id: Uuid, on: NaiveDate) -> bool {
        match self.transactions.iter_mut().find(|t| t.id == id) {
            Some(t) if !t.settled => {
                t.settled = true;
                t.settled_on = Some(on);
                info!(%id, %on, "settled transaction");
                true
            }
            Some(_) => false,
            None => {
                debug!(%id, "settle: no such transaction");
                false
            }
        }
    }

    pub fn unsettle(&mut self, id: Uuid) -> bool {
        match self.transactions.iter_mut().find(|t| t.id == id) {
            Some(t) if t.settled => {
                t.settled = false;
                t.settled_on = None;
                info!(%id, "reopened transaction");
                true
            }
            _ => false,
        }
    }

    // --- rollover bookkeeping ---

    pub fn append_materialized(&mut self, records: Vec<Transaction>) {
        self.transactions.extend(records);
    }

    pub fn last_rollover_check(&self) -> Option<YearMonth> {
        self.last_rollover_check
    }

    pub fn set_last_rollover_check(&mut self, month: YearMonth) {
        self.last_rollover_check = Some(month);
    }

    // --- categories ---

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Case-insensitive lookup.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(name))
    }

    pub fn add_category(
        &mut self,
        name: &str,
        kind: CategoryAffinity,
        color: Option<String>,
    ) -> LedgerResult<&Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Category name is required".into()));
        }
        if let Some(existing) = self.category(name) {
            return Err(LedgerError::Validation(format!(
                "Category '{}' already exists",
                existing.name
            )));
        }
        self.categories.push(Category {
            name: name.to_string(),
            kind,
            color,
        });
        info!(name, "added category");
        Ok(&self.categories[self.categories.len() - 1])
    }

    /// Drops the category and clears it from every record and template.
    pub fn remove_category(&mut self, name: &str) -> bool {
        let Some(pos) = self.categories.iter().position(|c| c.matches(name)) else {
            debug!(name, "remove: no such category");
            return false;
        };
        let removed = self.categories.remove(pos);
        for t in self.transactions.iter_mut().chain(self.templates.iter_mut()) {
            if t.category.as_deref() == Some(removed.name.as_str()) {
                t.category = None;
            }
        }
        info!(name = %removed.name, "removed category");
        true
    }

    // --- reminders ---

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn add_reminder(&mut self, text: &str, today: NaiveDate) -> LedgerResult<&Reminder> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LedgerError::Validation("Reminder text is required".into()));
        }
        self.reminders.push(Reminder {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            created_on: today,
        });
        Ok(&self.reminders[self.reminders.len() - 1])
    }

    pub fn set_reminder_completed(&mut self, id: Uuid, completed: bool) -> bool {
        match self.reminders.iter_mut().find(|r| r.id == id) {
            Some(r) if r.completed != completed => {
                r.completed = completed;
                true
            }
            _ => false,
        }
    }

    pub fn remove_reminder(&mut self, id: Uuid) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        before != self.reminders.len()
    }

    // --- goals ---

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn add_goal(
        &mut self,
        description: &str,
        target_amount: Decimal,
        current_amount: Decimal,
        target_date: NaiveDate,
    ) -> LedgerResult<&Goal> {
        let description = description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation("Goal description is required".into()));
        }
        if target_amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "Goal target must be positive, got {}",
                target_amount
            )));
        }
        check_amount("Goal target", target_amount)?;
        check_amount("Goal progress", current_amount)?;
        self.goals.push(Goal {
            id: Uuid::new_v4(),
            description: description.to_string(),
            target_amount,
            current_amount,
            target_date,
        });
        Ok(&self.goals[self.goals.len() - 1])
    }

    pub fn contribute_to_goal(&mut self, id: Uuid, amount: Decimal) -> LedgerResult<&Goal> {
        check_amount("Contribution", amount)?;
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("goal {}", id)))?;
        let total = goal
            .current_amount
            .checked_add(amount)
            .filter(|t| *t <= MAX_AMOUNT)
            .ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Contribution would take goal '{}' past {}",
                    goal.description, MAX_AMOUNT
                ))
            })?;
        goal.current_amount = total;
        Ok(goal)
    }

    pub fn remove_goal(&mut self, id: Uuid) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        before != self.goals.len()
    }

    // --- payday ---

    pub fn next_payday(&self) -> Option<NaiveDate> {
        self.next_payday
    }

    pub fn set_payday(&mut self, date: NaiveDate) {
        self.next_payday = Some(date);
    }

    pub fn clear_payday(&mut self) -> bool {
        self.next_payday.take().is_some()
    }
}

fn load_key<T, F>(store: &dyn KeyValueStore, key: &str, check: F) -> Result<T>
where
    T: DeserializeOwned + Default,
    F: Fn(&T) -> Result<(), String>,
{
    let Some(raw) = store.load(key)? else {
        return Ok(T::default());
    };
    let parsed = serde_json::from_str::<T>(&raw)
        .map_err(|e| e.to_string())
        .and_then(|v| check(&v).map(|_| v));
    match parsed {
        Ok(v) => Ok(v),
        Err(reason) => {
            let err = LedgerError::CorruptState {
                key: key.to_string(),
                reason,
            };
            warn!(key, error = %err, "discarding persisted state");
            Ok(T::default())
        }
    }
}

fn save_key<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, v: &T) -> Result<()> {
    let json = serde_json::to_string(v).with_context(|| format!("Serialize '{}'", key))?;
    store.save(key, &json)
}

fn check_records(records: &Vec<Transaction>) -> Result<(), String> {
    records.iter().try_for_each(Transaction::check_shape)
}

fn check_templates(records: &Vec<Transaction>) -> Result<(), String> {
    check_records(records)?;
    match records
        .iter()
        .find(|t| t.recurrence != Recurrence::FixedMonthly)
    {
        Some(t) => Err(format!("template {} is not fixed monthly", t.id)),
        None => Ok(()),
    }
}

fn check_categories(categories: &Vec<Category>) -> Result<(), String> {
    for (i, c) in categories.iter().enumerate() {
        if categories[..i].iter().any(|p| p.matches(&c.name)) {
            return Err(format!("duplicate category '{}'", c.name));
        }
    }
    Ok(())
}

fn check_goals(goals: &Vec<Goal>) -> Result<(), String> {
    for g in goals {
        check_amount("target", g.target_amount)
            .and_then(|_| check_amount("progress", g.current_amount))
            .map_err(|e| format!("goal {}: {}", g.id, e))?;
    }
    Ok(())
}

fn check_marker(marker: &Option<YearMonth>) -> Result<(), String> {
    match marker {
        Some(m) if !(1..=12).contains(&m.month) => Err(format!("month {} out of range", m.month)),
        _ => Ok(()),
    }
}
