// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use uuid::Uuid;

pub mod categories;
pub mod goals;
pub mod payday;
pub mod reminders;
pub mod reports;
pub mod rollover;
pub mod transactions;

/// Finds the single id starting with `needle` (case-insensitive, dashes
/// optional). `None` when nothing matches; an error when several do.
pub fn resolve_id(ids: impl IntoIterator<Item = Uuid>, needle: &str) -> Result<Option<Uuid>> {
    let needle = needle.trim().replace('-', "").to_lowercase();
    if needle.is_empty() {
        bail!("Id must not be empty");
    }
    let mut found = None;
    for id in ids {
        if id.simple().to_string().starts_with(&needle) {
            if found.is_some_and(|f| f != id) {
                bail!("Id prefix '{}' is ambiguous", needle);
            }
            found = Some(id);
        }
    }
    Ok(found)
}

pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
