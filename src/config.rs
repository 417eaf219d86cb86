// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::db;
use crate::utils::parse_date;

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
    /// Overrides the system clock when set.
    pub today: Option<NaiveDate>,
}

impl Config {
    /// Flags win over environment (both handled by clap), then platform defaults.
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db_path = match m.get_one::<String>("db") {
            Some(p) => PathBuf::from(p),
            None => db::db_path()?,
        };
        let log_filter = m
            .get_one::<String>("log")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let today = m.get_one::<String>("today").map(|s| parse_date(s)).transpose()?;
        Ok(Self {
            db_path,
            log_filter,
            today,
        })
    }
}
