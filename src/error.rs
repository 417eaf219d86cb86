// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed user input. Nothing has been applied.
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Persisted JSON that failed to parse or failed shape checks.
    #[error("corrupt persisted state under '{key}': {reason}")]
    CorruptState { key: String, reason: String },
}

pub type LedgerResult<T> = Result<T, LedgerError>;
