// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Uniqueness and existence checks against storage.
//!
//! One implementation, three distinct questions:
//!
//! - [`Oracle::ensure_unique`] - duplicate prevention before a write
//! - [`Oracle::ensure_reference`] - a row named in a payload must exist
//! - [`Oracle::ensure_in_range`] - a row named in the URL must exist
//!
//! Checks run in the order given and the first failure wins. Storage errors
//! are passed through untouched; they are fatal for the request.

use serde_json::Value;

use super::{Record, Storage, StorageError, Table};

/// A single duplicate-prevention check.
#[derive(Debug, Clone)]
pub struct UniqueCheck {
    pub column: &'static str,
    pub value: Value,
    /// Conflict message returned when the value is taken.
    pub message: &'static str,
}

impl UniqueCheck {
    pub fn new(column: &'static str, value: impl Into<Value>, message: &'static str) -> Self {
        Self {
            column,
            value: value.into(),
            message,
        }
    }
}

/// Outcome of a failed Oracle check.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Value already registered (409).
    #[error("{0}")]
    Conflict(String),

    /// Row referenced by the payload does not exist (404).
    #[error("{resource} {id} does not exist")]
    MissingReference { resource: &'static str, id: i64 },

    /// Row addressed by the URL does not exist (404).
    #[error("{resource} {id} not in server. ID out of range.")]
    OutOfRange { resource: &'static str, id: i64 },

    /// Fatal storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Human label for a table, used in messages.
pub fn resource_label(table: Table) -> &'static str {
    match table {
        Table::Parties => "Party",
        Table::Offices => "Office",
        Table::Users => "User",
        Table::Candidates => "Candidate",
        Table::Votes => "Vote",
        Table::Petitions => "Petition",
    }
}

/// Existence/uniqueness oracle over a [`Storage`] backend.
pub struct Oracle<'a> {
    storage: &'a dyn Storage,
}

impl<'a> Oracle<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Raw existence query.
    pub fn exists(&self, table: Table, column: &'static str, value: &Value) -> Result<bool, OracleError> {
        Ok(self.storage.exists(table, column, value)?)
    }

    /// Run duplicate checks in order; the first taken value wins.
    ///
    /// `except_id` lets an update keep its own current value.
    pub fn ensure_unique(
        &self,
        table: Table,
        checks: &[UniqueCheck],
        except_id: Option<i64>,
    ) -> Result<(), OracleError> {
        for check in checks {
            let taken = match except_id {
                None => self.storage.exists(table, check.column, &check.value)?,
                Some(id) => self
                    .storage
                    .find_one(table, check.column, &check.value)?
                    .is_some_and(|row| row.id != id),
            };
            if taken {
                tracing::debug!(table = %table, column = check.column, "duplicate value rejected");
                return Err(OracleError::Conflict(check.message.to_string()));
            }
        }
        Ok(())
    }

    /// A row referenced from a payload must exist.
    pub fn ensure_reference(&self, table: Table, id: i64) -> Result<Record, OracleError> {
        self.storage
            .fetch_by_id(table, id)?
            .ok_or(OracleError::MissingReference {
                resource: resource_label(table),
                id,
            })
    }

    /// A row addressed by the request path must exist.
    pub fn ensure_in_range(&self, table: Table, id: i64) -> Result<Record, OracleError> {
        self.storage
            .fetch_by_id(table, id)?
            .ok_or(OracleError::OutOfRange {
                resource: resource_label(table),
                id,
            })
    }
}

/// Map a failed write back onto the pre-check vocabulary.
///
/// Two requests can both pass [`Oracle::ensure_unique`] and race to the
/// insert; the loser's unique-constraint error is reported with the same
/// message its pre-check would have produced.
pub fn classify_write_error(err: StorageError, checks: &[UniqueCheck]) -> OracleError {
    match err {
        StorageError::UniqueViolation { table, columns } => {
            let message = checks
                .iter()
                .find(|check| columns.iter().any(|c| c == check.column))
                .map(|check| check.message.to_string())
                .unwrap_or_else(|| {
                    format!("Conflict - {} already registered", resource_label(table))
                });
            OracleError::Conflict(message)
        }
        StorageError::ReferenceViolation { table } => OracleError::Conflict(format!(
            "Conflict - operation blocked by related {} records",
            resource_label(table).to_lowercase()
        )),
        other => OracleError::Storage(other),
    }
}
