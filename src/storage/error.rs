// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage errors.

use super::schema::Table;

/// Error type for storage operations.
///
/// Everything except the constraint variants is fatal for the current
/// request: the caller aborts, any open transaction is rolled back, and the
/// operation is not retried.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying database failure (connectivity, malformed query, I/O).
    #[error("database error: {0}")]
    Database(String),

    /// A unique key on `table` already holds the written value.
    #[error("unique constraint violated on {table}({})", .columns.join(", "))]
    UniqueViolation { table: Table, columns: Vec<String> },

    /// A referenced row is missing, or a deleted row is still referenced.
    #[error("reference constraint violated on {table}")]
    ReferenceViolation { table: Table },

    /// Row with the given primary key does not exist.
    #[error("{table} row {id} not found")]
    NotFound { table: Table, id: i64 },

    /// Column name is not part of the table's schema.
    #[error("unknown column {column} on {table}")]
    UnknownColumn { table: Table, column: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
