// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Relational persistence behind a single [`Storage`] trait.
//!
//! ## Backends
//!
//! - [`SqliteStorage`] - production backend (rusqlite, one file per deployment)
//! - [`InMemoryStorage`] - test double with identical constraint behaviour
//!
//! ## Layers
//!
//! ```text
//! api handlers
//!   -> Oracle            (duplicate / reference / ID-range checks)
//!   -> repositories      (typed rows: StoredParty, StoredUser, ...)
//!   -> dyn Storage       (untyped Records keyed by Table)
//! ```
//!
//! Every call re-queries the backend. There is no cache, so checks always
//! observe the current state; concurrent writers that slip past a check are
//! caught by the backend's own unique constraints.

pub mod error;
pub mod memory;
pub mod oracle;
pub mod ownership;
pub mod record;
pub mod repository;
pub mod schema;
pub mod sqlite;

use serde_json::Value;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStorage;
pub use oracle::{Oracle, OracleError, UniqueCheck};
pub use ownership::OwnedResource;
pub use record::{Fields, Record};
pub use repository::{
    CandidateRepository, OfficeRepository, PartyRepository, PetitionRepository, UserRepository,
    VoteRepository,
};
pub use schema::Table;
pub use sqlite::SqliteStorage;

/// Storage collaborator consumed by the Oracle and the repositories.
///
/// Calls block the current thread for the duration of the query.
pub trait Storage: Send + Sync {
    /// Whether any row in `table` matches all `(column, value)` pairs.
    fn exists_where(&self, table: Table, criteria: &[(&'static str, Value)])
        -> StorageResult<bool>;

    /// Whether any row in `table` has `column == value`.
    fn exists(&self, table: Table, column: &'static str, value: &Value) -> StorageResult<bool> {
        self.exists_where(table, &[(column, value.clone())])
    }

    /// Fetch one row by primary key.
    fn fetch_by_id(&self, table: Table, id: i64) -> StorageResult<Option<Record>>;

    /// Fetch the first row (lowest id) with `column == value`.
    fn find_one(
        &self,
        table: Table,
        column: &'static str,
        value: &Value,
    ) -> StorageResult<Option<Record>>;

    /// Fetch every row in `table`, ordered by primary key.
    ///
    /// Each call re-executes the query.
    fn fetch_all(&self, table: Table) -> StorageResult<Vec<Record>>;

    /// Insert a row and return it with its assigned primary key.
    fn insert(&self, table: Table, fields: Fields) -> StorageResult<Record>;

    /// Overwrite the given columns of an existing row.
    fn update(&self, table: Table, id: i64, fields: Fields) -> StorageResult<Record>;

    /// Delete a row by primary key.
    fn delete(&self, table: Table, id: i64) -> StorageResult<()>;

    /// Cheap liveness probe used by the health endpoint.
    fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}
