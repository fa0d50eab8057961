// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Table catalogue shared by every storage backend.
//!
//! Table and column identifiers never come from request data: they are
//! the closed set declared here, and backends reject anything else before a
//! statement is built.

use super::{StorageError, StorageResult};

/// Relational tables backing the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Parties,
    Offices,
    Users,
    Candidates,
    Votes,
    Petitions,
}

impl Table {
    /// Every table, in dependency order (referenced tables first).
    pub const ALL: [Table; 6] = [
        Table::Users,
        Table::Parties,
        Table::Offices,
        Table::Candidates,
        Table::Votes,
        Table::Petitions,
    ];

    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::Parties => "parties",
            Table::Offices => "offices",
            Table::Users => "users",
            Table::Candidates => "candidates",
            Table::Votes => "votes",
            Table::Petitions => "petitions",
        }
    }

    /// Primary key column (auto-increment integer).
    pub fn id_column(self) -> &'static str {
        match self {
            Table::Parties => "party_id",
            Table::Offices => "office_id",
            Table::Users => "user_id",
            Table::Candidates => "candidate_id",
            Table::Votes => "vote_id",
            Table::Petitions => "petition_id",
        }
    }

    /// Non-key columns.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Parties => &[
                "name",
                "hq_address",
                "logo_url",
                "created_by",
                "registration_timestamp",
            ],
            Table::Offices => &["name", "office_type", "registration_timestamp"],
            Table::Users => &[
                "first_name",
                "last_name",
                "other_name",
                "email",
                "telephone",
                "passport_url",
                "password_hash",
                "is_admin",
                "registration_timestamp",
                "last_login_timestamp",
            ],
            Table::Candidates => &["office_id", "party_id", "user_id", "registration_timestamp"],
            Table::Votes => &[
                "office_id",
                "candidate_id",
                "party_id",
                "voter_id",
                "registration_timestamp",
            ],
            Table::Petitions => &[
                "office_id",
                "created_by",
                "cover_letter",
                "evidence",
                "registration_timestamp",
            ],
        }
    }

    /// Column sets whose combined value must be unique across rows.
    pub fn unique_keys(self) -> &'static [&'static [&'static str]] {
        match self {
            Table::Parties => &[&["name"], &["hq_address"], &["logo_url"]],
            Table::Offices => &[&["name"]],
            Table::Users => &[&["email"], &["telephone"], &["passport_url"]],
            Table::Candidates => &[&["user_id"]],
            Table::Votes => &[&["office_id", "voter_id"]],
            Table::Petitions => &[],
        }
    }

    /// Foreign keys: `(column, referenced table)`. The referenced column is
    /// always that table's primary key.
    pub fn references(self) -> &'static [(&'static str, Table)] {
        match self {
            Table::Parties => &[("created_by", Table::Users)],
            Table::Offices | Table::Users => &[],
            Table::Candidates => &[
                ("office_id", Table::Offices),
                ("party_id", Table::Parties),
                ("user_id", Table::Users),
            ],
            Table::Votes => &[
                ("office_id", Table::Offices),
                ("candidate_id", Table::Candidates),
                ("voter_id", Table::Users),
            ],
            Table::Petitions => &[("office_id", Table::Offices), ("created_by", Table::Users)],
        }
    }

    /// Validate that `column` belongs to this table (primary key included).
    pub fn check_column(self, column: &str) -> StorageResult<()> {
        if column == self.id_column() || self.columns().contains(&column) {
            Ok(())
        } else {
            Err(StorageError::UnknownColumn {
                table: self,
                column: column.to_string(),
            })
        }
    }

    /// Map a column name reported by the database back to its static name.
    pub fn static_column(self, column: &str) -> Option<&'static str> {
        if column == self.id_column() {
            return Some(self.id_column());
        }
        self.columns().iter().copied().find(|c| *c == column)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// SQLite DDL. Constraints mirror [`Table::unique_keys`] and
/// [`Table::references`].
pub const SQLITE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    other_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    telephone TEXT NOT NULL UNIQUE,
    passport_url TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0,
    registration_timestamp TEXT NOT NULL,
    last_login_timestamp TEXT
);
CREATE TABLE IF NOT EXISTS parties (
    party_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    hq_address TEXT NOT NULL UNIQUE,
    logo_url TEXT NOT NULL UNIQUE,
    created_by INTEGER NOT NULL REFERENCES users(user_id),
    registration_timestamp TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS offices (
    office_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    office_type TEXT NOT NULL
        CHECK (office_type IN ('Federal', 'Legislative', 'State', 'Local Government')),
    registration_timestamp TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS candidates (
    candidate_id INTEGER PRIMARY KEY AUTOINCREMENT,
    office_id INTEGER NOT NULL REFERENCES offices(office_id),
    party_id INTEGER NOT NULL REFERENCES parties(party_id),
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(user_id),
    registration_timestamp TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS votes (
    vote_id INTEGER PRIMARY KEY AUTOINCREMENT,
    office_id INTEGER NOT NULL REFERENCES offices(office_id),
    candidate_id INTEGER NOT NULL REFERENCES candidates(candidate_id),
    party_id INTEGER NOT NULL,
    voter_id INTEGER NOT NULL REFERENCES users(user_id),
    registration_timestamp TEXT NOT NULL,
    UNIQUE (office_id, voter_id)
);
CREATE TABLE IF NOT EXISTS petitions (
    petition_id INTEGER PRIMARY KEY AUTOINCREMENT,
    office_id INTEGER NOT NULL REFERENCES offices(office_id),
    created_by INTEGER NOT NULL REFERENCES users(user_id),
    cover_letter TEXT NOT NULL,
    evidence TEXT NOT NULL,
    registration_timestamp TEXT NOT NULL
);
";
