// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Candidate repository. A user may stand for at most one office.

use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::super::{Record, Storage, StorageResult, Table};
use super::timestamp;

/// Candidate row.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct StoredCandidate {
    pub id: i64,
    pub office_id: i64,
    pub party_id: i64,
    pub user_id: i64,
    pub registration_timestamp: String,
}

impl From<Record> for StoredCandidate {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            office_id: record.integer("office_id").unwrap_or_default(),
            party_id: record.integer("party_id").unwrap_or_default(),
            user_id: record.integer("user_id").unwrap_or_default(),
            registration_timestamp: record.text_or_default("registration_timestamp"),
        }
    }
}

pub struct CandidateRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> CandidateRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self, candidate_id: i64) -> StorageResult<Option<StoredCandidate>> {
        Ok(self
            .storage
            .fetch_by_id(Table::Candidates, candidate_id)?
            .map(StoredCandidate::from))
    }

    pub fn list(&self) -> StorageResult<Vec<StoredCandidate>> {
        Ok(self
            .storage
            .fetch_all(Table::Candidates)?
            .into_iter()
            .map(StoredCandidate::from)
            .collect())
    }

    pub fn create(
        &self,
        office_id: i64,
        party_id: i64,
        user_id: i64,
    ) -> StorageResult<StoredCandidate> {
        let record = self.storage.insert(
            Table::Candidates,
            vec![
                ("office_id", json!(office_id)),
                ("party_id", json!(party_id)),
                ("user_id", json!(user_id)),
                ("registration_timestamp", json!(timestamp())),
            ],
        )?;
        Ok(record.into())
    }
}
