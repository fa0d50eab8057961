// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Political party repository.

use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::super::{OwnedResource, Record, Storage, StorageResult, Table};
use super::timestamp;

/// Party row.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct StoredParty {
    /// Primary key
    pub id: i64,
    pub name: String,
    /// Headquarters address
    pub hq_address: String,
    pub logo_url: String,
    /// User who registered the party
    pub created_by: i64,
    pub registration_timestamp: String,
}

impl From<Record> for StoredParty {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.text_or_default("name"),
            hq_address: record.text_or_default("hq_address"),
            logo_url: record.text_or_default("logo_url"),
            created_by: record.integer("created_by").unwrap_or_default(),
            registration_timestamp: record.text_or_default("registration_timestamp"),
        }
    }
}

impl OwnedResource for StoredParty {
    fn creator_id(&self) -> i64 {
        self.created_by
    }
}

/// Repository for party rows.
pub struct PartyRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> PartyRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Get a party by ID.
    pub fn get(&self, party_id: i64) -> StorageResult<Option<StoredParty>> {
        Ok(self
            .storage
            .fetch_by_id(Table::Parties, party_id)?
            .map(StoredParty::from))
    }

    /// List every party, oldest first.
    pub fn list(&self) -> StorageResult<Vec<StoredParty>> {
        Ok(self
            .storage
            .fetch_all(Table::Parties)?
            .into_iter()
            .map(StoredParty::from)
            .collect())
    }

    /// Register a new party.
    pub fn create(
        &self,
        name: &str,
        hq_address: &str,
        logo_url: &str,
        created_by: i64,
    ) -> StorageResult<StoredParty> {
        let record = self.storage.insert(
            Table::Parties,
            vec![
                ("name", json!(name)),
                ("hq_address", json!(hq_address)),
                ("logo_url", json!(logo_url)),
                ("created_by", json!(created_by)),
                ("registration_timestamp", json!(timestamp())),
            ],
        )?;
        Ok(record.into())
    }

    /// Change a party's name.
    pub fn rename(&self, party_id: i64, name: &str) -> StorageResult<StoredParty> {
        let record = self
            .storage
            .update(Table::Parties, party_id, vec![("name", json!(name))])?;
        Ok(record.into())
    }

    /// Delete a party.
    pub fn delete(&self, party_id: i64) -> StorageResult<()> {
        self.storage.delete(Table::Parties, party_id)
    }
}
