// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Election petition repository.

use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::super::{OwnedResource, Record, Storage, StorageResult, Table};
use super::timestamp;

/// Petition row.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct StoredPetition {
    pub id: i64,
    /// Contested office
    pub office_id: i64,
    pub created_by: i64,
    pub cover_letter: String,
    /// Supporting evidence; may be empty
    pub evidence: String,
    pub registration_timestamp: String,
}

impl From<Record> for StoredPetition {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            office_id: record.integer("office_id").unwrap_or_default(),
            created_by: record.integer("created_by").unwrap_or_default(),
            cover_letter: record.text_or_default("cover_letter"),
            evidence: record.text_or_default("evidence"),
            registration_timestamp: record.text_or_default("registration_timestamp"),
        }
    }
}

impl OwnedResource for StoredPetition {
    fn creator_id(&self) -> i64 {
        self.created_by
    }
}

pub struct PetitionRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> PetitionRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> StorageResult<Vec<StoredPetition>> {
        Ok(self
            .storage
            .fetch_all(Table::Petitions)?
            .into_iter()
            .map(StoredPetition::from)
            .collect())
    }

    pub fn create(
        &self,
        office_id: i64,
        created_by: i64,
        cover_letter: &str,
        evidence: &str,
    ) -> StorageResult<StoredPetition> {
        let record = self.storage.insert(
            Table::Petitions,
            vec![
                ("office_id", json!(office_id)),
                ("created_by", json!(created_by)),
                ("cover_letter", json!(cover_letter)),
                ("evidence", json!(evidence)),
                ("registration_timestamp", json!(timestamp())),
            ],
        )?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::{NewUser, OfficeRepository, OfficeType, UserRepository};
    use crate::storage::InMemoryStorage;

    #[test]
    fn create_with_blank_evidence() {
        let storage = InMemoryStorage::new();
        let admin = UserRepository::new(&storage)
            .create(&NewUser::fixture("admin@example.com"))
            .unwrap();
        let office = OfficeRepository::new(&storage)
            .create("Governor", OfficeType::State)
            .unwrap();

        let repo = PetitionRepository::new(&storage);
        let petition = repo.create(office.id, admin.id, "Recount", "").unwrap();
        assert!(petition.is_created_by(admin.id));
        assert_eq!(petition.evidence, "");
        assert_eq!(repo.list().unwrap(), vec![petition]);
    }
}
