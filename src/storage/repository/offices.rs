// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Government office repository.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;
use utoipa::ToSchema;

use super::super::{Record, Storage, StorageResult, Table};
use super::timestamp;

/// Office category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficeType {
    Federal,
    Legislative,
    State,
    LocalGovernment,
}

impl OfficeType {
    pub const ALL: [OfficeType; 4] = [
        OfficeType::Federal,
        OfficeType::Legislative,
        OfficeType::State,
        OfficeType::LocalGovernment,
    ];

    /// Canonical spelling, as stored and returned.
    pub fn as_str(self) -> &'static str {
        match self {
            OfficeType::Federal => "Federal",
            OfficeType::Legislative => "Legislative",
            OfficeType::State => "State",
            OfficeType::LocalGovernment => "Local Government",
        }
    }

    /// Case-insensitive lookup by canonical spelling.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

impl Serialize for OfficeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OfficeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        OfficeType::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown office type '{raw}'")))
    }
}

/// Office row.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct StoredOffice {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "Federal")]
    pub office_type: OfficeType,
    pub registration_timestamp: String,
}

impl From<Record> for StoredOffice {
    fn from(record: Record) -> Self {
        let office_type = record
            .text("office_type")
            .and_then(OfficeType::parse)
            .unwrap_or(OfficeType::Federal);
        Self {
            id: record.id,
            name: record.text_or_default("name"),
            office_type,
            registration_timestamp: record.text_or_default("registration_timestamp"),
        }
    }
}

/// Repository for office rows.
pub struct OfficeRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> OfficeRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self, office_id: i64) -> StorageResult<Option<StoredOffice>> {
        Ok(self
            .storage
            .fetch_by_id(Table::Offices, office_id)?
            .map(StoredOffice::from))
    }

    pub fn list(&self) -> StorageResult<Vec<StoredOffice>> {
        Ok(self
            .storage
            .fetch_all(Table::Offices)?
            .into_iter()
            .map(StoredOffice::from)
            .collect())
    }

    /// Register a new office.
    pub fn create(&self, name: &str, office_type: OfficeType) -> StorageResult<StoredOffice> {
        let record = self.storage.insert(
            Table::Offices,
            vec![
                ("name", json!(name)),
                ("office_type", json!(office_type.as_str())),
                ("registration_timestamp", json!(timestamp())),
            ],
        )?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStorage, SqliteStorage};

    #[test]
    fn office_type_parse_is_case_insensitive() {
        assert_eq!(OfficeType::parse("federal"), Some(OfficeType::Federal));
        assert_eq!(
            OfficeType::parse("LOCAL GOVERNMENT"),
            Some(OfficeType::LocalGovernment)
        );
        assert_eq!(OfficeType::parse("Martian"), None);
    }

    #[test]
    fn office_type_serializes_canonically() {
        let office = StoredOffice {
            id: 1,
            name: "Governor".into(),
            office_type: OfficeType::LocalGovernment,
            registration_timestamp: "t".into(),
        };
        let value = serde_json::to_value(&office).unwrap();
        assert_eq!(value["type"], "Local Government");
    }

    #[test]
    fn create_and_list_in_memory() {
        let storage = InMemoryStorage::new();
        let repo = OfficeRepository::new(&storage);
        repo.create("Governor", OfficeType::State).unwrap();
        repo.create("Senator", OfficeType::Legislative).unwrap();

        let offices = repo.list().unwrap();
        assert_eq!(offices.len(), 2);
        assert_eq!(offices[1].office_type, OfficeType::Legislative);
    }

    #[test]
    fn stored_type_satisfies_sqlite_check_constraint() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let repo = OfficeRepository::new(&storage);
        let office = repo.create("Governor", OfficeType::LocalGovernment).unwrap();
        assert_eq!(
            repo.get(office.id).unwrap().unwrap().office_type,
            OfficeType::LocalGovernment
        );
    }
}
