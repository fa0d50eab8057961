// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vote repository.
//!
//! One vote per (voter, office). [`VoteRepository::has_voted`] is the
//! dedicated pre-check; the `(office_id, voter_id)` unique key backs it up.

use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::super::{Record, Storage, StorageResult, Table};
use super::timestamp;

/// Vote row.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct StoredVote {
    pub id: i64,
    pub office_id: i64,
    pub candidate_id: i64,
    /// Party of the chosen candidate at the time of voting
    pub party_id: i64,
    pub voter_id: i64,
    pub registration_timestamp: String,
}

impl From<Record> for StoredVote {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            office_id: record.integer("office_id").unwrap_or_default(),
            candidate_id: record.integer("candidate_id").unwrap_or_default(),
            party_id: record.integer("party_id").unwrap_or_default(),
            voter_id: record.integer("voter_id").unwrap_or_default(),
            registration_timestamp: record.text_or_default("registration_timestamp"),
        }
    }
}

pub struct VoteRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> VoteRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Whether `voter_id` already voted for `office_id`, for any candidate.
    pub fn has_voted(&self, voter_id: i64, office_id: i64) -> StorageResult<bool> {
        self.storage.exists_where(
            Table::Votes,
            &[("voter_id", json!(voter_id)), ("office_id", json!(office_id))],
        )
    }

    pub fn cast(
        &self,
        voter_id: i64,
        office_id: i64,
        candidate_id: i64,
        party_id: i64,
    ) -> StorageResult<StoredVote> {
        let record = self.storage.insert(
            Table::Votes,
            vec![
                ("office_id", json!(office_id)),
                ("candidate_id", json!(candidate_id)),
                ("party_id", json!(party_id)),
                ("voter_id", json!(voter_id)),
                ("registration_timestamp", json!(timestamp())),
            ],
        )?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::{
        CandidateRepository, NewUser, OfficeRepository, OfficeType, PartyRepository,
        UserRepository,
    };
    use crate::storage::{InMemoryStorage, SqliteStorage, StorageError};

    /// Seeds a voter, an office and two candidates for it.
    fn seed(storage: &dyn Storage) -> (i64, i64, i64, i64) {
        let users = UserRepository::new(storage);
        let voter = users.create(&NewUser::fixture("voter@example.com")).unwrap();
        let a = users.create(&NewUser::fixture("a@example.com")).unwrap();
        let b = users.create(&NewUser::fixture("b@example.com")).unwrap();
        let party = PartyRepository::new(storage)
            .create("Jubilee", "Nairobi", "j.png", a.id)
            .unwrap();
        let office = OfficeRepository::new(storage)
            .create("Governor", OfficeType::State)
            .unwrap();
        let candidates = CandidateRepository::new(storage);
        let first = candidates.create(office.id, party.id, a.id).unwrap();
        let second = candidates.create(office.id, party.id, b.id).unwrap();
        (voter.id, office.id, first.id, second.id)
    }

    fn assert_one_vote_per_office(storage: &dyn Storage) {
        let (voter, office, first, second) = seed(storage);
        let repo = VoteRepository::new(storage);

        assert!(!repo.has_voted(voter, office).unwrap());
        let vote = repo.cast(voter, office, first, 1).unwrap();
        assert_eq!(vote.voter_id, voter);
        assert!(repo.has_voted(voter, office).unwrap());

        let err = repo.cast(voter, office, second, 1).unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { .. }));
    }

    #[test]
    fn one_vote_per_office_in_memory() {
        assert_one_vote_per_office(&InMemoryStorage::new());
    }

    #[test]
    fn one_vote_per_office_sqlite() {
        assert_one_vote_per_office(&SqliteStorage::open_in_memory().unwrap());
    }
}
