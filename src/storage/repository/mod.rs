// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to relational storage.
//!
//! Each repository wraps a borrowed [`Storage`](super::Storage) and converts
//! untyped [`Record`](super::Record)s into the `Stored*` row types. Repositories
//! do not run Oracle checks; handlers do that before calling them.

pub mod candidates;
pub mod offices;
pub mod parties;
pub mod petitions;
pub mod users;
pub mod votes;

use chrono::{SecondsFormat, Utc};

pub use candidates::{CandidateRepository, StoredCandidate};
pub use offices::{OfficeRepository, OfficeType, StoredOffice};
pub use parties::{PartyRepository, StoredParty};
pub use petitions::{PetitionRepository, StoredPetition};
pub use users::{NewUser, StoredUser, UserRepository};
pub use votes::{StoredVote, VoteRepository};

/// Server-generated registration timestamp (RFC 3339, UTC).
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
