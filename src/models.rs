// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Response Models
//!
//! Success bodies share one shape: `{ "status": <code>, "<resource>": [...] }`.
//! The HTTP status always mirrors `status`. Request payloads live in
//! [`crate::validation::contracts`]; row types live in
//! [`crate::storage::repository`].

use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Role;
use crate::storage::repository::{
    StoredCandidate, StoredOffice, StoredParty, StoredPetition, StoredUser, StoredVote,
};

/// Handler return type: status code plus JSON envelope.
pub type Reply<T> = (StatusCode, Json<T>);

macro_rules! envelope {
    ($(#[$meta:meta])* $name:ident, $field:ident, $row:ty) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, ToSchema)]
        pub struct $name {
            #[schema(example = 200)]
            pub status: u16,
            pub $field: Vec<$row>,
        }

        impl $name {
            pub fn reply(status: StatusCode, rows: Vec<$row>) -> Reply<Self> {
                (
                    status,
                    Json(Self {
                        status: status.as_u16(),
                        $field: rows,
                    }),
                )
            }
        }
    };
}

envelope!(
    /// Parties envelope.
    PartyEnvelope,
    party,
    StoredParty
);
envelope!(
    /// Offices envelope.
    OfficeEnvelope,
    office,
    StoredOffice
);
envelope!(
    /// Candidates envelope.
    CandidateEnvelope,
    candidate,
    StoredCandidate
);
envelope!(
    /// Votes envelope.
    VoteEnvelope,
    vote,
    StoredVote
);
envelope!(
    /// Petitions envelope.
    PetitionEnvelope,
    petition,
    StoredPetition
);
envelope!(
    /// Signup/login envelope.
    AuthEnvelope,
    data,
    AuthPayload
);
envelope!(
    /// Current user envelope.
    ProfileEnvelope,
    user,
    UserProfile
);
envelope!(
    /// Plain confirmation envelope.
    MessageEnvelope,
    message,
    String
);

/// Issued token plus the account it belongs to.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub token: String,
    pub user: StoredUser,
}

/// Account details with the derived role.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: StoredUser,
    pub role: Role,
}

impl From<StoredUser> for UserProfile {
    fn from(user: StoredUser) -> Self {
        let role = Role::from_admin_flag(user.is_admin);
        Self { user, role }
    }
}
