// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request payloads and their field contracts.

use serde::Deserialize;
use utoipa::ToSchema;

use super::{Contracted, FieldContract, FieldSpec, ValidationError};
use crate::storage::repository::OfficeType;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

const OFFICE_TYPES: &[&str] = &["Federal", "Legislative", "State", "Local Government"];

/// Register a political party.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PartyRegistration {
    #[schema(example = "Jubilee")]
    pub name: String,
    #[schema(example = "Pangani, Nairobi")]
    pub hq_address: String,
    #[schema(example = "https://example.com/jubilee.png")]
    pub logo_url: String,
}

impl Contracted for PartyRegistration {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "party registration",
        fields: &[
            FieldSpec::text("name"),
            FieldSpec::text("hq_address"),
            FieldSpec::text("logo_url"),
        ],
    };

    fn refine(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        self.hq_address = self.hq_address.trim().to_string();
        self.logo_url = self.logo_url.trim().to_string();
        Ok(self)
    }
}

/// Rename a political party.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PartyRename {
    pub name: String,
}

impl Contracted for PartyRename {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "party rename",
        fields: &[FieldSpec::text("name")],
    };

    fn refine(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        Ok(self)
    }
}

/// Register a government office.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OfficeRegistration {
    #[schema(example = "Governor")]
    pub name: String,
    /// One of Federal, Legislative, State, Local Government (any case)
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "State")]
    pub office_type: OfficeType,
}

impl Contracted for OfficeRegistration {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "office registration",
        fields: &[
            FieldSpec::text("name"),
            FieldSpec::text("type").one_of(OFFICE_TYPES),
        ],
    };

    fn refine(mut self) -> Result<Self, ValidationError> {
        self.name = title_case(&self.name);
        Ok(self)
    }
}

/// Create an account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupPayload {
    pub first_name: String,
    pub last_name: String,
    pub other_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub telephone: String,
    pub passport_url: String,
    pub password: String,
    pub confirm_password: String,
}

impl Contracted for SignupPayload {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "user signup",
        fields: &[
            FieldSpec::text("first_name"),
            FieldSpec::text("last_name"),
            FieldSpec::text("other_name"),
            FieldSpec::text("email"),
            FieldSpec::text("telephone"),
            FieldSpec::text("passport_url"),
            FieldSpec::text("password"),
            FieldSpec::text("confirm_password"),
        ],
    };

    fn refine(mut self) -> Result<Self, ValidationError> {
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::Rule(
                "Invalid Password Length. 6 Characters minimum",
            ));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::Rule("Passwords do not match"));
        }
        self.email = self.email.trim().to_string();
        if !is_valid_email(&self.email) {
            return Err(ValidationError::Rule("Invalid Email Syntax"));
        }
        for field in [
            &mut self.first_name,
            &mut self.last_name,
            &mut self.other_name,
            &mut self.telephone,
            &mut self.passport_url,
        ] {
            *field = field.trim().to_string();
        }
        Ok(self)
    }
}

/// Exchange credentials for a token.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

impl Contracted for LoginPayload {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "login",
        fields: &[FieldSpec::text("email"), FieldSpec::text("password")],
    };

    fn refine(mut self) -> Result<Self, ValidationError> {
        self.email = self.email.trim().to_string();
        Ok(self)
    }
}

/// Register a user as candidate for the office named in the path.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct CandidateRegistration {
    pub party_id: i64,
    pub user_id: i64,
}

impl Contracted for CandidateRegistration {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "candidate registration",
        fields: &[FieldSpec::integer("party_id"), FieldSpec::integer("user_id")],
    };
}

/// Cast a vote. The voter is the authenticated caller.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct VotePayload {
    pub office_id: i64,
    pub candidate_id: i64,
}

impl Contracted for VotePayload {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "vote",
        fields: &[
            FieldSpec::integer("office_id"),
            FieldSpec::integer("candidate_id"),
        ],
    };
}

/// File a petition against an office's election result.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PetitionPayload {
    pub office_id: i64,
    pub cover_letter: String,
    /// May be empty
    pub evidence: String,
}

impl Contracted for PetitionPayload {
    const CONTRACT: &'static FieldContract = &FieldContract {
        resource: "petition",
        fields: &[
            FieldSpec::integer("office_id"),
            FieldSpec::text("cover_letter"),
            FieldSpec::text("evidence").blank_allowed(),
        ],
    };

    fn refine(mut self) -> Result<Self, ValidationError> {
        self.cover_letter = self.cover_letter.trim().to_string();
        self.evidence = self.evidence.trim().to_string();
        Ok(self)
    }
}

/// "member of  PARLIAMENT" -> "Member Of Parliament"
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain with
/// non-empty labels on both sides.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
        None => false,
    }
}
