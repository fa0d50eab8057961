// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Validation Module
//!
//! Field-contract validation for request bodies.
//!
//! Every payload type declares a constant [`FieldContract`]; handlers call
//! [`validate`] with the raw JSON body and get back the typed payload or the
//! first contract violation. Validation is pure: no storage access.
//!
//! ## Status mapping
//!
//! - 400: body not an object, wrong field count, unexpected field
//! - 422: wrong value type, blank text, non-positive integer, value outside
//!   an enumeration, resource-specific rules (password length, email syntax)

pub mod contract;
pub mod contracts;
pub mod validator;

use axum::http::StatusCode;

pub use contract::{FieldContract, FieldKind, FieldSpec};
pub use contracts::{
    CandidateRegistration, LoginPayload, OfficeRegistration, PartyRegistration, PartyRename,
    PetitionPayload, SignupPayload, VotePayload,
};
pub use validator::{validate, Contracted};

/// Contract violation, reported to the caller verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Bad Query - Request body must be a JSON object")]
    NotAnObject,

    #[error("Bad Query - {resource} expects {count} fields ({expected}), got {found}")]
    FieldCount {
        resource: &'static str,
        expected: String,
        count: usize,
        found: usize,
    },

    #[error("Bad Query - Unexpected field '{field}'. Expected fields: {expected}")]
    UnknownField { field: String, expected: String },

    #[error("Unprocessable Entity - '{field}' must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Empty data field - '{field}' cannot be blank")]
    EmptyField { field: &'static str },

    #[error("Unprocessable Entity - '{field}' must be 1 or greater")]
    NotPositive { field: &'static str },

    #[error("Unprocessable Entity - '{field}' must be one of: {allowed}")]
    NotAllowed {
        field: &'static str,
        allowed: String,
    },

    /// Resource-specific rule (password length, email syntax, ...).
    #[error("{0}")]
    Rule(&'static str),
}

impl ValidationError {
    pub fn status(&self) -> StatusCode {
        match self {
            ValidationError::NotAnObject
            | ValidationError::FieldCount { .. }
            | ValidationError::UnknownField { .. } => StatusCode::BAD_REQUEST,
            ValidationError::InvalidType { .. }
            | ValidationError::EmptyField { .. }
            | ValidationError::NotPositive { .. }
            | ValidationError::NotAllowed { .. }
            | ValidationError::Rule(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
