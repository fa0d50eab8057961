// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors that reject with the API error envelope.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;

use crate::error::ApiError;

/// Primary key taken from the `{id}` path segment. Must be 1 or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let id = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::bad_request(format!("Bad Query - '{raw}' is not a valid ID")))?;
        if id < 1 {
            return Err(ApiError::bad_request("ID cannot be zero or negative"));
        }
        Ok(Self(id))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Self::parse(&raw)
    }
}

/// Raw JSON body. Contract validation happens in the handler, after the
/// authorization gate.
pub struct JsonBody(pub Value);

impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("Bad Query - {}", rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn parse_accepts_positive_ids() {
        assert_eq!(EntityId::parse("42").unwrap(), EntityId(42));
    }

    #[test]
    fn parse_rejects_zero_and_negative() {
        for raw in ["0", "-3"] {
            let err = EntityId::parse(raw).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "ID cannot be zero or negative");
        }
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = EntityId::parse("abc").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("'abc'"));
    }
}
