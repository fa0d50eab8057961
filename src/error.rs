// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The single HTTP error type.
//!
//! Every failure leaves the server as `{ "status": <code>, "error": "<message>" }`
//! with the HTTP status mirroring `status`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{AuthError, PasswordError};
use crate::storage::{OracleError, StorageError};
use crate::validation::ValidationError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// Error envelope.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = 409)]
    pub status: u16,
    #[schema(example = "Conflict - Party name already registered")]
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            status: self.status.as_u16(),
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(err.status(), err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if let AuthError::Internal(ref msg) = err {
            tracing::error!(error = %msg, "authentication failure");
        }
        Self::new(err.status_code(), err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage failure");
        Self::internal(format!("Database error: {err}"))
    }
}

impl From<OracleError> for ApiError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Conflict(message) => Self::conflict(message),
            err @ (OracleError::MissingReference { .. } | OracleError::OutOfRange { .. }) => {
                Self::not_found(err.to_string())
            }
            OracleError::Storage(err) => err.into(),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "password hashing failure");
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Table;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let unp = ApiError::unprocessable("oops");
        assert_eq!(unp.status, StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(ApiError::conflict("dup").status, StatusCode::CONFLICT);
        assert_eq!(ApiError::unauthorized("no").status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn into_response_returns_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"status":400,"error":"bad data"}"#);
    }

    #[test]
    fn oracle_errors_map_to_conflict_and_not_found() {
        let conflict: ApiError = OracleError::Conflict("taken".into()).into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let out_of_range: ApiError = OracleError::OutOfRange {
            resource: "Party",
            id: 999_999,
        }
        .into();
        assert_eq!(out_of_range.status, StatusCode::NOT_FOUND);
        assert_eq!(out_of_range.message, "Party 999999 not in server. ID out of range.");

        let fatal: ApiError =
            OracleError::Storage(StorageError::NotFound { table: Table::Votes, id: 1 }).into();
        assert_eq!(fatal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_status_is_preserved() {
        let err: ApiError = ValidationError::EmptyField { field: "name" }.into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let err: ApiError = ValidationError::NotAnObject.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
