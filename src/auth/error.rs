// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authentication error type.
///
/// Everything except [`AuthError::Internal`] is a 401: the caller is either
/// not authenticated or not privileged enough for the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingToken,
    /// Header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Signature valid, expiry in the past
    TokenExpired,
    /// Bad signature, malformed token, or unknown subject
    InvalidToken,
    /// Endpoint restricted to admins
    AdminOnly,
    /// Endpoint restricted to the resource creator and admins
    NotOwner,
    /// Login with unknown email or wrong password
    InvalidCredentials,
    /// Token signing or key setup failed
    Internal(String),
}

impl AuthError {
    /// Short machine-readable reason, used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidToken => "invalid_token",
            AuthError::AdminOnly => "admin_only",
            AuthError::NotOwner => "not_owner",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "No token provided"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::TokenExpired => write!(f, "Expired token. Please login to get a new token"),
            AuthError::InvalidToken => write!(f, "Invalid token detected. Please register or login"),
            AuthError::AdminOnly => write!(f, "Restricted access. Admin only"),
            AuthError::NotOwner => write!(
                f,
                "Restricted access. Only admin and creator may modify this resource"
            ),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_token_returns_401_envelope() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["status"], 401);
        assert_eq!(body["error"], "No token provided");
    }

    #[tokio::test]
    async fn privilege_failures_are_401() {
        for err in [AuthError::AdminOnly, AuthError::NotOwner] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn internal_is_500() {
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
