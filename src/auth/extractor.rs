// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the authorization gate.
//!
//! Header-based extractors run before the request body is read, so an
//! authorization failure always wins over a malformed payload:
//!
//! ```rust,ignore
//! async fn create_office(
//!     State(state): State<AppState>,
//!     AdminOnly(admin): AdminOnly,
//!     JsonBody(body): JsonBody,
//! ) -> Result<impl IntoResponse, ApiError> { ... }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::gate::{Gate, Principal, Privileged};
use super::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Rejects with "No token provided" when the header is absent, or with the
/// expired / invalid token message when verification fails.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Reuse a principal resolved earlier in the same request
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = Principal::resolve(&parts.headers, &state.tokens)
            .require_authenticated()
            .inspect_err(|err| {
                tracing::debug!(reason = err.error_code(), "request not authenticated");
            })?;
        parts.extensions.insert(user.clone());
        Ok(Auth(user))
    }
}

/// Extractor that requires the admin flag.
pub struct AdminOnly(pub Privileged);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        let privileged = Gate::new(state.storage.as_ref()).require_admin(&user)?;
        Ok(AdminOnly(privileged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::NewUser;
    use crate::storage::{InMemoryStorage, UserRepository};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;

    fn create_test_state() -> AppState {
        let storage = InMemoryStorage::new();
        let users = UserRepository::new(&storage);
        users.ensure_admin("admin@example.com", "hash").unwrap();
        users.create(&NewUser::fixture("voter@example.com")).unwrap();
        AppState::new(
            Arc::new(storage),
            Arc::new(crate::auth::TokenService::new(b"extractor-secret")),
        )
    }

    fn parts(authorization: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = create_test_state();
        let mut parts = parts(None);

        let err = Auth::from_request_parts(&mut parts, &state).await.err().unwrap();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "No token provided");
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_valid_token() {
        let state = create_test_state();
        let token = state.tokens.issue(2).unwrap();
        let mut parts = parts(Some(format!("Bearer {token}")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.ok().unwrap();
        assert_eq!(user.user_id, 2);
        assert!(parts.extensions.get::<AuthenticatedUser>().is_some());
    }

    #[tokio::test]
    async fn auth_extractor_reports_expired_token() {
        let state = create_test_state();
        let token = state.tokens.issue_at(2, 1_000).unwrap();
        let mut parts = parts(Some(format!("Bearer {token}")));

        let err = Auth::from_request_parts(&mut parts, &state).await.err().unwrap();
        assert_eq!(err.message, "Expired token. Please login to get a new token");
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let state = create_test_state();
        let token = state.tokens.issue(2).unwrap();
        let mut parts = parts(Some(format!("Bearer {token}")));

        let err = AdminOnly::from_request_parts(&mut parts, &state).await.err().unwrap();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Restricted access. Admin only");
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let state = create_test_state();
        let token = state.tokens.issue(1).unwrap();
        let mut parts = parts(Some(format!("Bearer {token}")));

        let AdminOnly(admin) = AdminOnly::from_request_parts(&mut parts, &state)
            .await
            .ok()
            .unwrap();
        assert!(admin.is_admin);
    }
}
