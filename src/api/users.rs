// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: signup, login, logout and the current profile.

use axum::{extract::State, http::StatusCode};

use crate::{
    api::params::JsonBody,
    auth::{hash_password, verify_password, Auth, AuthError, PasswordError},
    error::ApiError,
    models::{AuthEnvelope, AuthPayload, MessageEnvelope, ProfileEnvelope, Reply},
    state::AppState,
    storage::{
        oracle::classify_write_error, repository::NewUser, Oracle, Table, UniqueCheck,
        UserRepository,
    },
    validation::{validate, LoginPayload, SignupPayload},
};

const EMAIL_TAKEN: &str = "Conflict - Email already registered";
const PASSPORT_TAKEN: &str = "Conflict - Passport photo already registered";
const PHONE_TAKEN: &str = "Conflict - Phone number already registered";

/// PBKDF2 is CPU-bound; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("password task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Create an account and return a token for it.
#[utoipa::path(
    post,
    path = "/api/v2/auth/signup",
    request_body = SignupPayload,
    tag = "Auth",
    responses(
        (status = 201, body = AuthEnvelope),
        (status = 400, body = crate::error::ErrorBody),
        (status = 409, body = crate::error::ErrorBody),
        (status = 422, body = crate::error::ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Reply<AuthEnvelope>, ApiError> {
    let storage = state.storage.as_ref();

    let payload: SignupPayload = validate(&body)?;
    let checks = [
        UniqueCheck::new("email", payload.email.as_str(), EMAIL_TAKEN),
        UniqueCheck::new("passport_url", payload.passport_url.as_str(), PASSPORT_TAKEN),
        UniqueCheck::new("telephone", payload.telephone.as_str(), PHONE_TAKEN),
    ];
    Oracle::new(storage).ensure_unique(Table::Users, &checks, None)?;

    let password = payload.password;
    let password_hash = run_blocking(move || hash_password(&password)).await?;

    let user = UserRepository::new(storage)
        .create(&NewUser {
            first_name: payload.first_name,
            last_name: payload.last_name,
            other_name: payload.other_name,
            email: payload.email,
            telephone: payload.telephone,
            passport_url: payload.passport_url,
            password_hash,
            is_admin: false,
        })
        .map_err(|e| classify_write_error(e, &checks))?;

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "account created");
    Ok(AuthEnvelope::reply(
        StatusCode::CREATED,
        vec![AuthPayload { token, user }],
    ))
}

/// Exchange credentials for a token.
///
/// Unknown email and wrong password produce the same response.
#[utoipa::path(
    post,
    path = "/api/v2/auth/login",
    request_body = LoginPayload,
    tag = "Auth",
    responses(
        (status = 200, body = AuthEnvelope),
        (status = 401, body = crate::error::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Reply<AuthEnvelope>, ApiError> {
    let payload: LoginPayload = validate(&body)?;
    let users = UserRepository::new(state.storage.as_ref());

    let Some(user) = users.find_by_email(&payload.email)? else {
        tracing::debug!("login for unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    let encoded = user.password_hash.clone();
    let password = payload.password;
    let matches = run_blocking(move || verify_password(&password, &encoded)).await?;
    if !matches {
        tracing::debug!(user_id = user.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let user = users.touch_last_login(user.id)?;
    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "login");
    Ok(AuthEnvelope::reply(
        StatusCode::OK,
        vec![AuthPayload { token, user }],
    ))
}

/// Acknowledge a logout. Tokens stay valid until they expire.
#[utoipa::path(
    post,
    path = "/api/v2/auth/logout",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageEnvelope),
        (status = 401, body = crate::error::ErrorBody)
    )
)]
pub async fn logout(Auth(user): Auth) -> Reply<MessageEnvelope> {
    tracing::info!(user_id = user.user_id, "logout");
    MessageEnvelope::reply(StatusCode::OK, vec!["Logged out".to_string()])
}

#[utoipa::path(
    get,
    path = "/api/v2/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ProfileEnvelope),
        (status = 401, body = crate::error::ErrorBody)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Reply<ProfileEnvelope>, ApiError> {
    let stored = UserRepository::new(state.storage.as_ref())
        .get(user.user_id)?
        .ok_or(AuthError::InvalidToken)?;
    Ok(ProfileEnvelope::reply(StatusCode::OK, vec![stored.into()]))
}
