// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CandidateEnvelope, Reply},
    state::AppState,
    storage::CandidateRepository,
};

#[utoipa::path(
    get,
    path = "/api/v2/candidates",
    tag = "Candidates",
    security(("bearer" = [])),
    responses(
        (status = 200, body = CandidateEnvelope),
        (status = 401, body = crate::error::ErrorBody)
    )
)]
pub async fn list_candidates(
    State(state): State<AppState>,
    Auth(_user): Auth,
) -> Result<Reply<CandidateEnvelope>, ApiError> {
    let candidates = CandidateRepository::new(state.storage.as_ref()).list()?;
    Ok(CandidateEnvelope::reply(StatusCode::OK, candidates))
}
