// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode};

use crate::{
    api::params::JsonBody,
    auth::{AdminOnly, Auth},
    error::ApiError,
    models::{PetitionEnvelope, Reply},
    state::AppState,
    storage::{Oracle, PetitionRepository, Table},
    validation::{validate, PetitionPayload},
};

/// File a petition against an office's result. Admin only.
#[utoipa::path(
    post,
    path = "/api/v2/petitions",
    request_body = PetitionPayload,
    tag = "Petitions",
    security(("bearer" = [])),
    responses(
        (status = 201, body = PetitionEnvelope),
        (status = 401, body = crate::error::ErrorBody),
        (status = 404, body = crate::error::ErrorBody)
    )
)]
pub async fn create_petition(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    JsonBody(body): JsonBody,
) -> Result<Reply<PetitionEnvelope>, ApiError> {
    let storage = state.storage.as_ref();

    let payload: PetitionPayload = validate(&body)?;
    Oracle::new(storage).ensure_reference(Table::Offices, payload.office_id)?;

    let petition = PetitionRepository::new(storage).create(
        payload.office_id,
        admin.user_id,
        &payload.cover_letter,
        &payload.evidence,
    )?;

    tracing::info!(petition_id = petition.id, office_id = petition.office_id, "petition filed");
    Ok(PetitionEnvelope::reply(StatusCode::CREATED, vec![petition]))
}

#[utoipa::path(
    get,
    path = "/api/v2/petitions",
    tag = "Petitions",
    security(("bearer" = [])),
    responses(
        (status = 200, body = PetitionEnvelope),
        (status = 401, body = crate::error::ErrorBody)
    )
)]
pub async fn list_petitions(
    State(state): State<AppState>,
    Auth(_user): Auth,
) -> Result<Reply<PetitionEnvelope>, ApiError> {
    let petitions = PetitionRepository::new(state.storage.as_ref()).list()?;
    Ok(PetitionEnvelope::reply(StatusCode::OK, petitions))
}
