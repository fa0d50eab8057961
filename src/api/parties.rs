// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode};

use crate::{
    api::params::{EntityId, JsonBody},
    auth::{Auth, Gate},
    error::ApiError,
    models::{MessageEnvelope, PartyEnvelope, Reply},
    state::AppState,
    storage::{
        oracle::classify_write_error, repository::StoredParty, Oracle, PartyRepository, Table,
        UniqueCheck,
    },
    validation::{validate, PartyRegistration, PartyRename},
};

const NAME_TAKEN: &str = "Conflict - Party name already registered";
const ADDRESS_TAKEN: &str = "Conflict - Address already registered";
const LOGO_TAKEN: &str = "Conflict - Logo already registered";

#[utoipa::path(
    get,
    path = "/api/v2/parties",
    tag = "Parties",
    responses((status = 200, body = PartyEnvelope))
)]
pub async fn list_parties(State(state): State<AppState>) -> Result<Reply<PartyEnvelope>, ApiError> {
    let parties = PartyRepository::new(state.storage.as_ref()).list()?;
    Ok(PartyEnvelope::reply(StatusCode::OK, parties))
}

#[utoipa::path(
    get,
    path = "/api/v2/parties/{id}",
    params(("id" = i64, Path, description = "Party ID")),
    tag = "Parties",
    responses(
        (status = 200, body = PartyEnvelope),
        (status = 404, body = crate::error::ErrorBody)
    )
)]
pub async fn get_party(
    State(state): State<AppState>,
    EntityId(party_id): EntityId,
) -> Result<Reply<PartyEnvelope>, ApiError> {
    let record = Oracle::new(state.storage.as_ref()).ensure_in_range(Table::Parties, party_id)?;
    Ok(PartyEnvelope::reply(StatusCode::OK, vec![record.into()]))
}

/// Register a party. The caller becomes its creator.
#[utoipa::path(
    post,
    path = "/api/v2/parties",
    request_body = PartyRegistration,
    tag = "Parties",
    security(("bearer" = [])),
    responses(
        (status = 201, body = PartyEnvelope),
        (status = 401, body = crate::error::ErrorBody),
        (status = 409, body = crate::error::ErrorBody)
    )
)]
pub async fn create_party(
    State(state): State<AppState>,
    Auth(user): Auth,
    JsonBody(body): JsonBody,
) -> Result<Reply<PartyEnvelope>, ApiError> {
    let storage = state.storage.as_ref();
    let creator = Gate::new(storage).privileges(&user)?;

    let payload: PartyRegistration = validate(&body)?;
    let checks = [
        UniqueCheck::new("name", payload.name.as_str(), NAME_TAKEN),
        UniqueCheck::new("hq_address", payload.hq_address.as_str(), ADDRESS_TAKEN),
        UniqueCheck::new("logo_url", payload.logo_url.as_str(), LOGO_TAKEN),
    ];
    Oracle::new(storage).ensure_unique(Table::Parties, &checks, None)?;

    let party = PartyRepository::new(storage)
        .create(
            &payload.name,
            &payload.hq_address,
            &payload.logo_url,
            creator.user_id,
        )
        .map_err(|e| classify_write_error(e, &checks))?;

    tracing::info!(party_id = party.id, created_by = party.created_by, "party registered");
    Ok(PartyEnvelope::reply(StatusCode::CREATED, vec![party]))
}

/// Rename a party. Creator or admin only.
#[utoipa::path(
    patch,
    path = "/api/v2/parties/{id}/name",
    params(("id" = i64, Path, description = "Party ID")),
    request_body = PartyRename,
    tag = "Parties",
    security(("bearer" = [])),
    responses(
        (status = 200, body = PartyEnvelope),
        (status = 401, body = crate::error::ErrorBody),
        (status = 404, body = crate::error::ErrorBody),
        (status = 409, body = crate::error::ErrorBody)
    )
)]
pub async fn rename_party(
    State(state): State<AppState>,
    Auth(user): Auth,
    EntityId(party_id): EntityId,
    JsonBody(body): JsonBody,
) -> Result<Reply<PartyEnvelope>, ApiError> {
    let storage = state.storage.as_ref();
    let oracle = Oracle::new(storage);

    let party = StoredParty::from(oracle.ensure_in_range(Table::Parties, party_id)?);
    Gate::new(storage).require_owner_or_admin(&user, &party)?;

    let payload: PartyRename = validate(&body)?;
    let checks = [UniqueCheck::new("name", payload.name.as_str(), NAME_TAKEN)];
    oracle.ensure_unique(Table::Parties, &checks, Some(party_id))?;

    let renamed = PartyRepository::new(storage)
        .rename(party_id, &payload.name)
        .map_err(|e| classify_write_error(e, &checks))?;

    tracing::info!(party_id, by = user.user_id, "party renamed");
    Ok(PartyEnvelope::reply(StatusCode::OK, vec![renamed]))
}

/// Delete a party. Creator or admin only.
#[utoipa::path(
    delete,
    path = "/api/v2/parties/{id}",
    params(("id" = i64, Path, description = "Party ID")),
    tag = "Parties",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageEnvelope),
        (status = 401, body = crate::error::ErrorBody),
        (status = 404, body = crate::error::ErrorBody),
        (status = 409, body = crate::error::ErrorBody, description = "Party still has candidates")
    )
)]
pub async fn delete_party(
    State(state): State<AppState>,
    Auth(user): Auth,
    EntityId(party_id): EntityId,
) -> Result<Reply<MessageEnvelope>, ApiError> {
    let storage = state.storage.as_ref();

    let party = StoredParty::from(Oracle::new(storage).ensure_in_range(Table::Parties, party_id)?);
    Gate::new(storage).require_owner_or_admin(&user, &party)?;

    PartyRepository::new(storage)
        .delete(party_id)
        .map_err(|e| classify_write_error(e, &[]))?;

    tracing::info!(party_id, by = user.user_id, "party deleted");
    Ok(MessageEnvelope::reply(
        StatusCode::OK,
        vec![format!("Party {party_id} ({}) deleted", party.name)],
    ))
}
