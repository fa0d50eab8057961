// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode};

use crate::{
    api::params::{EntityId, JsonBody},
    auth::AdminOnly,
    error::ApiError,
    models::{CandidateEnvelope, OfficeEnvelope, Reply},
    state::AppState,
    storage::{
        oracle::classify_write_error, CandidateRepository, OfficeRepository, Oracle, Table,
        UniqueCheck,
    },
    validation::{validate, CandidateRegistration, OfficeRegistration},
};

const OFFICE_TAKEN: &str = "Conflict - Office already registered";
const ALREADY_CANDIDATE: &str = "Conflict - User already registered as a candidate";

#[utoipa::path(
    get,
    path = "/api/v2/offices",
    tag = "Offices",
    responses((status = 200, body = OfficeEnvelope))
)]
pub async fn list_offices(State(state): State<AppState>) -> Result<Reply<OfficeEnvelope>, ApiError> {
    let offices = OfficeRepository::new(state.storage.as_ref()).list()?;
    Ok(OfficeEnvelope::reply(StatusCode::OK, offices))
}

#[utoipa::path(
    get,
    path = "/api/v2/offices/{id}",
    params(("id" = i64, Path, description = "Office ID")),
    tag = "Offices",
    responses(
        (status = 200, body = OfficeEnvelope),
        (status = 404, body = crate::error::ErrorBody)
    )
)]
pub async fn get_office(
    State(state): State<AppState>,
    EntityId(office_id): EntityId,
) -> Result<Reply<OfficeEnvelope>, ApiError> {
    let record = Oracle::new(state.storage.as_ref()).ensure_in_range(Table::Offices, office_id)?;
    Ok(OfficeEnvelope::reply(StatusCode::OK, vec![record.into()]))
}

/// Register an office. Admin only.
#[utoipa::path(
    post,
    path = "/api/v2/offices",
    request_body = OfficeRegistration,
    tag = "Offices",
    security(("bearer" = [])),
    responses(
        (status = 201, body = OfficeEnvelope),
        (status = 401, body = crate::error::ErrorBody),
        (status = 409, body = crate::error::ErrorBody),
        (status = 422, body = crate::error::ErrorBody)
    )
)]
pub async fn create_office(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    JsonBody(body): JsonBody,
) -> Result<Reply<OfficeEnvelope>, ApiError> {
    let storage = state.storage.as_ref();

    let payload: OfficeRegistration = validate(&body)?;
    let checks = [UniqueCheck::new("name", payload.name.as_str(), OFFICE_TAKEN)];
    Oracle::new(storage).ensure_unique(Table::Offices, &checks, None)?;

    let office = OfficeRepository::new(storage)
        .create(&payload.name, payload.office_type)
        .map_err(|e| classify_write_error(e, &checks))?;

    tracing::info!(office_id = office.id, by = admin.user_id, "office registered");
    Ok(OfficeEnvelope::reply(StatusCode::CREATED, vec![office]))
}

/// Register a user as candidate for this office. Admin only.
#[utoipa::path(
    post,
    path = "/api/v2/offices/{id}/register",
    params(("id" = i64, Path, description = "Office ID")),
    request_body = CandidateRegistration,
    tag = "Offices",
    security(("bearer" = [])),
    responses(
        (status = 201, body = CandidateEnvelope),
        (status = 401, body = crate::error::ErrorBody),
        (status = 404, body = crate::error::ErrorBody),
        (status = 409, body = crate::error::ErrorBody)
    )
)]
pub async fn register_candidate(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    EntityId(office_id): EntityId,
    JsonBody(body): JsonBody,
) -> Result<Reply<CandidateEnvelope>, ApiError> {
    let storage = state.storage.as_ref();
    let oracle = Oracle::new(storage);

    let payload: CandidateRegistration = validate(&body)?;
    oracle.ensure_in_range(Table::Offices, office_id)?;
    oracle.ensure_reference(Table::Parties, payload.party_id)?;
    oracle.ensure_reference(Table::Users, payload.user_id)?;

    let checks = [UniqueCheck::new("user_id", payload.user_id, ALREADY_CANDIDATE)];
    oracle.ensure_unique(Table::Candidates, &checks, None)?;

    let candidate = CandidateRepository::new(storage)
        .create(office_id, payload.party_id, payload.user_id)
        .map_err(|e| classify_write_error(e, &checks))?;

    tracing::info!(
        candidate_id = candidate.id,
        office_id,
        by = admin.user_id,
        "candidate registered"
    );
    Ok(CandidateEnvelope::reply(StatusCode::CREATED, vec![candidate]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{seeded_state, Seeded};
    use crate::auth::Privileged;
    use crate::storage::PartyRepository;
    use axum::Json;
    use serde_json::json;

    fn admin_only(user_id: i64) -> AdminOnly {
        AdminOnly(Privileged {
            user_id,
            is_admin: true,
            is_owner: false,
        })
    }

    #[tokio::test]
    async fn create_office_normalizes_name_and_type() {
        let Seeded { state, admin, .. } = seeded_state();

        let (status, Json(body)) = create_office(
            State(state),
            admin_only(admin),
            JsonBody(json!({"name": "county  assembly member", "type": "local government"})),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.office[0].name, "County Assembly Member");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["office"][0]["type"], "Local Government");
    }

    #[tokio::test]
    async fn office_name_is_unique_after_normalization() {
        let Seeded { state, admin, .. } = seeded_state();

        // "Governor" is seeded.
        let err = create_office(
            State(state),
            admin_only(admin),
            JsonBody(json!({"name": "GOVERNOR", "type": "State"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, OFFICE_TAKEN);
    }

    #[tokio::test]
    async fn office_type_enumeration_is_enforced() {
        let Seeded { state, admin, .. } = seeded_state();
        let err = create_office(
            State(state),
            admin_only(admin),
            JsonBody(json!({"name": "Governor", "type": "Martian"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn register_candidate_checks_references() {
        let Seeded {
            state,
            admin,
            voter,
            office,
            ..
        } = seeded_state();

        let err = register_candidate(
            State(state.clone()),
            admin_only(admin),
            EntityId(office),
            JsonBody(json!({"party_id": 5, "user_id": voter})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.starts_with("Party 5"));

        let err = register_candidate(
            State(state),
            admin_only(admin),
            EntityId(42),
            JsonBody(json!({"party_id": 1, "user_id": voter})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("ID out of range"));
    }

    #[tokio::test]
    async fn user_stands_for_one_office_only() {
        let Seeded {
            state,
            admin,
            voter,
            office,
            ..
        } = seeded_state();
        let storage = state.storage.as_ref();
        PartyRepository::new(storage)
            .create("Jubilee", "X", "Y", voter)
            .unwrap();
        let senator = OfficeRepository::new(storage)
            .create("Senator", crate::storage::repository::OfficeType::Legislative)
            .unwrap();

        let (status, Json(body)) = register_candidate(
            State(state.clone()),
            admin_only(admin),
            EntityId(office),
            JsonBody(json!({"party_id": 1, "user_id": voter})),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.candidate[0].office_id, office);

        let err = register_candidate(
            State(state),
            admin_only(admin),
            EntityId(senator.id),
            JsonBody(json!({"party_id": 1, "user_id": voter})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, ALREADY_CANDIDATE);
    }
}
