// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode};

use crate::{
    api::params::JsonBody,
    auth::{Auth, Gate},
    error::ApiError,
    models::{Reply, VoteEnvelope},
    state::AppState,
    storage::{
        oracle::classify_write_error, repository::StoredCandidate, Oracle, OracleError, Table,
        UniqueCheck, VoteRepository,
    },
    validation::{validate, VotePayload},
};

const ALREADY_VOTED: &str = "Conflict - Voter has already voted for this office";

/// Cast a vote as the authenticated caller.
///
/// One vote per voter per office, whichever candidate is chosen.
#[utoipa::path(
    post,
    path = "/api/v2/votes",
    request_body = VotePayload,
    tag = "Votes",
    security(("bearer" = [])),
    responses(
        (status = 201, body = VoteEnvelope),
        (status = 401, body = crate::error::ErrorBody),
        (status = 404, body = crate::error::ErrorBody),
        (status = 409, body = crate::error::ErrorBody),
        (status = 422, body = crate::error::ErrorBody)
    )
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    Auth(user): Auth,
    JsonBody(body): JsonBody,
) -> Result<Reply<VoteEnvelope>, ApiError> {
    let storage = state.storage.as_ref();
    let voter = Gate::new(storage).privileges(&user)?;

    let payload: VotePayload = validate(&body)?;
    let oracle = Oracle::new(storage);
    oracle.ensure_reference(Table::Offices, payload.office_id)?;
    let candidate =
        StoredCandidate::from(oracle.ensure_reference(Table::Candidates, payload.candidate_id)?);
    if candidate.office_id != payload.office_id {
        return Err(ApiError::unprocessable(format!(
            "Candidate {} is not contesting office {}",
            candidate.id, payload.office_id
        )));
    }

    let votes = VoteRepository::new(storage);
    if votes.has_voted(voter.user_id, payload.office_id)? {
        tracing::debug!(voter = voter.user_id, office_id = payload.office_id, "duplicate vote");
        return Err(OracleError::Conflict(ALREADY_VOTED.to_string()).into());
    }

    let checks = [UniqueCheck::new("voter_id", voter.user_id, ALREADY_VOTED)];
    let vote = votes
        .cast(
            voter.user_id,
            payload.office_id,
            candidate.id,
            candidate.party_id,
        )
        .map_err(|e| classify_write_error(e, &checks))?;

    tracing::info!(vote_id = vote.id, office_id = vote.office_id, "vote cast");
    Ok(VoteEnvelope::reply(StatusCode::CREATED, vec![vote]))
}
