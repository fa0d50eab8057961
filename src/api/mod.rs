// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderName,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{ApiError, ErrorBody},
    models::{
        AuthEnvelope, AuthPayload, CandidateEnvelope, MessageEnvelope, OfficeEnvelope,
        PartyEnvelope, PetitionEnvelope, ProfileEnvelope, UserProfile, VoteEnvelope,
    },
    state::AppState,
    storage::repository::{
        StoredCandidate, StoredOffice, StoredParty, StoredPetition, StoredUser, StoredVote,
    },
    validation::{
        CandidateRegistration, LoginPayload, OfficeRegistration, PartyRegistration, PartyRename,
        PetitionPayload, SignupPayload, VotePayload,
    },
};

pub mod candidates;
pub mod health;
pub mod offices;
pub mod params;
pub mod parties;
pub mod petitions;
pub mod users;
pub mod votes;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let v2_routes = Router::new()
        .route("/auth/signup", post(users::signup))
        .route("/auth/login", post(users::login))
        .route("/auth/logout", post(users::logout))
        .route("/users/me", get(users::me))
        .route(
            "/parties",
            get(parties::list_parties).post(parties::create_party),
        )
        .route(
            "/parties/{id}",
            get(parties::get_party).delete(parties::delete_party),
        )
        .route("/parties/{id}/name", patch(parties::rename_party))
        .route(
            "/offices",
            get(offices::list_offices).post(offices::create_office),
        )
        .route("/offices/{id}", get(offices::get_office))
        .route("/offices/{id}/register", post(offices::register_candidate))
        .route("/candidates", get(candidates::list_candidates))
        .route("/votes", post(votes::cast_vote))
        .route(
            "/petitions",
            get(petitions::list_petitions).post(petitions::create_petition),
        );

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api/v2", v2_routes)
        .route("/health", get(health::health))
        .fallback(not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found - no such route")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::signup,
        users::login,
        users::logout,
        users::me,
        parties::list_parties,
        parties::get_party,
        parties::create_party,
        parties::rename_party,
        parties::delete_party,
        offices::list_offices,
        offices::get_office,
        offices::create_office,
        offices::register_candidate,
        candidates::list_candidates,
        votes::cast_vote,
        petitions::create_petition,
        petitions::list_petitions,
        health::health
    ),
    components(
        schemas(
            ErrorBody,
            StoredParty,
            StoredOffice,
            StoredCandidate,
            StoredVote,
            StoredPetition,
            StoredUser,
            PartyEnvelope,
            OfficeEnvelope,
            CandidateEnvelope,
            VoteEnvelope,
            PetitionEnvelope,
            AuthEnvelope,
            AuthPayload,
            ProfileEnvelope,
            UserProfile,
            MessageEnvelope,
            PartyRegistration,
            PartyRename,
            OfficeRegistration,
            SignupPayload,
            LoginPayload,
            CandidateRegistration,
            VotePayload,
            PetitionPayload,
            health::HealthResponse,
            health::HealthChecks
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Signup, login and logout"),
        (name = "Users", description = "Current account"),
        (name = "Parties", description = "Political party registry"),
        (name = "Offices", description = "Political offices and candidate registration"),
        (name = "Candidates", description = "Registered candidates"),
        (name = "Votes", description = "Ballot casting"),
        (name = "Petitions", description = "Result petitions"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;

/// Declares the `bearer` scheme referenced by secured paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
