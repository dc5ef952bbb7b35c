// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route handlers.
//!
//! Handlers hold a store handle for the duration of one API call and
//! translate the result to HTTP. They contain no rules of their own.

use axum::{
    Json,
    extract::{Path, State as AxumState},
    http::StatusCode,
};
use pemilo_api::{
    AdminInfo, AuthenticationService, CastVoteRequest, CastVoteResponse, CloseSessionResponse,
    CreateAdminRequest, CreateCandidateRequest, CreateRoomRequest, CreateRoomResponse,
    CreateSubCandidateRequest, CreateTicketRequest, CreateTicketsBulkRequest, CreatedResponse,
    ListCandidatesResponse, LoginRequest, LoginResponse, PasswordPolicy, QuotaResponse,
    TallyResponse, TicketsResponse, UpdateAdminRequest, VerifyTicketRequest,
    VerifyTicketResponse, VoterRoomInfoResponse,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::HttpError;
use crate::owner::Owner;
use crate::session::SessionAdmin;

/// Liveness check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
        version: String::from(env!("CARGO_PKG_VERSION")),
    })
}

// ============================================================================
// Voter
// ============================================================================

pub async fn handle_get_voter_room(
    AxumState(state): AxumState<AppState>,
    Path(room_id): Path<i64>,
) -> Result<Json<VoterRoomInfoResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: VoterRoomInfoResponse =
        pemilo_api::get_voter_room_info(&mut persistence, state.clock.as_ref(), room_id)?;
    Ok(Json(response))
}

pub async fn handle_verify_ticket(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<VerifyTicketRequest>,
) -> Result<Json<VerifyTicketResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: VerifyTicketResponse = pemilo_api::verify_ticket(&mut persistence, &req)?;
    Ok(Json(response))
}

pub async fn handle_cast_vote(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<CastVoteRequest>,
) -> Result<(StatusCode, Json<CastVoteResponse>), HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: CastVoteResponse =
        pemilo_api::cast_vote(&mut persistence, state.clock.as_ref(), &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

// ============================================================================
// Authentication
// ============================================================================

pub async fn handle_login(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: LoginResponse = AuthenticationService::login(
        &mut persistence,
        state.clock.as_ref(),
        &req.username,
        &req.password,
    )?;
    Ok(Json(response))
}

pub async fn handle_logout(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { token, .. }: SessionAdmin,
) -> Result<StatusCode, HttpError> {
    let mut persistence = state.store.acquire().await?;
    AuthenticationService::logout(&mut persistence, &token)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin
// ============================================================================

pub async fn handle_get_quota(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
) -> Result<Json<QuotaResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: QuotaResponse = pemilo_api::get_admin_quota(&mut persistence, admin.admin_id)?;
    Ok(Json(response))
}

pub async fn handle_create_room(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: CreateRoomResponse =
        pemilo_api::create_room(&mut persistence, state.clock.as_ref(), &admin, &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_close_room(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
) -> Result<Json<CloseSessionResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: CloseSessionResponse =
        pemilo_api::close_room_session(&mut persistence, &admin, room_id)?;
    Ok(Json(response))
}

pub async fn handle_list_candidates(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
) -> Result<Json<ListCandidatesResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: ListCandidatesResponse =
        pemilo_api::list_candidates(&mut persistence, &admin, room_id)?;
    Ok(Json(response))
}

pub async fn handle_create_candidate(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
    Json(req): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: CreatedResponse = pemilo_api::create_candidate(
        &mut persistence,
        state.clock.as_ref(),
        &admin,
        room_id,
        &req,
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_create_sub_candidate(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(candidate_id): Path<i64>,
    Json(req): Json<CreateSubCandidateRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: CreatedResponse = pemilo_api::create_sub_candidate(
        &mut persistence,
        state.clock.as_ref(),
        &admin,
        candidate_id,
        &req,
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_list_tickets(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
) -> Result<Json<TicketsResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: TicketsResponse = pemilo_api::list_tickets(&mut persistence, &admin, room_id)?;
    Ok(Json(response))
}

pub async fn handle_create_ticket(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketsResponse>), HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: TicketsResponse = pemilo_api::create_ticket(
        &mut persistence,
        state.clock.as_ref(),
        &admin,
        room_id,
        &req,
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_create_tickets_bulk(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
    Json(req): Json<CreateTicketsBulkRequest>,
) -> Result<(StatusCode, Json<TicketsResponse>), HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: TicketsResponse = pemilo_api::create_tickets_bulk(
        &mut persistence,
        state.clock.as_ref(),
        &admin,
        room_id,
        &req,
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_realtime_tally(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
) -> Result<Json<TallyResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: TallyResponse =
        pemilo_api::get_realtime_tally(&mut persistence, &admin, room_id)?;
    Ok(Json(response))
}

pub async fn handle_vote_tally(
    AxumState(state): AxumState<AppState>,
    SessionAdmin { admin, .. }: SessionAdmin,
    Path(room_id): Path<i64>,
) -> Result<Json<TallyResponse>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: TallyResponse = pemilo_api::get_vote_tally(&mut persistence, &admin, room_id)?;
    Ok(Json(response))
}

// ============================================================================
// Owner
// ============================================================================

pub async fn handle_create_admin(
    AxumState(state): AxumState<AppState>,
    _owner: Owner,
    Json(req): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminInfo>), HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: AdminInfo = pemilo_api::create_admin(
        &mut persistence,
        state.clock.as_ref(),
        &PasswordPolicy::default(),
        &req,
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_update_admin(
    AxumState(state): AxumState<AppState>,
    _owner: Owner,
    Path(admin_id): Path<i64>,
    Json(req): Json<UpdateAdminRequest>,
) -> Result<Json<AdminInfo>, HttpError> {
    let mut persistence = state.store.acquire().await?;
    let response: AdminInfo = pemilo_api::update_admin(&mut persistence, admin_id, &req)?;
    Ok(Json(response))
}
