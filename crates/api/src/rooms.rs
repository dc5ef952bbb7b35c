// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room and candidate administration.

use std::str::FromStr;

use pemilo::Clock;
use pemilo_domain::{
    Candidate, DomainError, PublishState, Room, RoomStatus, SessionState, SubCandidate,
    VotersType, validate_candidate_name,
};
use pemilo_persistence::Persistence;
use tracing::info;

use crate::auth::AuthenticatedAdmin;
use crate::error::ApiError;
use crate::request_response::{
    CandidateInfo, CloseSessionResponse, CreateCandidateRequest, CreateRoomRequest,
    CreateRoomResponse, CreateSubCandidateRequest, CreatedResponse, ListCandidatesResponse,
    SubCandidateInfo,
};

/// Loads a room and checks that `admin` owns it.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
pub(crate) fn load_owned_room(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    room_id: i64,
) -> Result<Room, ApiError> {
    let room: Room = persistence
        .get_room(room_id)?
        .ok_or(DomainError::RoomNotFound(room_id))?;

    if room.admin_id != admin.admin_id {
        return Err(ApiError::Forbidden {
            message: format!("Room {room_id} belongs to another admin"),
        });
    }

    Ok(room)
}

/// Groups a room's sub-candidates under their candidates.
pub(crate) fn candidate_infos(
    candidates: Vec<Candidate>,
    sub_candidates: &[SubCandidate],
) -> Vec<CandidateInfo> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let candidate_id: i64 = candidate.candidate_id?;
            let sub_candidates: Vec<SubCandidateInfo> = sub_candidates
                .iter()
                .filter(|sub| sub.candidate_id == candidate_id)
                .filter_map(|sub| {
                    Some(SubCandidateInfo {
                        sub_candidate_id: sub.sub_candidate_id?,
                        name: sub.name.clone(),
                        photo_url: sub.photo_url.clone(),
                        description: sub.description.clone(),
                    })
                })
                .collect();
            Some(CandidateInfo {
                candidate_id,
                name: candidate.name,
                photo_url: candidate.photo_url,
                description: candidate.description,
                sub_candidates,
            })
        })
        .collect()
}

/// Creates a room owned by `admin`.
///
/// `wild_limited` rooms need a positive `voters_limit`, which counts against
/// the admin's voter quota immediately. `wild_unlimited` rooms need both
/// window bounds.
///
/// # Errors
///
/// - `InvalidInput` if a field is missing or malformed
/// - `QuotaExceeded` if the admin is at `max_room` or the limit does not fit
pub fn create_room(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    request: &CreateRoomRequest,
) -> Result<CreateRoomResponse, ApiError> {
    let voters_type: VotersType = VotersType::from_str(&request.voters_type)?;
    let status: RoomStatus = request
        .status
        .as_deref()
        .map_or(Ok(RoomStatus::Enabled), RoomStatus::from_str)?;
    let publish_state: PublishState = request
        .publish_state
        .as_deref()
        .map_or(Ok(PublishState::Published), PublishState::from_str)?;

    let room: Room = Room {
        room_id: None,
        admin_id: admin.admin_id,
        name: request.name.trim().to_string(),
        voters_type,
        voters_limit: request.voters_limit,
        session_start: request.session_start,
        session_end: request.session_end,
        status,
        publish_state,
        session_state: SessionState::Open,
    };
    room.validate()?;

    let room_id: i64 = persistence.create_room_with_quota(&room, clock.now())?;

    Ok(CreateRoomResponse {
        room_id,
        name: room.name,
        voters_type: voters_type.to_string(),
        status: status.to_string(),
        publish_state: publish_state.to_string(),
        session_state: room.session_state.to_string(),
    })
}

/// Closes a room's voting session by hand.
///
/// Closing an already-closed session succeeds and reports no change.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
pub fn close_room_session(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    room_id: i64,
) -> Result<CloseSessionResponse, ApiError> {
    let room: Room = load_owned_room(persistence, admin, room_id)?;
    if room.session_state == SessionState::Open {
        room.session_state.transition_to(SessionState::Closed)?;
    }

    let changed: bool = persistence.close_room_session(room_id)?;
    if changed {
        info!(room_id, admin_id = admin.admin_id, "Session closed by admin");
    }

    Ok(CloseSessionResponse {
        room_id,
        session_state: SessionState::Closed.to_string(),
        changed,
    })
}

/// Adds a candidate to a room.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
/// - `InvalidInput` if the name is blank
pub fn create_candidate(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    room_id: i64,
    request: &CreateCandidateRequest,
) -> Result<CreatedResponse, ApiError> {
    load_owned_room(persistence, admin, room_id)?;
    validate_candidate_name(&request.name)?;

    let candidate: Candidate = Candidate {
        candidate_id: None,
        room_id,
        name: request.name.trim().to_string(),
        photo_url: request.photo_url.clone(),
        description: request.description.clone(),
    };
    let candidate_id: i64 = persistence.create_candidate(&candidate, clock.now())?;

    Ok(CreatedResponse {
        id: candidate_id,
        message: format!("Candidate '{}' added", candidate.name),
    })
}

/// Adds a sub-candidate under a candidate.
///
/// # Errors
///
/// - `ResourceNotFound` if the candidate or its room does not exist
/// - `Forbidden` if another admin owns the room
/// - `InvalidInput` if the name is blank
pub fn create_sub_candidate(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    candidate_id: i64,
    request: &CreateSubCandidateRequest,
) -> Result<CreatedResponse, ApiError> {
    let candidate: Candidate = persistence
        .get_candidate(candidate_id)?
        .ok_or(DomainError::CandidateNotFound(candidate_id))?;
    load_owned_room(persistence, admin, candidate.room_id)?;
    validate_candidate_name(&request.name)?;

    let sub_candidate: SubCandidate = SubCandidate {
        sub_candidate_id: None,
        candidate_id,
        name: request.name.trim().to_string(),
        photo_url: request.photo_url.clone(),
        description: request.description.clone(),
    };
    let sub_candidate_id: i64 = persistence.create_sub_candidate(&sub_candidate, clock.now())?;

    Ok(CreatedResponse {
        id: sub_candidate_id,
        message: format!("Sub-candidate '{}' added", sub_candidate.name),
    })
}

/// Lists a room's candidates with their sub-candidates.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
pub fn list_candidates(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    room_id: i64,
) -> Result<ListCandidatesResponse, ApiError> {
    load_owned_room(persistence, admin, room_id)?;
    let candidates: Vec<Candidate> = persistence.list_candidates(room_id)?;
    let sub_candidates: Vec<SubCandidate> = persistence.list_sub_candidates(room_id)?;

    Ok(ListCandidatesResponse {
        room_id,
        candidates: candidate_infos(candidates, &sub_candidates),
    })
}
