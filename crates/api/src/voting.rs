// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote casting and tallies.
//!
//! `cast_vote` runs the eligibility checks as early exits and then hands the
//! vote to a single store transaction chosen by the room's voter policy. The
//! store transaction is what enforces ticket single-use, one vote per voter
//! and the vote ceiling; the early exits only save a write.

use pemilo::{
    Clock, VoterPolicy, check_room_accepts_votes, check_room_open_for_voters, limit_reached,
    resolve_voter_policy, should_close_session,
};
use pemilo_domain::{
    Candidate, CandidateTally, DomainError, Room, SubCandidate, Ticket, Vote, VotersType,
};
use pemilo_persistence::{LimitedVoteOutcome, Persistence, PersistenceError};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::AuthenticatedAdmin;
use crate::error::ApiError;
use crate::request_response::{
    CandidateTallyInfo, CastVoteRequest, CastVoteResponse, TallyResponse, VoterRoomInfoResponse,
};
use crate::rooms::{candidate_infos, load_owned_room};

fn load_room(persistence: &mut Persistence, room_id: i64) -> Result<Room, ApiError> {
    persistence
        .get_room(room_id)?
        .ok_or_else(|| DomainError::RoomNotFound(room_id).into())
}

/// Returns the voter-facing view of a room.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `DomainRuleViolation` if the room is disabled, unpublished, closed or
///   outside its voting window
pub fn get_voter_room_info(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    room_id: i64,
) -> Result<VoterRoomInfoResponse, ApiError> {
    let room: Room = load_room(persistence, room_id)?;
    check_room_open_for_voters(&room, clock.now())?;

    let candidates: Vec<Candidate> = persistence.list_candidates(room_id)?;
    let sub_candidates: Vec<SubCandidate> = persistence.list_sub_candidates(room_id)?;
    let requires_ticket: bool = room.voters_type.requires_ticket();
    let message: String = if requires_ticket {
        String::from("Enter your ticket code to vote")
    } else {
        String::from("Choose a candidate to vote")
    };

    Ok(VoterRoomInfoResponse {
        room_id,
        name: room.name,
        voters_type: room.voters_type.to_string(),
        requires_ticket,
        session_start: room.session_start,
        session_end: room.session_end,
        candidates: candidate_infos(candidates, &sub_candidates),
        message,
    })
}

/// Checks that the candidate, and the sub-candidate if one is given, belong
/// to the room.
fn check_ballot(persistence: &mut Persistence, request: &CastVoteRequest) -> Result<(), ApiError> {
    let candidate: Candidate = persistence
        .get_candidate(request.candidate_id)?
        .filter(|candidate| candidate.room_id == request.room_id)
        .ok_or(DomainError::CandidateNotFound(request.candidate_id))?;

    if let Some(sub_candidate_id) = request.sub_candidate_id {
        persistence
            .get_sub_candidate(sub_candidate_id)?
            .filter(|sub| Some(sub.candidate_id) == candidate.candidate_id)
            .ok_or(DomainError::SubCandidateNotFound(sub_candidate_id))?;
    }

    Ok(())
}

/// Closes the session of a `wild_limited` room that has no slot left and
/// reports the rejection.
fn reject_over_limit(persistence: &mut Persistence, room_id: i64) -> ApiError {
    match persistence.close_room_session(room_id) {
        Ok(true) => info!(room_id, "Session closed on over-limit vote"),
        Ok(false) => {}
        Err(err) => return err.into(),
    }
    DomainError::VoteLimitReached.into()
}

/// Checks the preconditions every vote shares.
///
/// A `wild_limited` room whose session is closed because it is full reports
/// the limit rather than the closed session, and the close is reapplied.
fn check_accepts_votes(
    persistence: &mut Persistence,
    room: &Room,
    room_id: i64,
) -> Result<(), ApiError> {
    match check_room_accepts_votes(room) {
        Ok(()) => Ok(()),
        Err(DomainError::SessionClosed) if room.voters_type == VotersType::WildLimited => {
            let total_votes: i64 = persistence.count_votes(room_id)?;
            match room.voters_limit {
                Some(limit) if limit_reached(limit, total_votes) => {
                    Err(reject_over_limit(persistence, room_id))
                }
                _ => Err(DomainError::SessionClosed.into()),
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Casts a vote.
///
/// Checks run in a fixed order: the room exists, it is enabled, published
/// and open, the candidate (and sub-candidate) belong to it, and then the
/// room's voter policy decides how the vote is admitted:
///
/// - `custom_tickets`: the ticket is redeemed and the vote recorded together
/// - `wild_limited`: the vote takes a slot under the limit; the vote that
///   fills the last slot closes the session, and a vote turned away because
///   no slot is left closes it too
/// - `wild_unlimited`: the vote is recorded if the window is active
///
/// # Errors
///
/// - `ResourceNotFound` for an unknown room, candidate, sub-candidate or ticket
/// - `InvalidInput` for a missing ticket code
/// - `DomainRuleViolation` if the room does not accept votes, the ticket is
///   used, the voter already voted or the limit is reached
/// - `Unavailable` if the store fails
pub fn cast_vote(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    request: &CastVoteRequest,
) -> Result<CastVoteResponse, ApiError> {
    let now: OffsetDateTime = clock.now();
    let room: Room = load_room(persistence, request.room_id)?;
    check_accepts_votes(persistence, &room, request.room_id)?;
    check_ballot(persistence, request)?;

    let policy: VoterPolicy = resolve_voter_policy(&room, request.ticket_code.as_deref(), now)?;
    let vote: Vote = Vote {
        vote_id: None,
        room_id: request.room_id,
        candidate_id: request.candidate_id,
        sub_candidate_id: request.sub_candidate_id,
        voter_identifier: policy.voter_identifier(),
        created_at: now,
    };

    let (vote_id, session_closed): (i64, bool) = match &policy {
        VoterPolicy::Ticket { code } => {
            let ticket: Ticket = persistence
                .find_ticket_by_code(request.room_id, code)?
                .ok_or(DomainError::InvalidTicket)?;
            if ticket.is_used {
                return Err(DomainError::TicketAlreadyUsed.into());
            }
            (persistence.record_ticket_vote(ticket.ticket_id, &vote)?, false)
        }
        VoterPolicy::Limited { limit } => {
            let total_votes: i64 = persistence.count_votes(request.room_id)?;
            if should_close_session(&room, total_votes) {
                debug!(room_id = request.room_id, total_votes, limit, "Room is full");
                return Err(reject_over_limit(persistence, request.room_id));
            }
            match persistence.record_limited_vote(&vote) {
                Ok(LimitedVoteOutcome {
                    vote_id,
                    session_closed,
                    ..
                }) => (vote_id, session_closed),
                Err(PersistenceError::DomainViolation(DomainError::VoteLimitReached)) => {
                    return Err(reject_over_limit(persistence, request.room_id));
                }
                Err(err) => return Err(err.into()),
            }
        }
        VoterPolicy::Unlimited => (persistence.record_open_vote(&vote)?, false),
    };

    info!(
        vote_id,
        room_id = request.room_id,
        candidate_id = request.candidate_id,
        session_closed,
        "Vote cast"
    );

    let message: String = if session_closed {
        String::from("Vote recorded. The voting session is now closed")
    } else {
        String::from("Vote recorded")
    };

    Ok(CastVoteResponse {
        vote_id,
        room_id: request.room_id,
        candidate_id: request.candidate_id,
        sub_candidate_id: request.sub_candidate_id,
        voter_identifier: vote.voter_identifier,
        session_closed,
        message,
    })
}

fn tally_response(room: &Room, room_id: i64, tallies: Vec<CandidateTally>) -> TallyResponse {
    let total_votes: i64 = tallies.iter().map(|tally| tally.vote_count).sum();
    TallyResponse {
        room_id,
        session_state: room.session_state.to_string(),
        total_votes,
        candidates: tallies
            .into_iter()
            .map(|tally| CandidateTallyInfo {
                candidate_id: tally.candidate_id,
                candidate_name: tally.candidate_name,
                vote_count: tally.vote_count,
                last_vote_at: tally.last_vote_at,
            })
            .collect(),
    }
}

/// Returns live vote counts for every candidate in the room, ordered by
/// candidate id. Candidates without votes report zero.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
pub fn get_realtime_tally(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    room_id: i64,
) -> Result<TallyResponse, ApiError> {
    let room: Room = load_owned_room(persistence, admin, room_id)?;
    let tallies: Vec<CandidateTally> = persistence.realtime_tally(room_id)?;
    Ok(tally_response(&room, room_id, tallies))
}

/// Returns the ranked tally: candidates with votes, most votes first, ties
/// broken by candidate id.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
pub fn get_vote_tally(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    room_id: i64,
) -> Result<TallyResponse, ApiError> {
    let room: Room = load_owned_room(persistence, admin, room_id)?;
    let tallies: Vec<CandidateTally> = persistence.count_votes_by_candidate(room_id)?;
    Ok(tally_response(&room, room_id, tallies))
}
