// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Voter
// ============================================================================

/// A sub-candidate as shown to voters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCandidateInfo {
    pub sub_candidate_id: i64,
    pub name: String,
    pub photo_url: String,
    pub description: Option<String>,
}

/// A candidate as shown to voters, with its sub-candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub candidate_id: i64,
    pub name: String,
    pub photo_url: String,
    pub description: String,
    pub sub_candidates: Vec<SubCandidateInfo>,
}

/// The voter-facing view of an open room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRoomInfoResponse {
    pub room_id: i64,
    pub name: String,
    pub voters_type: String,
    /// Whether a ticket code must accompany a vote.
    pub requires_ticket: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub session_start: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub session_end: Option<OffsetDateTime>,
    pub candidates: Vec<CandidateInfo>,
    pub message: String,
}

/// Request to cast a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVoteRequest {
    pub room_id: i64,
    pub candidate_id: i64,
    #[serde(default)]
    pub sub_candidate_id: Option<i64>,
    /// Required for `custom_tickets` rooms, ignored otherwise.
    #[serde(default)]
    pub ticket_code: Option<String>,
}

/// Response for a recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVoteResponse {
    pub vote_id: i64,
    pub room_id: i64,
    pub candidate_id: i64,
    pub sub_candidate_id: Option<i64>,
    /// The identifier the vote was recorded under.
    pub voter_identifier: String,
    /// Whether this vote closed the room's session.
    pub session_closed: bool,
    pub message: String,
}

/// Request to check a ticket before voting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyTicketRequest {
    pub room_id: i64,
    pub code: String,
}

/// Response for a ticket that can be redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyTicketResponse {
    pub valid: bool,
    pub message: String,
}

// ============================================================================
// Authentication
// ============================================================================

/// Request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub admin_id: i64,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

// ============================================================================
// Owner: admin accounts
// ============================================================================

/// Request to create an admin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
    pub max_room: i64,
    pub max_voters: i64,
}

/// Request to change an admin account. Omitted fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAdminRequest {
    #[serde(default)]
    pub max_room: Option<i64>,
    #[serde(default)]
    pub max_voters: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// An admin account as the owner sees it. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminInfo {
    pub admin_id: i64,
    pub username: String,
    pub max_room: i64,
    pub max_voters: i64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// ============================================================================
// Rooms and candidates
// ============================================================================

/// Request to create a room.
///
/// New rooms start `enabled`, `published` and `open` unless the request
/// says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub voters_type: String,
    #[serde(default)]
    pub voters_limit: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub session_start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub session_end: Option<OffsetDateTime>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub publish_state: Option<String>,
}

/// Response for a created room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room_id: i64,
    pub name: String,
    pub voters_type: String,
    pub status: String,
    pub publish_state: String,
    pub session_state: String,
}

/// Response for a session close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseSessionResponse {
    pub room_id: i64,
    pub session_state: String,
    /// `false` when the session was already closed.
    pub changed: bool,
}

/// Request to add a candidate to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCandidateRequest {
    pub name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub description: String,
}

/// Request to add a sub-candidate to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubCandidateRequest {
    pub name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for a created candidate or sub-candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: String,
}

/// The candidates of a room, as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCandidatesResponse {
    pub room_id: i64,
    pub candidates: Vec<CandidateInfo>,
}

// ============================================================================
// Tickets
// ============================================================================

/// Request to issue one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub code: String,
}

/// Request to issue a batch of tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketsBulkRequest {
    pub codes: Vec<String>,
}

/// A ticket as shown to the room owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketInfo {
    pub ticket_id: i64,
    pub code: String,
    pub is_used: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub used_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A list of tickets in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketsResponse {
    pub room_id: i64,
    pub tickets: Vec<TicketInfo>,
}

// ============================================================================
// Quota and tallies
// ============================================================================

/// An admin's ceilings, usage and headroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaResponse {
    pub max_room: i64,
    pub max_voters: i64,
    pub room_count: i64,
    pub voter_count: i64,
    pub remaining_rooms: i64,
    pub remaining_voters: i64,
}

/// Vote count for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTallyInfo {
    pub candidate_id: i64,
    pub candidate_name: String,
    pub vote_count: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_vote_at: Option<OffsetDateTime>,
}

/// Vote counts for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResponse {
    pub room_id: i64,
    pub session_state: String,
    pub total_votes: i64,
    pub candidates: Vec<CandidateTallyInfo>,
}
