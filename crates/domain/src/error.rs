// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use crate::types::VotersType;

/// Broad classification of a [`DomainError`].
///
/// Callers at the API boundary use this to choose a response shape
/// without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The referenced entity does not exist.
    NotFound,
    /// The input is malformed or incomplete.
    ValidationFailure,
    /// The request conflicts with the current state of the room, ticket or vote.
    StateConflict,
    /// An admin ceiling would be exceeded.
    QuotaExceeded,
    /// Too many recent failed attempts.
    RateLimited,
    /// The supplied credentials were rejected.
    CredentialFailure,
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Room does not exist.
    RoomNotFound(i64),
    /// Room status is `disabled`.
    RoomDisabled,
    /// Room is still a draft.
    RoomNotPublished,
    /// Room session has been closed.
    SessionClosed,
    /// The current time is outside the room's voting window.
    SessionNotActive,
    /// A session state transition that the lifecycle forbids.
    InvalidSessionTransition {
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
    },
    /// Room name is empty.
    InvalidRoomName,
    /// Unknown voters type, or an operation that the room's voters type
    /// does not support (e.g. issuing tickets for a `wild_limited` room).
    InvalidVotersType(String),
    /// A `wild_limited` room without a positive limit.
    VotersLimitRequired,
    /// A voters limit on a room that is not `wild_limited`.
    VotersLimitNotAllowed(VotersType),
    /// A `wild_unlimited` room without both window bounds.
    SessionRangeRequired,
    /// A window bound on a room that is not `wild_unlimited`.
    SessionRangeNotAllowed(VotersType),
    /// Window end precedes window start.
    InvalidSessionRange,
    /// Unknown room status value.
    InvalidRoomStatus(String),
    /// Unknown publish state value.
    InvalidPublishState(String),
    /// Unknown session state value.
    InvalidSessionState(String),
    /// Candidate does not exist in the room.
    CandidateNotFound(i64),
    /// Sub-candidate does not exist under the candidate.
    SubCandidateNotFound(i64),
    /// Candidate name is empty.
    InvalidCandidateName,
    /// A ticket code is required to vote in this room.
    TicketRequired,
    /// The ticket code does not exist in this room.
    InvalidTicket,
    /// The ticket has already been redeemed.
    TicketAlreadyUsed,
    /// A ticket code is empty or contains only whitespace.
    InvalidTicketCode,
    /// A bulk ticket request contained no codes.
    EmptyTicketBatch,
    /// A ticket code already exists in the room or repeats within the batch.
    TicketDuplicate {
        /// The offending code.
        code: String,
    },
    /// The voter identifier already has a vote in this room.
    VoterAlreadyVoted,
    /// The room's vote ceiling has been reached.
    VoteLimitReached,
    /// The admin already owns `max_room` rooms.
    MaxRoomExceeded {
        /// The admin's room ceiling.
        max_room: i64,
    },
    /// Admitting more voter capacity would exceed `max_voters`.
    MaxVotersExceeded {
        /// The admin's voter ceiling.
        max_voters: i64,
        /// The capacity that would result.
        projected: i64,
    },
    /// Requested voter capacity is negative.
    InvalidVoterCapacity(i64),
    /// The login identifier is locked out.
    RateLimitExceeded {
        /// Time until the lockout expires.
        remaining: Duration,
    },
    /// Username or password did not match.
    InvalidCredentials,
    /// The admin account is deactivated.
    AdminInactive,
    /// Admin does not exist.
    AdminNotFound(i64),
    /// An admin with this username already exists.
    AdminExists(String),
    /// Username is empty.
    InvalidUsername,
    /// Admin quota values must be non-negative.
    InvalidQuota {
        /// The field that was invalid.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
}

impl DomainError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::RoomNotFound(_)
            | Self::CandidateNotFound(_)
            | Self::SubCandidateNotFound(_)
            | Self::AdminNotFound(_)
            | Self::InvalidTicket => ErrorCategory::NotFound,
            Self::InvalidRoomName
            | Self::InvalidVotersType(_)
            | Self::VotersLimitRequired
            | Self::VotersLimitNotAllowed(_)
            | Self::SessionRangeRequired
            | Self::SessionRangeNotAllowed(_)
            | Self::InvalidSessionRange
            | Self::InvalidRoomStatus(_)
            | Self::InvalidPublishState(_)
            | Self::InvalidSessionState(_)
            | Self::InvalidCandidateName
            | Self::TicketRequired
            | Self::InvalidTicketCode
            | Self::EmptyTicketBatch
            | Self::InvalidVoterCapacity(_)
            | Self::InvalidUsername
            | Self::InvalidQuota { .. } => ErrorCategory::ValidationFailure,
            Self::RoomDisabled
            | Self::RoomNotPublished
            | Self::SessionClosed
            | Self::SessionNotActive
            | Self::InvalidSessionTransition { .. }
            | Self::TicketAlreadyUsed
            | Self::TicketDuplicate { .. }
            | Self::VoterAlreadyVoted
            | Self::VoteLimitReached
            | Self::AdminExists(_) => ErrorCategory::StateConflict,
            Self::MaxRoomExceeded { .. } | Self::MaxVotersExceeded { .. } => {
                ErrorCategory::QuotaExceeded
            }
            Self::RateLimitExceeded { .. } => ErrorCategory::RateLimited,
            Self::InvalidCredentials | Self::AdminInactive => ErrorCategory::CredentialFailure,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoomNotFound(id) => write!(f, "Room {id} not found"),
            Self::RoomDisabled => write!(f, "Room is disabled"),
            Self::RoomNotPublished => write!(f, "Room is not published"),
            Self::SessionClosed => write!(f, "Voting session is closed"),
            Self::SessionNotActive => write!(f, "Voting session is not active"),
            Self::InvalidSessionTransition { from, to } => {
                write!(f, "Invalid session transition from '{from}' to '{to}'")
            }
            Self::InvalidRoomName => write!(f, "Room name is required"),
            Self::InvalidVotersType(value) => write!(f, "Invalid voters type: {value}"),
            Self::VotersLimitRequired => {
                write!(f, "Voters limit is required for wild_limited rooms")
            }
            Self::VotersLimitNotAllowed(voters_type) => {
                write!(f, "Voters limit only applies to wild_limited rooms, not {voters_type}")
            }
            Self::SessionRangeRequired => {
                write!(f, "Session time range is required for wild_unlimited rooms")
            }
            Self::SessionRangeNotAllowed(voters_type) => write!(
                f,
                "Session time range only applies to wild_unlimited rooms, not {voters_type}"
            ),
            Self::InvalidSessionRange => {
                write!(f, "Session end time must not be before start time")
            }
            Self::InvalidRoomStatus(value) => write!(f, "Invalid room status: {value}"),
            Self::InvalidPublishState(value) => write!(f, "Invalid publish state: {value}"),
            Self::InvalidSessionState(value) => write!(f, "Invalid session state: {value}"),
            Self::CandidateNotFound(id) => write!(f, "Candidate {id} not found"),
            Self::SubCandidateNotFound(id) => write!(f, "Sub-candidate {id} not found"),
            Self::InvalidCandidateName => write!(f, "Candidate name is required"),
            Self::TicketRequired => write!(f, "Ticket code is required for this room"),
            Self::InvalidTicket => write!(f, "Invalid ticket code"),
            Self::TicketAlreadyUsed => write!(f, "Ticket has already been used"),
            Self::InvalidTicketCode => write!(f, "Ticket code must not be empty"),
            Self::EmptyTicketBatch => write!(f, "At least one ticket code is required"),
            Self::TicketDuplicate { code } => {
                write!(f, "Ticket code '{code}' already exists in this room")
            }
            Self::VoterAlreadyVoted => write!(f, "Voter has already voted in this room"),
            Self::VoteLimitReached => write!(f, "Vote limit has been reached for this room"),
            Self::MaxRoomExceeded { max_room } => {
                write!(f, "Maximum room quota exceeded (limit {max_room})")
            }
            Self::MaxVotersExceeded {
                max_voters,
                projected,
            } => write!(
                f,
                "Maximum voters quota exceeded ({projected} requested, limit {max_voters})"
            ),
            Self::InvalidVoterCapacity(value) => {
                write!(f, "Voter capacity must not be negative, got {value}")
            }
            Self::RateLimitExceeded { remaining } => write!(
                f,
                "Too many failed login attempts, try again in {}s",
                remaining.whole_seconds()
            ),
            Self::InvalidCredentials => write!(f, "Invalid username or password"),
            Self::AdminInactive => write!(f, "Admin account is inactive"),
            Self::AdminNotFound(id) => write!(f, "Admin {id} not found"),
            Self::AdminExists(username) => write!(f, "Admin '{username}' already exists"),
            Self::InvalidUsername => write!(f, "Username is required"),
            Self::InvalidQuota { field, value } => {
                write!(f, "Invalid {field}: {value} (must not be negative)")
            }
        }
    }
}

impl std::error::Error for DomainError {}
