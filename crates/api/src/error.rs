// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use pemilo::CoreError;
use pemilo_domain::{DomainError, ErrorCategory};
use pemilo_persistence::PersistenceError;
use thiserror::Error;
use tracing::error;

use crate::password_policy::PasswordPolicyError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The request conflicts with the current state of a room, ticket or vote.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An admin ceiling would be exceeded.
    #[error("Quota exceeded: {message}")]
    QuotaExceeded {
        /// A human-readable description of the ceiling.
        message: String,
    },
    /// Too many failed login attempts.
    #[error("Rate limited: {message}")]
    RateLimited {
        /// Seconds until another attempt will be considered.
        retry_after_secs: i64,
        /// A human-readable description.
        message: String,
    },
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The authenticated admin may not act on this resource.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// A human-readable description.
        message: String,
    },
    /// The store could not complete the request.
    #[error("Service unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("password"),
            message: err.to_string(),
        }
    }
}

/// Names the field, rule or resource a domain error is about.
///
/// For not-found errors this is the resource type, for validation failures
/// the offending field, and for state conflicts the rule that was broken.
const fn subject(err: &DomainError) -> &'static str {
    match err {
        DomainError::RoomNotFound(_) => "Room",
        DomainError::CandidateNotFound(_) => "Candidate",
        DomainError::SubCandidateNotFound(_) => "Sub-candidate",
        DomainError::AdminNotFound(_) => "Admin",
        DomainError::InvalidTicket => "Ticket",
        DomainError::InvalidRoomName => "name",
        DomainError::InvalidVotersType(_) => "voters_type",
        DomainError::VotersLimitRequired | DomainError::VotersLimitNotAllowed(_) => "voters_limit",
        DomainError::SessionRangeRequired
        | DomainError::SessionRangeNotAllowed(_)
        | DomainError::InvalidSessionRange => "session_range",
        DomainError::InvalidRoomStatus(_) => "status",
        DomainError::InvalidPublishState(_) => "publish_state",
        DomainError::InvalidSessionState(_) => "session_state",
        DomainError::InvalidCandidateName => "candidate_name",
        DomainError::TicketRequired => "ticket_code",
        DomainError::InvalidTicketCode | DomainError::EmptyTicketBatch => "codes",
        DomainError::InvalidVoterCapacity(_) => "voter_capacity",
        DomainError::InvalidUsername => "username",
        DomainError::InvalidQuota { field, .. } => *field,
        DomainError::RoomDisabled => "room_enabled",
        DomainError::RoomNotPublished => "room_published",
        DomainError::SessionClosed => "session_open",
        DomainError::SessionNotActive => "session_window",
        DomainError::InvalidSessionTransition { .. } => "session_lifecycle",
        DomainError::TicketAlreadyUsed => "single_use_ticket",
        DomainError::TicketDuplicate { .. } => "unique_ticket_code",
        DomainError::VoterAlreadyVoted => "one_vote_per_voter",
        DomainError::VoteLimitReached => "vote_limit",
        DomainError::AdminExists(_) => "unique_username",
        DomainError::MaxRoomExceeded { .. } => "max_room",
        DomainError::MaxVotersExceeded { .. } => "max_voters",
        DomainError::RateLimitExceeded { .. } => "login_throttle",
        DomainError::InvalidCredentials | DomainError::AdminInactive => "credentials",
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err.category() {
        ErrorCategory::NotFound => ApiError::ResourceNotFound {
            resource_type: String::from(subject(&err)),
            message,
        },
        ErrorCategory::ValidationFailure => ApiError::InvalidInput {
            field: String::from(subject(&err)),
            message,
        },
        ErrorCategory::StateConflict => ApiError::DomainRuleViolation {
            rule: String::from(subject(&err)),
            message,
        },
        ErrorCategory::QuotaExceeded => ApiError::QuotaExceeded { message },
        ErrorCategory::RateLimited => {
            let retry_after_secs: i64 = match err {
                DomainError::RateLimitExceeded { remaining } => remaining.whole_seconds(),
                _ => 0,
            };
            ApiError::RateLimited {
                retry_after_secs,
                message,
            }
        }
        ErrorCategory::CredentialFailure => ApiError::AuthenticationFailed { reason: message },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Typed rejections raised inside a store transaction keep their domain
/// meaning. Every other store failure becomes `Unavailable`; the caller may
/// retry, nothing is retried here.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        other => {
            error!(error = %other, "Store operation failed");
            ApiError::Unavailable {
                message: other.to_string(),
            }
        }
    }
}
