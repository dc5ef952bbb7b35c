// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Voter eligibility rules.
//!
//! These functions decide, from a room snapshot and the current time, which
//! policy governs a vote and whether it can proceed at all. They never touch
//! the store. The final word on ticket redemption and the vote ceiling
//! belongs to the store's atomic write; the checks here are early exits.

use pemilo_domain::{DomainError, PublishState, Room, RoomStatus, SessionState, VotersType};
use time::OffsetDateTime;

use crate::error::CoreError;

/// Prefix for identifiers minted for ticketless voters.
pub const VOTER_IDENTIFIER_PREFIX: &str = "voter_";

/// The eligibility policy a vote must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoterPolicy {
    /// Redeem the given ticket code, which is also the voter identifier.
    Ticket {
        /// The ticket code presented by the voter.
        code: String,
    },
    /// Admit the vote only while fewer than `limit` votes exist.
    Limited {
        /// The room's vote ceiling.
        limit: i64,
    },
    /// Admit the vote; the window has already been checked.
    Unlimited,
}

impl VoterPolicy {
    /// Returns the voter identifier this policy votes under.
    ///
    /// Ticket votes use the code itself. Other policies mint a fresh token.
    #[must_use]
    pub fn voter_identifier(&self) -> String {
        match self {
            Self::Ticket { code } => code.clone(),
            Self::Limited { .. } | Self::Unlimited => mint_voter_identifier(),
        }
    }
}

/// Checks the preconditions shared by every voters type.
///
/// The order is fixed: status, then publish state, then session state.
///
/// # Errors
///
/// - `RoomDisabled` if the room is disabled
/// - `RoomNotPublished` if the room is still a draft
/// - `SessionClosed` if the session has closed
pub const fn check_room_accepts_votes(room: &Room) -> Result<(), DomainError> {
    if matches!(room.status, RoomStatus::Disabled) {
        return Err(DomainError::RoomDisabled);
    }
    if matches!(room.publish_state, PublishState::Draft) {
        return Err(DomainError::RoomNotPublished);
    }
    if matches!(room.session_state, SessionState::Closed) {
        return Err(DomainError::SessionClosed);
    }
    Ok(())
}

/// Checks whether the room is open to voters right now.
///
/// This is the check behind the voter-facing room view: the shared
/// preconditions plus the voting window for `wild_unlimited` rooms.
///
/// # Errors
///
/// Any error from [`check_room_accepts_votes`], or `SessionNotActive` when a
/// `wild_unlimited` room is outside its window.
pub fn check_room_open_for_voters(room: &Room, now: OffsetDateTime) -> Result<(), DomainError> {
    check_room_accepts_votes(room)?;
    if !room.is_session_active(now) {
        return Err(DomainError::SessionNotActive);
    }
    Ok(())
}

/// Selects the voter policy for a vote in `room`.
///
/// # Arguments
///
/// * `room` - The room snapshot
/// * `ticket_code` - The ticket code supplied by the voter, if any
/// * `now` - The current instant
///
/// # Errors
///
/// - Any error from [`check_room_accepts_votes`]
/// - `TicketRequired` if a `custom_tickets` room receives no code or a blank one
/// - `VotersLimitRequired` if a `wild_limited` room has no limit stored
/// - `SessionNotActive` if a `wild_unlimited` room is outside its window
pub fn resolve_voter_policy(
    room: &Room,
    ticket_code: Option<&str>,
    now: OffsetDateTime,
) -> Result<VoterPolicy, CoreError> {
    check_room_accepts_votes(room)?;

    match room.voters_type {
        VotersType::CustomTickets => match ticket_code {
            Some(code) if !code.is_empty() => Ok(VoterPolicy::Ticket {
                code: code.to_string(),
            }),
            _ => Err(DomainError::TicketRequired.into()),
        },
        VotersType::WildLimited => room
            .voters_limit
            .map(|limit| VoterPolicy::Limited { limit })
            .ok_or_else(|| DomainError::VotersLimitRequired.into()),
        VotersType::WildUnlimited => {
            if room.is_session_active(now) {
                Ok(VoterPolicy::Unlimited)
            } else {
                Err(DomainError::SessionNotActive.into())
            }
        }
    }
}

/// Mints a fresh identifier for a ticketless voter.
///
/// The identifier is the prefix followed by 16 random bytes in lowercase hex.
#[must_use]
pub fn mint_voter_identifier() -> String {
    format!("{VOTER_IDENTIFIER_PREFIX}{:032x}", rand::random::<u128>())
}
