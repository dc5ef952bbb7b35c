// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// How a room decides who may vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotersType {
    /// Each voter redeems a pre-issued ticket code exactly once.
    CustomTickets,
    /// Anyone may vote until `voters_limit` votes have been recorded.
    WildLimited,
    /// Anyone may vote while the session window is active.
    WildUnlimited,
}

impl FromStr for VotersType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom_tickets" => Ok(Self::CustomTickets),
            "wild_limited" => Ok(Self::WildLimited),
            "wild_unlimited" => Ok(Self::WildUnlimited),
            _ => Err(DomainError::InvalidVotersType(s.to_string())),
        }
    }
}

impl std::fmt::Display for VotersType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl VotersType {
    /// Converts this voters type to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CustomTickets => "custom_tickets",
            Self::WildLimited => "wild_limited",
            Self::WildUnlimited => "wild_unlimited",
        }
    }

    /// Returns whether voters must present a ticket code.
    #[must_use]
    pub const fn requires_ticket(&self) -> bool {
        matches!(self, Self::CustomTickets)
    }
}

/// Whether a room is accepting any activity at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Enabled,
    Disabled,
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            _ => Err(DomainError::InvalidRoomStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RoomStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

/// Whether a room is visible to voters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    #[default]
    Draft,
    Published,
}

impl FromStr for PublishState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(DomainError::InvalidPublishState(s.to_string())),
        }
    }
}

impl std::fmt::Display for PublishState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PublishState {
    /// Converts this publish state to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// The voting session lifecycle of a room.
///
/// A session starts `Open` and may only ever move to `Closed`.
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Open,
    Closed,
}

impl FromStr for SessionState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidSessionState(s.to_string())),
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SessionState {
    /// Converts this session state to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// The only valid transition is `Open` → `Closed`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Open, Self::Closed))
    }

    /// Validates a transition, returning an error if the lifecycle forbids it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSessionTransition` for any transition
    /// other than `Open` → `Closed`.
    pub fn transition_to(self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(DomainError::InvalidSessionTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

/// A voting room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Store-assigned identifier. `None` until persisted.
    pub room_id: Option<i64>,
    /// The owning admin.
    pub admin_id: i64,
    pub name: String,
    pub voters_type: VotersType,
    /// Vote ceiling. Required and positive for `wild_limited`.
    pub voters_limit: Option<i64>,
    /// Inclusive start of the voting window for `wild_unlimited`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub session_start: Option<OffsetDateTime>,
    /// Inclusive end of the voting window for `wild_unlimited`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub session_end: Option<OffsetDateTime>,
    pub status: RoomStatus,
    pub publish_state: PublishState,
    pub session_state: SessionState,
}

impl Room {
    /// Validates the room against the rules of its voters type.
    ///
    /// # Errors
    ///
    /// - `InvalidRoomName` if the name is blank
    /// - `VotersLimitRequired` if a `wild_limited` room has no positive limit
    /// - `VotersLimitNotAllowed` if any other room carries a limit
    /// - `SessionRangeRequired` if a `wild_unlimited` room lacks either bound
    /// - `SessionRangeNotAllowed` if any other room carries a window bound
    /// - `InvalidSessionRange` if the window ends before it starts
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidRoomName);
        }
        if self.voters_type != VotersType::WildLimited && self.voters_limit.is_some() {
            return Err(DomainError::VotersLimitNotAllowed(self.voters_type));
        }
        if self.voters_type != VotersType::WildUnlimited
            && (self.session_start.is_some() || self.session_end.is_some())
        {
            return Err(DomainError::SessionRangeNotAllowed(self.voters_type));
        }

        match self.voters_type {
            VotersType::CustomTickets => Ok(()),
            VotersType::WildLimited => match self.voters_limit {
                Some(limit) if limit > 0 => Ok(()),
                _ => Err(DomainError::VotersLimitRequired),
            },
            VotersType::WildUnlimited => match (self.session_start, self.session_end) {
                (Some(start), Some(end)) if end < start => Err(DomainError::InvalidSessionRange),
                (Some(_), Some(_)) => Ok(()),
                _ => Err(DomainError::SessionRangeRequired),
            },
        }
    }

    /// Returns whether `now` falls inside the room's voting window.
    ///
    /// Only `wild_unlimited` rooms carry a window; every other voters type
    /// is always active. Both bounds are inclusive.
    #[must_use]
    pub fn is_session_active(&self, now: OffsetDateTime) -> bool {
        if self.voters_type != VotersType::WildUnlimited {
            return true;
        }
        match (self.session_start, self.session_end) {
            (Some(start), Some(end)) => start <= now && now <= end,
            _ => false,
        }
    }

    /// The voter capacity this room contributes to its admin's quota at
    /// creation time.
    ///
    /// `custom_tickets` rooms contribute when tickets are issued and
    /// `wild_unlimited` rooms never contribute.
    #[must_use]
    pub fn projected_voter_capacity(&self) -> i64 {
        match self.voters_type {
            VotersType::WildLimited => self.voters_limit.unwrap_or(0),
            VotersType::CustomTickets | VotersType::WildUnlimited => 0,
        }
    }
}

/// A candidate within a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: Option<i64>,
    pub room_id: i64,
    pub name: String,
    pub photo_url: String,
    pub description: String,
}

/// A running mate or sub-option attached to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCandidate {
    pub sub_candidate_id: Option<i64>,
    pub candidate_id: i64,
    pub name: String,
    pub photo_url: String,
    pub description: Option<String>,
}

/// A single-use voting ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: i64,
    pub room_id: i64,
    pub code: String,
    pub is_used: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub used_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub vote_id: Option<i64>,
    pub room_id: i64,
    pub candidate_id: i64,
    pub sub_candidate_id: Option<i64>,
    /// The ticket code or a minted `voter_` token.
    pub voter_identifier: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An admin's ceilings and current usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUsage {
    pub max_room: i64,
    pub max_voters: i64,
    pub room_count: i64,
    pub voter_count: i64,
}

/// A vote total for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub candidate_id: i64,
    pub candidate_name: String,
    pub vote_count: i64,
    /// When the most recent vote for this candidate was recorded.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_vote_at: Option<OffsetDateTime>,
}
