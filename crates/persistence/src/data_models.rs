// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored admin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminData {
    pub admin_id: i64,
    pub username: String,
    /// bcrypt hash. Never serialized out of the process.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub max_room: i64,
    pub max_voters: i64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Changes to an admin account. `None` leaves the field as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminUpdate {
    pub max_room: Option<i64>,
    pub max_voters: Option<i64>,
    pub is_active: Option<bool>,
}

/// A stored admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub admin_id: i64,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// A recorded login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttemptData {
    pub attempt_id: i64,
    pub identifier: String,
    pub attempt_at: OffsetDateTime,
    pub success: bool,
}

/// Result of admitting a vote into a `wild_limited` room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitedVoteOutcome {
    /// The new vote's identifier.
    pub vote_id: i64,
    /// Votes recorded in the room after this one.
    pub total_votes: i64,
    /// Whether this vote closed the session.
    pub session_closed: bool,
}
