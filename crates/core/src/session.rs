// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pemilo_domain::{Room, SessionState, VotersType};

/// Returns whether a room's session should close given its vote total.
///
/// Only `wild_limited` rooms close automatically, once the total reaches the
/// limit. Rooms that are already closed never need closing again.
#[must_use]
pub const fn should_close_session(room: &Room, total_votes: i64) -> bool {
    if matches!(room.session_state, SessionState::Closed) {
        return false;
    }
    match (room.voters_type, room.voters_limit) {
        (VotersType::WildLimited, Some(limit)) => total_votes >= limit,
        _ => false,
    }
}

/// Returns whether `total_votes` has used up a `wild_limited` room's limit,
/// whatever its session state.
#[must_use]
pub const fn limit_reached(limit: i64, total_votes: i64) -> bool {
    total_votes >= limit
}
