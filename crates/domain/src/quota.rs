// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin quota arithmetic.
//!
//! These checks are pure. The persistence layer re-runs them inside the
//! same transaction that creates rooms or tickets, so the usage figures
//! they see are never stale.

use crate::error::DomainError;
use crate::types::AdminUsage;

/// Checks that the admin may create one more room.
///
/// # Errors
///
/// Returns `MaxRoomExceeded` if the admin already owns `max_room` rooms.
pub const fn check_room_quota(usage: &AdminUsage) -> Result<(), DomainError> {
    if usage.room_count >= usage.max_room {
        return Err(DomainError::MaxRoomExceeded {
            max_room: usage.max_room,
        });
    }
    Ok(())
}

/// Checks that `additional` voter capacity fits under the admin's ceiling.
///
/// Zero additional capacity always fits; the check is `current + additional
/// <= max_voters`.
///
/// # Errors
///
/// - `InvalidVoterCapacity` if `additional` is negative
/// - `MaxVotersExceeded` if the projected total exceeds `max_voters`
pub const fn check_voter_quota(usage: &AdminUsage, additional: i64) -> Result<(), DomainError> {
    if additional < 0 {
        return Err(DomainError::InvalidVoterCapacity(additional));
    }
    let projected: i64 = usage.voter_count.saturating_add(additional);
    if projected > usage.max_voters {
        return Err(DomainError::MaxVotersExceeded {
            max_voters: usage.max_voters,
            projected,
        });
    }
    Ok(())
}
