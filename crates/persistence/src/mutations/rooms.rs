// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{
    AdminUsage, DomainError, Room, SessionState, check_room_quota, check_voter_quota,
};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::rooms;
use crate::error::PersistenceError;
use crate::queries::admins::get_admin_usage;
use crate::timestamp;

fn insert_room(
    conn: &mut SqliteConnection,
    room: &Room,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(rooms::table)
        .values((
            rooms::admin_id.eq(room.admin_id),
            rooms::name.eq(&room.name),
            rooms::voters_type.eq(room.voters_type.as_str()),
            rooms::voters_limit.eq(room.voters_limit),
            rooms::session_start.eq(timestamp::encode_opt(room.session_start)?),
            rooms::session_end.eq(timestamp::encode_opt(room.session_end)?),
            rooms::status.eq(room.status.as_str()),
            rooms::publish_state.eq(room.publish_state.as_str()),
            rooms::session_state.eq(room.session_state.as_str()),
            rooms::created_at.eq(timestamp::encode(now)?),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Creates a room after checking the owning admin's quotas.
///
/// The usage read, both quota checks and the insert run in one immediate
/// transaction, so two concurrent creations cannot both pass a check that
/// only one of them fits under.
///
/// # Errors
///
/// - `DomainViolation(AdminNotFound)` if the admin does not exist
/// - `DomainViolation(MaxRoomExceeded)` if the admin is at `max_room`
/// - `DomainViolation(MaxVotersExceeded)` if the room's limit does not fit
/// - Any database error
pub fn create_room_with_quota(
    conn: &mut SqliteConnection,
    room: &Room,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let usage: AdminUsage = get_admin_usage(conn, room.admin_id)?
            .ok_or(DomainError::AdminNotFound(room.admin_id))?;

        check_room_quota(&usage)?;
        check_voter_quota(&usage, room.projected_voter_capacity())?;

        let room_id: i64 = insert_room(conn, room, now)?;
        info!(room_id, admin_id = room.admin_id, voters_type = %room.voters_type, "Room created");
        Ok(room_id)
    })
}

/// Moves a room's session to `closed`.
///
/// Idempotent: closing an already-closed room changes nothing.
///
/// # Errors
///
/// Returns an error if the database update fails.
///
/// Returns `true` if this call performed the transition.
pub fn close_room_session(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<bool, PersistenceError> {
    let rows: usize = diesel::update(rooms::table)
        .filter(rooms::room_id.eq(room_id))
        .filter(rooms::session_state.eq(SessionState::Open.as_str()))
        .set(rooms::session_state.eq(SessionState::Closed.as_str()))
        .execute(conn)?;

    if rows > 0 {
        info!(room_id, "Room session closed");
    } else {
        debug!(room_id, "Room session already closed");
    }
    Ok(rows > 0)
}

/// Reserves one vote slot in a `wild_limited` room.
///
/// The increment is conditional on the room still being below its limit, so
/// the admitted count can never pass `voters_limit` no matter how many
/// connections race.
///
/// # Errors
///
/// Returns an error if the database update fails.
///
/// Returns `false` if the room has no slot left.
pub fn admit_limited_vote_slot(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<bool, PersistenceError> {
    let rows: usize = diesel::update(rooms::table)
        .filter(rooms::room_id.eq(room_id))
        .filter(rooms::admitted_votes.nullable().lt(rooms::voters_limit))
        .set(rooms::admitted_votes.eq(rooms::admitted_votes + 1))
        .execute(conn)?;

    Ok(rows > 0)
}
