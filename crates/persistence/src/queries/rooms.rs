// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{DomainError, Room};
use tracing::debug;

use crate::diesel_schema::rooms;
use crate::error::PersistenceError;
use crate::timestamp;

/// Diesel Queryable struct for room rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rooms)]
struct RoomRow {
    room_id: i64,
    admin_id: i64,
    name: String,
    voters_type: String,
    voters_limit: Option<i64>,
    session_start: Option<String>,
    session_end: Option<String>,
    status: String,
    publish_state: String,
    session_state: String,
}

impl RoomRow {
    fn into_room(self) -> Result<Room, PersistenceError> {
        let corrupt = |e: DomainError| PersistenceError::SerializationError(e.to_string());
        Ok(Room {
            room_id: Some(self.room_id),
            admin_id: self.admin_id,
            name: self.name,
            voters_type: self.voters_type.parse().map_err(corrupt)?,
            voters_limit: self.voters_limit,
            session_start: timestamp::decode_opt(self.session_start.as_deref())?,
            session_end: timestamp::decode_opt(self.session_end.as_deref())?,
            status: self.status.parse().map_err(corrupt)?,
            publish_state: self.publish_state.parse().map_err(corrupt)?,
            session_state: self.session_state.parse().map_err(corrupt)?,
        })
    }
}

/// Retrieves a room by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is corrupt.
/// Returns `Ok(None)` if the room is not found.
pub fn get_room(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Option<Room>, PersistenceError> {
    debug!(room_id, "Looking up room");

    rooms::table
        .filter(rooms::room_id.eq(room_id))
        .select(RoomRow::as_select())
        .first(conn)
        .optional()?
        .map(RoomRow::into_room)
        .transpose()
}

/// Counts the rooms owned by an admin.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_rooms_by_admin(
    conn: &mut SqliteConnection,
    admin_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(rooms::table
        .filter(rooms::admin_id.eq(admin_id))
        .count()
        .get_result(conn)?)
}

/// Returns the room's `voters_limit`, if the room exists and has one.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_voters_limit(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(rooms::table
        .filter(rooms::room_id.eq(room_id))
        .select(rooms::voters_limit)
        .first::<Option<i64>>(conn)
        .optional()?
        .flatten())
}
