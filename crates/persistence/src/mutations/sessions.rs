// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin session mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use crate::timestamp;

/// Creates a new session.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    admin_id: i64,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    debug!("Creating session for admin ID: {}", admin_id);

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::admin_id.eq(admin_id),
            sessions::created_at.eq(timestamp::encode(created_at)?),
            sessions::expires_at.eq(timestamp::encode(expires_at)?),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;
    info!(session_id, admin_id, "Session created");
    Ok(session_id)
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes every session that expired before `now`.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(timestamp::encode(now)?))
        .execute(conn)?;

    debug!(deleted, "Deleted expired sessions");
    Ok(deleted)
}
