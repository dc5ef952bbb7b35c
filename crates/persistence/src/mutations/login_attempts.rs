// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login attempt mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{evaluate_lockout, lockout_window_start};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::login_attempts;
use crate::error::PersistenceError;
use crate::queries::login_attempts::{count_recent_failures, most_recent_attempt};
use crate::timestamp;

/// Appends a login attempt.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_login_attempt(
    conn: &mut SqliteConnection,
    identifier: &str,
    success: bool,
    attempt_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(login_attempts::table)
        .values((
            login_attempts::identifier.eq(identifier),
            login_attempts::attempt_at.eq(timestamp::encode(attempt_at)?),
            login_attempts::success.eq(i32::from(success)),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Checks the lockout and, if clear, records a provisional failed attempt.
///
/// The check and the insert share an immediate transaction so concurrent
/// logins for one identifier cannot all slip past the third failure. A
/// locked-out attempt is not recorded. The caller flips the row to success
/// with [`mark_login_attempt_succeeded`] once credentials check out.
///
/// # Errors
///
/// - `DomainViolation(RateLimitExceeded)` if the identifier is locked out
/// - Any database error
pub fn reserve_login_attempt(
    conn: &mut SqliteConnection,
    identifier: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let failures: i64 = count_recent_failures(conn, identifier, lockout_window_start(now))?;
        let last_attempt_at: Option<OffsetDateTime> =
            most_recent_attempt(conn, identifier)?.map(|attempt| attempt.attempt_at);

        if let Err(err) = evaluate_lockout(failures, last_attempt_at, now) {
            warn!(identifier, failures, "Login attempt rejected by throttle");
            return Err(err.into());
        }

        record_login_attempt(conn, identifier, false, now)
    })
}

/// Marks a previously reserved attempt as successful.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_login_attempt_succeeded(
    conn: &mut SqliteConnection,
    attempt_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(login_attempts::table)
        .filter(login_attempts::attempt_id.eq(attempt_id))
        .set(login_attempts::success.eq(1))
        .execute(conn)?;
    Ok(())
}

/// Deletes attempts recorded before `before`.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn cleanup_login_attempts(
    conn: &mut SqliteConnection,
    before: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(login_attempts::table)
        .filter(login_attempts::attempt_at.lt(timestamp::encode(before)?))
        .execute(conn)?;

    debug!(deleted, "Cleaned up old login attempts");
    Ok(deleted)
}
