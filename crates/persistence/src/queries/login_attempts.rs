// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login attempt queries backing the login throttle.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;

use crate::data_models::LoginAttemptData;
use crate::diesel_schema::login_attempts;
use crate::error::PersistenceError;
use crate::timestamp;

/// Diesel Queryable struct for login attempt rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = login_attempts)]
struct LoginAttemptRow {
    attempt_id: i64,
    identifier: String,
    attempt_at: String,
    success: i32,
}

/// Counts failed attempts for an identifier at or after `since`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_recent_failures(
    conn: &mut SqliteConnection,
    identifier: &str,
    since: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let since: String = timestamp::encode(since)?;
    Ok(login_attempts::table
        .filter(login_attempts::identifier.eq(identifier))
        .filter(login_attempts::success.eq(0))
        .filter(login_attempts::attempt_at.ge(since))
        .count()
        .get_result(conn)?)
}

/// Returns the most recent attempt of any outcome for an identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn most_recent_attempt(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> Result<Option<LoginAttemptData>, PersistenceError> {
    let row: Option<LoginAttemptRow> = login_attempts::table
        .filter(login_attempts::identifier.eq(identifier))
        .order((
            login_attempts::attempt_at.desc(),
            login_attempts::attempt_id.desc(),
        ))
        .select(LoginAttemptRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| {
        Ok(LoginAttemptData {
            attempt_id: row.attempt_id,
            identifier: row.identifier,
            attempt_at: timestamp::decode(&row.attempt_at)?,
            success: row.success != 0,
        })
    })
    .transpose()
}
