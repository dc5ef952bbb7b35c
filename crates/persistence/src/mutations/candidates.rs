// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{Candidate, SubCandidate};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{candidates, sub_candidates};
use crate::error::PersistenceError;
use crate::timestamp;

/// Inserts a candidate.
///
/// # Errors
///
/// Returns an error if the insert fails, including a foreign key failure
/// when the room does not exist.
pub fn insert_candidate(
    conn: &mut SqliteConnection,
    candidate: &Candidate,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(candidates::table)
        .values((
            candidates::room_id.eq(candidate.room_id),
            candidates::name.eq(&candidate.name),
            candidates::photo_url.eq(&candidate.photo_url),
            candidates::description.eq(&candidate.description),
            candidates::created_at.eq(timestamp::encode(now)?),
        ))
        .execute(conn)?;

    let candidate_id: i64 = get_last_insert_rowid(conn)?;
    info!(candidate_id, room_id = candidate.room_id, "Candidate created");
    Ok(candidate_id)
}

/// Inserts a sub-candidate.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_sub_candidate(
    conn: &mut SqliteConnection,
    sub_candidate: &SubCandidate,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sub_candidates::table)
        .values((
            sub_candidates::candidate_id.eq(sub_candidate.candidate_id),
            sub_candidates::name.eq(&sub_candidate.name),
            sub_candidates::photo_url.eq(&sub_candidate.photo_url),
            sub_candidates::description.eq(&sub_candidate.description),
            sub_candidates::created_at.eq(timestamp::encode(now)?),
        ))
        .execute(conn)?;

    let sub_candidate_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        sub_candidate_id,
        candidate_id = sub_candidate.candidate_id,
        "Sub-candidate created"
    );
    Ok(sub_candidate_id)
}
