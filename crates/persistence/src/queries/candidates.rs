// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate and sub-candidate queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{Candidate, SubCandidate};

use crate::diesel_schema::{candidates, sub_candidates};
use crate::error::PersistenceError;

/// Diesel Queryable struct for candidate rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = candidates)]
struct CandidateRow {
    candidate_id: i64,
    room_id: i64,
    name: String,
    photo_url: String,
    description: String,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            candidate_id: Some(row.candidate_id),
            room_id: row.room_id,
            name: row.name,
            photo_url: row.photo_url,
            description: row.description,
        }
    }
}

/// Diesel Queryable struct for sub-candidate rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sub_candidates)]
struct SubCandidateRow {
    sub_candidate_id: i64,
    candidate_id: i64,
    name: String,
    photo_url: String,
    description: Option<String>,
}

impl From<SubCandidateRow> for SubCandidate {
    fn from(row: SubCandidateRow) -> Self {
        Self {
            sub_candidate_id: Some(row.sub_candidate_id),
            candidate_id: row.candidate_id,
            name: row.name,
            photo_url: row.photo_url,
            description: row.description,
        }
    }
}

/// Retrieves a candidate by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the candidate is not found.
pub fn get_candidate(
    conn: &mut SqliteConnection,
    candidate_id: i64,
) -> Result<Option<Candidate>, PersistenceError> {
    Ok(candidates::table
        .filter(candidates::candidate_id.eq(candidate_id))
        .select(CandidateRow::as_select())
        .first(conn)
        .optional()?
        .map(Candidate::from))
}

/// Lists the candidates of a room ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_candidates(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Vec<Candidate>, PersistenceError> {
    Ok(candidates::table
        .filter(candidates::room_id.eq(room_id))
        .order(candidates::candidate_id.asc())
        .select(CandidateRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Candidate::from)
        .collect())
}

/// Retrieves a sub-candidate by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the sub-candidate is not found.
pub fn get_sub_candidate(
    conn: &mut SqliteConnection,
    sub_candidate_id: i64,
) -> Result<Option<SubCandidate>, PersistenceError> {
    Ok(sub_candidates::table
        .filter(sub_candidates::sub_candidate_id.eq(sub_candidate_id))
        .select(SubCandidateRow::as_select())
        .first(conn)
        .optional()?
        .map(SubCandidate::from))
}

/// Lists every sub-candidate of every candidate in a room.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sub_candidates_for_room(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Vec<SubCandidate>, PersistenceError> {
    Ok(sub_candidates::table
        .inner_join(candidates::table)
        .filter(candidates::room_id.eq(room_id))
        .order(sub_candidates::sub_candidate_id.asc())
        .select(SubCandidateRow::as_select())
        .load(conn)?
        .into_iter()
        .map(SubCandidate::from)
        .collect())
}
