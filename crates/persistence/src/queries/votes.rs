// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote ledger queries.

use std::collections::HashMap;

use diesel::dsl::{count_star, exists, max};
use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{Candidate, CandidateTally};
use time::OffsetDateTime;

use crate::diesel_schema::votes;
use crate::error::PersistenceError;
use crate::queries::candidates::list_candidates;
use crate::timestamp;

/// Counts all votes recorded in a room.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_votes(conn: &mut SqliteConnection, room_id: i64) -> Result<i64, PersistenceError> {
    Ok(votes::table
        .filter(votes::room_id.eq(room_id))
        .count()
        .get_result(conn)?)
}

/// Returns whether a voter identifier already has a vote in the room.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn voter_has_voted(
    conn: &mut SqliteConnection,
    room_id: i64,
    voter_identifier: &str,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(exists(
        votes::table
            .filter(votes::room_id.eq(room_id))
            .filter(votes::voter_identifier.eq(voter_identifier)),
    ))
    .get_result(conn)?)
}

/// Per-candidate vote count and most recent vote time.
struct CandidateCount {
    vote_count: i64,
    last_vote_at: Option<OffsetDateTime>,
}

fn grouped_counts(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<HashMap<i64, CandidateCount>, PersistenceError> {
    let rows: Vec<(i64, i64, Option<String>)> = votes::table
        .filter(votes::room_id.eq(room_id))
        .group_by(votes::candidate_id)
        .select((votes::candidate_id, count_star(), max(votes::created_at)))
        .load(conn)?;

    rows.into_iter()
        .map(|(candidate_id, vote_count, last)| {
            Ok((
                candidate_id,
                CandidateCount {
                    vote_count,
                    last_vote_at: timestamp::decode_opt(last.as_deref())?,
                },
            ))
        })
        .collect()
}

fn tally_for(candidate: Candidate, counts: &HashMap<i64, CandidateCount>) -> CandidateTally {
    let candidate_id: i64 = candidate.candidate_id.unwrap_or_default();
    let count: Option<&CandidateCount> = counts.get(&candidate_id);
    CandidateTally {
        candidate_id,
        candidate_name: candidate.name,
        vote_count: count.map_or(0, |c| c.vote_count),
        last_vote_at: count.and_then(|c| c.last_vote_at),
    }
}

/// Historical tally: candidates with at least one vote, ordered by vote
/// count descending, ties broken by candidate ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_votes_by_candidate(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Vec<CandidateTally>, PersistenceError> {
    let counts: HashMap<i64, CandidateCount> = grouped_counts(conn, room_id)?;
    let mut tallies: Vec<CandidateTally> = list_candidates(conn, room_id)?
        .into_iter()
        .map(|candidate| tally_for(candidate, &counts))
        .filter(|tally| tally.vote_count > 0)
        .collect();
    tallies.sort_by(|a, b| {
        b.vote_count
            .cmp(&a.vote_count)
            .then(a.candidate_id.cmp(&b.candidate_id))
    });
    Ok(tallies)
}

/// Realtime tally: every candidate of the room, including those without
/// votes, ordered by candidate ID so repeated polls line up.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn realtime_tally(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Vec<CandidateTally>, PersistenceError> {
    let counts: HashMap<i64, CandidateCount> = grouped_counts(conn, room_id)?;
    Ok(list_candidates(conn, room_id)?
        .into_iter()
        .map(|candidate| tally_for(candidate, &counts))
        .collect())
}
