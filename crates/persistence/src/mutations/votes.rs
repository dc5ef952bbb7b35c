// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote recording.
//!
//! Each entry point records a vote under one voters type's admission
//! rules. The `(room_id, voter_identifier)` unique index is the final word
//! on double voting.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{DomainError, Vote};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::LimitedVoteOutcome;
use crate::diesel_schema::votes;
use crate::error::PersistenceError;
use crate::mutations::rooms::{admit_limited_vote_slot, close_room_session};
use crate::mutations::tickets::redeem_ticket_if_unused;
use crate::queries::rooms::get_voters_limit;
use crate::queries::votes::count_votes;
use crate::timestamp;

/// Inserts a vote unless the voter already has one in the room.
///
/// # Errors
///
/// Returns an error if the insert fails for any reason other than the
/// voter uniqueness constraint.
///
/// Returns `None` if a vote already existed.
pub fn insert_vote_if_absent(
    conn: &mut SqliteConnection,
    vote: &Vote,
) -> Result<Option<i64>, PersistenceError> {
    let rows: usize = diesel::insert_or_ignore_into(votes::table)
        .values((
            votes::room_id.eq(vote.room_id),
            votes::candidate_id.eq(vote.candidate_id),
            votes::sub_candidate_id.eq(vote.sub_candidate_id),
            votes::voter_identifier.eq(&vote.voter_identifier),
            votes::created_at.eq(timestamp::encode(vote.created_at)?),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Ok(None);
    }
    Ok(Some(get_last_insert_rowid(conn)?))
}

/// Records a vote paid for with a ticket.
///
/// Redeeming the ticket and inserting the vote happen in one transaction:
/// either both take effect or neither does.
///
/// # Errors
///
/// - `DomainViolation(TicketAlreadyUsed)` if the ticket was already redeemed
/// - `DomainViolation(VoterAlreadyVoted)` if the voter identifier already voted
/// - Any database error
pub fn record_ticket_vote(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    vote: &Vote,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if !redeem_ticket_if_unused(conn, ticket_id, vote.created_at)? {
            return Err(DomainError::TicketAlreadyUsed.into());
        }

        let vote_id: i64 =
            insert_vote_if_absent(conn, vote)?.ok_or(DomainError::VoterAlreadyVoted)?;
        info!(vote_id, room_id = vote.room_id, ticket_id, "Ticket vote recorded");
        Ok(vote_id)
    })
}

/// Records a vote in a `wild_limited` room.
///
/// A slot is reserved with a bounded increment before the vote is
/// inserted. When the insert brings the total to the limit the session is
/// closed in the same transaction.
///
/// # Errors
///
/// - `DomainViolation(VoteLimitReached)` if no slot is left
/// - `DomainViolation(VoterAlreadyVoted)` if the voter identifier already voted
/// - Any database error
pub fn record_limited_vote(
    conn: &mut SqliteConnection,
    vote: &Vote,
) -> Result<LimitedVoteOutcome, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if !admit_limited_vote_slot(conn, vote.room_id)? {
            return Err(DomainError::VoteLimitReached.into());
        }

        let vote_id: i64 =
            insert_vote_if_absent(conn, vote)?.ok_or(DomainError::VoterAlreadyVoted)?;
        let total_votes: i64 = count_votes(conn, vote.room_id)?;

        let session_closed: bool = match get_voters_limit(conn, vote.room_id)? {
            Some(limit) if total_votes >= limit => close_room_session(conn, vote.room_id)?,
            _ => false,
        };

        info!(
            vote_id,
            room_id = vote.room_id,
            total_votes,
            session_closed,
            "Limited vote recorded"
        );
        Ok(LimitedVoteOutcome {
            vote_id,
            total_votes,
            session_closed,
        })
    })
}

/// Records a vote in a `wild_unlimited` room.
///
/// # Errors
///
/// - `DomainViolation(VoterAlreadyVoted)` if the voter identifier already voted
/// - Any database error
pub fn record_open_vote(conn: &mut SqliteConnection, vote: &Vote) -> Result<i64, PersistenceError> {
    let vote_id: i64 = insert_vote_if_absent(conn, vote)?.ok_or(DomainError::VoterAlreadyVoted)?;
    info!(vote_id, room_id = vote.room_id, "Vote recorded");
    Ok(vote_id)
}
