// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket issuance and redemption.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{
    AdminUsage, DomainError, Room, Ticket, VotersType, check_voter_quota, validate_ticket_batch,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::tickets;
use crate::error::PersistenceError;
use crate::queries::admins::get_admin_usage;
use crate::queries::rooms::get_room;
use crate::queries::tickets::existing_codes;
use crate::timestamp;

/// Issues a batch of tickets for a `custom_tickets` room.
///
/// The batch is all-or-nothing: validation, the duplicate check against
/// stored codes, the voter quota check and every insert share one
/// immediate transaction.
///
/// # Errors
///
/// - `DomainViolation(RoomNotFound)` if the room does not exist
/// - `DomainViolation(InvalidVotersType)` if the room is not `custom_tickets`
/// - `DomainViolation(EmptyTicketBatch | InvalidTicketCode)` for a malformed batch
/// - `DomainViolation(TicketDuplicate)` if a code repeats or already exists
/// - `DomainViolation(MaxVotersExceeded)` if the batch does not fit the quota
/// - Any database error
pub fn issue_tickets(
    conn: &mut SqliteConnection,
    room_id: i64,
    codes: &[String],
    now: OffsetDateTime,
) -> Result<Vec<Ticket>, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let room: Room = get_room(conn, room_id)?.ok_or(DomainError::RoomNotFound(room_id))?;
        if room.voters_type != VotersType::CustomTickets {
            return Err(DomainError::InvalidVotersType(room.voters_type.to_string()).into());
        }

        validate_ticket_batch(codes)?;

        if let Some(code) = existing_codes(conn, room_id, codes)?.into_iter().next() {
            return Err(DomainError::TicketDuplicate { code }.into());
        }

        let usage: AdminUsage = get_admin_usage(conn, room.admin_id)?
            .ok_or(DomainError::AdminNotFound(room.admin_id))?;
        let additional: i64 = i64::try_from(codes.len()).unwrap_or(i64::MAX);
        check_voter_quota(&usage, additional)?;

        let created_at: String = timestamp::encode(now)?;
        let mut issued: Vec<Ticket> = Vec::with_capacity(codes.len());
        for code in codes {
            diesel::insert_into(tickets::table)
                .values((
                    tickets::room_id.eq(room_id),
                    tickets::code.eq(code),
                    tickets::is_used.eq(0),
                    tickets::created_at.eq(&created_at),
                ))
                .execute(conn)
                .map_err(|e| match PersistenceError::from(e) {
                    PersistenceError::UniqueViolation(_) => {
                        PersistenceError::DomainViolation(DomainError::TicketDuplicate {
                            code: code.clone(),
                        })
                    }
                    other => other,
                })?;

            issued.push(Ticket {
                ticket_id: get_last_insert_rowid(conn)?,
                room_id,
                code: code.clone(),
                is_used: false,
                used_at: None,
                created_at: now,
            });
        }

        debug!(room_id, count = issued.len(), "Ticket rows inserted");
        Ok(issued)
    })
}

/// Marks a ticket used, but only if it is still unused.
///
/// # Errors
///
/// Returns an error if the database update fails.
///
/// Returns `false` if the ticket was already used (or does not exist).
pub fn redeem_ticket_if_unused(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    now: OffsetDateTime,
) -> Result<bool, PersistenceError> {
    let rows: usize = diesel::update(tickets::table)
        .filter(tickets::ticket_id.eq(ticket_id))
        .filter(tickets::is_used.eq(0))
        .set((
            tickets::is_used.eq(1),
            tickets::used_at.eq(Some(timestamp::encode(now)?)),
        ))
        .execute(conn)?;

    debug!(ticket_id, redeemed = rows > 0, "Ticket redemption attempted");
    Ok(rows > 0)
}
