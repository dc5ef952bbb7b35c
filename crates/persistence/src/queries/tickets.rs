// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::Ticket;

use crate::diesel_schema::tickets;
use crate::error::PersistenceError;
use crate::timestamp;

/// Upper bound on bound parameters per `IN (...)` lookup.
const CODE_LOOKUP_CHUNK: usize = 500;

/// Diesel Queryable struct for ticket rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = tickets)]
struct TicketRow {
    ticket_id: i64,
    room_id: i64,
    code: String,
    is_used: i32,
    used_at: Option<String>,
    created_at: String,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket, PersistenceError> {
        Ok(Ticket {
            ticket_id: self.ticket_id,
            room_id: self.room_id,
            code: self.code,
            is_used: self.is_used != 0,
            used_at: timestamp::decode_opt(self.used_at.as_deref())?,
            created_at: timestamp::decode(&self.created_at)?,
        })
    }
}

/// Finds a ticket by its code within a room.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no ticket with that code exists in the room.
pub fn find_ticket_by_code(
    conn: &mut SqliteConnection,
    room_id: i64,
    code: &str,
) -> Result<Option<Ticket>, PersistenceError> {
    tickets::table
        .filter(tickets::room_id.eq(room_id))
        .filter(tickets::code.eq(code))
        .select(TicketRow::as_select())
        .first(conn)
        .optional()?
        .map(TicketRow::into_ticket)
        .transpose()
}

/// Lists a room's tickets in issue order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tickets(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Vec<Ticket>, PersistenceError> {
    tickets::table
        .filter(tickets::room_id.eq(room_id))
        .order(tickets::ticket_id.asc())
        .select(TicketRow::as_select())
        .load(conn)?
        .into_iter()
        .map(TicketRow::into_ticket)
        .collect()
}

/// Returns which of `codes` already exist in the room.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn existing_codes(
    conn: &mut SqliteConnection,
    room_id: i64,
    codes: &[String],
) -> Result<Vec<String>, PersistenceError> {
    let mut found: Vec<String> = Vec::new();
    for chunk in codes.chunks(CODE_LOOKUP_CHUNK) {
        let mut existing: Vec<String> = tickets::table
            .filter(tickets::room_id.eq(room_id))
            .filter(tickets::code.eq_any(chunk))
            .select(tickets::code)
            .load(conn)?;
        found.append(&mut existing);
    }
    Ok(found)
}
