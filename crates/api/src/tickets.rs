// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket issuance and lookup.

use pemilo::Clock;
use pemilo_domain::{DomainError, Room, Ticket, VotersType};
use pemilo_persistence::Persistence;
use tracing::info;

use crate::auth::AuthenticatedAdmin;
use crate::error::ApiError;
use crate::request_response::{
    CreateTicketRequest, CreateTicketsBulkRequest, TicketInfo, TicketsResponse,
    VerifyTicketRequest, VerifyTicketResponse,
};
use crate::rooms::load_owned_room;

fn ticket_info(ticket: Ticket) -> TicketInfo {
    TicketInfo {
        ticket_id: ticket.ticket_id,
        code: ticket.code,
        is_used: ticket.is_used,
        used_at: ticket.used_at,
        created_at: ticket.created_at,
    }
}

fn issue(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    room_id: i64,
    codes: &[String],
) -> Result<TicketsResponse, ApiError> {
    load_owned_room(persistence, admin, room_id)?;
    let tickets: Vec<Ticket> = persistence.issue_tickets(room_id, codes, clock.now())?;
    info!(
        room_id,
        admin_id = admin.admin_id,
        count = tickets.len(),
        "Tickets issued"
    );

    Ok(TicketsResponse {
        room_id,
        tickets: tickets.into_iter().map(ticket_info).collect(),
    })
}

/// Issues a single ticket for a `custom_tickets` room.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
/// - `InvalidInput` if the room does not use tickets or the code is blank
/// - `DomainRuleViolation` if the code already exists in the room
/// - `QuotaExceeded` if the ticket does not fit the admin's voter quota
pub fn create_ticket(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    room_id: i64,
    request: &CreateTicketRequest,
) -> Result<TicketsResponse, ApiError> {
    issue(
        persistence,
        clock,
        admin,
        room_id,
        std::slice::from_ref(&request.code),
    )
}

/// Issues a batch of tickets for a `custom_tickets` room.
///
/// The batch is all-or-nothing: any rejection leaves the room's tickets
/// unchanged.
///
/// # Errors
///
/// As [`create_ticket`], plus `InvalidInput` for an empty batch and
/// `DomainRuleViolation` for a code that repeats within the batch.
pub fn create_tickets_bulk(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    room_id: i64,
    request: &CreateTicketsBulkRequest,
) -> Result<TicketsResponse, ApiError> {
    issue(persistence, clock, admin, room_id, &request.codes)
}

/// Lists a room's tickets.
///
/// # Errors
///
/// - `ResourceNotFound` if the room does not exist
/// - `Forbidden` if another admin owns it
pub fn list_tickets(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    room_id: i64,
) -> Result<TicketsResponse, ApiError> {
    load_owned_room(persistence, admin, room_id)?;
    let tickets: Vec<Ticket> = persistence.list_tickets(room_id)?;

    Ok(TicketsResponse {
        room_id,
        tickets: tickets.into_iter().map(ticket_info).collect(),
    })
}

/// Checks that a ticket could be redeemed right now.
///
/// This is a read-only lookup for the voter's benefit. Redemption itself
/// happens when the vote is cast, and may still lose a race.
///
/// # Errors
///
/// - `ResourceNotFound` if the room or the ticket code does not exist
/// - `InvalidInput` if the room does not use tickets
/// - `DomainRuleViolation` if the ticket has been used
pub fn verify_ticket(
    persistence: &mut Persistence,
    request: &VerifyTicketRequest,
) -> Result<VerifyTicketResponse, ApiError> {
    let room: Room = persistence
        .get_room(request.room_id)?
        .ok_or(DomainError::RoomNotFound(request.room_id))?;

    if room.voters_type != VotersType::CustomTickets {
        return Err(DomainError::InvalidVotersType(room.voters_type.to_string()).into());
    }

    let ticket: Ticket = persistence
        .find_ticket_by_code(request.room_id, &request.code)?
        .ok_or(DomainError::InvalidTicket)?;

    if ticket.is_used {
        return Err(DomainError::TicketAlreadyUsed.into());
    }

    Ok(VerifyTicketResponse {
        valid: true,
        message: String::from("Ticket is valid, proceed to vote"),
    })
}
