// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only quota checks for admins.
//!
//! These are pre-checks. Room creation and ticket issuance re-run the same
//! rules inside their store transaction.

use pemilo_domain::{AdminUsage, DomainError};
use pemilo_persistence::Persistence;

use crate::error::ApiError;
use crate::request_response::QuotaResponse;

fn load_usage(persistence: &mut Persistence, admin_id: i64) -> Result<AdminUsage, ApiError> {
    persistence
        .get_admin_usage(admin_id)?
        .ok_or_else(|| DomainError::AdminNotFound(admin_id).into())
}

/// Checks whether the admin may create another room.
///
/// # Errors
///
/// - `ResourceNotFound` if the admin does not exist
/// - `QuotaExceeded` if the admin already owns `max_room` rooms
pub fn check_room_quota(persistence: &mut Persistence, admin_id: i64) -> Result<(), ApiError> {
    let usage: AdminUsage = load_usage(persistence, admin_id)?;
    pemilo_domain::check_room_quota(&usage)?;
    Ok(())
}

/// Checks whether the admin may admit `projected` more voters.
///
/// # Errors
///
/// - `ResourceNotFound` if the admin does not exist
/// - `InvalidInput` if `projected` is negative
/// - `QuotaExceeded` if the admin's voter ceiling would be exceeded
pub fn check_voter_quota(
    persistence: &mut Persistence,
    admin_id: i64,
    projected: i64,
) -> Result<(), ApiError> {
    let usage: AdminUsage = load_usage(persistence, admin_id)?;
    pemilo_domain::check_voter_quota(&usage, projected)?;
    Ok(())
}

/// Reports the admin's ceilings against current usage.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the admin does not exist.
pub fn get_admin_quota(
    persistence: &mut Persistence,
    admin_id: i64,
) -> Result<QuotaResponse, ApiError> {
    let usage: AdminUsage = load_usage(persistence, admin_id)?;
    Ok(QuotaResponse {
        max_room: usage.max_room,
        max_voters: usage.max_voters,
        room_count: usage.room_count,
        voter_count: usage.voter_count,
        remaining_rooms: (usage.max_room - usage.room_count).max(0),
        remaining_voters: (usage.max_voters - usage.voter_count).max(0),
    })
}
