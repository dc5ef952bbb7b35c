// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin account and quota usage queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{AdminUsage, VotersType};
use tracing::debug;

use crate::data_models::AdminData;
use crate::diesel_schema::{admins, rooms, tickets};
use crate::error::PersistenceError;
use crate::queries::rooms::count_rooms_by_admin;
use crate::timestamp;

/// Diesel Queryable struct for admin rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = admins)]
struct AdminRow {
    admin_id: i64,
    username: String,
    password_hash: String,
    max_room: i64,
    max_voters: i64,
    is_active: i32,
    created_at: String,
}

impl AdminRow {
    fn into_data(self) -> Result<AdminData, PersistenceError> {
        Ok(AdminData {
            admin_id: self.admin_id,
            username: self.username,
            password_hash: self.password_hash,
            max_room: self.max_room,
            max_voters: self.max_voters,
            is_active: self.is_active != 0,
            created_at: timestamp::decode(&self.created_at)?,
        })
    }
}

/// Retrieves an admin by username.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The exact username to search for
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the admin is not found.
pub fn get_admin_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<AdminData>, PersistenceError> {
    debug!("Looking up admin by username: {}", username);

    let result: Result<AdminRow, diesel::result::Error> = admins::table
        .filter(admins::username.eq(username))
        .select(AdminRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves an admin by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the admin is not found.
pub fn get_admin_by_id(
    conn: &mut SqliteConnection,
    admin_id: i64,
) -> Result<Option<AdminData>, PersistenceError> {
    debug!("Looking up admin by ID: {}", admin_id);

    let result: Result<AdminRow, diesel::result::Error> = admins::table
        .filter(admins::admin_id.eq(admin_id))
        .select(AdminRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Computes an admin's ceilings and current usage.
///
/// Voter usage is the sum of `voters_limit` over the admin's
/// `wild_limited` rooms plus the number of tickets issued across the
/// admin's `custom_tickets` rooms. `wild_unlimited` rooms contribute
/// nothing.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the admin is not found.
pub fn get_admin_usage(
    conn: &mut SqliteConnection,
    admin_id: i64,
) -> Result<Option<AdminUsage>, PersistenceError> {
    let Some(admin) = get_admin_by_id(conn, admin_id)? else {
        return Ok(None);
    };

    let room_count: i64 = count_rooms_by_admin(conn, admin_id)?;

    let limits: Vec<Option<i64>> = rooms::table
        .filter(rooms::admin_id.eq(admin_id))
        .filter(rooms::voters_type.eq(VotersType::WildLimited.as_str()))
        .select(rooms::voters_limit)
        .load(conn)?;
    let limited_capacity: i64 = limits.into_iter().flatten().sum();

    let ticket_count: i64 = tickets::table
        .inner_join(rooms::table)
        .filter(rooms::admin_id.eq(admin_id))
        .filter(rooms::voters_type.eq(VotersType::CustomTickets.as_str()))
        .count()
        .get_result(conn)?;

    let usage: AdminUsage = AdminUsage {
        max_room: admin.max_room,
        max_voters: admin.max_voters,
        room_count,
        voter_count: limited_capacity + ticket_count,
    };
    debug!(admin_id, ?usage, "Computed admin usage");

    Ok(Some(usage))
}

/// Verifies a password against a stored hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::CredentialError(format!("Failed to verify password: {e}")))
}
