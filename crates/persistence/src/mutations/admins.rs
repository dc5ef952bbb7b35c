// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin account mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pemilo_domain::{DomainError, validate_admin_fields, validate_quota_ceiling};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{AdminData, AdminUpdate};
use crate::diesel_schema::admins;
use crate::error::PersistenceError;
use crate::queries::admins::get_admin_by_id;
use crate::timestamp;

/// Creates a new admin account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The unique login name
/// * `password` - The plain-text password (will be hashed)
/// * `max_room` - Room ceiling
/// * `max_voters` - Voter capacity ceiling
/// * `now` - Creation time
///
/// # Errors
///
/// - `DomainViolation(InvalidUsername | InvalidQuota)` for invalid fields
/// - `DomainViolation(AdminExists)` if the username is taken
/// - `CredentialError` if hashing fails
pub fn create_admin(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
    max_room: i64,
    max_voters: i64,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    validate_admin_fields(username, max_room, max_voters)?;

    info!(
        "Creating admin with username: {}, max_room: {}, max_voters: {}",
        username, max_room, max_voters
    );

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::CredentialError(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(admins::table)
        .values((
            admins::username.eq(username),
            admins::password_hash.eq(&password_hash),
            admins::max_room.eq(max_room),
            admins::max_voters.eq(max_voters),
            admins::is_active.eq(1),
            admins::created_at.eq(timestamp::encode(now)?),
        ))
        .execute(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::UniqueViolation(_) => {
                PersistenceError::DomainViolation(DomainError::AdminExists(username.to_string()))
            }
            other => other,
        })?;

    let admin_id: i64 = get_last_insert_rowid(conn)?;
    info!(admin_id, "Admin created successfully");
    Ok(admin_id)
}

/// Applies an [`AdminUpdate`] and returns the admin as stored afterwards.
///
/// Lowering a ceiling below current usage is allowed. Existing rooms and
/// tickets stay, and later creations are refused by the quota checks.
///
/// # Errors
///
/// - `DomainViolation(InvalidQuota)` if a new ceiling is negative
/// - `DomainViolation(AdminNotFound)` if no such admin exists
/// - Any database error
pub fn update_admin(
    conn: &mut SqliteConnection,
    admin_id: i64,
    update: AdminUpdate,
) -> Result<AdminData, PersistenceError> {
    if let Some(max_room) = update.max_room {
        validate_quota_ceiling("max_room", max_room)?;
    }
    if let Some(max_voters) = update.max_voters {
        validate_quota_ceiling("max_voters", max_voters)?;
    }

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let current: AdminData =
            get_admin_by_id(conn, admin_id)?.ok_or(DomainError::AdminNotFound(admin_id))?;

        let max_room: i64 = update.max_room.unwrap_or(current.max_room);
        let max_voters: i64 = update.max_voters.unwrap_or(current.max_voters);
        let is_active: bool = update.is_active.unwrap_or(current.is_active);

        info!(admin_id, max_room, max_voters, is_active, "Updating admin");

        diesel::update(admins::table)
            .filter(admins::admin_id.eq(admin_id))
            .set((
                admins::max_room.eq(max_room),
                admins::max_voters.eq(max_voters),
                admins::is_active.eq(i32::from(is_active)),
            ))
            .execute(conn)?;

        Ok(AdminData {
            max_room,
            max_voters,
            is_active,
            ..current
        })
    })
}
