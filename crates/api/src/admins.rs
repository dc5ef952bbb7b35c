// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin account management for the server owner.
//!
//! Callers are expected to have authenticated the owner already. Nothing
//! here checks who is asking.

use pemilo::Clock;
use pemilo_domain::DomainError;
use pemilo_persistence::{AdminData, AdminUpdate, Persistence};
use tracing::info;

use crate::auth::AuthenticationService;
use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{AdminInfo, CreateAdminRequest, UpdateAdminRequest};

fn admin_info(admin: AdminData) -> AdminInfo {
    AdminInfo {
        admin_id: admin.admin_id,
        username: admin.username,
        max_room: admin.max_room,
        max_voters: admin.max_voters,
        is_active: admin.is_active,
        created_at: admin.created_at,
    }
}

/// Creates an admin account. New accounts start active.
///
/// # Errors
///
/// - `InvalidInput` if the password breaks the policy, the username is
///   blank or a ceiling is negative
/// - `DomainRuleViolation` if the username is taken
pub fn create_admin(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    policy: &PasswordPolicy,
    request: &CreateAdminRequest,
) -> Result<AdminInfo, ApiError> {
    let admin_id: i64 = AuthenticationService::provision_admin(
        persistence,
        clock,
        policy,
        &request.username,
        &request.password,
        request.max_room,
        request.max_voters,
    )?;

    let admin: AdminData = persistence
        .get_admin_by_id(admin_id)?
        .ok_or(DomainError::AdminNotFound(admin_id))?;
    Ok(admin_info(admin))
}

/// Changes an admin's ceilings or active flag.
///
/// A deactivated admin can no longer log in, and sessions it already holds
/// stop validating.
///
/// # Errors
///
/// - `ResourceNotFound` if the admin does not exist
/// - `InvalidInput` if a new ceiling is negative
pub fn update_admin(
    persistence: &mut Persistence,
    admin_id: i64,
    request: &UpdateAdminRequest,
) -> Result<AdminInfo, ApiError> {
    let update: AdminUpdate = AdminUpdate {
        max_room: request.max_room,
        max_voters: request.max_voters,
        is_active: request.is_active,
    };
    let admin: AdminData = persistence.update_admin(admin_id, update)?;
    info!(
        admin_id,
        max_room = admin.max_room,
        max_voters = admin.max_voters,
        is_active = admin.is_active,
        "Admin updated"
    );
    Ok(admin_info(admin))
}
