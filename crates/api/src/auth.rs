// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin authentication: throttled login, sessions and account provisioning.

use pemilo::Clock;
use pemilo_domain::DomainError;
use pemilo_persistence::{AdminData, Persistence, SessionData, verify_password};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::request_response::LoginResponse;

/// An admin whose session token has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    /// The admin's identifier.
    pub admin_id: i64,
    /// The admin's username.
    pub username: String,
}

impl AuthenticatedAdmin {
    /// Creates a new authenticated admin.
    #[must_use]
    pub const fn new(admin_id: i64, username: String) -> Self {
        Self { admin_id, username }
    }
}

/// Authentication service for admin login and session management.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Session lifetime.
    pub const SESSION_LIFETIME: Duration = Duration::hours(24);

    /// Authenticates an admin and creates a session.
    ///
    /// The login is throttled per username: after three failed attempts
    /// within five minutes, further attempts are rejected without looking at
    /// the credentials until the lockout expires. Every attempt that gets
    /// past the throttle is recorded, as a failure until the password checks
    /// out.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `clock` - The time source
    /// * `username` - The admin's username
    /// * `password` - The plaintext password to verify
    ///
    /// # Errors
    ///
    /// - `RateLimited` if the username is locked out
    /// - `AuthenticationFailed` for an unknown username, a wrong password or
    ///   an inactive account
    /// - `Unavailable` if the store fails
    pub fn login(
        persistence: &mut Persistence,
        clock: &dyn Clock,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let now: OffsetDateTime = clock.now();
        let attempt_id: i64 = persistence.reserve_login_attempt(username, now)?;

        let Some(admin) = persistence.get_admin_by_username(username)? else {
            debug!(username, "Login for unknown username");
            return Err(DomainError::InvalidCredentials.into());
        };

        if !verify_password(password, &admin.password_hash)? {
            debug!(admin_id = admin.admin_id, "Login with wrong password");
            return Err(DomainError::InvalidCredentials.into());
        }

        if !admin.is_active {
            warn!(admin_id = admin.admin_id, "Login for inactive admin");
            return Err(DomainError::AdminInactive.into());
        }

        persistence.mark_login_attempt_succeeded(attempt_id)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = now + Self::SESSION_LIFETIME;
        persistence.create_session(&session_token, admin.admin_id, now, expires_at)?;

        info!(admin_id = admin.admin_id, "Admin logged in");

        Ok(LoginResponse {
            session_token,
            admin_id: admin.admin_id,
            username: admin.username,
            expires_at,
        })
    }

    /// Validates a session token and returns the authenticated admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the token is unknown or expired, or
    /// if the admin no longer exists or has been deactivated.
    pub fn validate_session(
        persistence: &mut Persistence,
        clock: &dyn Clock,
        session_token: &str,
    ) -> Result<AuthenticatedAdmin, ApiError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)?
            .ok_or_else(|| Self::rejected("Invalid session token"))?;

        if clock.now() > session.expires_at {
            return Err(Self::rejected("Session expired"));
        }

        let admin: AdminData = persistence
            .get_admin_by_id(session.admin_id)?
            .ok_or_else(|| Self::rejected("Admin not found"))?;

        if !admin.is_active {
            return Err(Self::rejected("Admin account is inactive"));
        }

        Ok(AuthenticatedAdmin::new(admin.admin_id, admin.username))
    }

    /// Logs out by deleting the session.
    ///
    /// Deleting an unknown token succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
        persistence.delete_session(session_token)?;
        Ok(())
    }

    /// Prunes expired sessions and login attempts older than the retention
    /// period.
    ///
    /// Returns the number of sessions and attempts removed.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store fails.
    pub fn cleanup(
        persistence: &mut Persistence,
        clock: &dyn Clock,
    ) -> Result<(usize, usize), ApiError> {
        let now: OffsetDateTime = clock.now();
        let sessions: usize = persistence.delete_expired_sessions(now)?;
        let attempts: usize = persistence.cleanup_login_attempts(now)?;
        if sessions > 0 || attempts > 0 {
            info!(sessions, attempts, "Pruned expired sessions and login attempts");
        }
        Ok((sessions, attempts))
    }

    /// Creates an admin account after checking the password policy.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the password breaks the policy, the username is
    ///   blank or a ceiling is negative
    /// - `DomainRuleViolation` if the username is taken
    pub fn provision_admin(
        persistence: &mut Persistence,
        clock: &dyn Clock,
        policy: &PasswordPolicy,
        username: &str,
        password: &str,
        max_room: i64,
        max_voters: i64,
    ) -> Result<i64, ApiError> {
        policy.validate(password, username)?;
        let admin_id: i64 =
            persistence.create_admin(username, password, max_room, max_voters, clock.now())?;
        info!(admin_id, username, max_room, max_voters, "Provisioned admin");
        Ok(admin_id)
    }

    /// Generates a session token: 32 random bytes as lowercase hex.
    fn generate_session_token() -> String {
        format!(
            "{:032x}{:032x}",
            rand::random::<u128>(),
            rand::random::<u128>()
        )
    }

    fn rejected(reason: &str) -> ApiError {
        ApiError::AuthenticationFailed {
            reason: String::from(reason),
        }
    }
}
