// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for admin endpoints.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use pemilo_api::{ApiError, AuthenticatedAdmin, AuthenticationService};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::{ErrorResponse, HttpError};

/// Extractor for authenticated admins.
///
/// Reads `Authorization: Bearer <token>`, validates the session and yields
/// the admin together with the raw token (logout needs it).
///
/// ```ignore
/// async fn handler(
///     SessionAdmin { admin, .. }: SessionAdmin,
/// ) -> Result<Json<Response>, HttpError> {
///     ...
/// }
/// ```
pub struct SessionAdmin {
    /// The admin the session belongs to.
    pub admin: AuthenticatedAdmin,
    /// The bearer token that was presented.
    pub token: String,
}

impl FromRequestParts<AppState> for SessionAdmin {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        let admin: AuthenticatedAdmin = {
            let mut persistence = state.store.acquire().await.map_err(SessionError::Store)?;
            AuthenticationService::validate_session(&mut persistence, state.clock.as_ref(), token)
                .map_err(|e| {
                    debug!(error = %e, "Session validation failed");
                    SessionError::Rejected(e)
                })?
        };

        debug!(admin_id = admin.admin_id, "Session validated");

        Ok(Self {
            admin,
            token: token.to_string(),
        })
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header is not `Bearer <token>`.
    InvalidAuthorizationHeader,
    /// The session was rejected, or could not be checked.
    Rejected(ApiError),
    /// No store handle could be obtained.
    Store(HttpError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: &str = match self {
            Self::MissingAuthorizationHeader => "Missing Authorization header",
            Self::InvalidAuthorizationHeader => {
                "Invalid Authorization header format. Expected: 'Bearer <token>'"
            }
            Self::Rejected(err) => return HttpError::from(err).into_response(),
            Self::Store(err) => return err.into_response(),
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: true,
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}
