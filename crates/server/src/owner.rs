// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP Basic authentication for the server owner.
//!
//! The owner is not an admin account. Its credentials come from the command
//! line, and it may only manage admin accounts. With no owner configured the
//! owner routes answer `403 Forbidden`.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{
        HeaderValue, StatusCode,
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::{Choice, ConstantTimeEq};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::ErrorResponse;

/// The owner's configured username and password.
pub struct OwnerCredentials {
    username: String,
    password: String,
}

impl OwnerCredentials {
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Compares both fields in full before combining the results.
    fn matches(&self, username: &str, password: &str) -> bool {
        let username_ok: Choice = self.username.as_bytes().ct_eq(username.as_bytes());
        let password_ok: Choice = self.password.as_bytes().ct_eq(password.as_bytes());
        (username_ok & password_ok).into()
    }
}

/// Extractor that admits only requests carrying the owner's credentials as
/// `Authorization: Basic <base64(username:password)>`.
pub struct Owner;

impl FromRequestParts<AppState> for Owner {
    type Rejection = OwnerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(owner) = state.owner.as_deref() else {
            debug!("Owner routes are disabled");
            return Err(OwnerError::Disabled);
        };

        let auth_header: &str = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(OwnerError::MissingAuthorizationHeader)?
            .to_str()
            .map_err(|_| OwnerError::InvalidAuthorizationHeader)?;

        let encoded: &str = auth_header
            .strip_prefix("Basic ")
            .ok_or(OwnerError::InvalidAuthorizationHeader)?;

        let decoded: Vec<u8> = STANDARD
            .decode(encoded.trim())
            .map_err(|_| OwnerError::InvalidAuthorizationHeader)?;
        let decoded: String =
            String::from_utf8(decoded).map_err(|_| OwnerError::InvalidAuthorizationHeader)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(OwnerError::InvalidAuthorizationHeader)?;

        if !owner.matches(username, password) {
            warn!("Owner authentication failed");
            return Err(OwnerError::InvalidCredentials);
        }

        Ok(Self)
    }
}

/// Owner authentication errors.
#[derive(Debug)]
pub enum OwnerError {
    /// No owner credentials were configured.
    Disabled,
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header is not valid `Basic` credentials.
    InvalidAuthorizationHeader,
    /// The credentials do not match the owner's.
    InvalidCredentials,
}

impl IntoResponse for OwnerError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, &str) = match self {
            Self::Disabled => (StatusCode::FORBIDDEN, "Owner routes are disabled"),
            Self::MissingAuthorizationHeader => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header")
            }
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Expected: 'Basic <credentials>'",
            ),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid owner credentials"),
        };

        let mut response: Response = (
            status,
            Json(ErrorResponse {
                error: true,
                message: message.to_string(),
            }),
        )
            .into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"Restricted\""),
            );
        }
        response
    }
}
