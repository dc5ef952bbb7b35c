// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod admin_tests;
mod voter_tests;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pemilo::FixedClock;
use pemilo_api::{AuthenticationService, LoginResponse, PasswordPolicy};
use pemilo_persistence::Persistence;
use serde::Serialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::macros::datetime;
use tower::ServiceExt;

use crate::owner::OwnerCredentials;
use crate::store::Store;
use crate::{AppState, build_router};

pub const TEST_NOW: OffsetDateTime = datetime!(2026-03-01 09:00:00 UTC);
pub const TEST_PASSWORD: &str = "Ballot-Box-2026";
pub const OWNER_USERNAME: &str = "owner";
pub const OWNER_PASSWORD: &str = "Owner-Secret-2026";

fn build_state(store: Store) -> (AppState, Arc<FixedClock>) {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(TEST_NOW));
    let state: AppState = AppState {
        store,
        clock: clock.clone(),
        owner: Some(Arc::new(OwnerCredentials::new(
            OWNER_USERNAME.to_string(),
            OWNER_PASSWORD.to_string(),
        ))),
    };
    (state, clock)
}

/// Helper to create test app state with in-memory persistence, a pinned
/// clock and owner routes enabled.
pub fn create_test_app_state() -> (AppState, Arc<FixedClock>) {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    build_state(Store::shared(persistence))
}

/// Like [`create_test_app_state`], but backed by a database file so every
/// request opens its own connection.
pub fn create_file_app_state(path: &Path) -> (AppState, Arc<FixedClock>) {
    let store: Store = Store::file(path.to_path_buf()).expect("Failed to create file store");
    build_state(store)
}

pub async fn provision_admin(state: &AppState, username: &str, max_room: i64, max_voters: i64) {
    let mut persistence = state.store.acquire().await.expect("store handle");
    AuthenticationService::provision_admin(
        &mut persistence,
        state.clock.as_ref(),
        &PasswordPolicy::default(),
        username,
        TEST_PASSWORD,
        max_room,
        max_voters,
    )
    .expect("admin should be provisioned");
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&impl Serialize>,
) -> Response<Body> {
    let authorization: Option<String> = token.map(|token| format!("Bearer {token}"));
    send_with_authorization(app, method, uri, authorization, body).await
}

/// Sends a request with HTTP Basic credentials, as the owner routes expect.
pub async fn send_basic(
    app: &Router,
    method: &str,
    uri: &str,
    (username, password): (&str, &str),
    body: Option<&impl Serialize>,
) -> Response<Body> {
    let encoded: String = STANDARD.encode(format!("{username}:{password}"));
    send_with_authorization(app, method, uri, Some(format!("Basic {encoded}")), body).await
}

async fn send_with_authorization(
    app: &Router,
    method: &str,
    uri: &str,
    authorization: Option<String>,
    body: Option<&impl Serialize>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(authorization) = authorization {
        builder = builder.header("Authorization", authorization);
    }
    let body: Body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(value).unwrap())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

/// Logs in over HTTP and returns the session token.
pub async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(&serde_json::json!({ "username": username, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let login: LoginResponse = read_json(response).await;
    login.session_token
}

/// Creates a `wild_limited` room with one candidate over HTTP. Returns
/// `(room_id, candidate_id)`.
pub async fn create_limited_room(app: &Router, token: &str, limit: i64) -> (i64, i64) {
    let response = send(
        app,
        "POST",
        "/admin/rooms",
        Some(token),
        Some(&serde_json::json!({
            "name": "Class Representative",
            "voters_type": "wild_limited",
            "voters_limit": limit,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let room: serde_json::Value = read_json(response).await;
    let room_id: i64 = room["room_id"].as_i64().unwrap();

    let response = send(
        app,
        "POST",
        &format!("/admin/rooms/{room_id}/candidates"),
        Some(token),
        Some(&serde_json::json!({ "name": "Ayu" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let candidate: serde_json::Value = read_json(response).await;

    (room_id, candidate["id"].as_i64().unwrap())
}

pub fn app(state: &AppState) -> Router {
    build_router(state.clone())
}
