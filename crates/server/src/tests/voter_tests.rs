// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use pemilo_api::{CastVoteResponse, VoterRoomInfoResponse};

use super::{
    app, create_limited_room, create_test_app_state, login, provision_admin, read_json, send,
};
use crate::error::ErrorResponse;
use crate::handlers::HealthResponse;

#[tokio::test]
async fn test_health_reports_ok() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);

    let response = send(&app, "GET", "/health", None, None::<&()>).await;
    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = read_json(response).await;
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_unknown_room_returns_not_found() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);

    let response = send(&app, "GET", "/voter/rooms/99", None, None::<&()>).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = read_json(response).await;
    assert!(body.error);
}

#[tokio::test]
async fn test_limited_room_vote_flow_over_http() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);
    provision_admin(&state, "organizer", 5, 100).await;
    let token: String = login(&app, "organizer").await;
    let (room_id, candidate_id) = create_limited_room(&app, &token, 2).await;

    let uri: String = format!("/voter/rooms/{room_id}");
    let response = send(&app, "GET", &uri, None, None::<&()>).await;
    assert_eq!(response.status(), StatusCode::OK);
    let info: VoterRoomInfoResponse = read_json(response).await;
    assert!(!info.requires_ticket);
    assert_eq!(info.candidates.len(), 1);

    let ballot = serde_json::json!({ "room_id": room_id, "candidate_id": candidate_id });

    let first = send(&app, "POST", "/voter/votes", None, Some(&ballot)).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first: CastVoteResponse = read_json(first).await;
    assert!(!first.session_closed);

    let second = send(&app, "POST", "/voter/votes", None, Some(&ballot)).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second: CastVoteResponse = read_json(second).await;
    assert!(second.session_closed);

    let third = send(&app, "POST", "/voter/votes", None, Some(&ballot)).await;
    assert_eq!(third.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_ticket_vote_flow_over_http() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);
    provision_admin(&state, "organizer", 5, 100).await;
    let token: String = login(&app, "organizer").await;

    let response = send(
        &app,
        "POST",
        "/admin/rooms",
        Some(&token),
        Some(&serde_json::json!({ "name": "Board", "voters_type": "custom_tickets" })),
    )
    .await;
    let room: serde_json::Value = read_json(response).await;
    let room_id: i64 = room["room_id"].as_i64().unwrap();

    let response = send(
        &app,
        "POST",
        &format!("/admin/rooms/{room_id}/candidates"),
        Some(&token),
        Some(&serde_json::json!({ "name": "Bima" })),
    )
    .await;
    let candidate: serde_json::Value = read_json(response).await;
    let candidate_id: i64 = candidate["id"].as_i64().unwrap();

    let response = send(
        &app,
        "POST",
        &format!("/admin/rooms/{room_id}/tickets/bulk"),
        Some(&token),
        Some(&serde_json::json!({ "codes": ["T-1", "T-2"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let verify = serde_json::json!({ "room_id": room_id, "code": "T-1" });
    let response = send(&app, "POST", "/voter/tickets/verify", None, Some(&verify)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stranger = serde_json::json!({ "room_id": room_id, "code": "T-9" });
    let response = send(&app, "POST", "/voter/tickets/verify", None, Some(&stranger)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let ballot = serde_json::json!({
        "room_id": room_id,
        "candidate_id": candidate_id,
        "ticket_code": "T-1",
    });
    let response = send(&app, "POST", "/voter/votes", None, Some(&ballot)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "POST", "/voter/votes", None, Some(&ballot)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "POST", "/voter/tickets/verify", None, Some(&verify)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let missing = serde_json::json!({ "room_id": room_id, "candidate_id": candidate_id });
    let response = send(&app, "POST", "/voter/votes", None, Some(&missing)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
