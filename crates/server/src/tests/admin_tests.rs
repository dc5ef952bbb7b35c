// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::{StatusCode, header::RETRY_AFTER};
use pemilo_api::{QuotaResponse, TallyResponse};
use time::Duration;

use super::{
    TEST_PASSWORD, app, create_limited_room, create_test_app_state, login, provision_admin,
    read_json, send,
};

#[tokio::test]
async fn test_admin_routes_require_bearer_token() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);

    let response = send(&app, "GET", "/admin/quota", None, None::<&()>).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "GET", "/admin/quota", Some("not-a-session"), None::<&()>).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);
    provision_admin(&state, "organizer", 5, 100).await;
    let token: String = login(&app, "organizer").await;

    let response = send(&app, "POST", "/auth/logout", Some(&token), None::<&()>).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/admin/quota", Some(&token), None::<&()>).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_lockout_returns_retry_after() {
    let (state, clock) = create_test_app_state();
    let app = app(&state);
    provision_admin(&state, "organizer", 5, 100).await;

    let wrong = serde_json::json!({ "username": "organizer", "password": "Wrong-Pass-1" });
    for _ in 0..3 {
        let response = send(&app, "POST", "/auth/login", None, Some(&wrong)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    clock.advance(Duration::seconds(60));
    let right = serde_json::json!({ "username": "organizer", "password": TEST_PASSWORD });
    let response = send(&app, "POST", "/auth/login", None, Some(&right)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[RETRY_AFTER], "240");

    clock.advance(Duration::seconds(240));
    let response = send(&app, "POST", "/auth/login", None, Some(&right)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_room_quota_over_http() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);
    provision_admin(&state, "organizer", 1, 100).await;
    let token: String = login(&app, "organizer").await;

    create_limited_room(&app, &token, 10).await;

    let response = send(
        &app,
        "POST",
        "/admin/rooms",
        Some(&token),
        Some(&serde_json::json!({
            "name": "Second",
            "voters_type": "wild_limited",
            "voters_limit": 1,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "GET", "/admin/quota", Some(&token), None::<&()>).await;
    assert_eq!(response.status(), StatusCode::OK);
    let quota: QuotaResponse = read_json(response).await;
    assert_eq!(quota.room_count, 1);
    assert_eq!(quota.voter_count, 10);
    assert_eq!(quota.remaining_rooms, 0);
}

#[tokio::test]
async fn test_other_admins_room_is_forbidden() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);
    provision_admin(&state, "organizer", 5, 100).await;
    provision_admin(&state, "intruder", 5, 100).await;
    let owner_token: String = login(&app, "organizer").await;
    let intruder_token: String = login(&app, "intruder").await;
    let (room_id, _) = create_limited_room(&app, &owner_token, 3).await;

    for uri in [
        format!("/admin/rooms/{room_id}/realtime"),
        format!("/admin/rooms/{room_id}/tally"),
        format!("/admin/rooms/{room_id}/tickets"),
        format!("/admin/rooms/{room_id}/candidates"),
    ] {
        let response = send(&app, "GET", &uri, Some(&intruder_token), None::<&()>).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = send(
        &app,
        "POST",
        &format!("/admin/rooms/{room_id}/close"),
        Some(&intruder_token),
        None::<&()>,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tally_and_manual_close_over_http() {
    let (state, _clock) = create_test_app_state();
    let app = app(&state);
    provision_admin(&state, "organizer", 5, 100).await;
    let token: String = login(&app, "organizer").await;
    let (room_id, candidate_id) = create_limited_room(&app, &token, 5).await;

    let ballot = serde_json::json!({ "room_id": room_id, "candidate_id": candidate_id });
    send(&app, "POST", "/voter/votes", None, Some(&ballot)).await;

    let response = send(
        &app,
        "GET",
        &format!("/admin/rooms/{room_id}/realtime"),
        Some(&token),
        None::<&()>,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let tally: TallyResponse = read_json(response).await;
    assert_eq!(tally.total_votes, 1);
    assert_eq!(tally.candidates[0].vote_count, 1);

    let response = send(
        &app,
        "POST",
        &format!("/admin/rooms/{room_id}/close"),
        Some(&token),
        None::<&()>,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "POST", "/voter/votes", None, Some(&ballot)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        "GET",
        &format!("/admin/rooms/{room_id}/tally"),
        Some(&token),
        None::<&()>,
    )
    .await;
    let tally: TallyResponse = read_json(response).await;
    assert_eq!(tally.session_state, "closed");
}
