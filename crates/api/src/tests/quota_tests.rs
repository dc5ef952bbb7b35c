// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_admin, room_request, setup};
use crate::error::ApiError;
use crate::quota::{check_room_quota, check_voter_quota, get_admin_quota};
use crate::request_response::{CreateTicketsBulkRequest, QuotaResponse};
use crate::rooms::create_room;
use crate::tickets::create_tickets_bulk;

#[test]
fn test_second_room_exceeds_room_quota() {
    let (mut persistence, clock) = setup();
    let admin = create_test_admin(&mut persistence, &clock, "organizer", 1, 100);

    assert!(check_room_quota(&mut persistence, admin.admin_id).is_ok());
    create_room(
        &mut persistence,
        &clock,
        &admin,
        &room_request("wild_unlimited", None),
    )
    .unwrap();

    assert!(matches!(
        check_room_quota(&mut persistence, admin.admin_id),
        Err(ApiError::QuotaExceeded { .. })
    ));
    assert!(matches!(
        create_room(
            &mut persistence,
            &clock,
            &admin,
            &room_request("wild_unlimited", None)
        ),
        Err(ApiError::QuotaExceeded { .. })
    ));
}

#[test]
fn test_limited_room_capacity_counts_against_voter_quota() {
    let (mut persistence, clock) = setup();
    let admin = create_test_admin(&mut persistence, &clock, "organizer", 5, 10);

    create_room(
        &mut persistence,
        &clock,
        &admin,
        &room_request("wild_limited", Some(6)),
    )
    .unwrap();

    assert!(check_voter_quota(&mut persistence, admin.admin_id, 4).is_ok());
    assert!(matches!(
        check_voter_quota(&mut persistence, admin.admin_id, 5),
        Err(ApiError::QuotaExceeded { .. })
    ));
    assert!(matches!(
        create_room(
            &mut persistence,
            &clock,
            &admin,
            &room_request("wild_limited", Some(5))
        ),
        Err(ApiError::QuotaExceeded { .. })
    ));
}

#[test]
fn test_negative_projection_is_invalid() {
    let (mut persistence, clock) = setup();
    let admin = create_test_admin(&mut persistence, &clock, "organizer", 5, 10);

    assert!(matches!(
        check_voter_quota(&mut persistence, admin.admin_id, -1),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_admin_quota_reports_usage_and_headroom() {
    let (mut persistence, clock) = setup();
    let admin = create_test_admin(&mut persistence, &clock, "organizer", 3, 20);

    create_room(
        &mut persistence,
        &clock,
        &admin,
        &room_request("wild_limited", Some(5)),
    )
    .unwrap();
    let ticket_room: i64 = create_room(
        &mut persistence,
        &clock,
        &admin,
        &room_request("custom_tickets", None),
    )
    .unwrap()
    .room_id;
    create_tickets_bulk(
        &mut persistence,
        &clock,
        &admin,
        ticket_room,
        &CreateTicketsBulkRequest {
            codes: vec![String::from("Q1"), String::from("Q2")],
        },
    )
    .unwrap();
    create_room(
        &mut persistence,
        &clock,
        &admin,
        &room_request("wild_unlimited", None),
    )
    .unwrap();

    let quota: QuotaResponse = get_admin_quota(&mut persistence, admin.admin_id).unwrap();
    assert_eq!(
        quota,
        QuotaResponse {
            max_room: 3,
            max_voters: 20,
            room_count: 3,
            voter_count: 7,
            remaining_rooms: 0,
            remaining_voters: 13,
        }
    );
}

#[test]
fn test_unknown_admin_quota_is_not_found() {
    let (mut persistence, _clock) = setup();

    assert!(matches!(
        get_admin_quota(&mut persistence, 999),
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Admin"
    ));
    assert!(matches!(
        check_room_quota(&mut persistence, 999),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
