// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod quota_tests;

use pemilo::FixedClock;
use pemilo_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::auth::{AuthenticatedAdmin, AuthenticationService};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{CreateCandidateRequest, CreateRoomRequest};
use crate::rooms::{create_candidate, create_room};

/// The instant every test starts at.
pub const TEST_NOW: OffsetDateTime = datetime!(2026-03-01 09:00:00 UTC);

pub const TEST_PASSWORD: &str = "Ballot-Box-2026";

pub fn setup() -> (Persistence, FixedClock) {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("in-memory database should open");
    (persistence, FixedClock::new(TEST_NOW))
}

pub fn create_test_admin(
    persistence: &mut Persistence,
    clock: &FixedClock,
    username: &str,
    max_room: i64,
    max_voters: i64,
) -> AuthenticatedAdmin {
    let admin_id: i64 = AuthenticationService::provision_admin(
        persistence,
        clock,
        &PasswordPolicy::default(),
        username,
        TEST_PASSWORD,
        max_room,
        max_voters,
    )
    .expect("admin should be provisioned");
    AuthenticatedAdmin::new(admin_id, username.to_string())
}

pub fn room_request(voters_type: &str, voters_limit: Option<i64>) -> CreateRoomRequest {
    let (session_start, session_end) = if voters_type == "wild_unlimited" {
        (
            Some(datetime!(2026-03-01 08:00:00 UTC)),
            Some(datetime!(2026-03-01 17:00:00 UTC)),
        )
    } else {
        (None, None)
    };

    CreateRoomRequest {
        name: String::from("Class Representative"),
        voters_type: voters_type.to_string(),
        voters_limit,
        session_start,
        session_end,
        status: None,
        publish_state: None,
    }
}

/// Creates a room with two candidates. Returns `(room_id, [candidate ids])`.
pub fn create_room_with_candidates(
    persistence: &mut Persistence,
    clock: &FixedClock,
    admin: &AuthenticatedAdmin,
    voters_type: &str,
    voters_limit: Option<i64>,
) -> (i64, [i64; 2]) {
    let room_id: i64 = create_room(
        persistence,
        clock,
        admin,
        &room_request(voters_type, voters_limit),
    )
    .expect("room should be created")
    .room_id;

    let mut candidate_ids: [i64; 2] = [0; 2];
    for (slot, name) in candidate_ids.iter_mut().zip(["Ayu", "Bima"]) {
        *slot = create_candidate(
            persistence,
            clock,
            admin,
            room_id,
            &CreateCandidateRequest {
                name: name.to_string(),
                photo_url: String::new(),
                description: format!("{name} for class representative"),
            },
        )
        .expect("candidate should be created")
        .id;
    }

    (room_id, candidate_ids)
}
