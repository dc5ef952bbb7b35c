// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod room_tests;
mod vote_tests;

use pemilo_domain::{Candidate, PublishState, Room, RoomStatus, SessionState, Vote, VotersType};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

/// The instant every test treats as "now".
pub const TEST_NOW: OffsetDateTime = datetime!(2026-03-01 09:00:00 UTC);

/// Creates an admin with the given ceilings and returns its ID.
pub fn create_test_admin(
    persistence: &mut Persistence,
    username: &str,
    max_room: i64,
    max_voters: i64,
) -> i64 {
    persistence
        .create_admin(username, "correct-horse", max_room, max_voters, TEST_NOW)
        .expect("admin should be created")
}

/// Builds an open, published, enabled room of the given voters type.
pub fn build_room(admin_id: i64, voters_type: VotersType, voters_limit: Option<i64>) -> Room {
    let (session_start, session_end) = if voters_type == VotersType::WildUnlimited {
        (
            Some(datetime!(2026-03-01 08:00:00 UTC)),
            Some(datetime!(2026-03-01 17:00:00 UTC)),
        )
    } else {
        (None, None)
    };

    Room {
        room_id: None,
        admin_id,
        name: String::from("Student Council"),
        voters_type,
        voters_limit,
        session_start,
        session_end,
        status: RoomStatus::Enabled,
        publish_state: PublishState::Published,
        session_state: SessionState::Open,
    }
}

/// Creates a room with one candidate. Returns `(room_id, candidate_id)`.
pub fn create_room_with_candidate(
    persistence: &mut Persistence,
    admin_id: i64,
    voters_type: VotersType,
    voters_limit: Option<i64>,
) -> (i64, i64) {
    let room: Room = build_room(admin_id, voters_type, voters_limit);
    let room_id: i64 = persistence
        .create_room_with_quota(&room, TEST_NOW)
        .expect("room should be created");
    let candidate_id: i64 = persistence
        .create_candidate(&build_candidate(room_id, "Alice"), TEST_NOW)
        .expect("candidate should be created");
    (room_id, candidate_id)
}

pub fn build_candidate(room_id: i64, name: &str) -> Candidate {
    Candidate {
        candidate_id: None,
        room_id,
        name: name.to_string(),
        photo_url: format!("https://img.example/{name}.png"),
        description: format!("{name} for council"),
    }
}

pub fn build_vote(room_id: i64, candidate_id: i64, voter_identifier: &str) -> Vote {
    Vote {
        vote_id: None,
        room_id,
        candidate_id,
        sub_candidate_id: None,
        voter_identifier: voter_identifier.to_string(),
        created_at: TEST_NOW,
    }
}
