// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pemilo_domain::{PublishState, Room, RoomStatus, SessionState, VotersType};
use time::OffsetDateTime;
use time::macros::datetime;

pub const WINDOW_START: OffsetDateTime = datetime!(2026-06-01 08:00 UTC);
pub const WINDOW_END: OffsetDateTime = datetime!(2026-06-01 18:00 UTC);

pub fn create_test_room(voters_type: VotersType) -> Room {
    let (voters_limit, session_start, session_end) = match voters_type {
        VotersType::CustomTickets => (None, None, None),
        VotersType::WildLimited => (Some(2), None, None),
        VotersType::WildUnlimited => (None, Some(WINDOW_START), Some(WINDOW_END)),
    };
    Room {
        room_id: Some(10),
        admin_id: 1,
        name: String::from("Class President"),
        voters_type,
        voters_limit,
        session_start,
        session_end,
        status: RoomStatus::Enabled,
        publish_state: PublishState::Published,
        session_state: SessionState::Open,
    }
}
