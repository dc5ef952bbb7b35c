// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{DomainError, PublishState, Room, RoomStatus, SessionState, VotersType};

fn create_test_room(voters_type: VotersType) -> Room {
    Room {
        room_id: Some(1),
        admin_id: 1,
        name: String::from("Student Council 2026"),
        voters_type,
        voters_limit: None,
        session_start: None,
        session_end: None,
        status: RoomStatus::Enabled,
        publish_state: PublishState::Published,
        session_state: SessionState::Open,
    }
}

#[test]
fn test_voters_type_round_trips_through_str() {
    for voters_type in [
        VotersType::CustomTickets,
        VotersType::WildLimited,
        VotersType::WildUnlimited,
    ] {
        let parsed: VotersType = voters_type.as_str().parse().unwrap();
        assert_eq!(parsed, voters_type);
    }
}

#[test]
fn test_voters_type_rejects_unknown_value() {
    let result: Result<VotersType, DomainError> = "everyone".parse();
    assert_eq!(
        result,
        Err(DomainError::InvalidVotersType(String::from("everyone")))
    );
}

#[test]
fn test_only_custom_tickets_requires_ticket() {
    assert!(VotersType::CustomTickets.requires_ticket());
    assert!(!VotersType::WildLimited.requires_ticket());
    assert!(!VotersType::WildUnlimited.requires_ticket());
}

#[test]
fn test_state_enums_parse_stored_values() {
    assert_eq!("disabled".parse::<RoomStatus>(), Ok(RoomStatus::Disabled));
    assert_eq!("published".parse::<PublishState>(), Ok(PublishState::Published));
    assert_eq!("closed".parse::<SessionState>(), Ok(SessionState::Closed));
    assert!(matches!(
        "paused".parse::<SessionState>(),
        Err(DomainError::InvalidSessionState(_))
    ));
}

#[test]
fn test_session_state_only_allows_open_to_closed() {
    assert!(SessionState::Open.can_transition_to(SessionState::Closed));
    assert!(!SessionState::Closed.can_transition_to(SessionState::Open));
    assert!(!SessionState::Open.can_transition_to(SessionState::Open));
    assert!(!SessionState::Closed.can_transition_to(SessionState::Closed));

    assert_eq!(
        SessionState::Open.transition_to(SessionState::Closed),
        Ok(SessionState::Closed)
    );
    assert!(matches!(
        SessionState::Closed.transition_to(SessionState::Open),
        Err(DomainError::InvalidSessionTransition { .. })
    ));
}

#[test]
fn test_validate_accepts_custom_tickets_room() {
    let room: Room = create_test_room(VotersType::CustomTickets);
    assert!(room.validate().is_ok());
}

#[test]
fn test_validate_rejects_blank_name() {
    let mut room: Room = create_test_room(VotersType::CustomTickets);
    room.name = String::from("   ");
    assert_eq!(room.validate(), Err(DomainError::InvalidRoomName));
}

#[test]
fn test_validate_requires_positive_limit_for_wild_limited() {
    let mut room: Room = create_test_room(VotersType::WildLimited);
    assert_eq!(room.validate(), Err(DomainError::VotersLimitRequired));

    room.voters_limit = Some(0);
    assert_eq!(room.validate(), Err(DomainError::VotersLimitRequired));

    room.voters_limit = Some(-4);
    assert_eq!(room.validate(), Err(DomainError::VotersLimitRequired));

    room.voters_limit = Some(50);
    assert!(room.validate().is_ok());
}

#[test]
fn test_validate_requires_window_for_wild_unlimited() {
    let mut room: Room = create_test_room(VotersType::WildUnlimited);
    assert_eq!(room.validate(), Err(DomainError::SessionRangeRequired));

    room.session_start = Some(datetime!(2026-03-01 08:00 UTC));
    assert_eq!(room.validate(), Err(DomainError::SessionRangeRequired));

    room.session_end = Some(datetime!(2026-03-01 07:59 UTC));
    assert_eq!(room.validate(), Err(DomainError::InvalidSessionRange));

    room.session_end = Some(datetime!(2026-03-01 08:00 UTC));
    assert!(room.validate().is_ok());
}

#[test]
fn test_validate_rejects_limit_outside_wild_limited() {
    let mut tickets: Room = create_test_room(VotersType::CustomTickets);
    tickets.voters_limit = Some(5);
    assert_eq!(
        tickets.validate(),
        Err(DomainError::VotersLimitNotAllowed(VotersType::CustomTickets))
    );

    let mut open: Room = create_test_room(VotersType::WildUnlimited);
    open.session_start = Some(datetime!(2026-03-01 08:00 UTC));
    open.session_end = Some(datetime!(2026-03-01 17:00 UTC));
    open.voters_limit = Some(300);
    assert_eq!(
        open.validate(),
        Err(DomainError::VotersLimitNotAllowed(VotersType::WildUnlimited))
    );
}

#[test]
fn test_validate_rejects_window_outside_wild_unlimited() {
    let mut limited: Room = create_test_room(VotersType::WildLimited);
    limited.voters_limit = Some(40);
    limited.session_start = Some(datetime!(2020-01-01 08:00 UTC));
    limited.session_end = Some(datetime!(2020-01-01 17:00 UTC));
    assert_eq!(
        limited.validate(),
        Err(DomainError::SessionRangeNotAllowed(VotersType::WildLimited))
    );

    let mut tickets: Room = create_test_room(VotersType::CustomTickets);
    tickets.session_end = Some(datetime!(2026-03-01 17:00 UTC));
    assert_eq!(
        tickets.validate(),
        Err(DomainError::SessionRangeNotAllowed(VotersType::CustomTickets))
    );
}

#[test]
fn test_session_window_bounds_are_inclusive() {
    let start: OffsetDateTime = datetime!(2026-03-01 08:00 UTC);
    let end: OffsetDateTime = datetime!(2026-03-01 17:00 UTC);
    let mut room: Room = create_test_room(VotersType::WildUnlimited);
    room.session_start = Some(start);
    room.session_end = Some(end);

    assert!(!room.is_session_active(start - Duration::seconds(1)));
    assert!(room.is_session_active(start));
    assert!(room.is_session_active(datetime!(2026-03-01 12:30 UTC)));
    assert!(room.is_session_active(end));
    assert!(!room.is_session_active(end + Duration::seconds(1)));
}

#[test]
fn test_rooms_without_window_are_always_active() {
    let now: OffsetDateTime = datetime!(1999-12-31 23:59 UTC);
    assert!(create_test_room(VotersType::CustomTickets).is_session_active(now));
    assert!(create_test_room(VotersType::WildLimited).is_session_active(now));
    assert!(!create_test_room(VotersType::WildUnlimited).is_session_active(now));
}

#[test]
fn test_projected_voter_capacity_by_voters_type() {
    let mut limited: Room = create_test_room(VotersType::WildLimited);
    limited.voters_limit = Some(120);
    assert_eq!(limited.projected_voter_capacity(), 120);
    assert_eq!(
        create_test_room(VotersType::CustomTickets).projected_voter_capacity(),
        0
    );
    assert_eq!(
        create_test_room(VotersType::WildUnlimited).projected_voter_capacity(),
        0
    );
}
