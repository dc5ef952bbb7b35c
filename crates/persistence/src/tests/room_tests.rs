// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room creation, quota enforcement and session closing.

use pemilo_domain::{AdminUsage, DomainError, Room, SessionState, VotersType};

use super::{TEST_NOW, build_candidate, build_room, create_test_admin};
use crate::{Persistence, PersistenceError};

#[test]
fn test_create_and_get_room() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 3, 100);

    let room = build_room(admin_id, VotersType::WildUnlimited, None);
    let room_id = persistence.create_room_with_quota(&room, TEST_NOW).unwrap();

    let stored: Room = persistence.get_room(room_id).unwrap().unwrap();
    assert_eq!(stored.room_id, Some(room_id));
    assert_eq!(stored.voters_type, VotersType::WildUnlimited);
    assert_eq!(stored.session_start, room.session_start);
    assert_eq!(stored.session_end, room.session_end);
    assert_eq!(stored.session_state, SessionState::Open);
}

#[test]
fn test_get_missing_room_returns_none() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.get_room(999).unwrap().is_none());
}

#[test]
fn test_room_quota_rejects_room_beyond_max_room() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 100);
    let room = build_room(admin_id, VotersType::CustomTickets, None);

    persistence.create_room_with_quota(&room, TEST_NOW).unwrap();
    let result = persistence.create_room_with_quota(&room, TEST_NOW);

    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::MaxRoomExceeded { max_room: 1 }
        ))
    );
    let usage = persistence.get_admin_usage(admin_id).unwrap().unwrap();
    assert_eq!(usage.room_count, 1);
}

#[test]
fn test_voter_quota_rejects_limited_room_that_does_not_fit() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 5, 100);

    let first = build_room(admin_id, VotersType::WildLimited, Some(80));
    persistence.create_room_with_quota(&first, TEST_NOW).unwrap();

    let second = build_room(admin_id, VotersType::WildLimited, Some(30));
    let result = persistence.create_room_with_quota(&second, TEST_NOW);

    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::MaxVotersExceeded {
                max_voters: 100,
                projected: 110,
            }
        ))
    );
}

#[test]
fn test_voter_quota_allows_exact_fit() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 5, 100);

    let first = build_room(admin_id, VotersType::WildLimited, Some(80));
    persistence.create_room_with_quota(&first, TEST_NOW).unwrap();
    let second = build_room(admin_id, VotersType::WildLimited, Some(20));
    assert!(persistence.create_room_with_quota(&second, TEST_NOW).is_ok());
}

#[test]
fn test_room_for_unknown_admin_is_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let room = build_room(42, VotersType::CustomTickets, None);

    let result = persistence.create_room_with_quota(&room, TEST_NOW);
    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(DomainError::AdminNotFound(42)))
    );
}

#[test]
fn test_admin_usage_counts_limits_and_tickets_but_not_unlimited_rooms() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 5, 100);

    let limited = build_room(admin_id, VotersType::WildLimited, Some(10));
    persistence.create_room_with_quota(&limited, TEST_NOW).unwrap();
    let unlimited = build_room(admin_id, VotersType::WildUnlimited, None);
    persistence.create_room_with_quota(&unlimited, TEST_NOW).unwrap();
    let ticketed = build_room(admin_id, VotersType::CustomTickets, None);
    let ticket_room_id = persistence.create_room_with_quota(&ticketed, TEST_NOW).unwrap();
    persistence
        .issue_tickets(
            ticket_room_id,
            &[String::from("A1"), String::from("A2"), String::from("A3")],
            TEST_NOW,
        )
        .unwrap();

    let usage: AdminUsage = persistence.get_admin_usage(admin_id).unwrap().unwrap();
    assert_eq!(usage.room_count, 3);
    assert_eq!(usage.voter_count, 13);
    assert_eq!(usage.max_room, 5);
    assert_eq!(usage.max_voters, 100);
}

#[test]
fn test_close_room_session_is_idempotent() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 100);
    let room = build_room(admin_id, VotersType::CustomTickets, None);
    let room_id = persistence.create_room_with_quota(&room, TEST_NOW).unwrap();

    assert!(persistence.close_room_session(room_id).unwrap());
    assert!(!persistence.close_room_session(room_id).unwrap());

    let stored = persistence.get_room(room_id).unwrap().unwrap();
    assert_eq!(stored.session_state, SessionState::Closed);
}

#[test]
fn test_candidates_and_sub_candidates_are_listed_per_room() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 2, 100);
    let room = build_room(admin_id, VotersType::CustomTickets, None);
    let room_id = persistence.create_room_with_quota(&room, TEST_NOW).unwrap();
    let other_room_id = persistence.create_room_with_quota(&room, TEST_NOW).unwrap();

    let alice = persistence
        .create_candidate(&build_candidate(room_id, "Alice"), TEST_NOW)
        .unwrap();
    persistence
        .create_candidate(&build_candidate(room_id, "Bob"), TEST_NOW)
        .unwrap();
    persistence
        .create_candidate(&build_candidate(other_room_id, "Carol"), TEST_NOW)
        .unwrap();
    let mate = pemilo_domain::SubCandidate {
        sub_candidate_id: None,
        candidate_id: alice,
        name: String::from("Dave"),
        photo_url: String::from("https://img.example/dave.png"),
        description: None,
    };
    let mate_id = persistence.create_sub_candidate(&mate, TEST_NOW).unwrap();

    let names: Vec<String> = persistence
        .list_candidates(room_id)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec![String::from("Alice"), String::from("Bob")]);

    let subs = persistence.list_sub_candidates(room_id).unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].sub_candidate_id, Some(mate_id));
    assert!(persistence.list_sub_candidates(other_room_id).unwrap().is_empty());
}

#[test]
fn test_candidate_for_missing_room_fails_foreign_key() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let result = persistence.create_candidate(&build_candidate(777, "Ghost"), TEST_NOW);
    assert!(result.is_err());
}
