// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote recording and tallies.

use pemilo_domain::{CandidateTally, DomainError, SessionState, VotersType};
use time::Duration;

use super::{TEST_NOW, build_candidate, build_vote, create_room_with_candidate, create_test_admin};
use crate::{LimitedVoteOutcome, Persistence, PersistenceError};

#[test]
fn test_ticket_vote_redeems_ticket_and_records_vote() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 10);
    let (room_id, candidate_id) =
        create_room_with_candidate(&mut persistence, admin_id, VotersType::CustomTickets, None);
    let ticket = persistence
        .issue_tickets(room_id, &[String::from("T1")], TEST_NOW)
        .unwrap()
        .remove(0);

    persistence
        .record_ticket_vote(ticket.ticket_id, &build_vote(room_id, candidate_id, "T1"))
        .unwrap();

    assert!(persistence.voter_has_voted(room_id, "T1").unwrap());
    assert_eq!(persistence.count_votes(room_id).unwrap(), 1);
    let stored = persistence.find_ticket_by_code(room_id, "T1").unwrap().unwrap();
    assert!(stored.is_used);
}

#[test]
fn test_reused_ticket_is_rejected_without_second_vote() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 10);
    let (room_id, candidate_id) =
        create_room_with_candidate(&mut persistence, admin_id, VotersType::CustomTickets, None);
    let ticket = persistence
        .issue_tickets(room_id, &[String::from("T1")], TEST_NOW)
        .unwrap()
        .remove(0);
    let vote = build_vote(room_id, candidate_id, "T1");

    persistence.record_ticket_vote(ticket.ticket_id, &vote).unwrap();
    let result = persistence.record_ticket_vote(ticket.ticket_id, &vote);

    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(DomainError::TicketAlreadyUsed))
    );
    assert_eq!(persistence.count_votes(room_id).unwrap(), 1);
}

#[test]
fn test_failed_vote_insert_rolls_back_ticket_redemption() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 10);
    let (room_id, candidate_id) =
        create_room_with_candidate(&mut persistence, admin_id, VotersType::CustomTickets, None);
    let tickets = persistence
        .issue_tickets(room_id, &[String::from("T1"), String::from("T2")], TEST_NOW)
        .unwrap();

    // A vote already exists for identifier "T2"; redeeming ticket T2 with
    // that identifier must fail and leave the ticket unused.
    persistence
        .insert_vote_if_absent(&build_vote(room_id, candidate_id, "T2"))
        .unwrap();
    let retry = build_vote(room_id, candidate_id, "T2");
    let result = persistence.record_ticket_vote(tickets[1].ticket_id, &retry);

    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(DomainError::VoterAlreadyVoted))
    );
    let stored = persistence.find_ticket_by_code(room_id, "T2").unwrap().unwrap();
    assert!(!stored.is_used, "redemption must roll back with the vote");
}

#[test]
fn test_limited_votes_close_session_at_limit() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 10);
    let (room_id, candidate_id) =
        create_room_with_candidate(&mut persistence, admin_id, VotersType::WildLimited, Some(2));

    let first: LimitedVoteOutcome = persistence
        .record_limited_vote(&build_vote(room_id, candidate_id, "voter_a"))
        .unwrap();
    assert_eq!(first.total_votes, 1);
    assert!(!first.session_closed);

    let second: LimitedVoteOutcome = persistence
        .record_limited_vote(&build_vote(room_id, candidate_id, "voter_b"))
        .unwrap();
    assert_eq!(second.total_votes, 2);
    assert!(second.session_closed);

    let room = persistence.get_room(room_id).unwrap().unwrap();
    assert_eq!(room.session_state, SessionState::Closed);

    let third = persistence.record_limited_vote(&build_vote(room_id, candidate_id, "voter_c"));
    assert_eq!(
        third,
        Err(PersistenceError::DomainViolation(DomainError::VoteLimitReached))
    );
    assert_eq!(persistence.count_votes(room_id).unwrap(), 2);
}

#[test]
fn test_limited_duplicate_voter_does_not_consume_slot() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 10);
    let (room_id, candidate_id) =
        create_room_with_candidate(&mut persistence, admin_id, VotersType::WildLimited, Some(2));

    persistence
        .record_limited_vote(&build_vote(room_id, candidate_id, "voter_a"))
        .unwrap();
    let duplicate = persistence.record_limited_vote(&build_vote(room_id, candidate_id, "voter_a"));
    assert_eq!(
        duplicate,
        Err(PersistenceError::DomainViolation(DomainError::VoterAlreadyVoted))
    );

    let outcome = persistence
        .record_limited_vote(&build_vote(room_id, candidate_id, "voter_b"))
        .unwrap();
    assert_eq!(outcome.total_votes, 2);
}

#[test]
fn test_open_vote_rejects_second_vote_from_same_voter() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 10);
    let (room_id, candidate_id) =
        create_room_with_candidate(&mut persistence, admin_id, VotersType::WildUnlimited, None);

    persistence
        .record_open_vote(&build_vote(room_id, candidate_id, "voter_x"))
        .unwrap();
    let result = persistence.record_open_vote(&build_vote(room_id, candidate_id, "voter_x"));

    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(DomainError::VoterAlreadyVoted))
    );
}

#[test]
fn test_tallies_order_and_zero_fill() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "admin", 1, 10);
    let (room_id, alice) =
        create_room_with_candidate(&mut persistence, admin_id, VotersType::WildUnlimited, None);
    let bob = persistence
        .create_candidate(&build_candidate(room_id, "Bob"), TEST_NOW)
        .unwrap();
    let carol = persistence
        .create_candidate(&build_candidate(room_id, "Carol"), TEST_NOW)
        .unwrap();

    let mut late_vote = build_vote(room_id, bob, "voter_2");
    late_vote.created_at = TEST_NOW + Duration::minutes(5);
    persistence
        .record_open_vote(&build_vote(room_id, bob, "voter_1"))
        .unwrap();
    persistence.record_open_vote(&late_vote).unwrap();
    persistence
        .record_open_vote(&build_vote(room_id, alice, "voter_3"))
        .unwrap();

    let historical: Vec<CandidateTally> = persistence.count_votes_by_candidate(room_id).unwrap();
    assert_eq!(historical.len(), 2, "candidates without votes are omitted");
    assert_eq!(historical[0].candidate_id, bob);
    assert_eq!(historical[0].vote_count, 2);
    assert_eq!(historical[0].last_vote_at, Some(late_vote.created_at));
    assert_eq!(historical[1].candidate_id, alice);

    let realtime: Vec<CandidateTally> = persistence.realtime_tally(room_id).unwrap();
    let ids: Vec<i64> = realtime.iter().map(|t| t.candidate_id).collect();
    assert_eq!(ids, vec![alice, bob, carol]);
    assert_eq!(realtime[2].vote_count, 0);
    assert_eq!(realtime[2].last_vote_at, None);
    assert_eq!(realtime[2].candidate_name, "Carol");
}
