// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Pemilo voting system.
//!
//! This crate owns the durable store: rooms, candidates, tickets, votes,
//! admin accounts, sessions and login attempts. It is built on Diesel over
//! `SQLite`.
//!
//! ## Atomic Units
//!
//! The store is where the voting guarantees are actually enforced. Each of
//! these runs as one `IMMEDIATE` transaction:
//!
//! - Ticket redemption together with its vote insert
//! - Admission of a `wild_limited` vote against the room's limit, plus the
//!   automatic session close when the limit is hit
//! - Room creation together with its quota checks
//! - Ticket batch issuance together with its duplicate and quota checks
//! - The login throttle check together with the attempt it records
//!
//! Unique indexes on `(room_id, voter_identifier)` and `(room_id, code)`
//! back up the transactional checks.
//!
//! ## Testing
//!
//! - `new_in_memory()` gives every caller an isolated shared-cache database
//! - `new_with_file()` opens a WAL-mode file database and migrates it
//! - `open_file()` opens further connections to that file; several handles
//!   may be opened on the same file to exercise concurrent writers

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use pemilo_domain::{
    AdminUsage, Candidate, CandidateTally, Room, SubCandidate, Ticket, Vote,
    attempt_retention_cutoff,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

use crate::backend::sqlite::StoreKind;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamp;

#[cfg(test)]
mod tests;

pub use data_models::{
    AdminData, AdminUpdate, LimitedVoteOutcome, LoginAttemptData, SessionData,
};
pub use error::PersistenceError;
pub use queries::admins::verify_password;

fn path_str(path: &Path) -> Result<&str, PersistenceError> {
    path.to_str()
        .ok_or_else(|| PersistenceError::InitializationError("Invalid database path".to_string()))
}

/// Persistence adapter for the voting store.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::initialize_database(&shared_memory_url, StoreKind::Memory)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection =
            backend::sqlite::initialize_database(path_str(path.as_ref())?, StoreKind::File)?;

        Ok(Self { conn })
    }

    /// Opens another connection to a file database that `new_with_file` has
    /// already initialized, without re-running migrations.
    ///
    /// Handles opened this way are independent: each one is a separate
    /// `SQLite` connection, so writers contend on the database lock rather
    /// than on anything in this process.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection =
            backend::sqlite::open_connection(path_str(path.as_ref())?, StoreKind::File)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    /// Creates a room, enforcing the owning admin's room and voter quotas.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation` for quota failures or an unknown admin, or
    /// a database error.
    pub fn create_room_with_quota(
        &mut self,
        room: &Room,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::rooms::create_room_with_quota(&mut self.conn, room, now)
    }

    /// Retrieves a room by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_room(&mut self, room_id: i64) -> Result<Option<Room>, PersistenceError> {
        queries::rooms::get_room(&mut self.conn, room_id)
    }

    /// Closes a room's session. Returns `true` if this call closed it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn close_room_session(&mut self, room_id: i64) -> Result<bool, PersistenceError> {
        mutations::rooms::close_room_session(&mut self.conn, room_id)
    }

    // ========================================================================
    // Candidates
    // ========================================================================

    /// Creates a candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_candidate(
        &mut self,
        candidate: &Candidate,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::candidates::insert_candidate(&mut self.conn, candidate, now)
    }

    /// Creates a sub-candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_sub_candidate(
        &mut self,
        sub_candidate: &SubCandidate,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::candidates::insert_sub_candidate(&mut self.conn, sub_candidate, now)
    }

    /// Retrieves a candidate by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_candidate(
        &mut self,
        candidate_id: i64,
    ) -> Result<Option<Candidate>, PersistenceError> {
        queries::candidates::get_candidate(&mut self.conn, candidate_id)
    }

    /// Retrieves a sub-candidate by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_sub_candidate(
        &mut self,
        sub_candidate_id: i64,
    ) -> Result<Option<SubCandidate>, PersistenceError> {
        queries::candidates::get_sub_candidate(&mut self.conn, sub_candidate_id)
    }

    /// Lists a room's candidates ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_candidates(&mut self, room_id: i64) -> Result<Vec<Candidate>, PersistenceError> {
        queries::candidates::list_candidates(&mut self.conn, room_id)
    }

    /// Lists all sub-candidates belonging to a room's candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_sub_candidates(
        &mut self,
        room_id: i64,
    ) -> Result<Vec<SubCandidate>, PersistenceError> {
        queries::candidates::list_sub_candidates_for_room(&mut self.conn, room_id)
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Issues a batch of tickets. All or nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation` for an invalid batch, a duplicate code, a
    /// non-ticket room or a quota failure, or a database error.
    pub fn issue_tickets(
        &mut self,
        room_id: i64,
        codes: &[String],
        now: OffsetDateTime,
    ) -> Result<Vec<Ticket>, PersistenceError> {
        mutations::tickets::issue_tickets(&mut self.conn, room_id, codes, now)
    }

    /// Finds a ticket by code within a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_ticket_by_code(
        &mut self,
        room_id: i64,
        code: &str,
    ) -> Result<Option<Ticket>, PersistenceError> {
        queries::tickets::find_ticket_by_code(&mut self.conn, room_id, code)
    }

    /// Lists a room's tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_tickets(&mut self, room_id: i64) -> Result<Vec<Ticket>, PersistenceError> {
        queries::tickets::list_tickets(&mut self.conn, room_id)
    }

    /// Marks a ticket used if it is still unused. Returns `true` on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn redeem_ticket_if_unused(
        &mut self,
        ticket_id: i64,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        mutations::tickets::redeem_ticket_if_unused(&mut self.conn, ticket_id, now)
    }

    // ========================================================================
    // Votes
    // ========================================================================

    /// Inserts a vote unless the voter already voted. Returns the new ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_vote_if_absent(&mut self, vote: &Vote) -> Result<Option<i64>, PersistenceError> {
        mutations::votes::insert_vote_if_absent(&mut self.conn, vote)
    }

    /// Redeems a ticket and records its vote atomically.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation(TicketAlreadyUsed | VoterAlreadyVoted)` or a
    /// database error.
    pub fn record_ticket_vote(
        &mut self,
        ticket_id: i64,
        vote: &Vote,
    ) -> Result<i64, PersistenceError> {
        mutations::votes::record_ticket_vote(&mut self.conn, ticket_id, vote)
    }

    /// Admits and records a vote in a `wild_limited` room.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation(VoteLimitReached | VoterAlreadyVoted)` or a
    /// database error.
    pub fn record_limited_vote(
        &mut self,
        vote: &Vote,
    ) -> Result<LimitedVoteOutcome, PersistenceError> {
        mutations::votes::record_limited_vote(&mut self.conn, vote)
    }

    /// Records a vote in a `wild_unlimited` room.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation(VoterAlreadyVoted)` or a database error.
    pub fn record_open_vote(&mut self, vote: &Vote) -> Result<i64, PersistenceError> {
        mutations::votes::record_open_vote(&mut self.conn, vote)
    }

    /// Counts the votes recorded in a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_votes(&mut self, room_id: i64) -> Result<i64, PersistenceError> {
        queries::votes::count_votes(&mut self.conn, room_id)
    }

    /// Returns whether a voter identifier already voted in a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn voter_has_voted(
        &mut self,
        room_id: i64,
        voter_identifier: &str,
    ) -> Result<bool, PersistenceError> {
        queries::votes::voter_has_voted(&mut self.conn, room_id, voter_identifier)
    }

    /// Historical per-candidate counts, highest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_votes_by_candidate(
        &mut self,
        room_id: i64,
    ) -> Result<Vec<CandidateTally>, PersistenceError> {
        queries::votes::count_votes_by_candidate(&mut self.conn, room_id)
    }

    /// Realtime per-candidate counts for every candidate, by candidate ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn realtime_tally(
        &mut self,
        room_id: i64,
    ) -> Result<Vec<CandidateTally>, PersistenceError> {
        queries::votes::realtime_tally(&mut self.conn, room_id)
    }

    // ========================================================================
    // Admins
    // ========================================================================

    /// Creates an admin account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation(AdminExists)` if the username is taken,
    /// `DomainViolation` for invalid fields, or a database error.
    pub fn create_admin(
        &mut self,
        username: &str,
        password: &str,
        max_room: i64,
        max_voters: i64,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::admins::create_admin(
            &mut self.conn,
            username,
            password,
            max_room,
            max_voters,
            now,
        )
    }

    /// Retrieves an admin by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_admin_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<AdminData>, PersistenceError> {
        queries::admins::get_admin_by_username(&mut self.conn, username)
    }

    /// Retrieves an admin by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_admin_by_id(
        &mut self,
        admin_id: i64,
    ) -> Result<Option<AdminData>, PersistenceError> {
        queries::admins::get_admin_by_id(&mut self.conn, admin_id)
    }

    /// Changes an admin's ceilings or active flag and returns the stored
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation(AdminNotFound | InvalidQuota)` or a database
    /// error.
    pub fn update_admin(
        &mut self,
        admin_id: i64,
        update: AdminUpdate,
    ) -> Result<AdminData, PersistenceError> {
        mutations::admins::update_admin(&mut self.conn, admin_id, update)
    }

    /// Computes an admin's ceilings and current usage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_admin_usage(
        &mut self,
        admin_id: i64,
    ) -> Result<Option<AdminUsage>, PersistenceError> {
        queries::admins::get_admin_usage(&mut self.conn, admin_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates an admin session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        admin_id: i64,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(
            &mut self.conn,
            session_token,
            admin_id,
            created_at,
            expires_at,
        )
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Login Attempts
    // ========================================================================

    /// Appends a login attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_login_attempt(
        &mut self,
        identifier: &str,
        success: bool,
        attempt_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::login_attempts::record_login_attempt(
            &mut self.conn,
            identifier,
            success,
            attempt_at,
        )
    }

    /// Counts failed attempts for an identifier at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_recent_failures(
        &mut self,
        identifier: &str,
        since: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        queries::login_attempts::count_recent_failures(&mut self.conn, identifier, since)
    }

    /// Returns the most recent attempt of any outcome for an identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn most_recent_attempt(
        &mut self,
        identifier: &str,
    ) -> Result<Option<LoginAttemptData>, PersistenceError> {
        queries::login_attempts::most_recent_attempt(&mut self.conn, identifier)
    }

    /// Checks the lockout and records a provisional failed attempt.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation(RateLimitExceeded)` if locked out, or a
    /// database error.
    pub fn reserve_login_attempt(
        &mut self,
        identifier: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::login_attempts::reserve_login_attempt(&mut self.conn, identifier, now)
    }

    /// Marks a reserved attempt as successful.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_login_attempt_succeeded(
        &mut self,
        attempt_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::login_attempts::mark_login_attempt_succeeded(&mut self.conn, attempt_id)
    }

    /// Deletes attempts older than the retention period.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn cleanup_login_attempts(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::login_attempts::cleanup_login_attempts(
            &mut self.conn,
            attempt_retention_cutoff(now),
        )
    }
}
