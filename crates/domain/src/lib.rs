// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod login_throttle;
mod quota;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::{DomainError, ErrorCategory};
pub use login_throttle::{
    ATTEMPT_RETENTION, LOCKOUT_WINDOW, MAX_FAILED_ATTEMPTS, attempt_retention_cutoff,
    evaluate_lockout, lockout_window_start,
};
pub use quota::{check_room_quota, check_voter_quota};
pub use types::{
    AdminUsage, Candidate, CandidateTally, PublishState, Room, RoomStatus, SessionState,
    SubCandidate, Ticket, Vote, VotersType,
};
pub use validation::{
    validate_admin_fields, validate_candidate_name, validate_quota_ceiling, validate_ticket_batch,
    validate_ticket_code,
};
