// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Pemilo voting system.
//!
//! Every operation takes the persistence layer and a [`pemilo::Clock`]
//! explicitly and returns an [`ApiError`] on rejection. Admin operations
//! additionally take the [`AuthenticatedAdmin`] resolved from a session
//! token and act only on rooms that admin owns.

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

mod admins;
mod auth;
mod error;
mod password_policy;
mod quota;
mod request_response;
mod rooms;
mod tickets;
mod voting;

#[cfg(test)]
mod tests;

pub use admins::{create_admin, update_admin};
pub use auth::{AuthenticatedAdmin, AuthenticationService};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use quota::{check_room_quota, check_voter_quota, get_admin_quota};
pub use request_response::{
    AdminInfo, CandidateInfo, CandidateTallyInfo, CastVoteRequest, CastVoteResponse,
    CloseSessionResponse, CreateAdminRequest, CreateCandidateRequest, CreateRoomRequest,
    CreateRoomResponse, CreateSubCandidateRequest, CreateTicketRequest, CreateTicketsBulkRequest,
    CreatedResponse, ListCandidatesResponse, LoginRequest, LoginResponse, QuotaResponse,
    SubCandidateInfo, TallyResponse, TicketInfo, TicketsResponse, UpdateAdminRequest,
    VerifyTicketRequest, VerifyTicketResponse, VoterRoomInfoResponse,
};
pub use rooms::{
    close_room_session, create_candidate, create_room, create_sub_candidate, list_candidates,
};
pub use tickets::{create_ticket, create_tickets_bulk, list_tickets, verify_ticket};
pub use voting::{cast_vote, get_realtime_tally, get_vote_tally, get_voter_room_info};
