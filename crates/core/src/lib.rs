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
#![allow(clippy::multiple_crate_versions)]

mod clock;
mod eligibility;
mod error;
mod session;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use eligibility::{
    VOTER_IDENTIFIER_PREFIX, VoterPolicy, check_room_accepts_votes, check_room_open_for_voters,
    mint_voter_identifier, resolve_voter_policy,
};
pub use error::CoreError;
pub use session::{limit_reached, should_close_session};
