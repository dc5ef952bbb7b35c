// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every function takes a `&mut SqliteConnection` so it can run either on
//! its own or inside a transaction opened by a mutation.

pub mod admins;
pub mod candidates;
pub mod login_attempts;
pub mod rooms;
pub mod sessions;
pub mod tickets;
pub mod votes;
