// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Operations that must observe and modify state as one unit open an
//! `IMMEDIATE` transaction, which takes the database write lock up front so
//! a concurrent writer waits on the busy timeout instead of interleaving.

pub mod admins;
pub mod candidates;
pub mod login_attempts;
pub mod rooms;
pub mod sessions;
pub mod tickets;
pub mod votes;
