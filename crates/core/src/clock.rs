// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time source abstraction.
//!
//! Every rule that depends on "now" takes the instant as an argument.
//! Callers obtain it from a [`Clock`] so tests can pin or advance time.

use std::sync::{Mutex, PoisonError};
use time::{Duration, OffsetDateTime};

/// A source of the current UTC instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<OffsetDateTime>,
}

impl FixedClock {
    /// Creates a clock pinned at `instant`.
    #[must_use]
    pub const fn new(instant: OffsetDateTime) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: OffsetDateTime) {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += duration;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
