// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sliding-window lockout rule for admin logins.

use time::{Duration, OffsetDateTime};

use crate::error::DomainError;

/// Failed attempts inside the window that trigger a lockout.
pub const MAX_FAILED_ATTEMPTS: i64 = 3;

/// Length of both the failure lookback and the lockout itself.
pub const LOCKOUT_WINDOW: Duration = Duration::minutes(5);

/// Attempts older than this are eligible for cleanup.
pub const ATTEMPT_RETENTION: Duration = Duration::hours(24);

/// Returns the earliest `attempt_at` that still counts toward a lockout.
#[must_use]
pub fn lockout_window_start(now: OffsetDateTime) -> OffsetDateTime {
    now - LOCKOUT_WINDOW
}

/// Returns the cutoff before which attempts may be deleted.
#[must_use]
pub fn attempt_retention_cutoff(now: OffsetDateTime) -> OffsetDateTime {
    now - ATTEMPT_RETENTION
}

/// Decides whether a login identifier is currently locked out.
///
/// `recent_failures` is the number of failed attempts since
/// [`lockout_window_start`]. `last_attempt_at` is the most recent attempt of
/// any outcome. The lockout lasts [`LOCKOUT_WINDOW`] from that attempt.
///
/// # Errors
///
/// Returns `RateLimitExceeded` carrying the remaining wait, rounded to the
/// nearest second.
pub fn evaluate_lockout(
    recent_failures: i64,
    last_attempt_at: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if recent_failures < MAX_FAILED_ATTEMPTS {
        return Ok(());
    }

    let Some(last_attempt_at) = last_attempt_at else {
        return Ok(());
    };

    let elapsed: Duration = now - last_attempt_at;
    if elapsed >= LOCKOUT_WINDOW {
        return Ok(());
    }

    Err(DomainError::RateLimitExceeded {
        remaining: round_to_seconds(LOCKOUT_WINDOW - elapsed),
    })
}

fn round_to_seconds(duration: Duration) -> Duration {
    let mut seconds: i64 = duration.whole_seconds();
    if duration.subsec_milliseconds() >= 500 {
        seconds += 1;
    }
    Duration::seconds(seconds)
}
