// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;
use time::macros::datetime;

use crate::{Clock, FixedClock, SystemClock};

#[test]
fn test_fixed_clock_moves_only_when_told() {
    let clock: FixedClock = FixedClock::new(datetime!(2026-01-01 00:00 UTC));
    assert_eq!(clock.now(), datetime!(2026-01-01 00:00 UTC));

    clock.advance(Duration::minutes(5));
    assert_eq!(clock.now(), datetime!(2026-01-01 00:05 UTC));

    clock.set(datetime!(2027-01-01 00:00 UTC));
    assert_eq!(clock.now(), datetime!(2027-01-01 00:00 UTC));
}

#[test]
fn test_system_clock_is_utc() {
    assert!(SystemClock.now().offset().is_utc());
}
