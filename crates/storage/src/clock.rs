// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! A [`Clock`] is a way to get the current date and time.
//!
//! This is useful to be able to mock the clock in tests, instead of relying
//! on the system clock directly.

use std::sync::{Arc, atomic::AtomicI64};

use chrono::{DateTime, TimeZone, Utc};

/// Represents a clock which can give the current date and time
pub trait Clock: Sync + Send {
    /// Get the current date and time
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + Send + Sync + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// A clock which uses the system time
#[derive(Clone, Default)]
pub struct SystemClock {
    _private: (),
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        // This is the clock used elsewhere, it's fine to call Utc::now here
        #[allow(clippy::disallowed_methods)]
        Utc::now()
    }
}

/// A fake clock, which can be set to any time and advanced manually, only
/// useful in tests
pub struct MockClock {
    timestamp: AtomicI64,
}

impl Default for MockClock {
    fn default() -> Self {
        let datetime = Utc.with_ymd_and_hms(2026, 1, 16, 14, 40, 0).unwrap();
        Self::new(datetime)
    }
}

impl MockClock {
    /// Create a new clock which starts at the given datetime
    #[must_use]
    pub fn new(datetime: DateTime<Utc>) -> Self {
        let timestamp = AtomicI64::new(datetime.timestamp_millis());
        Self { timestamp }
    }

    /// Move the clock forward by the given amount of time
    pub fn advance(&self, duration: chrono::Duration) {
        self.timestamp.fetch_add(
            duration.num_milliseconds(),
            std::sync::atomic::Ordering::Relaxed,
        );
    }

    /// Set the clock to the given datetime
    pub fn jump(&self, datetime: DateTime<Utc>) {
        self.timestamp.store(
            datetime.timestamp_millis(),
            std::sync::atomic::Ordering::Relaxed,
        );
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        let timestamp = self.timestamp.load(std::sync::atomic::Ordering::Relaxed);
        chrono::TimeZone::timestamp_millis_opt(&Utc, timestamp).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_mocked_clock() {
        let clock = MockClock::default();

        // Time should be frozen, and stay the same on each call
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, second);

        clock.advance(Duration::try_seconds(10).unwrap());
        let third = clock.now();
        assert_eq!(first + Duration::try_seconds(10).unwrap(), third);
    }

    #[test]
    fn test_real_clock() {
        let clock = SystemClock::default();

        // The clock should advance on its own
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let second = clock.now();
        assert_ne!(first, second);
    }
}
