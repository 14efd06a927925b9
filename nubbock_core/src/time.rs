// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic time in host ticks.
//!
//! The core never reads a clock. Embedders pass [`HostTime`] values taken
//! from whatever monotonic source their event loop uses, and the
//! [`TransformAnimator`](crate::animator::TransformAnimator) turns elapsed
//! time into whole animation ticks. Ticks are nanoseconds.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as monotonic host ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the time elapsed since `earlier`, or zero if `earlier` is later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Adds `duration`, returning `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// A span of host ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration of `ms` milliseconds at nanosecond tick resolution.
    #[inline]
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000_000)
    }

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns how many whole `period`s fit in `self`.
    ///
    /// A zero `period` yields zero.
    #[inline]
    #[must_use]
    pub const fn whole_periods(self, period: Self) -> u64 {
        if period.0 == 0 { 0 } else { self.0 / period.0 }
    }

    /// Multiplies by `n`, saturating at `u64::MAX` ticks.
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, n: u64) -> Self {
        Self(self.0.saturating_mul(n))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_are_nanosecond_ticks() {
        assert_eq!(Duration::from_millis(20).ticks(), 20_000_000);
    }

    #[test]
    fn whole_periods_floor() {
        let period = Duration::from_millis(20);
        assert_eq!(Duration::from_millis(59).whole_periods(period), 2);
        assert_eq!(Duration::from_millis(60).whole_periods(period), 3);
        assert_eq!(Duration::from_millis(60).whole_periods(Duration::ZERO), 0);
    }

    #[test]
    fn host_time_arithmetic() {
        let t = HostTime(1000);
        assert_eq!((t + Duration(200)).ticks(), 1200);
        assert_eq!(HostTime(1500) - t, Duration(500));
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(HostTime(u64::MAX).checked_add(Duration(1)), None);
    }
}
