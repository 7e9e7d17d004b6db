// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Normalisation of wait and limit intervals.
//!
//! Integer and float values are milliseconds. Values that make no sense as
//! a delay (negative numbers, NaN) clamp to zero, meaning "as soon as
//! possible". Nothing here ever fails.

use core::time::Duration;

/// Conversion into a non-negative interval.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use pacer_core::IntoInterval;
///
/// assert_eq!(250_u64.into_interval(), Duration::from_millis(250));
/// assert_eq!((-5_i64).into_interval(), Duration::ZERO);
/// assert_eq!(f64::NAN.into_interval(), Duration::ZERO);
/// assert_eq!(1000.0_f64.into_interval(), Duration::from_secs(1));
/// ```
pub trait IntoInterval {
    fn into_interval(self) -> Duration;
}

impl IntoInterval for Duration {
    fn into_interval(self) -> Duration {
        self
    }
}

impl IntoInterval for u64 {
    fn into_interval(self) -> Duration {
        Duration::from_millis(self)
    }
}

impl IntoInterval for u32 {
    fn into_interval(self) -> Duration {
        Duration::from_millis(u64::from(self))
    }
}

impl IntoInterval for i64 {
    fn into_interval(self) -> Duration {
        u64::try_from(self).map_or(Duration::ZERO, Duration::from_millis)
    }
}

impl IntoInterval for i32 {
    fn into_interval(self) -> Duration {
        i64::from(self).into_interval()
    }
}

impl IntoInterval for f64 {
    fn into_interval(self) -> Duration {
        if self.is_nan() || self <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self / 1000.0).unwrap_or(Duration::MAX)
    }
}
