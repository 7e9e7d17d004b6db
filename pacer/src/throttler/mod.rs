// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Leading-and-trailing throttle for plain functions.
//!
//! This implements **leading + trailing throttle** semantics:
//! - A call outside the cooldown window executes immediately, synchronously,
//!   and opens a new window of `limit`
//! - Calls inside the window are coalesced: each one cancels the pending
//!   trailing call and re-arms it for the end of the window with its own
//!   arguments, so the trailing execution always carries the latest call
//! - A call exactly `limit` after the last execution is outside the window
//! - A zero `limit` never throttles
//!
//! # Example
//!
//! ```rust
//! use pacer::{ThrottleExt, ThrottleState};
//! use pacer_test_utils::{CallRecorder, ManualScheduler};
//!
//! let scheduler = ManualScheduler::new();
//! let recorder = CallRecorder::new(&scheduler);
//! let on_scroll = recorder.callback().throttle_with(100, scheduler.clone());
//!
//! on_scroll.call(0);                  // leading edge, runs now
//! scheduler.advance_ms(20);
//! on_scroll.call(20);                 // coalesced
//! scheduler.advance_ms(30);
//! on_scroll.call(50);                 // replaces 20
//! assert_eq!(on_scroll.state(), ThrottleState::CoolingPending);
//!
//! scheduler.advance_ms(100);
//! assert_eq!(recorder.calls(), vec![(0, 0), (100, 50)]);
//! ```

mod implementation;

pub use implementation::{ThrottleState, Throttled};

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
use crate::DefaultScheduler;
use pacer_core::IntoInterval;
use pacer_runtime::{Clock, Scheduler};

/// Extension trait providing `throttle` on any function of one argument.
///
/// Functions of several arguments take a tuple; functions of none take `()`.
pub trait ThrottleExt<A>: Fn(A) + Send + Sync + Sized + 'static
where
    A: Send + 'static,
{
    /// Throttle on the default runtime's scheduler and clock.
    #[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
    fn throttle(self, limit: impl IntoInterval) -> Throttled<A, DefaultScheduler> {
        Throttled::new(self, limit, DefaultScheduler::default())
    }

    /// Throttle on an explicit scheduler and clock.
    fn throttle_with<S>(self, limit: impl IntoInterval, scheduler: S) -> Throttled<A, S>
    where
        S: Scheduler + Clock,
    {
        Throttled::new(self, limit, scheduler)
    }
}

impl<F, A> ThrottleExt<A> for F
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
{
}

/// Wrap `func` so it executes at most once per `limit`.
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub fn throttle<A, F>(func: F, limit: impl IntoInterval) -> Throttled<A, DefaultScheduler>
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
{
    Throttled::new(func, limit, DefaultScheduler::default())
}

/// [`throttle`] with an explicit scheduler and clock.
pub fn throttle_with<A, F, S>(func: F, limit: impl IntoInterval, scheduler: S) -> Throttled<A, S>
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
    S: Scheduler + Clock,
{
    Throttled::new(func, limit, scheduler)
}
