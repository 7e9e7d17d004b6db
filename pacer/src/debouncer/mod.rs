// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Trailing debounce for plain functions.
//!
//! This implements **trailing debounce** semantics:
//! - Each call cancels the pending execution and schedules a new one `wait` later
//! - Only the last call of a burst executes, with its own arguments
//! - Calls spaced `wait` or more apart each execute
//! - A zero `wait` still defers execution to the scheduler; it is never synchronous
//!
//! # Example
//!
//! ```rust
//! use pacer::DebounceExt;
//! use pacer_test_utils::{CallRecorder, ManualScheduler};
//!
//! let scheduler = ManualScheduler::new();
//! let recorder = CallRecorder::new(&scheduler);
//! let search = recorder.callback().debounce_with(100, scheduler.clone());
//!
//! search.call("r");
//! scheduler.advance_ms(30);
//! search.call("ru");
//! scheduler.advance_ms(30);
//! search.call("rust");
//! scheduler.advance_ms(200);
//!
//! assert_eq!(recorder.calls(), vec![(160, "rust")]);
//! ```

mod implementation;

pub use implementation::Debounced;

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
use crate::DefaultScheduler;
use pacer_core::IntoInterval;
use pacer_runtime::Scheduler;

/// Extension trait providing `debounce` on any function of one argument.
///
/// Functions of several arguments take a tuple; functions of none take `()`.
pub trait DebounceExt<A>: Fn(A) + Send + Sync + Sized + 'static
where
    A: Send + 'static,
{
    /// Debounce on the default runtime's scheduler.
    #[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
    fn debounce(self, wait: impl IntoInterval) -> Debounced<A, DefaultScheduler> {
        Debounced::new(self, wait, DefaultScheduler::default())
    }

    /// Debounce on an explicit scheduler.
    fn debounce_with<S: Scheduler>(self, wait: impl IntoInterval, scheduler: S) -> Debounced<A, S> {
        Debounced::new(self, wait, scheduler)
    }
}

impl<F, A> DebounceExt<A> for F
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
{
}

/// Wrap `func` so it runs `wait` after the last of a burst of calls.
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub fn debounce<A, F>(func: F, wait: impl IntoInterval) -> Debounced<A, DefaultScheduler>
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
{
    Debounced::new(func, wait, DefaultScheduler::default())
}

/// [`debounce`] with an explicit scheduler.
pub fn debounce_with<A, F, S>(func: F, wait: impl IntoInterval, scheduler: S) -> Debounced<A, S>
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
    S: Scheduler,
{
    Debounced::new(func, wait, scheduler)
}
