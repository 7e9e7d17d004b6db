// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Delayed-callback scheduling.
//!
//! A [`Scheduler`] runs a callback once, no earlier than a given delay after
//! it was scheduled, unless the returned handle is cancelled first.
//! Cancelling is idempotent: cancelling twice, or after the callback fired,
//! does nothing.
//!
//! [`RuntimeScheduler`] builds a scheduler out of any [`Runtime`]: every
//! scheduled callback gets its own task that races the runtime's sleep
//! against a [`CancellationToken`].

use crate::runtime::Runtime;
use crate::timer::Timer;
use core::fmt::{self, Debug};
use core::marker::PhantomData;
use core::ops::Sub;
use core::pin::pin;
use core::time::Duration;
use futures::future::{select, Either};
use pacer_core::{CancellationToken, Result};

/// Callback handed to a [`Scheduler`].
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Monotonic, non-decreasing time source.
pub trait Clock {
    type Instant: Copy + Debug + Ord + Send + Sync + Sub<Self::Instant, Output = Duration>;

    fn now(&self) -> Self::Instant;
}

/// Handle to a scheduled callback.
pub trait ScheduledHandle: Debug + Send + Sync + 'static {
    /// Withdraw the callback if it has not fired yet.
    ///
    /// Must be idempotent and must never fail.
    fn cancel(&self);

    fn is_cancelled(&self) -> bool;
}

pub trait Scheduler: Clone + Send + Sync + 'static {
    type Handle: ScheduledHandle;

    /// Run `callback` once, no earlier than `delay` from now.
    ///
    /// A zero delay still defers the callback; it never runs inside this call.
    ///
    /// # Errors
    /// Fails when the scheduler cannot accept new work, such as when no
    /// runtime is available to drive the timer.
    fn schedule(&self, delay: Duration, callback: Callback) -> Result<Self::Handle>;
}

/// Handle returned by [`RuntimeScheduler`].
#[derive(Clone, Debug)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl ScheduledHandle for TaskHandle {
    fn cancel(&self) {
        self.token.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// [`Scheduler`] and [`Clock`] driven by an async [`Runtime`].
pub struct RuntimeScheduler<R: Runtime> {
    timer: R::Timer,
    _runtime: PhantomData<fn() -> R>,
}

impl<R: Runtime> RuntimeScheduler<R> {
    pub fn new() -> Self {
        Self {
            timer: R::Timer::default(),
            _runtime: PhantomData,
        }
    }
}

impl<R: Runtime> Default for RuntimeScheduler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Runtime> Clone for RuntimeScheduler<R> {
    fn clone(&self) -> Self {
        Self {
            timer: self.timer.clone(),
            _runtime: PhantomData,
        }
    }
}

impl<R: Runtime> Debug for RuntimeScheduler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeScheduler")
            .field("runtime", &R::NAME)
            .field("timer", &self.timer)
            .finish()
    }
}

impl<R: Runtime> Clock for RuntimeScheduler<R> {
    type Instant = <R::Timer as Timer>::Instant;

    fn now(&self) -> Self::Instant {
        self.timer.now()
    }
}

impl<R: Runtime> Scheduler for RuntimeScheduler<R> {
    type Handle = TaskHandle;

    fn schedule(&self, delay: Duration, callback: Callback) -> Result<TaskHandle> {
        let token = CancellationToken::new();
        let watch = token.clone();
        let timer = self.timer.clone();

        R::spawn(async move {
            let sleep = pin!(timer.sleep_future(delay));
            let cancelled = pin!(watch.cancelled());

            if let Either::Left(_) = select(sleep, cancelled).await {
                // Both may have become ready in the same poll.
                if !watch.is_cancelled() {
                    callback();
                }
            }
        })?;

        Ok(TaskHandle { token })
    }
}
