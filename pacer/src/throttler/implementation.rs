// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::time::Duration;
use pacer_core::{IntoInterval, Result};
use pacer_runtime::{Clock, ScheduledHandle, Scheduler};
use parking_lot::Mutex;
use std::sync::Arc;

/// Where a [`Throttled`] wrapper stands relative to its cooldown window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThrottleState {
    /// A call made now executes immediately: nothing ran yet, or the
    /// cooldown since the last execution is over.
    Idle,
    /// Within `limit` of the last execution, no trailing call pending.
    Cooling,
    /// Within `limit` of the last execution, trailing call scheduled.
    CoolingPending,
}

/// A function wrapped so that it runs at most once per `limit`.
///
/// The first call executes immediately on the caller's thread. Calls made
/// during the following cooldown are coalesced into one trailing execution
/// at the end of the window, carrying the latest call's arguments. Each such
/// call cancels and re-arms the trailing callback for `limit - elapsed`.
///
/// A trailing callback firing concurrently with a call is serialized with it
/// by the state lock: whichever takes the lock first completes its whole
/// transition, and the other observes the result.
///
/// Clones share the same state. Dropping the wrapper does not cancel a
/// pending trailing call; use [`cancel`](Self::cancel) for that.
pub struct Throttled<A, S>
where
    S: Scheduler + Clock,
{
    inner: Arc<Inner<A, S>>,
}

struct Inner<A, S>
where
    S: Scheduler + Clock,
{
    func: Box<dyn Fn(A) + Send + Sync>,
    limit: Duration,
    scheduler: S,
    cooldown: Mutex<Cooldown<A, S::Handle, <S as Clock>::Instant>>,
}

struct Cooldown<A, H, I> {
    last_invoked_at: Option<I>,
    pending: Option<H>,
    pending_args: Option<A>,
    generation: u64,
}

impl<A, H, I> Cooldown<A, H, I>
where
    H: ScheduledHandle,
    I: Copy + core::ops::Sub<I, Output = Duration>,
{
    /// Time left before a call may execute immediately.
    fn remaining(&self, now: I, limit: Duration) -> Duration {
        self.last_invoked_at
            .map_or(Duration::ZERO, |last| limit.saturating_sub(now - last))
    }

    /// Drop the trailing call and invalidate any fire already in flight.
    fn withdraw(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        self.pending_args = None;
        match self.pending.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    fn state(&self, now: I, limit: Duration) -> ThrottleState {
        if self.pending.is_some() {
            ThrottleState::CoolingPending
        } else if self.last_invoked_at.is_some() && !self.remaining(now, limit).is_zero() {
            ThrottleState::Cooling
        } else {
            ThrottleState::Idle
        }
    }
}

impl<A, S> Throttled<A, S>
where
    A: Send + 'static,
    S: Scheduler + Clock,
{
    pub fn new<F>(func: F, limit: impl IntoInterval, scheduler: S) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                func: Box::new(func),
                limit: limit.into_interval(),
                scheduler,
                cooldown: Mutex::new(Cooldown {
                    last_invoked_at: None,
                    pending: None,
                    pending_args: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Execute now if outside the cooldown, otherwise (re)arm the trailing call.
    ///
    /// A scheduling failure is logged and the call is dropped; use
    /// [`try_call`](Self::try_call) to observe it.
    pub fn call(&self, args: A) {
        if let Err(err) = self.try_call(args) {
            error!("throttle: failed to schedule trailing call: {err}");
        }
    }

    /// Like [`call`](Self::call), reporting scheduling failures.
    ///
    /// # Errors
    /// Returns the scheduler's error when a trailing callback could not be
    /// scheduled. Immediate executions never fail.
    pub fn try_call(&self, args: A) -> Result<()> {
        let inner = &self.inner;
        let mut cooldown = inner.cooldown.lock();
        let now = inner.scheduler.now();
        let remaining = cooldown.remaining(now, inner.limit);

        if remaining.is_zero() {
            if cooldown.withdraw() {
                trace!("throttle: cooldown over, dropping superseded trailing call");
            }
            cooldown.last_invoked_at = Some(now);
            drop(cooldown);

            (inner.func)(args);
            return Ok(());
        }

        cooldown.pending_args = Some(args);
        inner.arm(&mut cooldown, remaining)
    }

    /// Cancel the pending trailing call, if any. Idempotent.
    ///
    /// The cooldown itself keeps running. Returns `true` if a call was pending.
    pub fn cancel(&self) -> bool {
        let withdrawn = self.inner.cooldown.lock().withdraw();
        if withdrawn {
            trace!("throttle: trailing call cancelled");
        }
        withdrawn
    }

    pub fn is_pending(&self) -> bool {
        self.inner.cooldown.lock().pending.is_some()
    }

    pub fn state(&self) -> ThrottleState {
        let cooldown = self.inner.cooldown.lock();
        cooldown.state(self.inner.scheduler.now(), self.inner.limit)
    }

    /// The minimum spacing between executions.
    pub fn interval(&self) -> Duration {
        self.inner.limit
    }
}

type CooldownOf<A, S> = Cooldown<A, <S as Scheduler>::Handle, <S as Clock>::Instant>;

impl<A, S> Inner<A, S>
where
    A: Send + 'static,
    S: Scheduler + Clock,
{
    /// Replace any trailing callback with one firing `delay` from now.
    ///
    /// Must be called with the cooldown lock held and `pending_args` set.
    fn arm(self: &Arc<Self>, cooldown: &mut CooldownOf<A, S>, delay: Duration) -> Result<()> {
        cooldown.generation = cooldown.generation.wrapping_add(1);
        if let Some(previous) = cooldown.pending.take() {
            previous.cancel();
            trace!("throttle: rebasing trailing call");
        }
        let generation = cooldown.generation;

        let inner = Arc::clone(self);
        match self
            .scheduler
            .schedule(delay, Box::new(move || inner.fire(generation)))
        {
            Ok(handle) => {
                cooldown.pending = Some(handle);
                trace!("throttle: trailing call {generation} in {delay:?}");
                Ok(())
            }
            Err(err) => {
                cooldown.pending_args = None;
                Err(err)
            }
        }
    }

    fn fire(self: &Arc<Self>, generation: u64) {
        let args = {
            let mut cooldown = self.cooldown.lock();
            if cooldown.generation != generation || cooldown.pending.is_none() {
                trace!("throttle: ignoring stale callback {generation}");
                return;
            }

            let now = self.scheduler.now();
            let remaining = cooldown.remaining(now, self.limit);
            if !remaining.is_zero() {
                warn!("throttle: trailing call fired {remaining:?} early, re-arming");
                if let Err(err) = self.arm(&mut cooldown, remaining) {
                    error!("throttle: failed to re-arm trailing call: {err}");
                }
                return;
            }

            cooldown.pending = None;
            cooldown.last_invoked_at = Some(now);
            cooldown.pending_args.take()
        };

        if let Some(args) = args {
            (self.func)(args);
        }
    }
}

impl<A, S> Clone for Throttled<A, S>
where
    S: Scheduler + Clock,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S> fmt::Debug for Throttled<A, S>
where
    S: Scheduler + Clock + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cooldown = self.inner.cooldown.lock();
        f.debug_struct("Throttled")
            .field("limit", &self.inner.limit)
            .field("last_invoked_at", &cooldown.last_invoked_at)
            .field("pending", &cooldown.pending.is_some())
            .field("scheduler", &self.inner.scheduler)
            .finish()
    }
}
