// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::time::Duration;
use pacer_core::{IntoInterval, Result};
use pacer_runtime::{ScheduledHandle, Scheduler};
use parking_lot::Mutex;
use std::sync::Arc;

/// A function wrapped so that it runs only after a quiet period.
///
/// Every [`call`](Self::call) cancels the outstanding callback, if any, and
/// schedules a new one `wait` in the future carrying this call's arguments.
/// A burst of calls spaced less than `wait` apart therefore collapses into
/// one execution, `wait` after the last call, with the last call's
/// arguments.
///
/// A call racing with a firing callback is serialized with it by the state
/// lock. If the callback wins it executes; otherwise it finds itself
/// superseded and does nothing.
///
/// Clones share the same state: calling any clone restarts the quiet
/// period for all of them. Dropping the wrapper does not cancel an
/// outstanding callback; use [`cancel`](Self::cancel) for that.
pub struct Debounced<A, S: Scheduler> {
    inner: Arc<Inner<A, S>>,
}

struct Inner<A, S: Scheduler> {
    func: Box<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    scheduler: S,
    state: Mutex<State<S::Handle>>,
}

struct State<H> {
    pending: Option<H>,
    generation: u64,
}

impl<H: ScheduledHandle> State<H> {
    /// Cancel the outstanding callback and invalidate any fire already in flight.
    fn withdraw(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.pending.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

impl<A, S> Debounced<A, S>
where
    A: Send + 'static,
    S: Scheduler,
{
    pub fn new<F>(func: F, wait: impl IntoInterval, scheduler: S) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                func: Box::new(func),
                wait: wait.into_interval(),
                scheduler,
                state: Mutex::new(State {
                    pending: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Restart the quiet period with `args` as the arguments to run with.
    ///
    /// Returns immediately. A scheduling failure is logged and the call is
    /// dropped; use [`try_call`](Self::try_call) to observe it.
    pub fn call(&self, args: A) {
        if let Err(err) = self.try_call(args) {
            error!("debounce: failed to schedule call: {err}");
        }
    }

    /// Like [`call`](Self::call), reporting scheduling failures.
    ///
    /// # Errors
    /// Returns the scheduler's error when the callback could not be
    /// scheduled. The previously outstanding callback is cancelled either way.
    pub fn try_call(&self, args: A) -> Result<()> {
        let mut state = self.inner.state.lock();

        if state.withdraw() {
            trace!("debounce: superseded pending call");
        }
        let generation = state.generation;

        let inner = Arc::clone(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.wait,
            Box::new(move || inner.fire(generation, args)),
        )?;
        state.pending = Some(handle);

        trace!("debounce: scheduled call {generation} in {:?}", self.inner.wait);
        Ok(())
    }

    /// Cancel the outstanding call, if any. Idempotent.
    ///
    /// Returns `true` if a call was pending.
    pub fn cancel(&self) -> bool {
        let withdrawn = self.inner.state.lock().withdraw();
        if withdrawn {
            trace!("debounce: pending call cancelled");
        }
        withdrawn
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// The quiet period.
    pub fn interval(&self) -> Duration {
        self.inner.wait
    }
}

impl<A, S: Scheduler> Inner<A, S> {
    fn fire(&self, generation: u64, args: A) {
        {
            let mut state = self.state.lock();
            if state.generation != generation || state.pending.is_none() {
                trace!("debounce: ignoring stale callback {generation}");
                return;
            }
            state.pending = None;
        }

        (self.func)(args);
    }
}

impl<A, S: Scheduler> Clone for Debounced<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S: Scheduler + fmt::Debug> fmt::Debug for Debounced<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.inner.wait)
            .field("pending", &self.inner.state.lock().pending.is_some())
            .field("scheduler", &self.inner.scheduler)
            .finish()
    }
}
