// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::manual_scheduler::ManualScheduler;
use async_channel::{unbounded, Receiver};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records `(virtual millis, args)` for every invocation of a wrapped function.
#[derive(Clone, Debug)]
pub struct CallRecorder<A> {
    scheduler: ManualScheduler,
    calls: Arc<Mutex<Vec<(u64, A)>>>,
}

impl<A> CallRecorder<A>
where
    A: Clone + Send + 'static,
{
    pub fn new(scheduler: &ManualScheduler) -> Self {
        Self {
            scheduler: scheduler.clone(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Function to hand to `debounce`/`throttle`.
    pub fn callback(&self) -> impl Fn(A) + Send + Sync + 'static {
        let recorder = self.clone();
        move |args: A| {
            let at = recorder.scheduler.now_ms();
            recorder.calls.lock().push((at, args));
        }
    }

    pub fn calls(&self) -> Vec<(u64, A)> {
        self.calls.lock().clone()
    }

    pub fn args(&self) -> Vec<A> {
        self.calls.lock().iter().map(|(_, args)| args.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }
}

/// Function that forwards its arguments into a channel.
///
/// Used with real runtimes, where invocations happen on spawned tasks and
/// the test awaits them through [`recv_timeout`](crate::recv_timeout).
pub fn recording_channel<A>() -> (impl Fn(A) + Send + Sync + Clone + 'static, Receiver<A>)
where
    A: Send + 'static,
{
    let (tx, rx) = unbounded();
    let record = move |args: A| {
        tx.try_send(args).ok();
    };
    (record, rx)
}
