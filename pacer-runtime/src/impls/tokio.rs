// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[cfg(feature = "runtime-tokio")]
use core::future::Future;
#[cfg(feature = "runtime-tokio")]
use std::time::Duration;

#[cfg(feature = "runtime-tokio")]
use crate::{runtime::Runtime, timer::Timer};
#[cfg(feature = "runtime-tokio")]
use pacer_core::{PacerError, Result};

#[cfg(feature = "runtime-tokio")]
#[derive(Debug)]
pub struct TokioRuntime;

#[cfg(feature = "runtime-tokio")]
impl Runtime for TokioRuntime {
    const NAME: &'static str = "tokio";

    type Timer = TokioTimer;

    fn spawn<F>(future: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|_| PacerError::no_runtime(Self::NAME))?;
        drop(handle.spawn(future));
        Ok(())
    }
}

/// Timer backed by `tokio::time`.
///
/// Uses `tokio::time::Instant` rather than `std::time::Instant`, so a
/// runtime started with paused time drives both sleeping and `now()`.
#[cfg(feature = "runtime-tokio")]
#[derive(Clone, Debug, Default)]
pub struct TokioTimer;

#[cfg(feature = "runtime-tokio")]
impl Timer for TokioTimer {
    type Sleep = tokio::time::Sleep;

    type Instant = tokio::time::Instant;

    fn sleep_future(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }
}
