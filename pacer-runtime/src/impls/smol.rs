// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[cfg(feature = "runtime-smol")]
use core::future::Future;
#[cfg(feature = "runtime-smol")]
use core::pin::Pin;
#[cfg(feature = "runtime-smol")]
use core::task::{Context, Poll};
#[cfg(feature = "runtime-smol")]
use std::time::Duration;

#[cfg(feature = "runtime-smol")]
use crate::{runtime::Runtime, timer::Timer};
#[cfg(feature = "runtime-smol")]
use pacer_core::Result;

#[cfg(feature = "runtime-smol")]
#[derive(Debug)]
pub struct SmolRuntime;

#[cfg(feature = "runtime-smol")]
impl Runtime for SmolRuntime {
    const NAME: &'static str = "smol";

    type Timer = SmolTimer;

    // The global smol executor starts lazily, so spawning cannot fail.
    fn spawn<F>(future: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        smol::spawn(future).detach();
        Ok(())
    }
}

#[cfg(feature = "runtime-smol")]
#[derive(Clone, Debug, Default)]
pub struct SmolTimer;

#[cfg(feature = "runtime-smol")]
#[derive(Debug)]
pub struct SmolSleep {
    timer: async_io::Timer,
}

#[cfg(feature = "runtime-smol")]
impl Future for SmolSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.timer).poll(cx).map(|_| ())
    }
}

#[cfg(feature = "runtime-smol")]
impl Timer for SmolTimer {
    type Sleep = SmolSleep;

    type Instant = std::time::Instant;

    fn sleep_future(&self, duration: Duration) -> Self::Sleep {
        SmolSleep {
            timer: async_io::Timer::after(duration),
        }
    }

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }
}
