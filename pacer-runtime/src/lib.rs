// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collaborators the pacer wrappers are written against.
//!
//! - [`Clock`](scheduler::Clock) - monotonic `now()`
//! - [`Scheduler`](scheduler::Scheduler) - "run this callback after a delay, cancelably"
//! - [`Timer`](timer::Timer) and [`Runtime`](runtime::Runtime) - the async
//!   building blocks [`RuntimeScheduler`](scheduler::RuntimeScheduler) turns
//!   into a scheduler
//!
//! Runtime implementations are selected with the `runtime-tokio` (default)
//! and `runtime-smol` features.

pub mod impls;
pub mod runtime;
pub mod scheduler;
pub mod timer;

pub use scheduler::{Callback, Clock, RuntimeScheduler, ScheduledHandle, Scheduler, TaskHandle};
