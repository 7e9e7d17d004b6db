// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Call-rate control for plain functions: debounce and throttle.
//!
//! Both wrappers take a function of one argument (use a tuple for several,
//! `()` for none), discard its return value, and keep all of their state in
//! one record per wrapper. They are runtime-agnostic: timing comes from a
//! [`Scheduler`](pacer_runtime::Scheduler) and, for throttle, a
//! [`Clock`](pacer_runtime::Clock).
//!
//! # Overview
//!
//! - **[`Debounced`]** - runs once after a quiet period of `wait`, with the
//!   last call's arguments
//! - **[`Throttled`]** - runs at most once per `limit`: immediately on the
//!   leading edge, then once at the end of each cooldown with the latest
//!   arguments
//! - **[`DebounceExt`] / [`ThrottleExt`]** - `.debounce(wait)` and
//!   `.throttle(limit)` on any `Fn(A)`
//!
//! # Runtime Support
//!
//! Enable runtime-specific features in your `Cargo.toml`:
//! - `runtime-tokio` (default) - timers on the current tokio runtime
//! - `runtime-smol` - timers on the global smol executor
//!
//! `*_with` constructors accept any scheduler, such as the deterministic
//! `ManualScheduler` from `pacer-test-utils`.
//!
//! # Example
//!
//! ```rust,no_run
//! use pacer::{debounce, ThrottleExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let save = debounce(|doc: String| println!("saving {doc}"), 500);
//! save.call("draft 1".to_string());
//! save.call("draft 2".to_string()); // only this one is saved
//!
//! let report = (|(x, y): (i32, i32)| println!("pointer at {x},{y}")).throttle(100);
//! report.call((1, 1));
//! report.call((2, 3));
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

// Must precede the modules that use its macros.
#[macro_use]
mod logging;

mod debouncer;
pub mod prelude;
mod throttler;

pub use debouncer::{debounce_with, DebounceExt, Debounced};
pub use pacer_core::{IntoInterval, PacerError, Result};
pub use throttler::{throttle_with, ThrottleExt, ThrottleState, Throttled};

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use debouncer::debounce;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use throttler::throttle;

#[cfg(feature = "runtime-tokio")]
pub type DefaultRuntime = pacer_runtime::impls::tokio::TokioRuntime;

#[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
pub type DefaultRuntime = pacer_runtime::impls::smol::SmolRuntime;

/// Scheduler used by [`debounce`], [`throttle`] and the extension traits.
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub type DefaultScheduler = pacer_runtime::RuntimeScheduler<DefaultRuntime>;
