// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Convenience re-exports.
//!
//! ```rust
//! use pacer::prelude::*;
//! ```

pub use crate::{DebounceExt, Debounced, IntoInterval, ThrottleExt, ThrottleState, Throttled};
pub use pacer_runtime::{Clock, ScheduledHandle, Scheduler};

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use crate::{debounce, throttle, DefaultScheduler};
