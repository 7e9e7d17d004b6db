// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the pacer rate-control library.
//!
//! Designed for development and testing only, not for production code.
//!
//! # Key Types
//!
//! ## `ManualScheduler`
//!
//! A [`Scheduler`](pacer_runtime::Scheduler) and [`Clock`](pacer_runtime::Clock)
//! over virtual time. Nothing fires until the test advances the clock, and
//! callbacks run on the test thread in deadline order:
//!
//! ```rust
//! use pacer_runtime::Scheduler;
//! use pacer_test_utils::ManualScheduler;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = ManualScheduler::new();
//! let fired = Arc::new(AtomicBool::new(false));
//! let flag = fired.clone();
//!
//! scheduler
//!     .schedule(Duration::from_millis(100), Box::new(move || flag.store(true, Ordering::SeqCst)))
//!     .unwrap();
//!
//! scheduler.advance_ms(99);
//! assert!(!fired.load(Ordering::SeqCst));
//! scheduler.advance_ms(1);
//! assert!(fired.load(Ordering::SeqCst));
//! ```
//!
//! ## `CallRecorder`
//!
//! Records each invocation of a wrapped function together with the virtual
//! time it happened at.
//!
//! # Module Organization
//!
//! - `manual_scheduler` - `ManualScheduler`, `ManualInstant`, `ManualHandle`
//! - `recorder` - `CallRecorder` and the channel-backed `recording_channel`
//! - `helpers` - async receive assertions

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub mod helpers;
pub mod manual_scheduler;
pub mod recorder;

pub use helpers::{assert_no_recv, recv_timeout};
pub use manual_scheduler::{ManualHandle, ManualInstant, ManualScheduler};
pub use recorder::{recording_channel, CallRecorder};
