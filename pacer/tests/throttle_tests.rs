// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pacer::{throttle_with, PacerError, ThrottleExt, ThrottleState};
use pacer_core::Result;
use pacer_runtime::{Callback, Clock, Scheduler};
use pacer_test_utils::{CallRecorder, ManualHandle, ManualInstant, ManualScheduler};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scheduler whose callbacks fire `skew` later than requested.
#[derive(Clone, Debug)]
struct LateScheduler {
    inner: ManualScheduler,
    skew: Duration,
}

impl Scheduler for LateScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, callback: Callback) -> Result<ManualHandle> {
        self.inner.schedule(delay + self.skew, callback)
    }
}

impl Clock for LateScheduler {
    type Instant = ManualInstant;

    fn now(&self) -> ManualInstant {
        self.inner.now()
    }
}

/// Scheduler whose first callback fires `skew` earlier than requested.
#[derive(Clone, Debug)]
struct EarlyOnceScheduler {
    inner: ManualScheduler,
    skew: Duration,
    used: Arc<AtomicBool>,
}

impl Scheduler for EarlyOnceScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, callback: Callback) -> Result<ManualHandle> {
        let delay = if self.used.swap(true, Ordering::SeqCst) {
            delay
        } else {
            delay.saturating_sub(self.skew)
        };
        self.inner.schedule(delay, callback)
    }
}

impl Clock for EarlyOnceScheduler {
    type Instant = ManualInstant;

    fn now(&self) -> ManualInstant {
        self.inner.now()
    }
}

#[test]
fn test_throttle_leading_call_is_synchronous() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());

    // Act
    throttled.call("first");

    // Assert
    assert_eq!(recorder.calls(), vec![(0, "first")]);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_throttle_coalesces_burst_into_latest_args() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());

    // Act
    throttled.call("lead");
    scheduler.advance_to_ms(20);
    throttled.call("X");
    scheduler.advance_to_ms(50);
    throttled.call("Y");
    scheduler.advance_to_ms(1_000);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, "lead"), (100, "Y")]);
}

#[test]
fn test_throttle_steady_rate_never_coalesces() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());

    // Act
    for at in [0, 100, 250, 350, 1_000] {
        scheduler.advance_to_ms(at);
        throttled.call(at);
        assert_eq!(scheduler.pending(), 0);
    }

    // Assert
    assert_eq!(
        recorder.calls(),
        vec![(0, 0), (100, 100), (250, 250), (350, 350), (1_000, 1_000)]
    );
}

#[test]
fn test_throttle_boundary_call_executes_immediately() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());

    // Act
    throttled.call(1);
    scheduler.advance_to_ms(99);
    assert_eq!(throttled.state(), ThrottleState::Cooling);
    scheduler.advance_to_ms(100);
    throttled.call(2);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, 1), (100, 2)]);
    assert!(!throttled.is_pending());
}

#[test]
fn test_throttle_zero_limit_never_throttles() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = throttle_with(recorder.callback(), 0, scheduler.clone());

    // Act
    throttled.call(1);
    throttled.call(2);
    throttled.call(3);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, 1), (0, 2), (0, 3)]);
    assert_eq!(throttled.state(), ThrottleState::Idle);
}

#[test]
fn test_throttle_negative_limit_clamps_to_zero() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = throttle_with(recorder.callback(), f64::NAN, scheduler.clone());

    // Act
    throttled.call(1);
    throttled.call(2);

    // Assert
    assert_eq!(throttled.interval(), Duration::ZERO);
    assert_eq!(recorder.count(), 2);
}

#[test]
fn test_throttle_trailing_call_rebases_on_each_window() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());

    // Act
    throttled.call("lead");
    scheduler.advance_to_ms(90);
    throttled.call("X");
    scheduler.advance_to_ms(130);
    throttled.call("Y");
    scheduler.advance_to_ms(180);
    throttled.call("Z");
    scheduler.advance_to_ms(1_000);

    // Assert
    assert_eq!(
        recorder.calls(),
        vec![(0, "lead"), (100, "X"), (200, "Z")]
    );
}

#[test]
fn test_throttle_at_most_one_trailing_callback() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());

    // Act
    throttled.call(0);
    for i in 1..=40 {
        scheduler.advance_ms(2);
        throttled.call(i);
        assert_eq!(scheduler.pending(), 1);
    }
    scheduler.advance_to_ms(1_000);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, 0), (100, 40)]);
}

#[test]
fn test_throttle_state_machine() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let throttled = (|_: u8| {}).throttle_with(100, scheduler.clone());

    // Act & Assert
    assert_eq!(throttled.state(), ThrottleState::Idle);

    throttled.call(1);
    assert_eq!(throttled.state(), ThrottleState::Cooling);

    scheduler.advance_to_ms(10);
    throttled.call(2);
    assert_eq!(throttled.state(), ThrottleState::CoolingPending);

    scheduler.advance_to_ms(100);
    assert_eq!(throttled.state(), ThrottleState::Cooling);

    scheduler.advance_to_ms(200);
    assert_eq!(throttled.state(), ThrottleState::Idle);
}

#[test]
fn test_throttle_late_scheduler_call_after_window_supersedes_trailing() {
    // Arrange
    let manual = ManualScheduler::new();
    let scheduler = LateScheduler {
        inner: manual.clone(),
        skew: Duration::from_millis(50),
    };
    let recorder = CallRecorder::new(&manual);
    let throttled = recorder.callback().throttle_with(100, scheduler);

    // Act
    throttled.call("lead");
    manual.advance_to_ms(10);
    throttled.call("X");
    manual.advance_to_ms(120);
    throttled.call("Y");
    manual.advance_to_ms(1_000);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, "lead"), (120, "Y")]);
}

#[test]
fn test_throttle_early_fire_rearms_instead_of_dropping() {
    // Arrange
    let manual = ManualScheduler::new();
    let scheduler = EarlyOnceScheduler {
        inner: manual.clone(),
        skew: Duration::from_millis(30),
        used: Arc::new(AtomicBool::new(false)),
    };
    let recorder = CallRecorder::new(&manual);
    let throttled = recorder.callback().throttle_with(100, scheduler);

    // Act
    throttled.call("lead");
    manual.advance_to_ms(20);
    throttled.call("X");
    manual.advance_to_ms(70);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, "lead")]);
    assert!(throttled.is_pending());

    manual.advance_to_ms(1_000);
    assert_eq!(recorder.calls(), vec![(0, "lead"), (100, "X")]);
}

#[test]
fn test_throttle_panicking_trailing_call_leaves_wrapper_usable() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let record = recorder.callback();
    let throttled = (move |input: &'static str| {
        assert_ne!(input, "boom", "refusing to process");
        record(input);
    })
    .throttle_with(100, scheduler.clone());

    // Act
    throttled.call("lead");
    scheduler.advance_to_ms(10);
    throttled.call("boom");
    let outcome = catch_unwind(AssertUnwindSafe(|| scheduler.advance_to_ms(100)));
    scheduler.advance_to_ms(150);
    throttled.call("after");
    scheduler.advance_to_ms(1_000);

    // Assert
    assert!(outcome.is_err());
    assert_eq!(recorder.calls(), vec![(0, "lead"), (200, "after")]);
}

#[test]
fn test_throttle_panicking_leading_call_still_opens_window() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let record = recorder.callback();
    let throttled = (move |input: &'static str| {
        assert_ne!(input, "boom", "refusing to process");
        record(input);
    })
    .throttle_with(100, scheduler.clone());

    // Act
    let outcome = catch_unwind(AssertUnwindSafe(|| throttled.call("boom")));

    // Assert
    assert!(outcome.is_err());
    assert_eq!(throttled.state(), ThrottleState::Cooling);

    scheduler.advance_to_ms(100);
    throttled.call("next");
    assert_eq!(recorder.calls(), vec![(100, "next")]);
}

#[test]
fn test_throttle_try_call_reports_scheduler_failure() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());
    scheduler.shut_down();

    // Act
    let leading = throttled.try_call(1);
    let trailing = throttled.try_call(2);

    // Assert
    assert!(leading.is_ok());
    assert!(matches!(trailing, Err(PacerError::SchedulerShutdown { .. })));
    assert!(!throttled.is_pending());
    assert_eq!(recorder.calls(), vec![(0, 1)]);
}

#[test]
fn test_throttle_reentrant_call_from_wrapped_function() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let record = recorder.callback();
    let slot: Arc<std::sync::OnceLock<pacer::Throttled<u32, ManualScheduler>>> =
        Arc::new(std::sync::OnceLock::new());
    let again = slot.clone();
    let throttled = (move |n: u32| {
        record(n);
        if n == 1 {
            if let Some(me) = again.get() {
                me.call(2);
            }
        }
    })
    .throttle_with(100, scheduler.clone());
    slot.set(throttled.clone()).ok();

    // Act
    throttled.call(1);
    scheduler.advance_to_ms(1_000);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, 1), (100, 2)]);
}

#[test]
fn test_throttle_unbounded_limit_defers_without_overflow() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let by_duration = recorder.callback().throttle_with(Duration::MAX, scheduler.clone());
    let by_float = recorder.callback().throttle_with(f64::INFINITY, scheduler.clone());

    // Act
    by_duration.call("lead");
    by_float.call("lead");
    scheduler.advance_ms(10);
    by_duration.call("deferred");
    by_float.call("deferred");
    scheduler.advance_ms(100_000);

    // Assert
    assert_eq!(recorder.calls(), vec![(0, "lead"), (0, "lead")]);
    assert_eq!(by_float.interval(), Duration::MAX);
    assert_eq!(by_duration.state(), ThrottleState::CoolingPending);
    assert_eq!(by_float.state(), ThrottleState::CoolingPending);
}

#[test]
fn test_throttle_trailing_execution_opens_new_window() {
    // Arrange
    let scheduler = ManualScheduler::new();
    let recorder = CallRecorder::new(&scheduler);
    let throttled = recorder.callback().throttle_with(100, scheduler.clone());

    // Act
    throttled.call("lead");
    scheduler.advance_to_ms(50);
    throttled.call("X");
    scheduler.advance_to_ms(100);
    throttled.call("Y");
    let state_after_trailing = throttled.state();
    scheduler.advance_to_ms(1_000);

    // Assert
    assert_eq!(state_after_trailing, ThrottleState::CoolingPending);
    assert_eq!(
        recorder.calls(),
        vec![(0, "lead"), (100, "X"), (200, "Y")]
    );
}
