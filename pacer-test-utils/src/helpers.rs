// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_channel::Receiver;
use std::time::Duration;
use tokio::time::sleep;

/// Receive the next recorded call, or `None` if nothing arrives within `timeout_ms`.
pub async fn recv_timeout<T>(rx: &Receiver<T>, timeout_ms: u64) -> Option<T> {
    tokio::select! {
        item = rx.recv() => item.ok(),
        _ = sleep(Duration::from_millis(timeout_ms)) => None,
    }
}

/// Panic if a call is recorded within `timeout_ms`.
pub async fn assert_no_recv<T>(rx: &Receiver<T>, timeout_ms: u64) {
    tokio::select! {
        item = rx.recv() => {
            if item.is_ok() {
                panic!("Unexpected invocation recorded, expected none.");
            }
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}
