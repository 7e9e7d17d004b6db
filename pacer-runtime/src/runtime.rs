// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::timer::Timer;
use core::future::Future;
use pacer_core::Result;

pub trait Runtime: 'static {
    /// Runtime name used in error messages
    const NAME: &'static str;

    type Timer: Timer + Default;

    /// Spawn a detached task on this runtime.
    ///
    /// # Errors
    /// Returns [`PacerError::NoRuntime`](pacer_core::PacerError::NoRuntime)
    /// when called outside a running instance of the runtime.
    fn spawn<F>(future: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static;
}
