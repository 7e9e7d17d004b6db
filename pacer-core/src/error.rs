// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the pacer rate-control library.
//!
//! Wrapped functions never report errors to their callers: debounced and
//! throttled executions are deferred, so their outcome is unobservable.
//! What can fail is handing a callback to the scheduler, and that is what
//! [`PacerError`] describes.
//!
//! # Examples
//!
//! ```
//! use pacer_core::{PacerError, Result};
//!
//! fn schedule_somewhere() -> Result<()> {
//!     Err(PacerError::no_runtime("tokio"))
//! }
//!
//! assert!(schedule_somewhere().unwrap_err().is_recoverable());
//! ```

/// Root error type for pacer operations.
#[derive(Debug, thiserror::Error)]
pub enum PacerError {
    /// No async runtime was available to drive the timer task.
    ///
    /// Raised, for example, when a tokio-backed wrapper is called from a
    /// thread that is not inside a tokio runtime.
    #[error("No {runtime} runtime available to schedule a callback")]
    NoRuntime {
        /// Name of the runtime that was looked up
        runtime: &'static str,
    },

    /// The scheduler that owned the timer queue is gone.
    #[error("Scheduler has shut down: {context}")]
    SchedulerShutdown {
        /// What was being scheduled when the shutdown was noticed
        context: String,
    },

    /// Error produced by user code, such as a custom scheduler.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PacerError {
    pub const fn no_runtime(runtime: &'static str) -> Self {
        Self::NoRuntime { runtime }
    }

    pub fn scheduler_shutdown(context: impl Into<String>) -> Self {
        Self::SchedulerShutdown {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Whether a later call may succeed.
    ///
    /// A missing runtime is a property of the calling context, so calling
    /// again from inside a runtime works. A shut-down scheduler stays down.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoRuntime { .. })
    }
}

/// Specialized Result type for pacer operations.
pub type Result<T> = std::result::Result<T, PacerError>;

/// Conversion of arbitrary errors into [`PacerError::UserError`].
pub trait IntoPacerError {
    fn into_pacer_error(self) -> PacerError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoPacerError for E {
    fn into_pacer_error(self) -> PacerError {
        PacerError::user_error(self)
    }
}
