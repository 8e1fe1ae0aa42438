use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use thiserror::Error;

/// Why a [`CancellationToken`] reports that work should stop.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Interruption {
    /// [`CancellationToken::cancel`] was called.
    #[error("operation was cancelled")]
    Cancelled,
    /// The token's deadline has passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// A cancellation token, optionally carrying a deadline.
///
/// Long-running collection loops poll this between units of work (for mount
/// tables, between lines) and bail out once it reports done.
#[derive(Debug, Default)]
pub struct CancellationToken {
    // Setting this to true will mark the cancellation token as "cancelled".
    cancelled: Mutex<bool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// A token that is never done unless explicitly cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also reports done once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Mutex::new(false),
            deadline: Some(deadline),
        }
    }

    /// A token that reports done once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Returns the deadline, if there is one.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Mark the [`CancellationToken`] as cancelled.
    ///
    /// This is idempotent, and once cancelled, will stay cancelled.
    pub fn cancel(&self) {
        let mut guard = self
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        *guard = true;
    }

    /// Checks the token without blocking on anything but the flag itself.
    ///
    /// Explicit cancellation wins over an expired deadline if both apply.
    pub fn check(&self) -> Result<(), Interruption> {
        let cancelled = *self
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if cancelled {
            Err(Interruption::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Err(Interruption::DeadlineExceeded)
        } else {
            Ok(())
        }
    }

    /// Whether the token reports done for any reason.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }
}
