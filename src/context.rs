//! Per-call cancellation and deadline propagation.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CvmError, Result};

/// Cancellation and deadline scope for a single call.
///
/// A context wraps the whole pipeline run: credential fetch, signing,
/// every network step, and retry-backoff sleeps. Cancelling the token
/// aborts the in-flight attempt and the call returns [`CvmError::Cancelled`];
/// a cancelled call is never retried. Deadline expiry returns
/// [`CvmError::DeadlineExceeded`] without further retries.
///
/// Contexts are cheap to clone; clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never cancels and has no deadline. The context-less
    /// client methods use this internally.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// A context with an absolute deadline.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A context driven by an externally owned cancellation token.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Sets the deadline to `timeout` from now, keeping the token.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Returns the token; cancelling it aborts the call.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CvmError::Cancelled);
        }
        Ok(())
    }

    /// Runs `fut` under this context's cancellation and deadline.
    ///
    /// A context cancelled before the call starts returns without polling
    /// `fut` at all, so nothing is transmitted.
    pub(crate) async fn guard<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check_cancelled()?;

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => Err(CvmError::Cancelled),
                    outcome = tokio::time::timeout_at(deadline, fut) => {
                        outcome.map_err(|_| CvmError::DeadlineExceeded)?
                    }
                }
            }
            None => {
                tokio::select! {
                    _ = self.cancel.cancelled() => Err(CvmError::Cancelled),
                    outcome = fut => outcome,
                }
            }
        }
    }
}
