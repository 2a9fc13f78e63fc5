//! Blocking resolution.
//!
//! # Danger
//!
//! Waiting here parks the calling thread until the gateway answers. The
//! gateway future runs on the runtime behind the supplied [`Handle`]; if the
//! calling thread is the one driving that runtime (any thread of a
//! current-thread runtime, or a worker thread of a multi-thread runtime),
//! the gateway can never make progress and the wait never ends. Only call
//! these from a dedicated thread. Nothing here can detect the mistake, so
//! prefer [`BlockingResolve::join_timeout`] when in doubt.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{FinderError, FinderResult};
use crate::outcome::Outcome;

use super::task::ResolveTask;

enum Waiting {
    Ready(Outcome),
    Running {
        rx: Receiver<FinderResult<Outcome>>,
        join: AbortOnDrop,
    },
}

/// Aborts the spawned resolution, and with it the gateway call, when dropped.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            tracing::trace!("aborting abandoned blocking resolution");
            self.0.abort();
        }
    }
}

/// Handle returned by [`crate::Resolver::start_blocking`].
///
/// Dropping a running handle without joining cancels the resolution.
pub struct BlockingResolve {
    waiting: Waiting,
}

impl BlockingResolve {
    pub(crate) fn start(mut task: ResolveTask, handle: &Handle) -> Self {
        if let Some(outcome) = task.take_ready() {
            return Self {
                waiting: Waiting::Ready(outcome),
            };
        }

        let (tx, rx) = bounded::<FinderResult<Outcome>>(1);
        let join = handle.spawn(async move {
            let _ = tx.send(task.await);
        });
        Self {
            waiting: Waiting::Running {
                rx,
                join: AbortOnDrop(join),
            },
        }
    }

    /// True if the outcome was known without a gateway call.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.waiting, Waiting::Ready(_))
    }

    /// Blocks until the resolution completes.
    pub fn join(self) -> FinderResult<Outcome> {
        match self.waiting {
            Waiting::Ready(outcome) => Ok(outcome),
            Waiting::Running { rx, .. } => rx.recv().map_err(|_| FinderError::Disconnected)?,
        }
    }

    /// Blocks until the resolution completes or `timeout` elapses.
    ///
    /// On timeout the running task is aborted, which drops the in-flight
    /// gateway call.
    pub fn join_timeout(self, timeout: Duration) -> FinderResult<Outcome> {
        match self.waiting {
            Waiting::Ready(outcome) => Ok(outcome),
            Waiting::Running { rx, join } => rx.recv_timeout(timeout).map_err(|err| match err {
                RecvTimeoutError::Timeout => {
                    drop(join);
                    FinderError::Timeout {
                        duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    }
                }
                RecvTimeoutError::Disconnected => FinderError::Disconnected,
            })?,
        }
    }
}

impl std::fmt::Debug for BlockingResolve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.waiting {
            Waiting::Ready(_) => "ready",
            Waiting::Running { .. } => "running",
        };
        f.debug_struct("BlockingResolve").field("state", &state).finish()
    }
}
