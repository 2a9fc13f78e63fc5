//! Cancellable resolution tasks.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::trace;

use crate::error::FinderResult;
use crate::outcome::Outcome;

enum TaskState {
    Ready(Option<Outcome>),
    Pending(BoxFuture<'static, FinderResult<Outcome>>),
    Finished,
}

/// A resolution in progress.
///
/// Resolves to the [`Outcome`], or to the gateway error that prevented one.
/// Tasks answered without the gateway (empty query, supplied mention,
/// refused short query) are ready on creation and have nothing to cancel.
///
/// Dropping a pending task, or calling [`ResolveTask::cancel`], drops the
/// in-flight gateway future with it; no outcome is produced.
#[must_use = "a ResolveTask does nothing unless awaited"]
pub struct ResolveTask {
    state: TaskState,
}

impl ResolveTask {
    pub(crate) fn ready(outcome: Outcome) -> Self {
        Self {
            state: TaskState::Ready(Some(outcome)),
        }
    }

    pub(crate) fn pending<F>(future: F) -> Self
    where
        F: Future<Output = FinderResult<Outcome>> + Send + 'static,
    {
        Self {
            state: TaskState::Pending(future.boxed()),
        }
    }

    /// True if the outcome is already known and awaiting will not suspend.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, TaskState::Ready(Some(_)))
    }

    /// Takes a pre-completed outcome without polling.
    pub(crate) fn take_ready(&mut self) -> Option<Outcome> {
        match &mut self.state {
            TaskState::Ready(slot) => {
                let outcome = slot.take();
                self.state = TaskState::Finished;
                outcome
            }
            _ => None,
        }
    }

    /// Cancels the task. Returns true if a gateway call was still in flight.
    pub fn cancel(self) -> bool {
        matches!(self.state, TaskState::Pending(_))
    }
}

impl Future for ResolveTask {
    type Output = FinderResult<Outcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match &mut this.state {
            TaskState::Ready(slot) => {
                let outcome = slot.take().expect("ResolveTask polled after completion");
                this.state = TaskState::Finished;
                Poll::Ready(Ok(outcome))
            }
            TaskState::Pending(future) => {
                let result = ready!(future.as_mut().poll(cx));
                this.state = TaskState::Finished;
                Poll::Ready(result)
            }
            TaskState::Finished => panic!("ResolveTask polled after completion"),
        }
    }
}

impl Drop for ResolveTask {
    fn drop(&mut self) {
        if matches!(self.state, TaskState::Pending(_)) {
            trace!("resolution dropped before the gateway answered");
        }
    }
}

impl fmt::Debug for ResolveTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            TaskState::Ready(_) => "ready",
            TaskState::Pending(_) => "pending",
            TaskState::Finished => "finished",
        };
        f.debug_struct("ResolveTask").field("state", &state).finish()
    }
}
