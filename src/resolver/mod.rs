//! Query resolution.
//!
//! [`Resolver`] turns a raw query into a single [`Outcome`], asking the
//! directory at most once. The non-blocking driver returns a
//! [`ResolveTask`]; the blocking driver parks the calling thread and is only
//! safe on a dedicated thread (see [`blocking`]). Both run the same
//! classification, guards, and matching, so they always agree.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::candidate::CandidateEntry;
use crate::config::ResolverConfig;
use crate::error::{ConfigError, FinderResult};
use crate::gateway::DirectoryGateway;
use crate::outcome::Outcome;

pub mod blocking;
mod plan;
mod task;

pub use blocking::BlockingResolve;
pub use task::ResolveTask;

use plan::Step;

/// Resolves free-form queries against a [`DirectoryGateway`].
///
/// Stateless apart from its configuration; cheap to clone and safe to share
/// across concurrent resolutions.
///
/// # Example
/// ```rust,ignore
/// let resolver = Resolver::new();
/// match resolver.resolve_async("Kodehawa#0001", gateway).await? {
///     Outcome::Resolved(member) => println!("found {}", member.tag()),
///     Outcome::Ambiguous(list) => println!("did you mean: {}", list.tags().join(", ")),
///     other => println!("no match: {}", other.kind()),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: Arc<ResolverConfig>,
}

impl Resolver {
    /// Creates a resolver with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with a validated configuration.
    pub fn with_config(config: ResolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `query` without blocking.
    ///
    /// The returned task is already complete when no gateway call is needed.
    /// Gateway errors are returned as-is inside [`crate::FinderError::Gateway`].
    pub fn resolve_async<G>(&self, query: &str, gateway: Arc<G>) -> ResolveTask
    where
        G: DirectoryGateway + ?Sized + 'static,
    {
        match plan::plan(&self.config, query, &*gateway) {
            Step::Done(outcome) => {
                debug!(outcome = outcome.kind(), "resolved without the gateway");
                ResolveTask::ready(outcome)
            }
            Step::Lookup(id) => ResolveTask::pending(async move {
                let found = gateway.lookup_by_id(id).await?;
                Ok(plan::settle_lookup(id, found))
            }),
            Step::Search(search) => {
                let display_limit = self.config.ambiguous_display_limit;
                ResolveTask::pending(async move {
                    let candidates = gateway.search_by_prefix(&search.prefix, search.limit).await?;
                    Ok(search.settle(candidates, display_limit))
                })
            }
        }
    }

    /// Like [`Resolver::resolve_async`], but an empty query selects `default`
    /// instead of producing [`Outcome::NoSelection`].
    pub fn resolve_or_default<G>(&self, query: &str, gateway: Arc<G>, default: CandidateEntry) -> ResolveTask
    where
        G: DirectoryGateway + ?Sized + 'static,
    {
        if query.trim().is_empty() {
            return ResolveTask::ready(Outcome::Resolved(default));
        }
        self.resolve_async(query, gateway)
    }

    /// Starts a blocking resolution; wait on it with
    /// [`BlockingResolve::join`] or [`BlockingResolve::join_timeout`].
    ///
    /// The gateway call runs on `handle`'s runtime. See [`blocking`] for why
    /// the caller must not be a thread driving that runtime.
    pub fn start_blocking<G>(&self, query: &str, gateway: Arc<G>, handle: &Handle) -> BlockingResolve
    where
        G: DirectoryGateway + ?Sized + 'static,
    {
        BlockingResolve::start(self.resolve_async(query, gateway), handle)
    }

    /// Resolves `query`, parking the calling thread until the gateway answers.
    ///
    /// Deadlocks if called from a thread driving `handle`'s runtime.
    pub fn resolve_blocking<G>(&self, query: &str, gateway: Arc<G>, handle: &Handle) -> FinderResult<Outcome>
    where
        G: DirectoryGateway + ?Sized + 'static,
    {
        self.start_blocking(query, gateway, handle).join()
    }

    /// Like [`Resolver::resolve_blocking`], giving up after `timeout`.
    pub fn resolve_blocking_timeout<G>(
        &self,
        query: &str,
        gateway: Arc<G>,
        handle: &Handle,
        timeout: Duration,
    ) -> FinderResult<Outcome>
    where
        G: DirectoryGateway + ?Sized + 'static,
    {
        self.start_blocking(query, gateway, handle).join_timeout(timeout)
    }

    /// Blocking twin of [`Resolver::resolve_or_default`].
    pub fn resolve_or_default_blocking<G>(
        &self,
        query: &str,
        gateway: Arc<G>,
        handle: &Handle,
        default: CandidateEntry,
    ) -> FinderResult<Outcome>
    where
        G: DirectoryGateway + ?Sized + 'static,
    {
        BlockingResolve::start(self.resolve_or_default(query, gateway, default), handle).join()
    }
}
