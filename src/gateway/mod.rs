//! The directory the resolver queries.
//!
//! These traits define the contract a directory backend must implement. The
//! resolver only ever issues one call per resolution, never retries, and
//! propagates [`GatewayError`] untouched. Latency, caching, rate limiting,
//! and retry policy all belong to the implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::candidate::{CandidateEntry, CandidateId};

pub mod memory;

pub use crate::error::GatewayError;
pub use memory::{GatewayCall, InMemoryDirectory, DEFAULT_CALL_LOG_CAPACITY};

/// A remote directory of named, identified records.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// Fetch a single record by id. `Ok(None)` when no such record exists.
    async fn lookup_by_id(&self, id: CandidateId) -> Result<Option<CandidateEntry>, GatewayError>;

    /// Case-insensitive prefix search on names, returning at most `limit`
    /// records in directory-defined order.
    async fn search_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<CandidateEntry>, GatewayError>;

    /// Records the caller already resolved out of band (for example, the
    /// mentions parsed from the message carrying the query). No I/O.
    fn mentioned_entries(&self) -> Vec<CandidateEntry> {
        Vec::new()
    }
}

#[async_trait]
impl<G: DirectoryGateway + ?Sized> DirectoryGateway for Arc<G> {
    async fn lookup_by_id(&self, id: CandidateId) -> Result<Option<CandidateEntry>, GatewayError> {
        (**self).lookup_by_id(id).await
    }

    async fn search_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<CandidateEntry>, GatewayError> {
        (**self).search_by_prefix(prefix, limit).await
    }

    fn mentioned_entries(&self) -> Vec<CandidateEntry> {
        (**self).mentioned_entries()
    }
}

/// Binds a per-message mention list to a shared directory.
///
/// Remote operations go to the wrapped gateway; `mentioned_entries` returns
/// the bound list instead.
///
/// ```
/// use std::sync::Arc;
///
/// use memberfind::gateway::{DirectoryGateway, InMemoryDirectory, WithMentions};
/// use memberfind::{CandidateEntry, CandidateId};
///
/// let directory = Arc::new(InMemoryDirectory::new());
/// let mention = CandidateEntry::new(CandidateId::new(1), "Kodehawa", "0001");
/// let scoped = WithMentions::new(directory, vec![mention.clone()]);
/// assert_eq!(scoped.mentioned_entries(), vec![mention]);
/// ```
#[derive(Debug, Clone)]
pub struct WithMentions<G> {
    inner: G,
    mentions: Vec<CandidateEntry>,
}

impl<G> WithMentions<G> {
    /// Wraps `inner` with the given mentions.
    pub fn new(inner: G, mentions: Vec<CandidateEntry>) -> Self {
        Self { inner, mentions }
    }

    /// The wrapped gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: DirectoryGateway> DirectoryGateway for WithMentions<G> {
    async fn lookup_by_id(&self, id: CandidateId) -> Result<Option<CandidateEntry>, GatewayError> {
        self.inner.lookup_by_id(id).await
    }

    async fn search_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<CandidateEntry>, GatewayError> {
        self.inner.search_by_prefix(prefix, limit).await
    }

    fn mentioned_entries(&self) -> Vec<CandidateEntry> {
        self.mentions.clone()
    }
}
